//! Small helpers for [`BigUint`] values that represent field elements.
use num_bigint::BigUint;

/// Helpers for BigUint
pub trait BigUintHelpers {
    /// Returns true when the value fits in `bits` bits
    fn fits_in(&self, bits: usize) -> bool;
}

impl BigUintHelpers for BigUint {
    fn fits_in(&self, bits: usize) -> bool {
        self.bits() as usize <= bits
    }
}
