use ark_ff::{BigInteger, PrimeField};
use ark_serialize::CanonicalDeserialize;
use num_bigint::BigUint;
use thiserror::Error;

// Field helpers error
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHelpersError {
    #[error("failed to deserialize field bytes")]
    DeserializeBytes,
    #[error("value does not fit in {0} bits")]
    TooWide(usize),
}
pub type Result<T> = std::result::Result<T, FieldHelpersError>;

/// Field element helpers
pub trait FieldHelpers<F> {
    /// Deserialize from bytes
    fn from_bytes(bytes: &[u8]) -> Result<F>;

    /// Deserialize from little-endian bits
    fn from_bits(bits: &[bool]) -> Result<F>;

    /// Serialize to bytes
    fn to_bytes(&self) -> Vec<u8>;

    /// Serialize to little-endian bits
    fn to_bits(&self) -> Vec<bool>;

    /// Canonical integer representative
    fn to_biguint(&self) -> BigUint;

    /// Canonical representative as a native word, if it fits in 64 bits
    fn to_u64(&self) -> Result<u64>;
}

impl<F: PrimeField> FieldHelpers<F> for F {
    fn from_bytes(bytes: &[u8]) -> Result<F> {
        F::deserialize_compressed(bytes).map_err(|_| FieldHelpersError::DeserializeBytes)
    }

    fn from_bits(bits: &[bool]) -> Result<F> {
        let mut bytes = F::zero().to_bytes();
        if bits.len() > 8 * bytes.len() {
            return Err(FieldHelpersError::DeserializeBytes);
        }
        for (i, bit) in bits.iter().enumerate() {
            bytes[i / 8] |= (*bit as u8) << (i % 8);
        }
        F::from_bytes(&bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.into_bigint().to_bytes_le()
    }

    fn to_bits(&self) -> Vec<bool> {
        self.to_bytes().iter().fold(vec![], |mut bits, byte| {
            let mut byte = *byte;
            for _ in 0..8 {
                bits.push(byte & 0x01 == 0x01);
                byte >>= 1;
            }
            bits
        })
    }

    fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.to_bytes())
    }

    fn to_u64(&self) -> Result<u64> {
        u64::try_from(&self.to_biguint()).map_err(|_| FieldHelpersError::TooWide(64))
    }
}

/// Returns `2^exp` as a field element
pub fn pow2<F: PrimeField>(exp: usize) -> F {
    F::from(2u64).pow([exp as u64])
}
