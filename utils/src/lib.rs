pub mod biguint_helpers;
pub mod field_helpers;
pub mod math;

pub use biguint_helpers::BigUintHelpers;
pub use field_helpers::{FieldHelpers, FieldHelpersError};
