//! This module contains the components shipped with the crate.

pub mod array_swap;
pub mod division_or_zero;
pub mod padding;
