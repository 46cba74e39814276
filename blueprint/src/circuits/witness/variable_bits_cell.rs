use super::{variables::Variables, WitnessCell};
use crate::{
    circuits::{assignment::AssignmentTable, window::Window},
    error::AssignmentError,
};
use ark_ff::PrimeField;
use blueprint_utils::FieldHelpers;

/// Witness cell assigned from bits of a variable
/// See [Variables] for more details
pub struct VariableBitsCell<'a> {
    name: &'a str,
    start: usize, // inclusive
    end: usize,   // exclusive
}

impl<'a> VariableBitsCell<'a> {
    /// Create witness cell assigned from the bits [start, end) of named variable
    pub fn create(name: &'a str, start: usize, end: usize) -> Box<VariableBitsCell<'a>> {
        Box::new(VariableBitsCell { name, start, end })
    }
}

impl<'a, F: PrimeField> WitnessCell<F> for VariableBitsCell<'a> {
    fn value(
        &self,
        _table: &AssignmentTable<F>,
        _window: &Window,
        variables: &Variables<F>,
    ) -> Result<F, AssignmentError> {
        let bits = variables.get(self.name)?.to_bits();
        let end = self.end.min(bits.len());
        let start = self.start.min(end);
        Ok(F::from_bits(&bits[start..end])?)
    }
}
