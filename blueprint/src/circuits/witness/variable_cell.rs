use super::{variables::Variables, WitnessCell};
use crate::{
    circuits::{assignment::AssignmentTable, window::Window},
    error::AssignmentError,
};
use ark_ff::Field;

/// Witness cell assigned from a variable
/// See [Variables] for more details
pub struct VariableCell<'a> {
    name: &'a str,
}

impl<'a> VariableCell<'a> {
    /// Create witness cell assigned from a variable name
    pub fn create(name: &'a str) -> Box<VariableCell<'a>> {
        Box::new(VariableCell { name })
    }
}

impl<'a, F: Field> WitnessCell<F> for VariableCell<'a> {
    fn value(
        &self,
        _table: &AssignmentTable<F>,
        _window: &Window,
        variables: &Variables<F>,
    ) -> Result<F, AssignmentError> {
        variables.get(self.name)
    }
}
