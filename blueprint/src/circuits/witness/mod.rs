//! Declarative witness layouts.
//!
//! A layout is a grid of [`WitnessCell`]s laid over a component's window:
//! row `r`, column `c` of the layout is written to window-local witness cell
//! `(c, r)`. Cells are evaluated in row-major order.

use crate::{
    circuits::{assignment::AssignmentTable, window::Window},
    error::AssignmentError,
};
use ark_ff::Field;

mod constant_cell;
mod variable_bits_cell;
mod variable_cell;
mod variables;

pub use self::{
    constant_cell::ConstantCell,
    variable_bits_cell::VariableBitsCell,
    variable_cell::VariableCell,
    variables::{variable_map, variables, Variables},
};

/// Witness cell interface
pub trait WitnessCell<F: Field> {
    fn value(
        &self,
        table: &AssignmentTable<F>,
        window: &Window,
        variables: &Variables<F>,
    ) -> Result<F, AssignmentError>;
}

/// A layout row; `None` leaves the cell untouched
pub type LayoutRow<'a, F> = Vec<Option<Box<dyn WitnessCell<F> + 'a>>>;

/// Initialize a witness cell based on layout and computed variables
pub fn init_cell<F: Field>(
    table: &mut AssignmentTable<F>,
    window: &Window,
    row: usize,
    col: usize,
    layout: &[LayoutRow<F>],
    variables: &Variables<F>,
) -> Result<(), AssignmentError> {
    if let Some(cell) = &layout[row][col] {
        let value = cell.value(table, window, variables)?;
        table.assign(window.var(col, row), value)?;
    }
    Ok(())
}

/// Initialize a witness row based on layout and computed variables
pub fn init_row<F: Field>(
    table: &mut AssignmentTable<F>,
    window: &Window,
    row: usize,
    layout: &[LayoutRow<F>],
    variables: &Variables<F>,
) -> Result<(), AssignmentError> {
    for col in 0..layout[row].len() {
        init_cell(table, window, row, col, layout, variables)?;
    }
    Ok(())
}

/// Initialize a witness based on layout and computed variables
pub fn init<F: Field>(
    table: &mut AssignmentTable<F>,
    window: &Window,
    layout: &[LayoutRow<F>],
    variables: &Variables<F>,
) -> Result<(), AssignmentError> {
    for row in 0..layout.len() {
        init_row(table, window, row, layout, variables)?;
    }
    Ok(())
}
