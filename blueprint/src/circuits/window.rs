//! The slice of the table a component instance owns.

use crate::circuits::{expr::Expr, variable::Variable};
use serde::{Deserialize, Serialize};

/// Columns and first row of a component instance.
///
/// Components address their cells through local column indices; the window
/// maps them to table columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub witness: Vec<usize>,
    pub constant: Vec<usize>,
    pub public_input: Vec<usize>,
    pub start_row: usize,
}

impl Window {
    /// A window over the first `witness` witness columns and first
    /// `constant` constant columns
    pub fn contiguous(witness: usize, constant: usize, start_row: usize) -> Self {
        Self {
            witness: (0..witness).collect(),
            constant: (0..constant).collect(),
            public_input: vec![],
            start_row,
        }
    }

    /// Table column of local witness column `i`
    pub fn w(&self, i: usize) -> usize {
        self.witness[i]
    }

    /// Table column of local constant column `i`
    pub fn c(&self, i: usize) -> usize {
        self.constant[i]
    }

    /// Absolute witness cell at local column `col`, `row` rows below the start
    pub fn var(&self, col: usize, row: usize) -> Variable {
        Variable::witness(self.w(col), self.start_row + row)
    }

    /// Absolute constant cell at local column `col`, `row` rows below the start
    pub fn constant_var(&self, col: usize, row: usize) -> Variable {
        Variable::constant(self.c(col), self.start_row + row)
    }

    /// Witness cell at local column `col`, `rotation` rows from the gate row
    pub fn rel(&self, col: usize, rotation: i64) -> Variable {
        Variable::witness_rel(self.w(col), rotation)
    }

    /// [`Window::rel`] as an expression
    pub fn cell<F>(&self, col: usize, rotation: i64) -> Expr<F> {
        self.rel(col, rotation).into()
    }
}
