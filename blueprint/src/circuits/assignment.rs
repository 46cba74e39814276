//! This module implements the [`AssignmentTable`], the grid of field elements
//! filled by the components' assignment generation.
//!
//! Witness, public-input and constant cells are written at most once. Reading
//! a cell that was never written is an error, so a component that forgets a
//! cell its gate reads is caught instead of silently reading zero. Selector
//! cells are owned by the circuit builder and default to zero.

use crate::{
    circuits::{
        config::TableConfig,
        variable::{ColumnType, Variable},
    },
    error::TableError,
};
use ark_ff::Field;

/// The assignment table
#[derive(Clone, Debug)]
pub struct AssignmentTable<F> {
    witness: Vec<Vec<Option<F>>>,
    public_input: Vec<Vec<Option<F>>>,
    constant: Vec<Vec<Option<F>>>,
    selector: Vec<Vec<bool>>,
    rows: usize,
}

impl<F: Field> AssignmentTable<F> {
    /// Creates an empty table with the column counts declared by `config`
    pub fn new(config: &TableConfig) -> Self {
        Self {
            witness: vec![vec![]; config.witness_columns],
            public_input: vec![vec![]; config.public_input_columns],
            constant: vec![vec![]; config.constant_columns],
            selector: vec![vec![]; config.selector_columns],
            rows: 0,
        }
    }

    /// Number of rows used so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Declared number of columns of the given kind
    pub fn columns(&self, kind: ColumnType) -> usize {
        match kind {
            ColumnType::Witness => self.witness.len(),
            ColumnType::PublicInput => self.public_input.len(),
            ColumnType::Constant => self.constant.len(),
            ColumnType::Selector => self.selector.len(),
        }
    }

    /// Grows every column to at least `rows` rows
    pub fn ensure_rows(&mut self, rows: usize) {
        if rows <= self.rows {
            return;
        }
        self.rows = rows;
        for column in self
            .witness
            .iter_mut()
            .chain(self.public_input.iter_mut())
            .chain(self.constant.iter_mut())
        {
            column.resize(rows, None);
        }
        for column in self.selector.iter_mut() {
            column.resize(rows, false);
        }
    }

    fn check_column(&self, var: &Variable) -> Result<(), TableError> {
        let declared = self.columns(var.column_type);
        if var.index >= declared {
            return Err(TableError::ColumnOutOfRange {
                kind: var.column_type,
                index: var.index,
                declared,
            });
        }
        Ok(())
    }

    fn column_mut(&mut self, var: &Variable) -> Result<&mut Vec<Option<F>>, TableError> {
        self.check_column(var)?;
        match var.column_type {
            ColumnType::Witness => Ok(&mut self.witness[var.index]),
            ColumnType::PublicInput => Ok(&mut self.public_input[var.index]),
            ColumnType::Constant => Ok(&mut self.constant[var.index]),
            ColumnType::Selector => Err(TableError::SelectorWrite(*var)),
        }
    }

    fn slot_mut(&mut self, var: &Variable) -> Result<&mut Option<F>, TableError> {
        let row = var.absolute_row()?;
        self.check_column(var)?;
        self.ensure_rows(row + 1);
        let column = self.column_mut(var)?;
        Ok(&mut column[row])
    }

    /// Writes `value` into the cell named by `var`
    ///
    /// # Errors
    ///
    /// Fails if the cell already holds a value, if the column is not declared,
    /// or if `var` is a selector or a rotation.
    pub fn assign(&mut self, var: Variable, value: F) -> Result<(), TableError> {
        let slot = self.slot_mut(&var)?;
        if slot.is_some() {
            return Err(TableError::CellOverwritten(var));
        }
        *slot = Some(value);
        Ok(())
    }

    /// Overwrites a witness cell that may already hold a value.
    ///
    /// This is the only way to change an assigned cell; it exists to craft
    /// invalid witnesses for soundness tests.
    pub fn replace_witness(&mut self, var: Variable, value: F) -> Result<(), TableError> {
        if var.column_type != ColumnType::Witness {
            return Err(TableError::CellOverwritten(var));
        }
        *self.slot_mut(&var)? = Some(value);
        Ok(())
    }

    /// Returns true when the cell holds a value
    pub fn is_assigned(&self, var: &Variable) -> bool {
        self.value(var).is_ok()
    }

    /// Reads the value of an absolute cell
    pub fn value(&self, var: &Variable) -> Result<F, TableError> {
        let row = var.absolute_row()?;
        self.check_column(var)?;
        let cell = match var.column_type {
            ColumnType::Witness => self.witness[var.index].get(row).copied().flatten(),
            ColumnType::PublicInput => self.public_input[var.index].get(row).copied().flatten(),
            ColumnType::Constant => self.constant[var.index].get(row).copied().flatten(),
            ColumnType::Selector => {
                return Ok(if self.selector_enabled(var.index, row) {
                    F::one()
                } else {
                    F::zero()
                })
            }
        };
        cell.ok_or(TableError::UnassignedCell(*var))
    }

    /// Sets the selector cell `(index, row)` to one
    pub fn enable_selector(&mut self, index: usize, row: usize) -> Result<(), TableError> {
        self.check_column(&Variable::selector(index, row))?;
        self.ensure_rows(row + 1);
        self.selector[index][row] = true;
        Ok(())
    }

    /// Returns true when the selector cell `(index, row)` is one
    pub fn selector_enabled(&self, index: usize, row: usize) -> bool {
        self.selector
            .get(index)
            .and_then(|column| column.get(row))
            .copied()
            .unwrap_or(false)
    }

    /// Rows at which selector `index` is enabled
    pub fn enabled_rows(&self, index: usize) -> Vec<usize> {
        self.selector.get(index).map_or(vec![], |column| {
            column
                .iter()
                .enumerate()
                .filter_map(|(row, enabled)| enabled.then_some(row))
                .collect()
        })
    }

    /// The public input vector: the first public-input column up to the last
    /// assigned row
    pub fn public_inputs(&self) -> Vec<F> {
        let Some(column) = self.public_input.first() else {
            return vec![];
        };
        let len = column
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1);
        column[..len]
            .iter()
            .map(|cell| cell.unwrap_or_else(F::zero))
            .collect()
    }

    /// Column-major values of every column of `kind`, unassigned cells as zero,
    /// in the shape a proof system backend consumes
    pub fn columns_of(&self, kind: ColumnType) -> Vec<Vec<F>> {
        let dense = |columns: &Vec<Vec<Option<F>>>| {
            columns
                .iter()
                .map(|column| {
                    column
                        .iter()
                        .map(|cell| cell.unwrap_or_else(F::zero))
                        .collect()
                })
                .collect()
        };
        match kind {
            ColumnType::Witness => dense(&self.witness),
            ColumnType::PublicInput => dense(&self.public_input),
            ColumnType::Constant => dense(&self.constant),
            ColumnType::Selector => self
                .selector
                .iter()
                .map(|column| {
                    column
                        .iter()
                        .map(|enabled| if *enabled { F::one() } else { F::zero() })
                        .collect()
                })
                .collect(),
        }
    }
}
