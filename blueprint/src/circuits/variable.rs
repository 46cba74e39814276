//! This module implements [`Variable`], a typed reference to one cell of the
//! assignment table.

use crate::error::TableError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of column a [`Variable`] points into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ColumnType {
    Witness,
    PublicInput,
    Constant,
    Selector,
}

impl ColumnType {
    fn prefix(self) -> &'static str {
        match self {
            ColumnType::Witness => "W",
            ColumnType::PublicInput => "P",
            ColumnType::Constant => "C",
            ColumnType::Selector => "S",
        }
    }
}

/// A cell of the table.
///
/// A variable never owns a value. When `relative` is set, `row` is a rotation
/// applied to the row a gate is evaluated at, otherwise it is an absolute row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub column_type: ColumnType,
    pub index: usize,
    pub row: i64,
    pub relative: bool,
}

impl Variable {
    pub fn new(column_type: ColumnType, index: usize, row: usize) -> Self {
        Self {
            column_type,
            index,
            row: row as i64,
            relative: false,
        }
    }

    pub fn rotation(column_type: ColumnType, index: usize, rotation: i64) -> Self {
        Self {
            column_type,
            index,
            row: rotation,
            relative: true,
        }
    }

    pub fn witness(index: usize, row: usize) -> Self {
        Self::new(ColumnType::Witness, index, row)
    }

    pub fn public_input(index: usize, row: usize) -> Self {
        Self::new(ColumnType::PublicInput, index, row)
    }

    pub fn constant(index: usize, row: usize) -> Self {
        Self::new(ColumnType::Constant, index, row)
    }

    pub fn selector(index: usize, row: usize) -> Self {
        Self::new(ColumnType::Selector, index, row)
    }

    pub fn witness_rel(index: usize, rotation: i64) -> Self {
        Self::rotation(ColumnType::Witness, index, rotation)
    }

    pub fn constant_rel(index: usize, rotation: i64) -> Self {
        Self::rotation(ColumnType::Constant, index, rotation)
    }

    /// Turns a relative variable into the absolute cell it names when its gate
    /// is evaluated at `base_row`. Absolute variables are returned unchanged.
    pub fn resolve(&self, base_row: usize) -> Result<Variable, TableError> {
        if !self.relative {
            return Ok(*self);
        }
        let row = base_row as i64 + self.row;
        if row < 0 {
            return Err(TableError::NegativeRow(*self));
        }
        Ok(Variable {
            row,
            relative: false,
            ..*self
        })
    }

    /// The absolute row of this variable
    pub fn absolute_row(&self) -> Result<usize, TableError> {
        if self.relative {
            return Err(TableError::UnresolvedRotation(*self));
        }
        usize::try_from(self.row).map_err(|_| TableError::NegativeRow(*self))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.column_type.prefix();
        if self.relative {
            write!(f, "{prefix}{}[{:+}]", self.index, self.row)
        } else {
            write!(f, "{prefix}{}@{}", self.index, self.row)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn resolve_rotation() {
        let var = Variable::witness_rel(3, -1);
        assert_eq!(var.resolve(5), Ok(Variable::witness(3, 4)));
        assert_eq!(var.resolve(0), Err(TableError::NegativeRow(var)));
        assert_eq!(
            var.absolute_row(),
            Err(TableError::UnresolvedRotation(var))
        );
    }

    #[test]
    fn display() {
        assert_eq!(Variable::witness(2, 7).to_string(), "W2@7");
        assert_eq!(Variable::constant_rel(0, 1).to_string(), "C0[+1]");
        assert_eq!(Variable::public_input(0, 0).to_string(), "P0@0");
    }

    proptest! {
        #[test]
        fn absolute_variables_resolve_to_themselves(
            kind: ColumnType,
            index in 0usize..32,
            row in 0usize..1024,
            base in 0usize..1024,
        ) {
            let var = Variable::new(kind, index, row);
            prop_assert_eq!(var.resolve(base), Ok(var));
            prop_assert_eq!(var.absolute_row(), Ok(row));
        }
    }
}
