//! This module implements the gate, lookup and copy constraints that a
//! component emits into the [`Circuit`](super::constraints::Circuit).

use crate::{
    circuits::{expr::Expr, variable::Variable},
    error::CircuitError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tuple of expressions whose value at an enabled row must be a row of
/// lookup table `table_id`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupConstraint<F> {
    pub table_id: i32,
    pub entry: Vec<Expr<F>>,
}

impl<F> LookupConstraint<F> {
    pub fn new(table_id: i32, entry: Vec<Expr<F>>) -> Self {
        Self { table_id, entry }
    }

    /// A single-column lookup of `value`
    pub fn single(table_id: i32, value: Expr<F>) -> Self {
        Self::new(table_id, vec![value])
    }
}

/// The constraints a component places on one row, before a selector is
/// attached to them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateDef<F> {
    pub constraints: Vec<Expr<F>>,
    pub lookups: Vec<LookupConstraint<F>>,
}

impl<F> GateDef<F> {
    pub fn new(constraints: Vec<Expr<F>>) -> Self {
        Self {
            constraints,
            lookups: vec![],
        }
    }

    #[must_use]
    pub fn with_lookups(mut self, lookups: Vec<LookupConstraint<F>>) -> Self {
        self.lookups = lookups;
        self
    }
}

/// A selector-gated set of polynomial identities.
///
/// Constraints and lookups use relative variables and are checked at every
/// row where selector column `selector` is one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate<F> {
    pub selector: usize,
    /// Name of the component that emitted the gate
    pub component: String,
    pub constraints: Vec<Expr<F>>,
    pub lookups: Vec<LookupConstraint<F>>,
}

/// The shape of a gate: emitting gates twice for equal keys reuses the
/// selectors of the first emission
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateKey {
    pub component: String,
    /// Structural parameters, rendered
    pub params: String,
    pub witness_columns: Vec<usize>,
    pub constant_columns: Vec<usize>,
}

impl fmt::Display for GateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} over W{:?} C{:?}",
            self.component, self.params, self.witness_columns, self.constant_columns
        )
    }
}

/// Two absolute cells asserted equal by the permutation argument
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CopyConstraint(pub Variable, pub Variable);

impl CopyConstraint {
    /// # Errors
    ///
    /// Both cells must be absolute, distinct, and outside selector columns.
    pub fn new(a: Variable, b: Variable) -> Result<Self, CircuitError> {
        use crate::circuits::variable::ColumnType::Selector;
        if a == b
            || a.relative
            || b.relative
            || a.column_type == Selector
            || b.column_type == Selector
        {
            return Err(CircuitError::InvalidCopy(a, b));
        }
        Ok(CopyConstraint(a, b))
    }
}
