//! This module implements the error types raised while building a circuit.
//!
//! Each stage of a build has its own error type; [`BuildError`] is the single
//! terminal error a caller sees for a failed build attempt.

use crate::circuits::variable::{ColumnType, Variable};
use blueprint_utils::FieldHelpersError;
use thiserror::Error;

/// Errors raised when a component is instantiated over a window
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("{component} expects {expected} input variables, got {got}")]
    WrongArity {
        component: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{component} expects an array of pairs, got {len} elements")]
    OddArray { component: &'static str, len: usize },

    #[error("{component} has no layout for {columns} witness columns")]
    UnsupportedPreset {
        component: &'static str,
        columns: usize,
    },

    #[error("{component} needs {needed} witness columns but its window has {got}")]
    WindowTooNarrow {
        component: &'static str,
        needed: usize,
        got: usize,
    },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Errors raised while computing a manifest from static parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("{component} requires at least one block")]
    ZeroBlocks { component: &'static str },

    #[error("{num_bits} bits cannot be carried by {num_blocks} blocks of 64 bits")]
    BitsOutOfRange { num_bits: usize, num_blocks: usize },

    #[error("a {word_bits} bit word does not fit in a {field_bits} bit field")]
    WordTooWide { word_bits: usize, field_bits: usize },

    #[error("{component} requires a non-empty array")]
    EmptyArray { component: &'static str },

    #[error("{component} cannot be laid out over {columns} witness columns")]
    NoAcceptableColumns {
        component: &'static str,
        columns: usize,
    },
}

/// Errors raised by the assignment table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("column {index} is out of range for {kind:?} columns (declared: {declared})")]
    ColumnOutOfRange {
        kind: ColumnType,
        index: usize,
        declared: usize,
    },

    #[error("cell {0} was read before being assigned")]
    UnassignedCell(Variable),

    #[error("cell {0} was already assigned")]
    CellOverwritten(Variable),

    #[error("cell {0} resolves to a negative row")]
    NegativeRow(Variable),

    #[error("cell {0} is relative and must be resolved against a row first")]
    UnresolvedRotation(Variable),

    #[error("selector columns cannot be written directly: {0}")]
    SelectorWrite(Variable),
}

/// Errors raised by the constraint system, including failed satisfaction checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error(
        "the gate of {component} (selector {selector}) is not satisfied at row {row}: constraint {constraint}"
    )]
    GateNotSatisfied {
        component: String,
        selector: usize,
        row: usize,
        constraint: usize,
    },

    #[error("the copy class containing {first} and {second} holds different values")]
    InconsistentCopyClass { first: Variable, second: Variable },

    #[error(
        "the lookup {lookup} of {component} (selector {selector}) at row {row} is not in table {table}"
    )]
    LookupFailed {
        component: String,
        selector: usize,
        row: usize,
        lookup: usize,
        table: i32,
    },

    #[error("lookup table {0} is not registered")]
    UnknownTable(i32),

    #[error("lookup table {0} is already registered with different contents")]
    TableConflict(i32),

    #[error("no selector column left for {component} (declared: {declared})")]
    SelectorOverflow {
        component: String,
        declared: usize,
    },

    #[error("copy constraints need two distinct absolute cells: ({0}, {1})")]
    InvalidCopy(Variable, Variable),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Errors raised by the row/column allocator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("not enough {kind:?} columns: needed {needed}, declared {declared}")]
    NotEnoughColumns {
        kind: ColumnType,
        needed: usize,
        declared: usize,
    },
}

/// Errors raised while generating a witness for concrete inputs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("input {index} of {component} does not fit in {bits} bits")]
    InputOutOfRange {
        component: &'static str,
        index: usize,
        bits: usize,
    },

    #[error("input {index} of {component} must be boolean")]
    NotBoolean {
        component: &'static str,
        index: usize,
    },

    #[error("the witness variable {0} is missing from the layout variables")]
    MissingVariable(String),

    #[error("failed to convert field element: {0}")]
    Field(#[from] FieldHelpersError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Errors raised when the component protocol is driven out of order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("{component}: {operation} expects state {expected}, found {found}")]
    OutOfOrder {
        component: &'static str,
        operation: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{outstanding} allocated instances were never assigned")]
    Unfinished { outstanding: usize },
}

/// The terminal error of a circuit build attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("construction failed: {0}")]
    Construction(#[from] ConstructionError),

    #[error("invalid shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("table error: {0}")]
    Table(#[from] TableError),

    #[error("circuit error: {0}")]
    Circuit(#[from] CircuitError),

    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    #[error("assignment failed: {0}")]
    Assignment(#[from] AssignmentError),

    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("the assignment does not satisfy the circuit (component bug): {0}")]
    Consistency(CircuitError),
}
