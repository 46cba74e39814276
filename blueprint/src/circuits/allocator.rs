//! The row/column allocator.
//!
//! Components are placed one after another: each allocation starts at the
//! row cursor and advances it by the manifest's row count. Every component
//! reuses the table's columns from column 0, so the used width is the widest
//! manifest seen so far.

use crate::{
    circuits::{config::TableConfig, manifest::Manifest, variable::ColumnType, window::Window},
    error::AllocationError,
};
use log::debug;

/// A bump allocator over the rows of the table
#[derive(Clone, Debug)]
pub struct Allocator {
    cursor: usize,
    used_witness_columns: usize,
    witness_columns: usize,
    constant_columns: usize,
    public_input_columns: usize,
}

impl Allocator {
    pub fn new(config: &TableConfig) -> Self {
        Self {
            cursor: 0,
            used_witness_columns: 0,
            witness_columns: config.witness_columns,
            constant_columns: config.constant_columns,
            public_input_columns: config.public_input_columns,
        }
    }

    /// The next free row
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The widest witness window handed out so far
    pub fn used_witness_columns(&self) -> usize {
        self.used_witness_columns
    }

    /// Witness columns declared in the table
    pub fn available_witness_columns(&self) -> usize {
        self.witness_columns
    }

    /// Reserves `rows` rows without placing a component on them
    pub fn skip_rows(&mut self, rows: usize) -> usize {
        let start = self.cursor;
        self.cursor += rows;
        start
    }

    /// The window a component of shape `manifest` would get, without
    /// reserving it
    pub fn peek(&self, manifest: &Manifest) -> Result<Window, AllocationError> {
        let check = |kind, needed, declared| {
            if needed > declared {
                Err(AllocationError::NotEnoughColumns {
                    kind,
                    needed,
                    declared,
                })
            } else {
                Ok(())
            }
        };
        check(
            ColumnType::Witness,
            manifest.witness_columns,
            self.witness_columns,
        )?;
        check(
            ColumnType::Constant,
            manifest.constant_columns,
            self.constant_columns,
        )?;
        check(
            ColumnType::PublicInput,
            manifest.public_input_columns,
            self.public_input_columns,
        )?;

        Ok(Window {
            witness: (0..manifest.witness_columns).collect(),
            constant: (0..manifest.constant_columns).collect(),
            public_input: (0..manifest.public_input_columns).collect(),
            start_row: self.cursor,
        })
    }

    /// Reserves the rows of `manifest` at the cursor.
    /// Only call this with a manifest [`Allocator::peek`] accepted.
    pub fn commit(&mut self, manifest: &Manifest) -> usize {
        if manifest.witness_columns > self.used_witness_columns {
            debug!(
                "widening witness columns from {} to {}",
                self.used_witness_columns, manifest.witness_columns
            );
            self.used_witness_columns = manifest.witness_columns;
        }
        let start = self.skip_rows(manifest.rows);
        debug!(
            "allocated rows {}..{} over {} witness columns",
            start, self.cursor, manifest.witness_columns
        );
        start
    }

    /// Places a component of shape `manifest` at the cursor
    pub fn allocate(&mut self, manifest: &Manifest) -> Result<Window, AllocationError> {
        let window = self.peek(manifest)?;
        self.commit(manifest);
        Ok(window)
    }
}
