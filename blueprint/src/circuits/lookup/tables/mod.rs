use ark_ff::PrimeField;
use blueprint_utils::{BigUintHelpers, FieldHelpers};
use std::collections::HashSet;

pub mod range;

pub use range::{range_table, range_table_id, RANGE_TABLE_ID_OFFSET};

/// The largest range table that is materialized row by row for a backend
pub const MAX_MATERIALIZED_RANGE_BITS: usize = 16;

/// The rows of a lookup table
#[derive(Clone, Debug)]
pub enum TableContents<F> {
    /// Explicit rows, stored column-major. `rows` indexes them for membership.
    Columns {
        data: Vec<Vec<F>>,
        rows: HashSet<Vec<F>>,
    },
    /// The single-column table `[0, 2^bits)`, checked by bound
    Range { bits: usize },
}

// `rows` is derived from `data`, so only `data` takes part in equality.
impl<F: PartialEq> PartialEq for TableContents<F> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TableContents::Columns { data: a, .. }, TableContents::Columns { data: b, .. }) => {
                a == b
            }
            (TableContents::Range { bits: a }, TableContents::Range { bits: b }) => a == b,
            _ => false,
        }
    }
}

impl<F: Eq> Eq for TableContents<F> {}

/// A table of values that can be used for a lookup, along with the ID for the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupTable<F> {
    pub id: i32,
    pub contents: TableContents<F>,
}

impl<F: PrimeField> LookupTable<F> {
    /// Creates a table from column-major `data`.
    /// Columns shorter than the first are padded with zero.
    pub fn from_columns(id: i32, data: Vec<Vec<F>>) -> Self {
        let len = data.first().map_or(0, Vec::len);
        let rows = (0..len)
            .map(|i| {
                data.iter()
                    .map(|column| column.get(i).copied().unwrap_or_else(F::zero))
                    .collect()
            })
            .collect();
        LookupTable {
            id,
            contents: TableContents::Columns { data, rows },
        }
    }

    /// Number of columns of an entry
    pub fn width(&self) -> usize {
        match &self.contents {
            TableContents::Columns { data, .. } => data.len(),
            TableContents::Range { .. } => 1,
        }
    }

    /// Number of rows of the table
    pub fn len(&self) -> usize {
        match &self.contents {
            TableContents::Columns { data, .. } => data.first().map_or(0, Vec::len),
            TableContents::Range { bits } => 1usize.checked_shl(*bits as u32).unwrap_or(usize::MAX),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return true if `entry` is a row of the table.
    /// An entry of the wrong width is never a member.
    pub fn contains(&self, entry: &[F]) -> bool {
        if entry.len() != self.width() {
            return false;
        }
        match &self.contents {
            TableContents::Columns { rows, .. } => rows.contains(entry),
            TableContents::Range { bits } => entry[0].to_biguint().fits_in(*bits),
        }
    }

    /// Return true if the table has an entry containing all zeros.
    pub fn has_zero_entry(&self) -> bool {
        self.contains(&vec![F::zero(); self.width()])
    }

    /// Explicit column-major rows of the table, for tables small enough to
    /// be committed to row by row.
    pub fn materialize(&self) -> Option<Vec<Vec<F>>> {
        match &self.contents {
            TableContents::Columns { data, .. } => Some(data.clone()),
            TableContents::Range { bits } if *bits <= MAX_MATERIALIZED_RANGE_BITS => {
                Some(vec![(0..1u64 << bits).map(F::from).collect()])
            }
            TableContents::Range { .. } => None,
        }
    }
}
