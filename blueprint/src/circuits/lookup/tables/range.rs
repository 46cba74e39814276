//! Range tables
//!
//! A range table is a single-column table containing the numbers from 0 to
//! `2^bits` (excluded). Looking a value up in it checks that the value fits in
//! `bits` bits. The zero-bit table contains only zero.

use super::{LookupTable, TableContents};
use ark_ff::PrimeField;

/// The table ID of the 0-bit range table. The `n`-bit table has ID
/// `RANGE_TABLE_ID_OFFSET + n`.
pub const RANGE_TABLE_ID_OFFSET: i32 = 16;

/// The table ID of the `bits`-bit range table
pub fn range_table_id(bits: usize) -> i32 {
    RANGE_TABLE_ID_OFFSET + bits as i32
}

/// The single-column table `[0, 2^bits)`
pub fn range_table<F: PrimeField>(bits: usize) -> LookupTable<F> {
    LookupTable {
        id: range_table_id(bits),
        contents: TableContents::Range { bits },
    }
}
