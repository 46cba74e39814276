//! Coordinate layout of the padding component.
//!
//! The component works in logical *steps*, one per 64-bit word plus a
//! terminal step. Five steps form a *stride*; each [`LayoutPreset`] maps a
//! stride onto a fixed block of rows through an explicit coordinate
//! template. Gates, copy constraints and the witness are all read off the
//! one [`PaddingLayout`] computed from the template.

use super::PaddingParams;
use crate::error::{ConstructionError, ShapeError};
use ark_ff::PrimeField;
use blueprint_utils::math::round_up_to;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Bits per message word
pub const WORD_BITS: usize = 64;

/// Logical steps per stride
pub const STEPS_PER_STRIDE: usize = 5;

/// A cell of a stride, as `(row offset within the stride, column)`
pub type Coordinate = (usize, usize);

/// The four cells of one step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StepCells<C = Coordinate> {
    /// The input word
    pub value: C,
    /// The high `shift` bits of `value`
    pub first: C,
    /// The low `64 - shift` bits of `value`
    pub second: C,
    /// `previous second * 2^shift + first`, the re-aligned word
    pub sum: C,
}

const fn step(row: usize, col: usize) -> StepCells {
    StepCells {
        value: (row, col),
        first: (row, col + 1),
        second: (row, col + 2),
        sum: (row, col + 3),
    }
}

/// Cell template of one stride
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrideTemplate {
    pub rows: usize,
    /// Carries the last `second` of the previous stride
    pub relay: Coordinate,
    pub steps: [StepCells; STEPS_PER_STRIDE],
}

const NINE_COLUMNS: StrideTemplate = StrideTemplate {
    rows: 3,
    relay: (0, 0),
    steps: [step(0, 1), step(0, 5), step(1, 0), step(1, 4), step(2, 0)],
};

const FIFTEEN_COLUMNS: StrideTemplate = StrideTemplate {
    rows: 2,
    relay: (0, 0),
    steps: [step(0, 1), step(0, 5), step(0, 9), step(1, 0), step(1, 4)],
};

/// Supported witness-column counts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum LayoutPreset {
    Nine,
    Fifteen,
}

impl LayoutPreset {
    /// The preset for `columns` witness columns, if there is one
    pub fn from_columns(columns: usize) -> Option<Self> {
        LayoutPreset::iter().find(|preset| preset.columns() == columns)
    }

    pub fn columns(self) -> usize {
        match self {
            LayoutPreset::Nine => 9,
            LayoutPreset::Fifteen => 15,
        }
    }

    pub fn template(self) -> &'static StrideTemplate {
        match self {
            LayoutPreset::Nine => &NINE_COLUMNS,
            LayoutPreset::Fifteen => &FIFTEEN_COLUMNS,
        }
    }

    /// Every supported column count
    pub fn all_columns() -> Vec<usize> {
        LayoutPreset::iter().map(LayoutPreset::columns).collect()
    }
}

/// Checks the static parameters and returns the shift.
///
/// `num_bits` must lie in `(64 * (num_blocks - 1), 64 * num_blocks]`, and
/// the field must hold any 64-bit word.
pub fn shift_of<F: PrimeField>(params: &PaddingParams) -> Result<usize, ShapeError> {
    let PaddingParams {
        num_blocks,
        num_bits,
    } = *params;
    if num_blocks == 0 {
        return Err(ShapeError::ZeroBlocks {
            component: super::PADDING_NAME,
        });
    }
    let field_bits = F::MODULUS_BIT_SIZE as usize;
    if field_bits <= WORD_BITS {
        return Err(ShapeError::WordTooWide {
            word_bits: WORD_BITS,
            field_bits,
        });
    }
    let capacity = num_blocks
        .checked_mul(WORD_BITS)
        .ok_or(ShapeError::BitsOutOfRange {
            num_bits,
            num_blocks,
        })?;
    if num_bits > capacity || num_bits <= capacity - WORD_BITS {
        return Err(ShapeError::BitsOutOfRange {
            num_bits,
            num_blocks,
        });
    }
    Ok(capacity - num_bits)
}

/// The resolved layout of one padding instance, in window-local rows
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddingLayout {
    pub preset: LayoutPreset,
    pub shift: usize,
    pub num_blocks: usize,
    pub strides: usize,
    /// One relay cell per stride
    pub relays: Vec<Coordinate>,
    /// Every step, including the terminal step and the filler steps that
    /// complete the last stride
    pub steps: Vec<StepCells>,
}

impl PaddingLayout {
    /// Number of strides needed for `num_blocks` words plus the terminal step
    pub fn strides_for(num_blocks: usize) -> usize {
        round_up_to(num_blocks + 1, STEPS_PER_STRIDE) / STEPS_PER_STRIDE
    }

    pub fn rows_for(preset: LayoutPreset, num_blocks: usize) -> usize {
        Self::strides_for(num_blocks) * preset.template().rows
    }

    pub fn new<F: PrimeField>(
        columns: usize,
        params: &PaddingParams,
    ) -> Result<Self, ConstructionError> {
        let preset =
            LayoutPreset::from_columns(columns).ok_or(ConstructionError::UnsupportedPreset {
                component: super::PADDING_NAME,
                columns,
            })?;
        let shift = shift_of::<F>(params)?;
        let template = preset.template();
        let strides = Self::strides_for(params.num_blocks);

        let offset = |(row, col): Coordinate, stride: usize| (row + stride * template.rows, col);
        let relays = (0..strides).map(|j| offset(template.relay, j)).collect();
        let steps = (0..strides)
            .flat_map(|j| {
                template.steps.iter().map(move |cells| StepCells {
                    value: offset(cells.value, j),
                    first: offset(cells.first, j),
                    second: offset(cells.second, j),
                    sum: offset(cells.sum, j),
                })
            })
            .collect();

        Ok(Self {
            preset,
            shift,
            num_blocks: params.num_blocks,
            strides,
            relays,
            steps,
        })
    }

    pub fn rows(&self) -> usize {
        self.strides * self.preset.template().rows
    }

    /// First row of stride `j`
    pub fn stride_row(&self, j: usize) -> usize {
        j * self.preset.template().rows
    }

    /// The step that finalizes the last carry
    pub fn terminal_step(&self) -> usize {
        self.num_blocks
    }
}
