//! Witness generation and reference computation for the padding component.

use super::{
    layout::{PaddingLayout, StepCells, STEPS_PER_STRIDE, WORD_BITS},
    PADDING_NAME,
};
use crate::{
    circuits::{
        assignment::AssignmentTable,
        window::Window,
        witness::{self, LayoutRow, VariableBitsCell, VariableCell, Variables, WitnessCell},
    },
    error::{AssignmentError, ShapeError},
};
use ark_ff::PrimeField;
use blueprint_utils::FieldHelpers;
use num_bigint::BigUint;

const VALUE: [&str; STEPS_PER_STRIDE] = ["value0", "value1", "value2", "value3", "value4"];
const SUM: [&str; STEPS_PER_STRIDE] = ["sum0", "sum1", "sum2", "sum3", "sum4"];
const RELAY: &str = "relay";

/// Reference computation: re-aligns `message`, the big-endian 64-bit words
/// of a `num_bits`-bit integer `M`, into the words of `M * 2^shift`.
pub fn calculate(message: &[u64], num_bits: usize) -> Result<Vec<u64>, ShapeError> {
    let num_blocks = message.len();
    let capacity = num_blocks * WORD_BITS;
    if num_blocks == 0 {
        return Err(ShapeError::ZeroBlocks {
            component: PADDING_NAME,
        });
    }
    if num_bits > capacity || num_bits <= capacity - WORD_BITS {
        return Err(ShapeError::BitsOutOfRange {
            num_bits,
            num_blocks,
        });
    }
    let shift = capacity - num_bits;

    let value = message
        .iter()
        .fold(BigUint::from(0u8), |acc, word| (acc << WORD_BITS) + *word);
    let mut digits = (value << shift).to_u64_digits();
    digits.resize(num_blocks, 0);
    digits.reverse();
    Ok(digits)
}

/// Splits `word` into its high `shift` bits and low `64 - shift` bits
pub(crate) fn split(word: u64, shift: usize) -> (u128, u128) {
    let word = word as u128;
    let low_bits = WORD_BITS - shift;
    (word >> low_bits, word & ((1u128 << low_bits) - 1))
}

/// The words fed to every step: the message, then zeros for the terminal
/// and filler steps
pub(crate) fn step_values<F: PrimeField>(
    layout: &PaddingLayout,
    message: &[F],
) -> Result<Vec<u64>, AssignmentError> {
    let mut values = Vec::with_capacity(layout.steps.len());
    for (index, word) in message.iter().enumerate() {
        let out_of_range = |bits| AssignmentError::InputOutOfRange {
            component: PADDING_NAME,
            index,
            bits,
        };
        let word = word.to_u64().map_err(|_| out_of_range(WORD_BITS))?;
        // the leading word carries the bits that do not fill a whole block
        if index == 0 && split(word, layout.shift).0 != 0 {
            return Err(out_of_range(WORD_BITS - layout.shift));
        }
        values.push(word);
    }
    values.resize(layout.steps.len(), 0);
    Ok(values)
}

/// The `sum` of every step, with the carry threaded through the steps
pub(crate) fn step_sums(values: &[u64], shift: usize) -> Vec<u128> {
    let mut previous_low = 0u128;
    values
        .iter()
        .map(|word| {
            let (high, low) = split(*word, shift);
            let sum = (previous_low << shift) | high;
            previous_low = low;
            sum
        })
        .collect()
}

fn layout_rows<'a, F: PrimeField>(layout: &PaddingLayout) -> Vec<LayoutRow<'a, F>> {
    let template = layout.preset.template();
    let low_bits = WORD_BITS - layout.shift;

    let mut rows: Vec<LayoutRow<F>> = (0..template.rows)
        .map(|_| (0..layout.preset.columns()).map(|_| None).collect())
        .collect();
    let mut set = |(row, col): (usize, usize), cell: Box<dyn WitnessCell<F> + 'a>| {
        rows[row][col] = Some(cell)
    };

    set(template.relay, VariableCell::create(RELAY));
    for (k, StepCells { value, first, second, sum }) in template.steps.iter().enumerate() {
        set(*value, VariableCell::create(VALUE[k]));
        set(*first, VariableBitsCell::create(VALUE[k], low_bits, WORD_BITS));
        set(*second, VariableBitsCell::create(VALUE[k], 0, low_bits));
        set(*sum, VariableCell::create(SUM[k]));
    }
    rows
}

/// Fills every cell of the layout for `message`, returning the sums of all
/// steps
pub(crate) fn create<F: PrimeField>(
    table: &mut AssignmentTable<F>,
    window: &Window,
    layout: &PaddingLayout,
    message: &[F],
) -> Result<Vec<F>, AssignmentError> {
    let values = step_values(layout, message)?;
    let sums = step_sums(&values, layout.shift);
    let rows = layout_rows::<F>(layout);

    for j in 0..layout.strides {
        let steps = j * STEPS_PER_STRIDE..(j + 1) * STEPS_PER_STRIDE;
        let relay = match j {
            0 => 0,
            _ => split(values[steps.start - 1], layout.shift).1,
        };

        let mut variables = Variables::create();
        variables.insert(RELAY, F::from(relay));
        for (k, step) in steps.enumerate() {
            variables.insert(VALUE[k], F::from(values[step]));
            variables.insert(SUM[k], F::from(sums[step]));
        }

        let stride_window = Window {
            start_row: window.start_row + layout.stride_row(j),
            ..window.clone()
        };
        witness::init(table, &stride_window, &rows, &variables)?;
    }

    Ok(sums.into_iter().map(F::from).collect())
}
