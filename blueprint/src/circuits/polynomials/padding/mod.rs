//! Padding gate
//!
//! This component re-aligns a message of `num_blocks` 64-bit words carrying
//! a `num_bits`-bit integer `M` (every word full except possibly the first)
//! into the words of `M * 2^shift`, with `shift = 64 * num_blocks - num_bits`.
//!
//! Every word goes through one step that splits it at `64 - shift` bits and
//! carries the low part into the next word:
//!
//! ```text
//!     value  = first * 2^(64 - shift) + second
//!     sum    = previous_second * 2^shift + first
//! ```
//!
//! with `first` in `[0, 2^shift)` and `second` in `[0, 2^(64 - shift))`
//! checked by range lookups. A terminal step with value zero flushes the last
//! carry, and the output words are the sums of steps `1..=num_blocks`.
//!
//! Steps are grouped five to a stride; the stride layout depends on the
//! column count (see [`layout::LayoutPreset`]). Within a stride, the first
//! step reads its previous `second` from the stride's relay cell, which is
//! copy-constrained to the last `second` of the previous stride (or to zero
//! for the first stride).
//!
//! Constraints, for each step `k` of a stride
//!
//!   1) value_k - first_k * 2^(64 - shift) - second_k
//!   2) sum_k - previous_k * 2^shift - first_k
//!
//! Lookups, for each step `k` of a stride
//!
//!   1) first_k  in range table `shift`
//!   2) second_k in range table `64 - shift`

pub mod layout;
pub mod witness;

pub use witness::calculate;

use self::layout::{LayoutPreset, PaddingLayout, StepCells, WORD_BITS};
use crate::{
    circuits::{
        assignment::AssignmentTable,
        component::Component,
        expr::Expr,
        gate::{GateDef, GateKey, LookupConstraint},
        lookup::tables::{range_table, range_table_id, LookupTable},
        manifest::{Manifest, ManifestParam},
        variable::Variable,
        window::Window,
    },
    error::{AssignmentError, ConstructionError, ShapeError},
};
use ark_ff::PrimeField;
use blueprint_utils::field_helpers::pow2;
use std::marker::PhantomData;

pub(crate) const PADDING_NAME: &str = "padding";

/// Static configuration of the padding component
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaddingParams {
    pub num_blocks: usize,
    pub num_bits: usize,
}

/// The message words, most significant first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddingInput {
    pub message: Vec<Variable>,
}

/// The padded words, most significant first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddingOutput {
    pub padded_message: Vec<Variable>,
}

/// The padding component
#[derive(Clone, Debug)]
pub struct Padding<F> {
    window: Window,
    params: PaddingParams,
    layout: PaddingLayout,
    _field: PhantomData<F>,
}

impl<F: PrimeField> Padding<F> {
    pub fn layout(&self) -> &PaddingLayout {
        &self.layout
    }

    fn at(&self, (row, col): (usize, usize)) -> Variable {
        self.window.var(col, row)
    }

    fn cell(&self, (row, col): (usize, usize)) -> Expr<F> {
        self.window.cell(col, row as i64)
    }

    fn zero(&self) -> Variable {
        self.window.constant_var(0, 0)
    }
}

impl<F: PrimeField> Component<F> for Padding<F> {
    const NAME: &'static str = PADDING_NAME;
    type Params = PaddingParams;
    type Input = PaddingInput;
    type Output = PaddingOutput;

    fn requirement(_params: &PaddingParams) -> ManifestParam {
        ManifestParam::Set(LayoutPreset::all_columns())
    }

    fn manifest(params: &PaddingParams, witness_columns: usize) -> Result<Manifest, ShapeError> {
        layout::shift_of::<F>(params)?;
        let preset =
            LayoutPreset::from_columns(witness_columns).ok_or(ShapeError::NoAcceptableColumns {
                component: PADDING_NAME,
                columns: witness_columns,
            })?;
        Ok(Manifest {
            witness_columns: preset.columns(),
            constant_columns: 1,
            public_input_columns: 0,
            rows: PaddingLayout::rows_for(preset, params.num_blocks),
            gate_count: 1,
            needs_lookup: true,
        })
    }

    fn new(window: Window, params: PaddingParams) -> Result<Self, ConstructionError> {
        if window.constant.is_empty() {
            return Err(ConstructionError::WindowTooNarrow {
                component: PADDING_NAME,
                needed: 1,
                got: 0,
            });
        }
        let layout = PaddingLayout::new::<F>(window.witness.len(), &params)?;
        Ok(Self {
            window,
            params,
            layout,
            _field: PhantomData,
        })
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn params(&self) -> &PaddingParams {
        &self.params
    }

    /// The stride gate depends on the shift only, so instances with different
    /// block counts share it
    fn gate_key(&self) -> GateKey {
        GateKey {
            component: PADDING_NAME.to_string(),
            params: format!("{{ shift: {} }}", self.layout.shift),
            witness_columns: self.window.witness.clone(),
            constant_columns: vec![],
        }
    }

    fn gates(&self) -> Vec<GateDef<F>> {
        let shift = self.layout.shift;
        let template = self.layout.preset.template();
        let low_table = range_table_id(WORD_BITS - shift);
        let high_table = range_table_id(shift);

        let mut constraints = vec![];
        let mut lookups = vec![];
        let mut previous = self.cell(template.relay);
        for StepCells {
            value,
            first,
            second,
            sum,
        } in template.steps
        {
            let (value, first, second, sum) = (
                self.cell(value),
                self.cell(first),
                self.cell(second),
                self.cell(sum),
            );
            constraints.push(
                value - first.clone().scale(pow2(WORD_BITS - shift)) - second.clone(),
            );
            constraints.push(sum - previous.scale(pow2(shift)) - first.clone());
            lookups.push(LookupConstraint::single(high_table, first));
            lookups.push(LookupConstraint::single(low_table, second.clone()));
            previous = second;
        }

        vec![GateDef::new(constraints).with_lookups(lookups)]
    }

    fn gate_rows(&self) -> Vec<Vec<usize>> {
        vec![(0..self.layout.strides)
            .map(|j| self.layout.stride_row(j))
            .collect()]
    }

    fn lookup_tables(&self) -> Vec<LookupTable<F>> {
        vec![
            range_table(self.layout.shift),
            range_table(WORD_BITS - self.layout.shift),
        ]
    }

    fn check_input(
        params: &PaddingParams,
        input: &PaddingInput,
    ) -> Result<(), ConstructionError> {
        if input.message.len() != params.num_blocks {
            return Err(ConstructionError::WrongArity {
                component: PADDING_NAME,
                expected: params.num_blocks,
                got: input.message.len(),
            });
        }
        Ok(())
    }

    fn copy_constraints(&self, input: &PaddingInput) -> Vec<(Variable, Variable)> {
        let layout = &self.layout;
        let zero = self.zero();
        let mut copies = vec![(self.at(layout.relays[0]), zero)];

        // the leading word has no carry in, so its high part is zero
        copies.push((self.at(layout.steps[0].sum), zero));

        for (j, relay) in layout.relays.iter().enumerate().skip(1) {
            let last = &layout.steps[j * layout::STEPS_PER_STRIDE - 1];
            copies.push((self.at(*relay), self.at(last.second)));
        }

        for (i, step) in layout.steps.iter().enumerate() {
            let source = input.message.get(i).copied().unwrap_or(zero);
            copies.push((source, self.at(step.value)));
        }
        copies
    }

    fn constants(&self) -> Vec<(Variable, F)> {
        vec![(self.zero(), F::zero())]
    }

    fn generate_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &PaddingInput,
    ) -> Result<PaddingOutput, AssignmentError> {
        let message = input
            .message
            .iter()
            .map(|var| table.value(var))
            .collect::<Result<Vec<_>, _>>()?;
        witness::create(table, &self.window, &self.layout, &message)?;
        Ok(self.result())
    }

    fn generate_empty_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &PaddingInput,
    ) -> Result<PaddingOutput, AssignmentError> {
        let message = input
            .message
            .iter()
            .map(|var| table.value(var))
            .collect::<Result<Vec<_>, _>>()?;
        let values = witness::step_values(&self.layout, &message)?;
        let sums = witness::step_sums(&values, self.layout.shift);

        let output = self.result();
        for (var, sum) in output.padded_message.iter().zip(&sums[1..]) {
            table.assign(*var, F::from(*sum))?;
        }
        Ok(output)
    }

    fn result(&self) -> PaddingOutput {
        PaddingOutput {
            padded_message: self.layout.steps[1..=self.layout.terminal_step()]
                .iter()
                .map(|step| self.at(step.sum))
                .collect(),
        }
    }
}
