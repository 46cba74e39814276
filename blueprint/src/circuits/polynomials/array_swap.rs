//! Array swap gate
//!
//! Given a control bit `t` and an array `[a_1, b_1, ..., a_n, b_n]`, this
//! component outputs the array unchanged when `t = 0` and with every pair
//! swapped, `[b_1, a_1, ..., b_n, a_n]`, when `t = 1`.
//!
//! Layout, over `W` witness columns with `p = (W - 1) / 4` pairs per row
//!
//! | col         | `ArraySwap`   |
//! | ----------- | ------------- |
//! |           0 | `t`  (copy)   |
//! |  1 + 4s + 0 | `a_s` (copy)  |
//! |  1 + 4s + 1 | `b_s` (copy)  |
//! |  1 + 4s + 2 | `out_a_s`     |
//! |  1 + 4s + 3 | `out_b_s`     |
//!
//! The `t` cells of all rows are wired together. Slots past the last pair
//! are zero-filled.
//!
//! Constraints, on every row
//!
//!   1) t * (t - 1)
//!   2) out_a_s - (a_s + t * (b_s - a_s)), for every slot `s`
//!   3) out_b_s - (b_s + t * (a_s - b_s)), for every slot `s`

use crate::{
    circuits::{
        assignment::AssignmentTable,
        component::Component,
        gate::{GateDef, GateKey},
        manifest::{Manifest, ManifestParam},
        variable::Variable,
        window::Window,
        witness::{self, ConstantCell, LayoutRow, VariableCell, Variables, WitnessCell},
    },
    error::{AssignmentError, ConstructionError, ShapeError},
};
use ark_ff::PrimeField;
use itertools::Itertools;
use std::marker::PhantomData;

const ARRAY_SWAP_NAME: &str = "array_swap";

/// Narrowest layout: the control bit and one pair slot
pub const ARRAY_SWAP_MIN_COLUMNS: usize = 5;

/// Witness columns taken by one pair slot
const SLOT_WIDTH: usize = 4;

/// Reference computation: `array` with every pair swapped when `t` is set
pub fn calculate<F: PrimeField>(t: bool, array: &[F]) -> Result<Vec<F>, ConstructionError> {
    if array.len() % 2 != 0 {
        return Err(ConstructionError::OddArray {
            component: ARRAY_SWAP_NAME,
            len: array.len(),
        });
    }
    Ok(swap_pairs(t, array))
}

fn swap_pairs<F: PrimeField>(t: bool, array: &[F]) -> Vec<F> {
    array
        .iter()
        .copied()
        .tuples()
        .flat_map(|(a, b)| if t { [b, a] } else { [a, b] })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArraySwapParams {
    pub pairs: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArraySwapInput {
    pub t: Variable,
    pub array: Vec<Variable>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArraySwapOutput {
    pub array: Vec<Variable>,
}

/// The array swap component
#[derive(Clone, Debug)]
pub struct ArraySwap<F> {
    window: Window,
    params: ArraySwapParams,
    pairs_per_row: usize,
    _field: PhantomData<F>,
}

fn pairs_per_row(witness_columns: usize, pairs: usize) -> usize {
    ((witness_columns - 1) / SLOT_WIDTH).min(pairs)
}

impl<F: PrimeField> ArraySwap<F> {
    pub fn pairs_per_row(&self) -> usize {
        self.pairs_per_row
    }

    /// Row and first column of pair `i`
    fn slot(&self, i: usize) -> (usize, usize) {
        (
            i / self.pairs_per_row,
            1 + (i % self.pairs_per_row) * SLOT_WIDTH,
        )
    }

    fn rows(&self) -> usize {
        self.params.pairs.div_ceil(self.pairs_per_row)
    }

    /// One row of the layout with the first `used` slots live
    fn layout<'a>(names: &'a [[String; SLOT_WIDTH]], used: usize) -> Vec<LayoutRow<'a, F>> {
        let mut row: LayoutRow<F> = vec![Some(VariableCell::create("t"))];
        for (s, slot) in names.iter().enumerate() {
            for name in slot {
                let cell: Box<dyn WitnessCell<F> + 'a> = if s < used {
                    VariableCell::create(name.as_str())
                } else {
                    ConstantCell::create(F::zero())
                };
                row.push(Some(cell));
            }
        }
        vec![row]
    }
}

impl<F: PrimeField> Component<F> for ArraySwap<F> {
    const NAME: &'static str = ARRAY_SWAP_NAME;
    type Params = ArraySwapParams;
    type Input = ArraySwapInput;
    type Output = ArraySwapOutput;

    fn requirement(_params: &ArraySwapParams) -> ManifestParam {
        ManifestParam::Range {
            min: ARRAY_SWAP_MIN_COLUMNS,
            max: None,
        }
    }

    fn manifest(params: &ArraySwapParams, witness_columns: usize) -> Result<Manifest, ShapeError> {
        if params.pairs == 0 {
            return Err(ShapeError::EmptyArray {
                component: ARRAY_SWAP_NAME,
            });
        }
        if witness_columns < ARRAY_SWAP_MIN_COLUMNS {
            return Err(ShapeError::NoAcceptableColumns {
                component: ARRAY_SWAP_NAME,
                columns: witness_columns,
            });
        }
        let per_row = pairs_per_row(witness_columns, params.pairs);
        Ok(Manifest {
            witness_columns: 1 + per_row * SLOT_WIDTH,
            rows: params.pairs.div_ceil(per_row),
            gate_count: 1,
            ..Default::default()
        })
    }

    fn new(window: Window, params: ArraySwapParams) -> Result<Self, ConstructionError> {
        if window.witness.len() < ARRAY_SWAP_MIN_COLUMNS {
            return Err(ConstructionError::WindowTooNarrow {
                component: ARRAY_SWAP_NAME,
                needed: ARRAY_SWAP_MIN_COLUMNS,
                got: window.witness.len(),
            });
        }
        if params.pairs == 0 {
            return Err(ShapeError::EmptyArray {
                component: ARRAY_SWAP_NAME,
            }
            .into());
        }
        Ok(Self {
            pairs_per_row: pairs_per_row(window.witness.len(), params.pairs),
            window,
            params,
            _field: PhantomData,
        })
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn params(&self) -> &ArraySwapParams {
        &self.params
    }

    /// The row gate only depends on the slots per row
    fn gate_key(&self) -> GateKey {
        GateKey {
            component: ARRAY_SWAP_NAME.to_string(),
            params: format!("{{ pairs_per_row: {} }}", self.pairs_per_row),
            witness_columns: self.window.witness.clone(),
            constant_columns: vec![],
        }
    }

    fn gates(&self) -> Vec<GateDef<F>> {
        let cell = |col| self.window.cell::<F>(col, 0);
        let t = cell(0);

        let mut constraints = vec![t.clone().boolean()];
        for s in 0..self.pairs_per_row {
            let col = 1 + s * SLOT_WIDTH;
            let (a, b, out_a, out_b) = (cell(col), cell(col + 1), cell(col + 2), cell(col + 3));
            constraints.push(out_a - (a.clone() + t.clone() * (b.clone() - a.clone())));
            constraints.push(out_b - (b.clone() + t.clone() * (a - b)));
        }
        vec![GateDef::new(constraints)]
    }

    fn gate_rows(&self) -> Vec<Vec<usize>> {
        vec![(0..self.rows()).collect()]
    }

    fn check_input(
        params: &ArraySwapParams,
        input: &ArraySwapInput,
    ) -> Result<(), ConstructionError> {
        let expected = 2 * params.pairs;
        if input.array.len() != expected {
            return Err(ConstructionError::WrongArity {
                component: ARRAY_SWAP_NAME,
                expected,
                got: input.array.len(),
            });
        }
        Ok(())
    }

    fn copy_constraints(&self, input: &ArraySwapInput) -> Vec<(Variable, Variable)> {
        let mut copies = vec![(input.t, self.window.var(0, 0))];
        for row in 1..self.rows() {
            copies.push((self.window.var(0, row - 1), self.window.var(0, row)));
        }
        for (i, (a, b)) in input.array.iter().tuples().enumerate() {
            let (row, col) = self.slot(i);
            copies.push((*a, self.window.var(col, row)));
            copies.push((*b, self.window.var(col + 1, row)));
        }
        copies
    }

    fn generate_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &ArraySwapInput,
    ) -> Result<ArraySwapOutput, AssignmentError> {
        let t = table.value(&input.t)?;
        if t != F::zero() && t != F::one() {
            return Err(AssignmentError::NotBoolean {
                component: ARRAY_SWAP_NAME,
                index: 0,
            });
        }
        let array = input
            .array
            .iter()
            .map(|var| table.value(var))
            .collect::<Result<Vec<_>, _>>()?;
        let swapped = swap_pairs(t.is_one(), &array);

        let names: Vec<[String; SLOT_WIDTH]> = (0..self.pairs_per_row)
            .map(|s| [format!("a{s}"), format!("b{s}"), format!("out_a{s}"), format!("out_b{s}")])
            .collect();

        for row in 0..self.rows() {
            let first = row * self.pairs_per_row;
            let pairs = first..(first + self.pairs_per_row).min(self.params.pairs);
            let mut variables = Variables::create();
            variables.insert("t", t);
            for (slot, i) in pairs.clone().enumerate() {
                let [a, b, out_a, out_b] = &names[slot];
                variables.insert(a, array[2 * i]);
                variables.insert(b, array[2 * i + 1]);
                variables.insert(out_a, swapped[2 * i]);
                variables.insert(out_b, swapped[2 * i + 1]);
            }

            let row_window = Window {
                start_row: self.window.start_row + row,
                ..self.window.clone()
            };
            witness::init(
                table,
                &row_window,
                &Self::layout(&names, pairs.len()),
                &variables,
            )?;
        }

        Ok(self.result())
    }

    fn generate_empty_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &ArraySwapInput,
    ) -> Result<ArraySwapOutput, AssignmentError> {
        let t = table.value(&input.t)?;
        if t != F::zero() && t != F::one() {
            return Err(AssignmentError::NotBoolean {
                component: ARRAY_SWAP_NAME,
                index: 0,
            });
        }
        let array = input
            .array
            .iter()
            .map(|var| table.value(var))
            .collect::<Result<Vec<_>, _>>()?;
        let swapped = swap_pairs(t.is_one(), &array);

        let output = self.result();
        for (var, value) in output.array.iter().zip(swapped) {
            table.assign(*var, value)?;
        }
        Ok(output)
    }

    fn result(&self) -> ArraySwapOutput {
        ArraySwapOutput {
            array: (0..self.params.pairs)
                .flat_map(|i| {
                    let (row, col) = self.slot(i);
                    [
                        self.window.var(col + 2, row),
                        self.window.var(col + 3, row),
                    ]
                })
                .collect(),
        }
    }
}
