//! Division-or-zero gate
//!
//! This component computes `z = x / y` when `y != 0` and `z = 0` when
//! `y = 0`, with degree-2 constraints only. The degenerate divisor is a
//! policy, not an error.
//!
//! Layout
//!
//! | col | `DivisionOrZero` |
//! | --- | ---------------- |
//! |   0 | `x`     (copy)   |
//! |   1 | `y`     (copy)   |
//! |   2 | `z`              |
//! |   3 | `inv`            |
//! |   4 | `flag`           |
//!
//! where `inv = y^-1` and `flag = 0` when `y != 0`, and `inv = 0` and
//! `flag = 1` when `y = 0`.
//!
//! Constraints
//!
//!   1) y * inv - (1 - flag)
//!   2) flag * (flag - 1)
//!   3) flag * (inv + y)
//!   4) x * inv - z
//!
//! With `flag = 1`, 3) forces `inv = -y` and 1) then forces `y^2 = 0`, so
//! `y = inv = 0`. With `y = 0`, 1) forces `flag = 1`. With `y != 0`, `flag`
//! must be 0 and 1) pins `inv` to the inverse of `y`.

use crate::{
    circuits::{
        assignment::AssignmentTable,
        component::Component,
        expr::Expr,
        gate::GateDef,
        manifest::{Manifest, ManifestParam},
        variable::Variable,
        window::Window,
        witness::{self, LayoutRow, VariableCell},
    },
    error::{AssignmentError, ConstructionError, ShapeError},
    variable_map,
};
use ark_ff::PrimeField;

/// Number of witness columns of the gate
pub const DIVISION_OR_ZERO_COLUMNS: usize = 5;

/// Reference computation: `x / y`, or zero when `y = 0`
pub fn calculate<F: PrimeField>(x: F, y: F) -> F {
    y.inverse().map_or_else(F::zero, |inv| x * inv)
}

/// Dividend and divisor cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivisionInput {
    pub x: Variable,
    pub y: Variable,
}

impl DivisionInput {
    /// Builds the input from exactly two variables, `[x, y]`
    pub fn from_vars(vars: &[Variable]) -> Result<Self, ConstructionError> {
        match vars {
            [x, y] => Ok(Self { x: *x, y: *y }),
            _ => Err(ConstructionError::WrongArity {
                component: DivisionOrZero::NAME_STR,
                expected: 2,
                got: vars.len(),
            }),
        }
    }

    pub fn all_vars(&self) -> Vec<Variable> {
        vec![self.x, self.y]
    }
}

/// The quotient cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivisionOutput {
    pub z: Variable,
}

/// The division-or-zero component
#[derive(Clone, Debug)]
pub struct DivisionOrZero {
    window: Window,
}

impl DivisionOrZero {
    const NAME_STR: &'static str = "division_or_zero";

    fn layout<'a, F: PrimeField>() -> Vec<LayoutRow<'a, F>> {
        vec![vec![
            Some(VariableCell::create("x")),
            Some(VariableCell::create("y")),
            Some(VariableCell::create("z")),
            Some(VariableCell::create("inv")),
            Some(VariableCell::create("flag")),
        ]]
    }
}

impl<F: PrimeField> Component<F> for DivisionOrZero {
    const NAME: &'static str = DivisionOrZero::NAME_STR;
    type Params = ();
    type Input = DivisionInput;
    type Output = DivisionOutput;

    fn requirement(_params: &()) -> ManifestParam {
        ManifestParam::Single(DIVISION_OR_ZERO_COLUMNS)
    }

    fn manifest(_params: &(), witness_columns: usize) -> Result<Manifest, ShapeError> {
        if witness_columns < DIVISION_OR_ZERO_COLUMNS {
            return Err(ShapeError::NoAcceptableColumns {
                component: Self::NAME_STR,
                columns: witness_columns,
            });
        }
        Ok(Manifest {
            witness_columns: DIVISION_OR_ZERO_COLUMNS,
            rows: 1,
            gate_count: 1,
            ..Default::default()
        })
    }

    fn new(window: Window, _params: ()) -> Result<Self, ConstructionError> {
        if window.witness.len() < DIVISION_OR_ZERO_COLUMNS {
            return Err(ConstructionError::WindowTooNarrow {
                component: Self::NAME_STR,
                needed: DIVISION_OR_ZERO_COLUMNS,
                got: window.witness.len(),
            });
        }
        Ok(Self { window })
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn params(&self) -> &() {
        &()
    }

    fn gates(&self) -> Vec<GateDef<F>> {
        let cell = |col| self.window.cell::<F>(col, 0);
        let (x, y, z, inv, flag) = (cell(0), cell(1), cell(2), cell(3), cell(4));

        vec![GateDef::new(vec![
            y.clone() * inv.clone() - (Expr::one() - flag.clone()),
            flag.clone().boolean(),
            flag * (inv.clone() + y),
            x * inv - z,
        ])]
    }

    fn gate_rows(&self) -> Vec<Vec<usize>> {
        vec![vec![0]]
    }

    fn copy_constraints(&self, input: &DivisionInput) -> Vec<(Variable, Variable)> {
        vec![
            (input.x, self.window.var(0, 0)),
            (self.window.var(1, 0), input.y),
        ]
    }

    fn generate_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &DivisionInput,
    ) -> Result<DivisionOutput, AssignmentError> {
        let x = table.value(&input.x)?;
        let y = table.value(&input.y)?;

        let (inv, flag) = match y.inverse() {
            Some(inv) => (inv, F::zero()),
            None => (F::zero(), F::one()),
        };
        let z = x * inv;

        witness::init(
            table,
            &self.window,
            &Self::layout(),
            &variable_map!("x" => x, "y" => y, "z" => z, "inv" => inv, "flag" => flag),
        )?;

        Ok(<Self as Component<F>>::result(self))
    }

    fn generate_empty_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &DivisionInput,
    ) -> Result<DivisionOutput, AssignmentError> {
        let z = calculate(table.value(&input.x)?, table.value(&input.y)?);
        witness::init_cell(
            table,
            &self.window,
            0,
            2,
            &Self::layout(),
            &variable_map!("z" => z),
        )?;
        Ok(<Self as Component<F>>::result(self))
    }

    fn result(&self) -> DivisionOutput {
        DivisionOutput {
            z: self.window.var(2, 0),
        }
    }
}
