//! Test Framework

use crate::{
    circuits::{
        assignment::AssignmentTable, builder::CircuitBuilder, config::TableConfig,
        constraints::Circuit, variable::Variable,
    },
    error::BuildError,
};
use ark_ff::PrimeField;
use std::time::Instant;

#[derive(Default)]
pub(crate) struct TestFramework<F: PrimeField> {
    config: TableConfig,
    public_inputs: Vec<F>,
}

/// A build in progress: run components on [`TestRunner::builder`], then
/// check the result
pub(crate) struct TestRunner<F: PrimeField> {
    builder: CircuitBuilder<F>,
    public_inputs: Vec<Variable>,
    invalidations: Vec<(Variable, F)>,
}

impl<F: PrimeField> TestFramework<F> {
    #[must_use]
    pub(crate) fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub(crate) fn public_inputs(mut self, public_inputs: Vec<F>) -> Self {
        self.public_inputs = public_inputs;
        self
    }

    /// creates the builder and writes the public inputs
    pub(crate) fn setup(self) -> TestRunner<F> {
        let mut builder = CircuitBuilder::new(self.config.self_check(false));
        let public_inputs = builder
            .assign_public_inputs(&self.public_inputs)
            .expect("public inputs fit in the table");
        TestRunner {
            builder,
            public_inputs,
            invalidations: vec![],
        }
    }
}

impl<F: PrimeField> TestRunner<F> {
    pub(crate) fn builder(&mut self) -> &mut CircuitBuilder<F> {
        &mut self.builder
    }

    /// The value of an assigned cell
    pub(crate) fn value(&self, var: Variable) -> F {
        self.builder.table().value(&var).expect("cell is assigned")
    }

    /// The cell of public input `i`
    pub(crate) fn public_input(&self, i: usize) -> Variable {
        self.public_inputs[i]
    }

    pub(crate) fn public_inputs(&self) -> &[Variable] {
        &self.public_inputs
    }

    /// Overwrites `var` with `value` before checking
    #[must_use]
    pub(crate) fn invalidate(mut self, var: Variable, value: F) -> Self {
        self.invalidations.push((var, value));
        self
    }

    /// Applies the invalidations and checks the table against the circuit
    pub(crate) fn check(mut self) -> Result<(Circuit<F>, AssignmentTable<F>), BuildError> {
        for (var, value) in std::mem::take(&mut self.invalidations) {
            self.builder
                .table_mut()
                .replace_witness(var, value)
                .expect("invalidations target witness cells");
        }

        let start = Instant::now();
        self.builder.check()?;
        println!("- time to check: {}ms", start.elapsed().as_millis());

        self.builder.finalize()
    }
}
