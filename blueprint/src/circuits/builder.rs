//! This module implements the [`CircuitBuilder`], the context threaded
//! through every component call of a circuit build.
//!
//! The builder owns the shared [`Circuit`], the [`AssignmentTable`] and the
//! row allocator, which is the only cursor of the build. A component goes
//! through
//!
//! 1. [`CircuitBuilder::allocate`]: negotiate a column count, compute the
//!    manifest, place the window, bind the component
//! 2. [`CircuitBuilder::generate_gates`]: register (or reuse) the gates and
//!    enable their selectors
//! 3. [`CircuitBuilder::generate_copy_constraints`]: write constants and wire
//!    the inputs
//! 4. [`CircuitBuilder::generate_assignments`]: fill the witness
//!
//! [`CircuitBuilder::generate_empty_assignments`] goes from 1 straight to 4
//! when only values are needed.
//!
//! The first error of any component call ends the build: it is recorded, and
//! [`CircuitBuilder::finalize`] returns it instead of the tables. Finalizing
//! also fails while an allocated instance has not reached its assignments.

use crate::{
    circuits::{
        allocator::Allocator,
        assignment::AssignmentTable,
        component::{Component, Instance, InstanceState},
        config::TableConfig,
        constraints::Circuit,
        manifest::{Manifest, ManifestParam},
        variable::Variable,
    },
    error::{BuildError, ConstructionError, ProtocolError, ShapeError},
};
use ark_ff::PrimeField;
use blueprint_utils::math::ceil_log2;
use log::{debug, trace};

/// The circuit build context
#[derive(Clone, Debug)]
pub struct CircuitBuilder<F> {
    config: TableConfig,
    circuit: Circuit<F>,
    table: AssignmentTable<F>,
    allocator: Allocator,
    public_inputs: usize,
    /// Allocated instances not yet assigned
    outstanding: usize,
    /// First error of a component call
    failure: Option<BuildError>,
}

impl<F: PrimeField> CircuitBuilder<F> {
    pub fn new(config: TableConfig) -> Self {
        Self {
            circuit: Circuit::new(config.selector_columns),
            table: AssignmentTable::new(&config),
            allocator: Allocator::new(&config),
            public_inputs: 0,
            outstanding: 0,
            failure: None,
            config,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn circuit(&self) -> &Circuit<F> {
        &self.circuit
    }

    pub fn table(&self) -> &AssignmentTable<F> {
        &self.table
    }

    /// Direct access to the table, e.g. to corrupt a witness in a soundness test
    pub fn table_mut(&mut self) -> &mut AssignmentTable<F> {
        &mut self.table
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// The error that ended the build, if any
    pub fn failure(&self) -> Option<&BuildError> {
        self.failure.as_ref()
    }

    /// Keeps the first error seen
    fn record<T>(&mut self, result: Result<T, BuildError>) -> Result<T, BuildError> {
        if let Err(err) = &result {
            debug!("build failed: {err}");
            self.failure.get_or_insert_with(|| err.clone());
        }
        result
    }

    /// Appends `values` to the public input vector, returning their cells
    pub fn assign_public_inputs(&mut self, values: &[F]) -> Result<Vec<Variable>, BuildError> {
        let mut vars = Vec::with_capacity(values.len());
        for value in values {
            let var = Variable::public_input(0, self.public_inputs);
            self.table.assign(var, *value)?;
            self.public_inputs += 1;
            vars.push(var);
        }
        Ok(vars)
    }

    /// Places a declared instance in the table and binds its component.
    ///
    /// Nothing is reserved when the component rejects its window.
    pub fn allocate<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
    ) -> Result<Manifest, BuildError> {
        let result = self.place(instance);
        self.record(result)
    }

    fn place<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
    ) -> Result<Manifest, BuildError> {
        instance.check_state(InstanceState::Declared, "allocate")?;

        let requirement = C::requirement(instance.params());
        let available = self.allocator.available_witness_columns();
        let columns = match instance.columns() {
            Some(columns) if !requirement.accepts(columns) => {
                return Err(ConstructionError::UnsupportedPreset {
                    component: C::NAME,
                    columns,
                }
                .into())
            }
            Some(columns) => columns,
            None => {
                let table = ManifestParam::Range {
                    min: 0,
                    max: Some(available),
                };
                ManifestParam::negotiate(&[requirement, table], available).ok_or(
                    ShapeError::NoAcceptableColumns {
                        component: C::NAME,
                        columns: available,
                    },
                )?
            }
        };

        let manifest = C::manifest(instance.params(), columns)?;
        let window = self.allocator.peek(&manifest)?;
        let component = C::new(window, instance.params().clone())?;
        let start = self.allocator.commit(&manifest);
        self.table.ensure_rows(start + manifest.rows);

        debug!(
            "{} placed at row {start}: {} rows, {} witness columns, {} gates",
            C::NAME,
            manifest.rows,
            manifest.witness_columns,
            manifest.gate_count
        );
        instance.set_allocated(manifest, component);
        self.outstanding += 1;
        Ok(manifest)
    }

    /// Registers the instance's lookup tables and gates, reusing the gates of
    /// an earlier instance of the same shape, and enables the selectors on
    /// the instance's rows
    pub fn generate_gates<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
    ) -> Result<Vec<usize>, BuildError> {
        let result = self.emit_gates(instance);
        self.record(result)
    }

    fn emit_gates<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
    ) -> Result<Vec<usize>, BuildError> {
        let component = instance.expect(InstanceState::Allocated, "generate_gates")?;

        for table in component.lookup_tables() {
            self.circuit.add_lookup_table(table)?;
        }

        let key = component.gate_key();
        let selectors = match self.circuit.selectors_for(&key) {
            Some(selectors) => selectors.to_vec(),
            None => self.circuit.add_gates(&key, component.gates())?,
        };

        let start = component.window().start_row;
        for (selector, rows) in selectors.iter().zip(component.gate_rows()) {
            for row in rows {
                self.table.enable_selector(*selector, start + row)?;
            }
        }

        instance.set_gates_emitted(selectors.clone());
        Ok(selectors)
    }

    /// Writes the instance's constants and wires its inputs
    pub fn generate_copy_constraints<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
        input: &C::Input,
    ) -> Result<(), BuildError> {
        let result = self.emit_copy_constraints(instance, input);
        self.record(result)
    }

    fn emit_copy_constraints<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
        input: &C::Input,
    ) -> Result<(), BuildError> {
        let component = instance.expect(InstanceState::GatesEmitted, "generate_copy_constraints")?;
        C::check_input(component.params(), input)?;

        for (var, value) in component.constants() {
            self.table.assign(var, value)?;
        }
        for (a, b) in component.copy_constraints(input) {
            trace!("{}: copy {a} <-> {b}", C::NAME);
            self.circuit.add_copy_constraint(a, b)?;
        }

        instance.advance(InstanceState::CopyConstraintsEmitted);
        Ok(())
    }

    /// Gates and copy constraints in one call
    pub fn generate_circuit<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
        input: &C::Input,
    ) -> Result<C::Output, BuildError> {
        self.generate_gates(instance)?;
        self.generate_copy_constraints(instance, input)?;
        let output = instance
            .expect(InstanceState::CopyConstraintsEmitted, "generate_circuit")
            .map(C::result)
            .map_err(BuildError::from);
        self.record(output)
    }

    /// Fills the instance's witness from the values of `input`
    pub fn generate_assignments<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
        input: &C::Input,
    ) -> Result<C::Output, BuildError> {
        let result = self.assign(instance, input, InstanceState::CopyConstraintsEmitted);
        self.record(result)
    }

    /// Computes only the instance's outputs, skipping gates and copy
    /// constraints. A table built this way is not meant to be proven.
    pub fn generate_empty_assignments<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
        input: &C::Input,
    ) -> Result<C::Output, BuildError> {
        let result = self.assign(instance, input, InstanceState::Allocated);
        self.record(result)
    }

    /// Fills the witness of an instance in state `from`; only the full
    /// assignments follow the copy constraints
    fn assign<C: Component<F>>(
        &mut self,
        instance: &mut Instance<F, C>,
        input: &C::Input,
        from: InstanceState,
    ) -> Result<C::Output, BuildError> {
        let full = from == InstanceState::CopyConstraintsEmitted;
        let operation = if full {
            "generate_assignments"
        } else {
            "generate_empty_assignments"
        };
        let component = instance.expect(from, operation)?;
        C::check_input(component.params(), input)?;
        let output = if full {
            component.generate_assignments(&mut self.table, input)?
        } else {
            component.generate_empty_assignments(&mut self.table, input)?
        };
        instance.advance(InstanceState::Assigned);
        self.outstanding -= 1;
        Ok(output)
    }

    /// Runs the whole protocol for one use-site
    pub fn instantiate<C: Component<F>>(
        &mut self,
        params: C::Params,
        input: &C::Input,
    ) -> Result<C::Output, BuildError> {
        let checked = C::check_input(&params, input).map_err(BuildError::from);
        self.record(checked)?;
        let mut instance = Instance::<F, C>::declare(params);
        self.allocate(&mut instance)?;
        self.generate_circuit(&mut instance, input)?;
        self.generate_assignments(&mut instance, input)
    }

    /// Checks the table against the circuit
    pub fn check(&self) -> Result<(), BuildError> {
        self.circuit
            .verify(&self.table)
            .map_err(BuildError::Consistency)
    }

    /// Ends the build and hands the circuit and table over to a backend.
    /// A failed or unfinished build is an error, and so is an unsatisfied
    /// table when `self_check` is set.
    pub fn finalize(self) -> Result<(Circuit<F>, AssignmentTable<F>), BuildError> {
        if let Some(err) = self.failure {
            return Err(err);
        }
        if self.outstanding > 0 {
            return Err(ProtocolError::Unfinished {
                outstanding: self.outstanding,
            }
            .into());
        }
        let rows = self.table.rows().max(1);
        debug!(
            "finalizing: {rows} rows (domain 2^{}), {} gates, {} copy constraints, {} lookup tables",
            ceil_log2(rows),
            self.circuit.gates().len(),
            self.circuit.copy_constraints().len(),
            self.circuit.lookup_tables().count()
        );
        if self.config.self_check {
            self.check()?;
            debug!("self-check passed");
        }
        Ok((self.circuit, self.table))
    }
}
