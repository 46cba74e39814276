//! This module implements the [`Circuit`], the constraint system shared by
//! every component of a build: gates, copy constraints and lookup tables.

use crate::{
    circuits::{
        assignment::AssignmentTable,
        gate::{CopyConstraint, Gate, GateDef, GateKey},
        lookup::tables::LookupTable,
        permutation::CopyClasses,
        variable::Variable,
    },
    error::CircuitError,
};
use ark_ff::PrimeField;
use log::debug;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// The constraint system
#[derive(Clone, Debug)]
pub struct Circuit<F> {
    gates: Vec<Gate<F>>,
    copy_constraints: Vec<CopyConstraint>,
    lookup_tables: BTreeMap<i32, LookupTable<F>>,
    selectors: HashMap<GateKey, Vec<usize>>,
    selector_columns: usize,
}

impl<F: PrimeField> Circuit<F> {
    /// Creates an empty circuit with room for `selector_columns` gates
    pub fn new(selector_columns: usize) -> Self {
        Self {
            gates: vec![],
            copy_constraints: vec![],
            lookup_tables: BTreeMap::new(),
            selectors: HashMap::new(),
            selector_columns,
        }
    }

    pub fn gates(&self) -> &[Gate<F>] {
        &self.gates
    }

    pub fn copy_constraints(&self) -> &[CopyConstraint] {
        &self.copy_constraints
    }

    pub fn lookup_tables(&self) -> impl Iterator<Item = &LookupTable<F>> {
        self.lookup_tables.values()
    }

    pub fn lookup_table(&self, id: i32) -> Option<&LookupTable<F>> {
        self.lookup_tables.get(&id)
    }

    /// Number of selector columns in use
    pub fn selectors_used(&self) -> usize {
        self.gates.len()
    }

    /// Selectors already registered for `key`
    pub fn selectors_for(&self, key: &GateKey) -> Option<&[usize]> {
        self.selectors.get(key).map(Vec::as_slice)
    }

    /// Registers one gate per entry of `defs` under a fresh selector each,
    /// unless `key` was registered before, in which case its selectors are
    /// returned and nothing is added.
    pub fn add_gates(
        &mut self,
        key: &GateKey,
        defs: Vec<GateDef<F>>,
    ) -> Result<Vec<usize>, CircuitError> {
        if let Some(selectors) = self.selectors.get(key) {
            debug!("reusing selectors {selectors:?} for {key}");
            return Ok(selectors.clone());
        }
        if self.gates.len() + defs.len() > self.selector_columns {
            return Err(CircuitError::SelectorOverflow {
                component: key.component.clone(),
                declared: self.selector_columns,
            });
        }

        let mut selectors = Vec::with_capacity(defs.len());
        for def in defs {
            let selector = self.gates.len();
            self.gates.push(Gate {
                selector,
                component: key.component.clone(),
                constraints: def.constraints,
                lookups: def.lookups,
            });
            selectors.push(selector);
        }
        debug!("new selectors {selectors:?} for {key}");
        self.selectors.insert(key.clone(), selectors.clone());
        Ok(selectors)
    }

    /// Adds a copy constraint between two absolute cells
    pub fn add_copy_constraint(&mut self, a: Variable, b: Variable) -> Result<(), CircuitError> {
        self.copy_constraints.push(CopyConstraint::new(a, b)?);
        Ok(())
    }

    /// Registers a lookup table.
    ///
    /// Tables are append-only: registering an identical table again is a
    /// no-op, registering different contents under a known ID is an error.
    pub fn add_lookup_table(&mut self, table: LookupTable<F>) -> Result<(), CircuitError> {
        match self.lookup_tables.get(&table.id) {
            Some(existing) if *existing == table => Ok(()),
            Some(_) => Err(CircuitError::TableConflict(table.id)),
            None => {
                debug!("registering lookup table {}", table.id);
                self.lookup_tables.insert(table.id, table);
                Ok(())
            }
        }
    }

    /// The equivalence classes of all copy constraints
    pub fn copy_classes(&self) -> Vec<Vec<Variable>> {
        CopyClasses::new(&self.copy_constraints).classes()
    }

    /// Highest degree among all gate constraints
    pub fn max_degree(&self) -> usize {
        self.gates
            .iter()
            .flat_map(|gate| gate.constraints.iter().map(|c| c.degree()))
            .max()
            .unwrap_or(0)
    }

    /// Checks that `table` satisfies the circuit: every gate constraint
    /// vanishes and every lookup entry is in its table at each row where the
    /// gate's selector is enabled, and every copy class holds one value.
    pub fn verify(&self, table: &AssignmentTable<F>) -> Result<(), CircuitError> {
        for gate in &self.gates {
            for lookup in &gate.lookups {
                if !self.lookup_tables.contains_key(&lookup.table_id) {
                    return Err(CircuitError::UnknownTable(lookup.table_id));
                }
            }
        }

        for gate in &self.gates {
            table
                .enabled_rows(gate.selector)
                .into_par_iter()
                .try_for_each(|row| self.verify_gate_row(gate, table, row))?;
        }

        for class in self.copy_classes() {
            let first = class[0];
            let value = table.value(&first)?;
            for other in &class[1..] {
                if table.value(other)? != value {
                    return Err(CircuitError::InconsistentCopyClass {
                        first,
                        second: *other,
                    });
                }
            }
        }

        // all good!
        Ok(())
    }

    fn verify_gate_row(
        &self,
        gate: &Gate<F>,
        table: &AssignmentTable<F>,
        row: usize,
    ) -> Result<(), CircuitError> {
        let cell = |var: &Variable| -> Result<F, CircuitError> {
            Ok(table.value(&var.resolve(row)?)?)
        };

        for (constraint, expr) in gate.constraints.iter().enumerate() {
            if !expr.evaluate(&cell)?.is_zero() {
                return Err(CircuitError::GateNotSatisfied {
                    component: gate.component.clone(),
                    selector: gate.selector,
                    row,
                    constraint,
                });
            }
        }

        for (lookup, constraint) in gate.lookups.iter().enumerate() {
            let entry = constraint
                .entry
                .iter()
                .map(|expr| expr.evaluate(&cell))
                .collect::<Result<Vec<F>, _>>()?;
            let member = self
                .lookup_tables
                .get(&constraint.table_id)
                .is_some_and(|t| t.contains(&entry));
            if !member {
                return Err(CircuitError::LookupFailed {
                    component: gate.component.clone(),
                    selector: gate.selector,
                    row,
                    lookup,
                    table: constraint.table_id,
                });
            }
        }

        Ok(())
    }
}
