//! The component protocol.
//!
//! Every gadget implements [`Component`]: a pure manifest, value-independent
//! gate and copy-constraint emission, and value-dependent assignment
//! generation. Gate emission and assignment generation must address the same
//! cells, so implementations derive both from one layout function.
//!
//! An [`Instance`] tracks where one use-site of a component is in the
//! protocol; the [`CircuitBuilder`](super::builder::CircuitBuilder) refuses
//! out-of-order calls.

use crate::{
    circuits::{
        assignment::AssignmentTable,
        gate::{GateDef, GateKey},
        lookup::tables::LookupTable,
        manifest::{Manifest, ManifestParam},
        variable::Variable,
        window::Window,
    },
    error::{AssignmentError, ConstructionError, ProtocolError, ShapeError},
};
use ark_ff::PrimeField;
use std::{fmt::Debug, marker::PhantomData};
use strum_macros::IntoStaticStr;

/// A gadget lowered into gates, copy constraints and a witness
pub trait Component<F: PrimeField>: Sized {
    /// Name used in gate keys, logs and errors
    const NAME: &'static str;

    /// Static configuration. It is part of the gate key, so it must render
    /// every parameter the gate constraints depend on.
    type Params: Clone + Debug;

    /// External cells wired into the component
    type Input;

    /// Cells holding the component's results
    type Output;

    /// Witness-column counts the component can be laid out over
    fn requirement(params: &Self::Params) -> ManifestParam;

    /// The resolved shape for `witness_columns` columns
    fn manifest(params: &Self::Params, witness_columns: usize) -> Result<Manifest, ShapeError>;

    /// Binds the component to its window
    fn new(window: Window, params: Self::Params) -> Result<Self, ConstructionError>;

    fn window(&self) -> &Window;

    fn params(&self) -> &Self::Params;

    /// The shape under which gates are memoized
    fn gate_key(&self) -> GateKey {
        GateKey {
            component: Self::NAME.to_string(),
            params: format!("{:?}", self.params()),
            witness_columns: self.window().witness.clone(),
            constant_columns: self.window().constant.clone(),
        }
    }

    /// The gates of the component, one selector each
    fn gates(&self) -> Vec<GateDef<F>>;

    /// For each gate, the row offsets within the window where it is enabled
    fn gate_rows(&self) -> Vec<Vec<usize>>;

    /// Lookup tables the gates refer to
    fn lookup_tables(&self) -> Vec<LookupTable<F>> {
        vec![]
    }

    /// Rejects inputs of the wrong arity before anything is placed
    fn check_input(
        _params: &Self::Params,
        _input: &Self::Input,
    ) -> Result<(), ConstructionError> {
        Ok(())
    }

    /// Pairs of cells to wire together: external inputs to local cells, and
    /// local cells to each other or to constants
    fn copy_constraints(&self, input: &Self::Input) -> Vec<(Variable, Variable)>;

    /// Constant cells the component relies on
    fn constants(&self) -> Vec<(Variable, F)> {
        vec![]
    }

    /// Fills every cell the gates read, from the values of `input`
    fn generate_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &Self::Input,
    ) -> Result<Self::Output, AssignmentError>;

    /// Fills only the output cells, for builds that need values but no proof
    fn generate_empty_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &Self::Input,
    ) -> Result<Self::Output, AssignmentError> {
        self.generate_assignments(table, input)
    }

    /// The output cells
    fn result(&self) -> Self::Output;
}

/// Protocol state of an [`Instance`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum InstanceState {
    Declared,
    Allocated,
    GatesEmitted,
    CopyConstraintsEmitted,
    Assigned,
}

/// One use-site of a component
pub struct Instance<F: PrimeField, C: Component<F>> {
    params: C::Params,
    columns: Option<usize>,
    manifest: Option<Manifest>,
    component: Option<C>,
    selectors: Vec<usize>,
    state: InstanceState,
    _field: PhantomData<F>,
}

impl<F: PrimeField, C: Component<F>> Instance<F, C> {
    /// Declares a use-site; the column count is negotiated at allocation
    pub fn declare(params: C::Params) -> Self {
        Self {
            params,
            columns: None,
            manifest: None,
            component: None,
            selectors: vec![],
            state: InstanceState::Declared,
            _field: PhantomData,
        }
    }

    /// Declares a use-site laid out over exactly `columns` witness columns
    pub fn declare_with_columns(params: C::Params, columns: usize) -> Self {
        Self {
            columns: Some(columns),
            ..Self::declare(params)
        }
    }

    pub fn state(&self) -> InstanceState {
        self.state
    }

    pub fn params(&self) -> &C::Params {
        &self.params
    }

    pub(crate) fn columns(&self) -> Option<usize> {
        self.columns
    }

    /// The manifest chosen at allocation
    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    /// The component bound to its window, once allocated
    pub fn component(&self) -> Option<&C> {
        self.component.as_ref()
    }

    /// Selectors of the component's gates, once emitted
    pub fn selectors(&self) -> &[usize] {
        &self.selectors
    }

    /// The output cells, once allocated
    pub fn result(&self) -> Option<C::Output> {
        self.component.as_ref().map(C::result)
    }

    /// Fails unless the instance is in state `expected`
    pub(crate) fn check_state(
        &self,
        expected: InstanceState,
        operation: &'static str,
    ) -> Result<(), ProtocolError> {
        if self.state != expected {
            return Err(ProtocolError::OutOfOrder {
                component: C::NAME,
                operation,
                expected: expected.into(),
                found: self.state.into(),
            });
        }
        Ok(())
    }

    /// The bound component, provided the instance is in state `expected`
    pub(crate) fn expect(
        &self,
        expected: InstanceState,
        operation: &'static str,
    ) -> Result<&C, ProtocolError> {
        self.check_state(expected, operation)?;
        // past `Declared` the component is always bound
        self.component
            .as_ref()
            .ok_or(ProtocolError::OutOfOrder {
                component: C::NAME,
                operation,
                expected: InstanceState::Allocated.into(),
                found: self.state.into(),
            })
    }

    pub(crate) fn set_allocated(&mut self, manifest: Manifest, component: C) {
        self.manifest = Some(manifest);
        self.component = Some(component);
        self.state = InstanceState::Allocated;
    }

    pub(crate) fn set_gates_emitted(&mut self, selectors: Vec<usize>) {
        self.selectors = selectors;
        self.state = InstanceState::GatesEmitted;
    }

    pub(crate) fn advance(&mut self, state: InstanceState) {
        self.state = state;
    }
}
