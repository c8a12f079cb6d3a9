//! The per-layer graph builder.

use std::rc::Rc;

use animator_forge_core::assets::{MaskRef, MotionRef};
use animator_forge_core::errors::BuildResult;
use animator_forge_core::id::LayerId;
use animator_forge_core::parameter::ParameterKind;
use animator_forge_core::state_machine::State;
use animator_forge_core::transition::{TransitionSource, TransitionTarget};

use crate::defaults::Defaults;
use crate::document::{DocRef, with_layer_machine};
use crate::parameters::{
    BoolParameter, BoolParameterGroup, EnumIntParameter, FloatParameter, FloatParameterGroup,
    IntParameter, IntParameterGroup, ParameterHandle,
};
use crate::states::StateBuilder;
use crate::transitions::{EntryTransition, StateTransition, create_edge};

/// Graph builder bound to one layer's root sub-graph.
///
/// Obtained from the layer orchestrator on [`Author`](crate::author::Author);
/// creates states and marker transitions, and is the registry for typed
/// parameter handles.
#[derive(Clone)]
pub struct LayerBuilder {
    doc: DocRef,
    layer_id: LayerId,
    defaults: Rc<dyn Defaults>,
    placeholder: MotionRef,
}

impl LayerBuilder {
    pub(crate) fn new(
        doc: DocRef,
        layer_id: LayerId,
        defaults: Rc<dyn Defaults>,
        placeholder: MotionRef,
    ) -> Self {
        Self {
            doc,
            layer_id,
            defaults,
            placeholder,
        }
    }

    pub fn id(&self) -> LayerId {
        self.layer_id
    }

    /// The layer's current name in the controller.
    pub fn name(&self) -> String {
        let doc = self.doc.borrow();
        doc.controller
            .layer(self.layer_id)
            .expect("handle used after its layer was removed from the controller")
            .name
            .clone()
    }

    // ---- states ---------------------------------------------------------

    /// Creates a state at an explicit grid cell. Names are display-only;
    /// repeated calls with the same name create distinct states.
    pub fn new_state_at(&self, name: &str, x: i32, y: i32) -> StateBuilder {
        let grid = self.defaults.grid();
        self.add_state_at_pixels(name, (x as f32 * grid.0, y as f32 * grid.1))
    }

    /// Creates a state at the origin when the graph is empty, otherwise one
    /// grid cell to the right of the most recently created state.
    pub fn new_state(&self, name: &str) -> StateBuilder {
        let grid = self.defaults.grid();
        let position = with_layer_machine(&self.doc, self.layer_id, |machine| {
            machine
                .last_state()
                .map(|state| (state.position.0 + grid.0, state.position.1))
        })
        .unwrap_or((0.0, 0.0));
        self.add_state_at_pixels(name, position)
    }

    fn add_state_at_pixels(&self, name: &str, position: (f32, f32)) -> StateBuilder {
        let mut state = State::new(name, position);
        self.defaults.configure_state(&mut state, &self.placeholder);
        let state_id =
            with_layer_machine(&self.doc, self.layer_id, move |machine| machine.add_state(state));
        StateBuilder::new(
            self.doc.clone(),
            self.layer_id,
            state_id,
            self.defaults.clone(),
        )
    }

    // ---- marker transitions --------------------------------------------

    /// Transition from the any-state marker to the given state.
    pub fn any_state_transitions_to(&self, destination: &StateBuilder) -> StateTransition {
        StateTransition::new(create_edge(
            &self.doc,
            self.layer_id,
            &self.defaults,
            TransitionSource::AnyState,
            TransitionTarget::State(destination.id()),
        ))
    }

    /// Transition from the entry marker to the given state.
    pub fn entry_transitions_to(&self, destination: &StateBuilder) -> EntryTransition {
        let handle = create_edge(
            &self.doc,
            self.layer_id,
            &self.defaults,
            TransitionSource::Entry,
            TransitionTarget::State(destination.id()),
        );
        EntryTransition { handle }
    }

    // ---- parameter registry --------------------------------------------

    pub fn bool_parameter(&self, name: &str) -> BuildResult<BoolParameter> {
        self.declare(name, ParameterKind::Bool)?;
        Ok(BoolParameter::new(name))
    }

    /// Trigger parameter observed through a bool handle: a fired trigger is
    /// `true` in conditions.
    pub fn trigger_parameter(&self, name: &str) -> BuildResult<BoolParameter> {
        self.declare(name, ParameterKind::Trigger)?;
        Ok(BoolParameter::new(name))
    }

    pub fn int_parameter(&self, name: &str) -> BuildResult<IntParameter> {
        self.declare(name, ParameterKind::Int)?;
        Ok(IntParameter::new(name))
    }

    pub fn float_parameter(&self, name: &str) -> BuildResult<FloatParameter> {
        self.declare(name, ParameterKind::Float)?;
        Ok(FloatParameter::new(name))
    }

    /// Int parameter constrained to a closed enum value set.
    pub fn enum_parameter<E: Copy + Into<i32>>(
        &self,
        name: &str,
    ) -> BuildResult<EnumIntParameter<E>> {
        self.declare(name, ParameterKind::Int)?;
        Ok(EnumIntParameter::new(name))
    }

    pub fn bool_parameters(&self, names: &[&str]) -> BuildResult<BoolParameterGroup> {
        for name in names {
            self.declare(name, ParameterKind::Bool)?;
        }
        Ok(BoolParameterGroup::new(names))
    }

    pub fn trigger_parameters(&self, names: &[&str]) -> BuildResult<BoolParameterGroup> {
        for name in names {
            self.declare(name, ParameterKind::Trigger)?;
        }
        Ok(BoolParameterGroup::new(names))
    }

    pub fn int_parameters(&self, names: &[&str]) -> BuildResult<IntParameterGroup> {
        for name in names {
            self.declare(name, ParameterKind::Int)?;
        }
        Ok(IntParameterGroup::new(names))
    }

    pub fn float_parameters(&self, names: &[&str]) -> BuildResult<FloatParameterGroup> {
        for name in names {
            self.declare(name, ParameterKind::Float)?;
        }
        Ok(FloatParameterGroup::new(names))
    }

    fn declare(&self, name: &str, kind: ParameterKind) -> BuildResult<()> {
        self.doc
            .borrow_mut()
            .controller
            .declare_parameter(name, kind)
    }

    /// Rewrites the declared default value of the handle's parameter.
    pub fn override_value<P: ParameterHandle>(&self, parameter: &P, value: P::Value) {
        self.doc
            .borrow_mut()
            .controller
            .override_default_value(parameter.name(), value.into());
    }

    // ---- layer attributes ----------------------------------------------

    /// Replaces the layer's mask.
    pub fn with_mask(&self, mask: Option<MaskRef>) -> Self {
        {
            let mut doc = self.doc.borrow_mut();
            if let Some(layer) = doc.controller.layer_mut(self.layer_id) {
                layer.mask = mask;
            }
        }
        self.clone()
    }
}
