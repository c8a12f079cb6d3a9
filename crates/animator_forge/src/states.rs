//! Fluent handle over one state of a layer's sub-graph.

use std::rc::Rc;

use animator_forge_core::assets::MotionRef;
use animator_forge_core::errors::{BuildError, BuildResult};
use animator_forge_core::id::{LayerId, StateId};
use animator_forge_core::parameter::ParameterValue;
use animator_forge_core::state_machine::State;
use animator_forge_core::transition::{TransitionSettings, TransitionSource, TransitionTarget};

use crate::defaults::Defaults;
use crate::document::{DocRef, with_layer_machine};
use crate::parameters::{FloatParameter, ParameterHandle};
use crate::transitions::{EntryTransition, StateTransition, create_edge};

/// Handle to a state owned by a layer's sub-graph.
///
/// Cheap to clone; every method reads and mutates the shared document
/// directly, so relative placement always sees the anchor's current stored
/// position rather than a cached one.
#[derive(Clone)]
pub struct StateBuilder {
    doc: DocRef,
    layer_id: LayerId,
    state_id: StateId,
    defaults: Rc<dyn Defaults>,
}

impl std::fmt::Debug for StateBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateBuilder")
            .field("layer_id", &self.layer_id)
            .field("state_id", &self.state_id)
            .finish_non_exhaustive()
    }
}

impl StateBuilder {
    pub(crate) fn new(
        doc: DocRef,
        layer_id: LayerId,
        state_id: StateId,
        defaults: Rc<dyn Defaults>,
    ) -> Self {
        Self {
            doc,
            layer_id,
            state_id,
            defaults,
        }
    }

    pub fn id(&self) -> StateId {
        self.state_id
    }

    pub fn name(&self) -> String {
        self.with_state(|state| state.name.clone())
    }

    /// Current display position, in pixels.
    pub fn position(&self) -> (f32, f32) {
        self.with_state(|state| state.position)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        with_layer_machine(&self.doc, self.layer_id, |machine| {
            let state = machine
                .state_mut(self.state_id)
                .expect("handle used after its state was removed from the graph");
            f(state)
        })
    }

    // ---- placement ------------------------------------------------------

    pub fn left_of(&self, other: &StateBuilder) -> BuildResult<Self> {
        self.shift(other, -1, 0)
    }

    pub fn right_of(&self, other: &StateBuilder) -> BuildResult<Self> {
        self.shift(other, 1, 0)
    }

    pub fn over(&self, other: &StateBuilder) -> BuildResult<Self> {
        self.shift(other, 0, -1)
    }

    pub fn under(&self, other: &StateBuilder) -> BuildResult<Self> {
        self.shift(other, 0, 1)
    }

    /// Places this state a number of grid cells away from another state.
    pub fn shift(&self, other: &StateBuilder, dx: i32, dy: i32) -> BuildResult<Self> {
        let anchor = with_layer_machine(&self.doc, self.layer_id, |machine| {
            machine
                .state(other.state_id)
                .map(|state| state.position)
                .ok_or(BuildError::UnknownState(other.state_id))
        })?;
        self.place_relative_to(anchor, dx, dy);
        Ok(self.clone())
    }

    pub fn left_of_previous(&self) -> BuildResult<Self> {
        self.shift_previous(-1, 0)
    }

    pub fn right_of_previous(&self) -> BuildResult<Self> {
        self.shift_previous(1, 0)
    }

    pub fn over_previous(&self) -> BuildResult<Self> {
        self.shift_previous(0, -1)
    }

    pub fn under_previous(&self) -> BuildResult<Self> {
        self.shift_previous(0, 1)
    }

    /// Places this state relative to the second-most-recently-created state.
    /// Errors when the graph holds fewer than two states.
    pub fn shift_previous(&self, dx: i32, dy: i32) -> BuildResult<Self> {
        let anchor = with_layer_machine(&self.doc, self.layer_id, |machine| {
            machine
                .second_to_last_state()
                .map(|state| state.position)
        })?;
        self.place_relative_to(anchor, dx, dy);
        Ok(self.clone())
    }

    fn place_relative_to(&self, anchor: (f32, f32), dx: i32, dy: i32) {
        let grid = self.defaults.grid();
        let position = (anchor.0 + dx as f32 * grid.0, anchor.1 + dy as f32 * grid.1);
        self.with_state(|state| state.position = position);
    }

    // ---- attributes -----------------------------------------------------

    pub fn with_animation(&self, motion: &MotionRef) -> Self {
        self.with_state(|state| state.motion = Some(motion.clone()));
        self.clone()
    }

    pub fn with_write_defaults(&self, write_defaults: bool) -> Self {
        self.with_state(|state| state.write_defaults = write_defaults);
        self.clone()
    }

    /// Drives the motion's normalized time from a float parameter.
    pub fn motion_time(&self, parameter: &FloatParameter) -> Self {
        let name = parameter.name().to_owned();
        self.with_state(|state| state.time_parameter = Some(name));
        self.clone()
    }

    /// Scales the motion's playback speed by a float parameter.
    pub fn with_speed(&self, parameter: &FloatParameter) -> Self {
        let name = parameter.name().to_owned();
        self.with_state(|state| state.speed_parameter = Some(name));
        self.clone()
    }

    /// Sets a field on the opaque host behavior of the given kind, attaching
    /// the behavior on first use. At most one behavior per kind exists on a
    /// state.
    pub fn with_behavior_field(
        &self,
        kind: &str,
        field: &str,
        value: impl Into<ParameterValue>,
    ) -> Self {
        let value = value.into();
        self.with_state(|state| state.behavior_mut(kind).set_field(field, value));
        self.clone()
    }

    // ---- transitions ----------------------------------------------------

    pub fn transitions_to(&self, destination: &StateBuilder) -> StateTransition {
        self.new_edge(
            TransitionSource::State(self.state_id),
            TransitionTarget::State(destination.state_id),
        )
    }

    pub fn transitions_from_any(&self) -> StateTransition {
        self.new_edge(
            TransitionSource::AnyState,
            TransitionTarget::State(self.state_id),
        )
    }

    pub fn transitions_from_entry(&self) -> EntryTransition {
        let handle = create_edge(
            &self.doc,
            self.layer_id,
            &self.defaults,
            TransitionSource::Entry,
            TransitionTarget::State(self.state_id),
        );
        EntryTransition { handle }
    }

    /// Transition to the exit marker.
    pub fn exits(&self) -> StateTransition {
        self.new_edge(TransitionSource::State(self.state_id), TransitionTarget::Exit)
    }

    /// Unconditional, time-driven transition: exit time is forced on and no
    /// condition is attached. Returns this state for further chaining.
    pub fn automatically_moves_to(&self, destination: &StateBuilder) -> Self {
        let mut settings = TransitionSettings::default();
        self.defaults.configure_transition(&mut settings);
        settings.has_exit_time = true;
        with_layer_machine(&self.doc, self.layer_id, |machine| {
            machine.add_transition(
                TransitionSource::State(self.state_id),
                TransitionTarget::State(destination.state_id),
                settings,
            )
        });
        self.clone()
    }

    fn new_edge(&self, source: TransitionSource, target: TransitionTarget) -> StateTransition {
        StateTransition::new(create_edge(
            &self.doc,
            self.layer_id,
            &self.defaults,
            source,
            target,
        ))
    }
}
