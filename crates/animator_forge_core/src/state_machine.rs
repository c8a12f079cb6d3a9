//! States and the per-layer sub-graph that owns them.

use indexmap::IndexMap;

use crate::assets::MotionRef;
use crate::behavior::Behavior;
use crate::errors::{BuildError, BuildResult};
use crate::id::{StateId, TransitionId};
use crate::transition::{Transition, TransitionSettings, TransitionSource, TransitionTarget};

/// A state node. Owned exclusively by the sub-graph containing it.
///
/// The name is display-only: two states in the same graph may share one, and
/// deduplication is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: StateId,
    pub name: String,
    /// Display position in pixels. Grid-unit placement is resolved by the
    /// authoring layer before the position is stored.
    pub position: (f32, f32),
    pub motion: Option<MotionRef>,
    pub write_defaults: bool,
    /// Float parameter driving the motion's normalized time.
    pub time_parameter: Option<String>,
    /// Float parameter scaling the motion's playback speed.
    pub speed_parameter: Option<String>,
    pub behaviors: Vec<Behavior>,
}

impl State {
    pub fn new(name: impl Into<String>, position: (f32, f32)) -> Self {
        Self {
            id: StateId::new(),
            name: name.into(),
            position,
            motion: None,
            write_defaults: false,
            time_parameter: None,
            speed_parameter: None,
            behaviors: Vec::new(),
        }
    }

    /// The behavior of the given kind, attaching a fresh one on first use.
    pub fn behavior_mut(&mut self, kind: &str) -> &mut Behavior {
        match self.behaviors.iter().position(|b| b.kind == kind) {
            Some(index) => &mut self.behaviors[index],
            None => {
                self.behaviors.push(Behavior::new(kind));
                let index = self.behaviors.len() - 1;
                &mut self.behaviors[index]
            }
        }
    }
}

/// A layer's root sub-graph: states, transitions and the three fixed markers
/// (entry, exit, any-state), each with its own display anchor.
///
/// Insertion order of `states` is semantically relevant: auto-placement of
/// new states and anchor-less relative placement both refer to the most
/// recently created states.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateMachine {
    pub states: IndexMap<StateId, State>,
    pub transitions: IndexMap<TransitionId, Transition>,
    /// Nested graphs. The builder never creates these, but a rebuilt layer
    /// may contain externally authored ones that the wipe must discard.
    pub sub_machines: Vec<StateMachine>,
    pub any_state_position: (f32, f32),
    pub entry_position: (f32, f32),
    pub exit_position: (f32, f32),
    /// Host-editor undo bookkeeping toggle for every node owned by this
    /// graph. Forced off by the layer orchestrator.
    pub record_undo: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, state: State) -> StateId {
        let id = state.id;
        self.states.insert(id, state);
        id
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.get_mut(&id)
    }

    /// The most recently created state, if any.
    pub fn last_state(&self) -> Option<&State> {
        self.states.values().last()
    }

    /// Anchor for relative placement when no explicit anchor state is given.
    ///
    /// Errors when fewer than two states exist; placement must fail loudly
    /// rather than silently falling back to the origin.
    pub fn second_to_last_state(&self) -> BuildResult<&State> {
        let len = self.states.len();
        if len < 2 {
            return Err(BuildError::RelativePlacementNeedsTwoStates);
        }
        self.states
            .get_index(len - 2)
            .map(|(_, state)| state)
            .ok_or(BuildError::RelativePlacementNeedsTwoStates)
    }

    pub fn add_transition(
        &mut self,
        source: TransitionSource,
        target: TransitionTarget,
        settings: TransitionSettings,
    ) -> TransitionId {
        let transition = Transition::new(source, target, settings);
        let id = transition.id;
        self.transitions.insert(id, transition);
        id
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(&id)
    }

    pub fn transition_mut(&mut self, id: TransitionId) -> Option<&mut Transition> {
        self.transitions.get_mut(&id)
    }

    /// All transitions wired between the given endpoints, in creation order.
    pub fn transitions_between(
        &self,
        source: TransitionSource,
        target: TransitionTarget,
    ) -> Vec<&Transition> {
        self.transitions
            .values()
            .filter(|t| t.source == source && t.target == target)
            .collect()
    }

    /// Wipes every state, transition and nested graph. Marker anchors and the
    /// container itself survive, which is what keeps rebuilds idempotent.
    pub fn clear_graph(&mut self) {
        self.states.clear();
        self.transitions.clear();
        self.sub_machines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_to_last_requires_two_states() {
        let mut machine = StateMachine::new();
        assert_eq!(
            machine.second_to_last_state().unwrap_err(),
            BuildError::RelativePlacementNeedsTwoStates
        );

        machine.add_state(State::new("only", (0.0, 0.0)));
        assert_eq!(
            machine.second_to_last_state().unwrap_err(),
            BuildError::RelativePlacementNeedsTwoStates
        );

        machine.add_state(State::new("second", (1.0, 0.0)));
        assert_eq!(machine.second_to_last_state().unwrap().name, "only");
    }

    #[test]
    fn duplicate_names_create_distinct_states() {
        let mut machine = StateMachine::new();
        let a = machine.add_state(State::new("same", (0.0, 0.0)));
        let b = machine.add_state(State::new("same", (1.0, 0.0)));
        assert_ne!(a, b);
        assert_eq!(machine.states.len(), 2);
    }

    #[test]
    fn clear_graph_wipes_everything_but_anchors() {
        let mut machine = StateMachine::new();
        machine.any_state_position = (0.0, 490.0);
        let a = machine.add_state(State::new("a", (0.0, 0.0)));
        machine.add_transition(
            TransitionSource::AnyState,
            TransitionTarget::State(a),
            TransitionSettings::default(),
        );
        machine.sub_machines.push(StateMachine::new());

        machine.clear_graph();

        assert!(machine.states.is_empty());
        assert!(machine.transitions.is_empty());
        assert!(machine.sub_machines.is_empty());
        assert_eq!(machine.any_state_position, (0.0, 490.0));
    }

    #[test]
    fn behavior_attached_once_per_kind() {
        let mut state = State::new("s", (0.0, 0.0));
        state.behavior_mut("driver").set_field("x", 1);
        state.behavior_mut("driver").set_field("y", 2);
        state.behavior_mut("tracking").set_field("head", false);

        assert_eq!(state.behaviors.len(), 2);
        assert_eq!(state.behaviors[0].fields.len(), 2);
    }
}
