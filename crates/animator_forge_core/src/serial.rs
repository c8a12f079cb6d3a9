//! Serializable mirror of the controller, plus RON save/load helpers.
//!
//! Runtime ids are not persisted: transitions reference states by index into
//! the serialized state list, and fresh ids are generated on load. Motion and
//! mask references are persisted by name only; re-linking them to a container
//! asset is the host asset store's concern, not the graph's.

use std::collections::HashMap;

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::assets::{MaskRef, MotionRef};
use crate::behavior::Behavior;
use crate::controller::{Controller, Layer};
use crate::parameter::ParameterDecl;
use crate::state_machine::{State, StateMachine};
use crate::transition::{
    Condition, TransitionSettings, TransitionSource, TransitionTarget,
};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SerialError {
    #[error("could not encode controller as RON: {0}")]
    Encode(#[from] ron::Error),
    #[error("could not parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("transition references state index {index} but the graph has {states} states")]
    StateIndexOutOfRange { index: usize, states: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSerial {
    pub name: String,
    pub position: (f32, f32),
    pub motion: Option<String>,
    pub write_defaults: bool,
    #[serde(default)]
    pub time_parameter: Option<String>,
    #[serde(default)]
    pub speed_parameter: Option<String>,
    #[serde(default)]
    pub behaviors: Vec<Behavior>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TransitionSourceSerial {
    AnyState,
    Entry,
    State(usize),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TransitionTargetSerial {
    Exit,
    State(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSerial {
    pub source: TransitionSourceSerial,
    pub target: TransitionTargetSerial,
    pub settings: TransitionSettings,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMachineSerial {
    pub states: Vec<StateSerial>,
    pub transitions: Vec<TransitionSerial>,
    #[serde(default)]
    pub sub_machines: Vec<StateMachineSerial>,
    pub any_state_position: (f32, f32),
    pub entry_position: (f32, f32),
    pub exit_position: (f32, f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSerial {
    pub name: String,
    pub weight: f32,
    pub mask: Option<String>,
    pub state_machine: StateMachineSerial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerSerial {
    pub parameters: Vec<ParameterDecl>,
    pub layers: Vec<LayerSerial>,
}

impl From<&State> for StateSerial {
    fn from(state: &State) -> Self {
        Self {
            name: state.name.clone(),
            position: state.position,
            motion: state.motion.as_ref().map(|m| m.name.clone()),
            write_defaults: state.write_defaults,
            time_parameter: state.time_parameter.clone(),
            speed_parameter: state.speed_parameter.clone(),
            behaviors: state.behaviors.clone(),
        }
    }
}

impl From<&StateMachine> for StateMachineSerial {
    fn from(machine: &StateMachine) -> Self {
        let index_of: HashMap<_, _> = machine
            .states
            .keys()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();

        let mut transitions = Vec::with_capacity(machine.transitions.len());
        for transition in machine.transitions.values() {
            let source = match transition.source {
                TransitionSource::AnyState => TransitionSourceSerial::AnyState,
                TransitionSource::Entry => TransitionSourceSerial::Entry,
                TransitionSource::State(id) => match index_of.get(&id) {
                    Some(&index) => TransitionSourceSerial::State(index),
                    None => {
                        warn!(state = %id, "transition source is not in the graph, skipping");
                        continue;
                    }
                },
            };
            let target = match transition.target {
                TransitionTarget::Exit => TransitionTargetSerial::Exit,
                TransitionTarget::State(id) => match index_of.get(&id) {
                    Some(&index) => TransitionTargetSerial::State(index),
                    None => {
                        warn!(state = %id, "transition target is not in the graph, skipping");
                        continue;
                    }
                },
            };
            transitions.push(TransitionSerial {
                source,
                target,
                settings: transition.settings,
                conditions: transition.conditions.clone(),
            });
        }

        Self {
            states: machine.states.values().map(StateSerial::from).collect(),
            transitions,
            sub_machines: machine.sub_machines.iter().map(Self::from).collect(),
            any_state_position: machine.any_state_position,
            entry_position: machine.entry_position,
            exit_position: machine.exit_position,
        }
    }
}

impl From<&Layer> for LayerSerial {
    fn from(layer: &Layer) -> Self {
        Self {
            name: layer.name.clone(),
            weight: layer.weight,
            mask: layer.mask.as_ref().map(|m| m.name.clone()),
            state_machine: StateMachineSerial::from(&layer.state_machine),
        }
    }
}

impl From<&Controller> for ControllerSerial {
    fn from(controller: &Controller) -> Self {
        Self {
            parameters: controller.parameters.values().cloned().collect(),
            layers: controller.layers.iter().map(LayerSerial::from).collect(),
        }
    }
}

impl StateMachineSerial {
    pub fn into_machine(self) -> Result<StateMachine, SerialError> {
        let mut machine = StateMachine::new();
        machine.any_state_position = self.any_state_position;
        machine.entry_position = self.entry_position;
        machine.exit_position = self.exit_position;

        let mut ids = Vec::with_capacity(self.states.len());
        for serial in self.states {
            let mut state = State::new(serial.name, serial.position);
            state.motion = serial.motion.map(MotionRef::external);
            state.write_defaults = serial.write_defaults;
            state.time_parameter = serial.time_parameter;
            state.speed_parameter = serial.speed_parameter;
            state.behaviors = serial.behaviors;
            ids.push(machine.add_state(state));
        }

        let resolve = |index: usize| {
            ids.get(index)
                .copied()
                .ok_or(SerialError::StateIndexOutOfRange {
                    index,
                    states: ids.len(),
                })
        };
        for serial in self.transitions {
            let source = match serial.source {
                TransitionSourceSerial::AnyState => TransitionSource::AnyState,
                TransitionSourceSerial::Entry => TransitionSource::Entry,
                TransitionSourceSerial::State(index) => TransitionSource::State(resolve(index)?),
            };
            let target = match serial.target {
                TransitionTargetSerial::Exit => TransitionTarget::Exit,
                TransitionTargetSerial::State(index) => TransitionTarget::State(resolve(index)?),
            };
            let id = machine.add_transition(source, target, serial.settings);
            if let Some(transition) = machine.transition_mut(id) {
                transition.conditions = serial.conditions;
            }
        }

        for sub in self.sub_machines {
            machine.sub_machines.push(sub.into_machine()?);
        }

        Ok(machine)
    }
}

impl ControllerSerial {
    pub fn into_controller(self) -> Result<Controller, SerialError> {
        let mut controller = Controller::new();
        for decl in self.parameters {
            controller.parameters.insert(decl.name.clone(), decl);
        }
        for serial in self.layers {
            let mut layer = Layer::new(serial.name);
            layer.weight = serial.weight;
            layer.mask = serial.mask.map(MaskRef::external);
            layer.state_machine = serial.state_machine.into_machine()?;
            controller.layers.push(layer);
        }
        Ok(controller)
    }
}

/// Encodes the controller as pretty-printed RON.
pub fn to_ron_string(controller: &Controller) -> Result<String, SerialError> {
    let serial = ControllerSerial::from(controller);
    Ok(ron::ser::to_string_pretty(&serial, PrettyConfig::default())?)
}

/// Decodes a controller from RON produced by [`to_ron_string`].
pub fn from_ron_str(text: &str) -> Result<Controller, SerialError> {
    let serial: ControllerSerial = ron::from_str(text)?;
    serial.into_controller()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ParameterKind;
    use crate::transition::{Condition, ConditionMode};

    #[test]
    fn ron_round_trip_preserves_graph_shape() {
        let mut controller = Controller::new();
        controller
            .declare_parameter("Open", ParameterKind::Bool)
            .unwrap();

        let layer_id = controller.add_layer("Main");
        let machine = &mut controller.layer_mut(layer_id).unwrap().state_machine;
        machine.entry_position = (0.0, -70.0);
        let a = machine.add_state(State::new("Idle", (0.0, 0.0)));
        let b = machine.add_state(State::new("Active", (250.0, 0.0)));
        let t = machine.add_transition(
            TransitionSource::State(a),
            TransitionTarget::State(b),
            TransitionSettings::default(),
        );
        machine.transition_mut(t).unwrap().add_condition(Condition {
            parameter: "Open".into(),
            mode: ConditionMode::If,
            threshold: 0.0,
        });

        let text = to_ron_string(&controller).unwrap();
        let restored = from_ron_str(&text).unwrap();

        assert_eq!(restored.parameters.len(), 1);
        assert_eq!(restored.layers.len(), 1);
        let machine = &restored.layers[0].state_machine;
        assert_eq!(machine.states.len(), 2);
        assert_eq!(machine.transitions.len(), 1);
        let restored_t = machine.transitions.values().next().unwrap();
        assert_eq!(restored_t.conditions.len(), 1);
        assert_eq!(restored_t.conditions[0].parameter, "Open");
        assert_eq!(machine.entry_position, (0.0, -70.0));

        let names: Vec<_> = machine.states.values().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Idle", "Active"]);
    }
}
