//! The controller asset: a parameter table plus an ordered list of layers.

use indexmap::IndexMap;
use tracing::debug;

use crate::assets::MaskRef;
use crate::errors::{BuildError, BuildResult};
use crate::id::LayerId;
use crate::parameter::{ParameterDecl, ParameterKind, ParameterValue};
use crate::state_machine::StateMachine;

/// A named, weighted, independently evaluated sub-graph slot.
///
/// Identity is the name; the [`LayerId`] exists so handles held by the
/// authoring layer survive a rebuild of the sub-graph in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub weight: f32,
    pub mask: Option<MaskRef>,
    pub state_machine: StateMachine,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LayerId::new(),
            name: name.into(),
            weight: 1.0,
            mask: None,
            state_machine: StateMachine::new(),
        }
    }
}

/// The in-memory animation controller under construction.
///
/// Layer order is the evaluation order and must survive rebuilds, so layers
/// live in a plain `Vec` and rebuilding mutates a slot in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Controller {
    pub parameters: IndexMap<String, ParameterDecl>,
    pub layers: Vec<Layer>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a parameter, or confirms an existing declaration.
    ///
    /// The first declaration of a name creates it with the kind-appropriate
    /// default value. Re-declaring with the same kind is a no-op; with a
    /// different kind it is a hard error, never a silent coercion.
    pub fn declare_parameter(&mut self, name: &str, kind: ParameterKind) -> BuildResult<()> {
        match self.parameters.get(name) {
            Some(existing) if existing.kind != kind => Err(BuildError::ParameterKindConflict {
                name: name.to_owned(),
                existing: existing.kind,
                requested: kind,
            }),
            Some(_) => Ok(()),
            None => {
                self.parameters
                    .insert(name.to_owned(), ParameterDecl::new(name, kind));
                Ok(())
            }
        }
    }

    /// Rewrites the default value of an existing declaration. Unknown names
    /// are ignored.
    pub fn override_default_value(&mut self, name: &str, value: ParameterValue) {
        if let Some(decl) = self.parameters.get_mut(name) {
            decl.default = value;
        }
    }

    pub fn find_layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name == name)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    /// Appends a new layer under a collision-free name and returns its id.
    pub fn add_layer(&mut self, requested_name: &str) -> LayerId {
        let name = self.make_unique_layer_name(requested_name);
        let layer = Layer::new(name);
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    /// Removes the layer with the given name. Removing an absent layer is a
    /// no-op by design; removal is idempotent.
    pub fn remove_layer(&mut self, name: &str) {
        match self.find_layer_index(name) {
            Some(index) => {
                self.layers.remove(index);
            }
            None => debug!(layer = name, "no layer with this name, nothing to remove"),
        }
    }

    /// A layer name that does not collide with any existing layer: `base`,
    /// then `base 0`, `base 1`, ...
    pub fn make_unique_layer_name(&self, base: &str) -> String {
        if self.find_layer_index(base).is_none() {
            return base.to_owned();
        }
        let mut n = 0usize;
        loop {
            let candidate = format!("{base} {n}");
            if self.find_layer_index(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclaring_a_parameter_does_not_duplicate_or_mutate() {
        let mut controller = Controller::new();
        controller.declare_parameter("Seen", ParameterKind::Bool).unwrap();
        controller.override_default_value("Seen", ParameterValue::Bool(true));
        controller.declare_parameter("Seen", ParameterKind::Bool).unwrap();

        assert_eq!(controller.parameters.len(), 1);
        assert_eq!(
            controller.parameters["Seen"].default,
            ParameterValue::Bool(true)
        );
    }

    #[test]
    fn redeclaring_with_a_different_kind_is_an_error() {
        let mut controller = Controller::new();
        controller.declare_parameter("X", ParameterKind::Bool).unwrap();

        let err = controller
            .declare_parameter("X", ParameterKind::Int)
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::ParameterKindConflict {
                name: "X".into(),
                existing: ParameterKind::Bool,
                requested: ParameterKind::Int,
            }
        );
        assert_eq!(controller.parameters.len(), 1);
    }

    #[test]
    fn added_layers_get_unique_names() {
        let mut controller = Controller::new();
        controller.add_layer("Gestures");
        controller.add_layer("Gestures");
        controller.add_layer("Gestures");

        let names: Vec<_> = controller.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Gestures", "Gestures 0", "Gestures 1"]);
    }

    #[test]
    fn removing_a_missing_layer_is_a_noop() {
        let mut controller = Controller::new();
        controller.add_layer("Base");
        controller.remove_layer("NotThere");
        controller.remove_layer("Base");
        controller.remove_layer("Base");

        assert!(controller.layers.is_empty());
    }
}
