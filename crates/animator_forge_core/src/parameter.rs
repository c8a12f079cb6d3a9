//! Controller parameters.
//!
//! A parameter name maps to exactly one kind for the lifetime of a
//! controller. Declarations are created lazily by the registry in the
//! authoring crate and are never removed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a controller parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    Bool,
    Int,
    Float,
    /// Consumed-on-read boolean. Conditions treat it as `bool == true`.
    Trigger,
}

impl ParameterKind {
    /// Default value assigned when a parameter of this kind is first declared.
    pub fn default_value(self) -> ParameterValue {
        match self {
            ParameterKind::Bool | ParameterKind::Trigger => ParameterValue::Bool(false),
            ParameterKind::Int => ParameterValue::Int(0),
            ParameterKind::Float => ParameterValue::Float(0.0),
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterKind::Bool => "bool",
            ParameterKind::Int => "int",
            ParameterKind::Float => "float",
            ParameterKind::Trigger => "trigger",
        };
        f.write_str(name)
    }
}

/// A concrete parameter value, used for declaration defaults and for opaque
/// behavior fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        ParameterValue::Int(value)
    }
}

impl From<f32> for ParameterValue {
    fn from(value: f32) -> Self {
        ParameterValue::Float(value)
    }
}

/// One entry of the controller's parameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    pub kind: ParameterKind,
    pub default: ParameterValue,
}

impl ParameterDecl {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: kind.default_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults() {
        assert_eq!(
            ParameterKind::Bool.default_value(),
            ParameterValue::Bool(false)
        );
        assert_eq!(
            ParameterKind::Trigger.default_value(),
            ParameterValue::Bool(false)
        );
        assert_eq!(ParameterKind::Int.default_value(), ParameterValue::Int(0));
        assert_eq!(
            ParameterKind::Float.default_value(),
            ParameterValue::Float(0.0)
        );
    }
}
