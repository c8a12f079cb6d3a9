//! Typed handles over named controller parameters.
//!
//! Handles are plain names: the registry on the layer builder creates the
//! underlying declaration on first reference, and repeat references hand out
//! equivalent handles without touching the controller. Clause constructors
//! on the handles feed the condition algebra.

use std::marker::PhantomData;

use animator_forge_core::parameter::ParameterValue;
use animator_forge_core::transition::ConditionMode;

use crate::conditions::{AllOf, AnyOf, Clause};

/// Common surface of typed parameter handles.
pub trait ParameterHandle {
    type Value: Into<ParameterValue>;

    fn name(&self) -> &str;
}

/// Handle to a bool parameter. Trigger parameters share this handle type:
/// a fired trigger is observed as `bool == true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolParameter {
    name: String,
}

impl BoolParameter {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }

    pub fn is_true(&self) -> Clause {
        Clause::new(&self.name, ConditionMode::If, 0.0)
    }

    pub fn is_false(&self) -> Clause {
        Clause::new(&self.name, ConditionMode::IfNot, 0.0)
    }

    pub fn is_equal_to(&self, value: bool) -> Clause {
        if value { self.is_true() } else { self.is_false() }
    }
}

impl ParameterHandle for BoolParameter {
    type Value = bool;

    fn name(&self) -> &str {
        &self.name
    }
}

/// Handle to an int parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntParameter {
    name: String,
}

impl IntParameter {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }

    pub fn is_greater_than(&self, value: i32) -> Clause {
        Clause::new(&self.name, ConditionMode::Greater, value as f32)
    }

    pub fn is_less_than(&self, value: i32) -> Clause {
        Clause::new(&self.name, ConditionMode::Less, value as f32)
    }

    pub fn is_equal_to(&self, value: i32) -> Clause {
        Clause::new(&self.name, ConditionMode::Equals, value as f32)
    }

    pub fn is_not_equal_to(&self, value: i32) -> Clause {
        Clause::new(&self.name, ConditionMode::NotEqual, value as f32)
    }
}

impl ParameterHandle for IntParameter {
    type Value = i32;

    fn name(&self) -> &str {
        &self.name
    }
}

/// Handle to a float parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatParameter {
    name: String,
}

impl FloatParameter {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }

    pub fn is_greater_than(&self, value: f32) -> Clause {
        Clause::new(&self.name, ConditionMode::Greater, value)
    }

    pub fn is_less_than(&self, value: f32) -> Clause {
        Clause::new(&self.name, ConditionMode::Less, value)
    }
}

impl ParameterHandle for FloatParameter {
    type Value = f32;

    fn name(&self) -> &str {
        &self.name
    }
}

/// Handle to an int parameter constrained to a closed enum value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumIntParameter<E> {
    name: String,
    _values: PhantomData<E>,
}

impl<E: Copy + Into<i32>> EnumIntParameter<E> {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            _values: PhantomData,
        }
    }

    pub fn is_equal_to(&self, value: E) -> Clause {
        Clause::new(&self.name, ConditionMode::Equals, value.into() as f32)
    }

    pub fn is_not_equal_to(&self, value: E) -> Clause {
        Clause::new(&self.name, ConditionMode::NotEqual, value.into() as f32)
    }

    /// Disjunction: the parameter holds one of the given values.
    pub fn is_any_of(&self, values: &[E]) -> AnyOf {
        AnyOf(values.iter().map(|v| self.is_equal_to(*v)).collect())
    }

    /// Conjunction: the parameter holds none of the given values.
    pub fn is_not_any_of(&self, values: &[E]) -> AllOf {
        AllOf(values.iter().map(|v| self.is_not_equal_to(*v)).collect())
    }
}

impl<E: Copy + Into<i32>> ParameterHandle for EnumIntParameter<E> {
    type Value = i32;

    fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered group of bool (or trigger-as-bool) parameter handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolParameterGroup {
    parameters: Vec<BoolParameter>,
}

impl BoolParameterGroup {
    pub(crate) fn new(names: &[&str]) -> Self {
        Self {
            parameters: names.iter().map(|n| BoolParameter::new(n)).collect(),
        }
    }

    pub fn parameters(&self) -> &[BoolParameter] {
        &self.parameters
    }

    pub fn are_true(&self) -> AllOf {
        AllOf(self.parameters.iter().map(|p| p.is_true()).collect())
    }

    pub fn are_false(&self) -> AllOf {
        AllOf(self.parameters.iter().map(|p| p.is_false()).collect())
    }

    pub fn is_any_true(&self) -> AnyOf {
        AnyOf(self.parameters.iter().map(|p| p.is_true()).collect())
    }

    pub fn is_any_false(&self) -> AnyOf {
        AnyOf(self.parameters.iter().map(|p| p.is_false()).collect())
    }
}

/// Ordered group of int parameter handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntParameterGroup {
    parameters: Vec<IntParameter>,
}

impl IntParameterGroup {
    pub(crate) fn new(names: &[&str]) -> Self {
        Self {
            parameters: names.iter().map(|n| IntParameter::new(n)).collect(),
        }
    }

    pub fn parameters(&self) -> &[IntParameter] {
        &self.parameters
    }

    pub fn are_equal_to(&self, value: i32) -> AllOf {
        AllOf(
            self.parameters
                .iter()
                .map(|p| p.is_equal_to(value))
                .collect(),
        )
    }

    pub fn are_greater_than(&self, value: i32) -> AllOf {
        AllOf(
            self.parameters
                .iter()
                .map(|p| p.is_greater_than(value))
                .collect(),
        )
    }

    pub fn are_less_than(&self, value: i32) -> AllOf {
        AllOf(
            self.parameters
                .iter()
                .map(|p| p.is_less_than(value))
                .collect(),
        )
    }
}

/// Ordered group of float parameter handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatParameterGroup {
    parameters: Vec<FloatParameter>,
}

impl FloatParameterGroup {
    pub(crate) fn new(names: &[&str]) -> Self {
        Self {
            parameters: names.iter().map(|n| FloatParameter::new(n)).collect(),
        }
    }

    pub fn parameters(&self) -> &[FloatParameter] {
        &self.parameters
    }

    pub fn are_greater_than(&self, value: f32) -> AllOf {
        AllOf(
            self.parameters
                .iter()
                .map(|p| p.is_greater_than(value))
                .collect(),
        )
    }

    pub fn are_less_than(&self, value: f32) -> AllOf {
        AllOf(
            self.parameters
                .iter()
                .map(|p| p.is_less_than(value))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    enum Gesture {
        Neutral = 0,
        Fist = 1,
        Open = 2,
    }

    impl From<Gesture> for i32 {
        fn from(gesture: Gesture) -> i32 {
            gesture as i32
        }
    }

    #[test]
    fn bool_clauses_use_if_modes() {
        let p = BoolParameter::new("Seen");
        assert_eq!(p.is_true().mode, ConditionMode::If);
        assert_eq!(p.is_false().mode, ConditionMode::IfNot);
        assert_eq!(p.is_equal_to(true), p.is_true());
    }

    #[test]
    fn enum_any_of_builds_one_disjunct_per_value() {
        let p: EnumIntParameter<Gesture> = EnumIntParameter::new("Gesture");
        let any = p.is_any_of(&[Gesture::Fist, Gesture::Open]);
        assert_eq!(any.0.len(), 2);
        assert_eq!(any.0[0].threshold, 1.0);
        assert_eq!(any.0[1].threshold, 2.0);

        let none = p.is_not_any_of(&[Gesture::Neutral, Gesture::Fist]);
        assert_eq!(none.0.len(), 2);
        assert_eq!(none.0[0].mode, ConditionMode::NotEqual);
    }
}
