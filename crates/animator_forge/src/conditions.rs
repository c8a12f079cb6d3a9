//! Guard-clause sources for the transition condition algebra.
//!
//! A [`ConditionSource`] yields one or more clauses that are AND-ed onto a
//! single transition. An [`OrConditionSource`] is a declared disjunction: it
//! can only be applied through the fan-out path of the algebra, which turns
//! every disjunct into its own sibling transition.

use animator_forge_core::transition::{Condition, ConditionMode};

use crate::transitions::{TransitionContinuation, TransitionHead};

/// A source of AND-ed guard clauses.
pub trait ConditionSource {
    /// Appends this source's clauses to a transition's condition list.
    fn append_to(&self, conditions: &mut Vec<Condition>);
}

/// One comparison clause against a named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub parameter: String,
    pub mode: ConditionMode,
    pub threshold: f32,
}

impl Clause {
    pub(crate) fn new(parameter: &str, mode: ConditionMode, threshold: f32) -> Self {
        Self {
            parameter: parameter.to_owned(),
            mode,
            threshold,
        }
    }
}

impl ConditionSource for Clause {
    fn append_to(&self, conditions: &mut Vec<Condition>) {
        conditions.push(Condition {
            parameter: self.parameter.clone(),
            mode: self.mode,
            threshold: self.threshold,
        });
    }
}

/// Conjunction over a clause list: every clause must hold.
#[derive(Debug, Clone, PartialEq)]
pub struct AllOf(pub(crate) Vec<Clause>);

impl ConditionSource for AllOf {
    fn append_to(&self, conditions: &mut Vec<Condition>) {
        for clause in &self.0 {
            clause.append_to(conditions);
        }
    }
}

/// Declared disjunction over a clause list: any one clause may hold.
///
/// Not a [`ConditionSource`]: OR does not exist at the single-transition
/// level, so the only way to apply this is the fan-out entry point of the
/// algebra.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyOf(pub(crate) Vec<Clause>);

/// A source of disjunct groups realized as sibling transitions.
pub trait OrConditionSource {
    /// Applies the first disjunct to the head's transition and forks one
    /// sibling per remaining disjunct, returning every branch in order.
    fn apply_to(&self, head: &TransitionHead) -> Vec<TransitionContinuation>;
}

impl OrConditionSource for AnyOf {
    fn apply_to(&self, head: &TransitionHead) -> Vec<TransitionContinuation> {
        let mut branches: Vec<TransitionContinuation> = Vec::with_capacity(self.0.len());
        for clause in &self.0 {
            let branch = match branches.last() {
                None => head.when(clause.clone()),
                Some(previous) => previous.or().when(clause.clone()),
            };
            branches.push(branch);
        }
        if branches.is_empty() {
            branches.push(head.when_conditions());
        }
        branches
    }
}
