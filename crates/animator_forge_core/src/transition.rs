//! Guarded edges between graph nodes.

use serde::{Deserialize, Serialize};

use crate::id::{StateId, TransitionId};

/// Comparison applied to a parameter when evaluating one guard clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionMode {
    /// Bool (or trigger) is true. Threshold is ignored.
    If,
    /// Bool (or trigger) is false. Threshold is ignored.
    IfNot,
    Greater,
    Less,
    Equals,
    NotEqual,
}

/// One comparison clause attached to a transition. Immutable once added.
///
/// All clauses on a single transition are AND-ed; disjunction is expressed by
/// sibling transitions between the same endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub parameter: String,
    pub mode: ConditionMode,
    pub threshold: f32,
}

/// Which already-running transition may interrupt this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterruptionSource {
    #[default]
    None,
    Source,
    Destination,
    SourceThenDestination,
    DestinationThenSource,
}

/// Every non-condition attribute of a transition.
///
/// Kept as one copyable block because the OR fork of the condition algebra
/// duplicates it verbatim onto each sibling transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSettings {
    pub duration: f32,
    pub offset: f32,
    pub interruption_source: InterruptionSource,
    pub ordered_interruption: bool,
    pub exit_time: f32,
    pub has_exit_time: bool,
    /// When set, `duration` is in seconds; otherwise it is normalized to the
    /// source motion's length.
    pub has_fixed_duration: bool,
    pub can_transition_to_self: bool,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration: 0.0,
            offset: 0.0,
            interruption_source: InterruptionSource::None,
            ordered_interruption: true,
            exit_time: 0.0,
            has_exit_time: false,
            has_fixed_duration: true,
            can_transition_to_self: false,
        }
    }
}

/// Origin of a transition: an owned state or one of the fixed markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionSource {
    AnyState,
    Entry,
    State(StateId),
}

/// Destination of a transition: an owned state or the exit marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionTarget {
    Exit,
    State(StateId),
}

/// A guarded edge owned by a sub-graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub id: TransitionId,
    pub source: TransitionSource,
    pub target: TransitionTarget,
    pub settings: TransitionSettings,
    pub conditions: Vec<Condition>,
}

impl Transition {
    pub fn new(
        source: TransitionSource,
        target: TransitionTarget,
        settings: TransitionSettings,
    ) -> Self {
        Self {
            id: TransitionId::new(),
            source,
            target,
            settings,
            conditions: Vec::new(),
        }
    }

    pub fn add_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }
}
