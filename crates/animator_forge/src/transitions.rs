//! Transition handles and the condition-algebra chain.
//!
//! The chain grammar is encoded in the type system: each stage exposes only
//! the operations legal at that point, so e.g. an AND-only closure simply has
//! no `or` to call. The stages are
//!
//! - [`StateTransition`] / [`TransitionHead`]: fresh transition, conditions
//!   not yet started (`StateTransition` additionally carries the timing
//!   surface, which becomes unavailable once conditions begin);
//! - [`TransitionContinuation`]: at least one clause applied, `and`/`or`
//!   both legal;
//! - [`MultiTransitionContinuation`]: an OR-group was applied, `and`
//!   broadcasts to every branch;
//! - [`ContinuationOnlyOr`]: after a composed condition series, only `or`;
//! - [`ConditionsWithoutOr`]: inside an AND-only closure.
//!
//! Every call mutates the underlying graph immediately; there is no commit
//! step, and abandoning a chain at any stage leaves a valid transition.

use std::rc::Rc;

use animator_forge_core::id::{LayerId, TransitionId};
use animator_forge_core::transition::{
    InterruptionSource, Transition, TransitionSettings, TransitionSource, TransitionTarget,
};

use crate::conditions::{ConditionSource, OrConditionSource};
use crate::defaults::Defaults;
use crate::document::{DocRef, with_layer_machine};

/// Shared innards of every chain stage: enough to find the transition again
/// and to fork settings-identical siblings between the same endpoints.
#[derive(Clone)]
pub(crate) struct EdgeHandle {
    doc: DocRef,
    layer_id: LayerId,
    transition_id: TransitionId,
    source: TransitionSource,
    target: TransitionTarget,
}

impl EdgeHandle {
    fn with_transition<R>(&self, f: impl FnOnce(&mut Transition) -> R) -> R {
        with_layer_machine(&self.doc, self.layer_id, |machine| {
            let transition = machine
                .transition_mut(self.transition_id)
                .expect("handle used after its transition was removed from the graph");
            f(transition)
        })
    }

    fn append(&self, source: &impl ConditionSource) {
        self.with_transition(|t| source.append_to(&mut t.conditions));
    }

    /// The OR fork: a sibling transition between the same endpoints carrying
    /// a verbatim copy of the template's settings and an empty condition
    /// list. The creation path is re-derived from the endpoints, so
    /// any-state, entry, exit and state-to-state templates each fork the
    /// matching kind of edge.
    fn fork_sibling(&self) -> EdgeHandle {
        let settings = self.with_transition(|t| t.settings);
        let transition_id = with_layer_machine(&self.doc, self.layer_id, |machine| {
            machine.add_transition(self.source, self.target, settings)
        });
        EdgeHandle {
            transition_id,
            ..self.clone()
        }
    }
}

/// Wires a defaults-configured transition between the given endpoints.
pub(crate) fn create_edge(
    doc: &DocRef,
    layer_id: LayerId,
    defaults: &Rc<dyn Defaults>,
    source: TransitionSource,
    target: TransitionTarget,
) -> EdgeHandle {
    let mut settings = TransitionSettings::default();
    defaults.configure_transition(&mut settings);
    let transition_id = with_layer_machine(doc, layer_id, |machine| {
        machine.add_transition(source, target, settings)
    });
    EdgeHandle {
        doc: doc.clone(),
        layer_id,
        transition_id,
        source,
        target,
    }
}

/// A fresh transition whose conditions have not started yet.
///
/// This is what [`or`](TransitionContinuation::or) returns: timing was copied
/// from the template and is no longer editable, only the `when` family is
/// available. Entry transitions are also represented by this type, since
/// entry edges carry no timing surface at all.
#[derive(Clone)]
pub struct TransitionHead {
    pub(crate) handle: EdgeHandle,
}

/// An entry-marker transition; only the condition chain is available.
pub type EntryTransition = TransitionHead;

impl TransitionHead {
    /// Starts the condition list with an AND-ed clause source.
    pub fn when(&self, source: impl ConditionSource) -> TransitionContinuation {
        self.handle.append(&source);
        TransitionContinuation {
            handle: self.handle.clone(),
        }
    }

    /// Applies a declared OR-group: the first disjunct lands on this
    /// transition and every further disjunct forks its own sibling. The
    /// branches stay tracked as one group so that a following `and`
    /// broadcasts to all of them.
    pub fn when_any(&self, source: impl OrConditionSource) -> MultiTransitionContinuation {
        let branches = source.apply_to(self);
        MultiTransitionContinuation {
            handle: self.handle.clone(),
            branches,
        }
    }

    /// Applies a series of AND-ed conditions; the closure's argument type
    /// does not expose `or`.
    pub fn when_all(&self, f: impl FnOnce(&mut ConditionsWithoutOr)) -> TransitionContinuation {
        let mut conditions = ConditionsWithoutOr {
            handle: self.handle.clone(),
        };
        f(&mut conditions);
        TransitionContinuation {
            handle: self.handle.clone(),
        }
    }

    /// Applies a condition series that may itself contain `or` forks; the
    /// result can only be continued with another `or`, never an `and`.
    pub fn when_composed(&self, f: impl FnOnce(&TransitionHead)) -> ContinuationOnlyOr {
        f(self);
        ContinuationOnlyOr {
            handle: self.handle.clone(),
        }
    }

    /// Continues with an empty condition list.
    pub fn when_conditions(&self) -> TransitionContinuation {
        TransitionContinuation {
            handle: self.handle.clone(),
        }
    }
}

/// A fresh any-state, exit or state-to-state transition: timing configuration
/// plus the `when` family.
#[derive(Clone)]
pub struct StateTransition {
    head: TransitionHead,
}

impl StateTransition {
    pub(crate) fn new(handle: EdgeHandle) -> Self {
        Self {
            head: TransitionHead { handle },
        }
    }

    fn tweak(&self, f: impl FnOnce(&mut TransitionSettings)) -> Self {
        self.head.handle.with_transition(|t| f(&mut t.settings));
        self.clone()
    }

    /// Transition blend duration, in seconds.
    pub fn with_transition_duration_seconds(&self, seconds: f32) -> Self {
        self.tweak(|s| s.duration = seconds)
    }

    /// Transition blend duration as a fraction of the source motion.
    pub fn with_transition_duration_percent(&self, normalized: f32) -> Self {
        self.tweak(|s| {
            s.has_fixed_duration = false;
            s.duration = normalized;
        })
    }

    pub fn with_source_interruption(&self) -> Self {
        self.tweak(|s| s.interruption_source = InterruptionSource::Source)
    }

    pub fn with_ordered_interruption(&self) -> Self {
        self.tweak(|s| s.ordered_interruption = true)
    }

    pub fn with_no_ordered_interruption(&self) -> Self {
        self.tweak(|s| s.ordered_interruption = false)
    }

    pub fn with_transition_to_self(&self) -> Self {
        self.tweak(|s| s.can_transition_to_self = true)
    }

    pub fn with_no_transition_to_self(&self) -> Self {
        self.tweak(|s| s.can_transition_to_self = false)
    }

    /// Take the transition once the source motion has fully played.
    pub fn after_animation_finishes(&self) -> Self {
        self.tweak(|s| {
            s.has_exit_time = true;
            s.exit_time = 1.0;
        })
    }

    /// Take the transition once the source motion reaches the given
    /// normalized time.
    pub fn after_animation_is_at_least_at_percent(&self, exit_time_normalized: f32) -> Self {
        self.tweak(|s| {
            s.has_exit_time = true;
            s.exit_time = exit_time_normalized;
        })
    }

    pub fn when(&self, source: impl ConditionSource) -> TransitionContinuation {
        self.head.when(source)
    }

    pub fn when_any(&self, source: impl OrConditionSource) -> MultiTransitionContinuation {
        self.head.when_any(source)
    }

    pub fn when_all(&self, f: impl FnOnce(&mut ConditionsWithoutOr)) -> TransitionContinuation {
        self.head.when_all(f)
    }

    pub fn when_composed(&self, f: impl FnOnce(&TransitionHead)) -> ContinuationOnlyOr {
        self.head.when_composed(f)
    }

    pub fn when_conditions(&self) -> TransitionContinuation {
        self.head.when_conditions()
    }
}

/// A transition with at least one clause applied; `and` extends the
/// conjunction, `or` forks a settings-identical sibling.
#[derive(Clone)]
pub struct TransitionContinuation {
    pub(crate) handle: EdgeHandle,
}

impl TransitionContinuation {
    /// Adds a further clause source; all preceding clauses must still hold.
    pub fn and(&self, source: impl ConditionSource) -> Self {
        self.handle.append(&source);
        self.clone()
    }

    /// Adds a series of AND-ed conditions that cannot contain `or`.
    pub fn and_all(&self, f: impl FnOnce(&mut ConditionsWithoutOr)) -> Self {
        let mut conditions = ConditionsWithoutOr {
            handle: self.handle.clone(),
        };
        f(&mut conditions);
        self.clone()
    }

    /// Forks a sibling transition with identical settings and no conditions
    /// yet, realizing disjunction between the two condition lists.
    pub fn or(&self) -> TransitionHead {
        TransitionHead {
            handle: self.handle.fork_sibling(),
        }
    }
}

/// The tracked branches of an applied OR-group.
///
/// `and` loops over every branch: a condition added after the group applies
/// to all of its disjuncts, not just the most recently forked one.
#[derive(Clone)]
pub struct MultiTransitionContinuation {
    handle: EdgeHandle,
    branches: Vec<TransitionContinuation>,
}

impl MultiTransitionContinuation {
    pub fn and(&self, source: impl ConditionSource) -> Self {
        for branch in &self.branches {
            branch.handle.append(&source);
        }
        self.clone()
    }

    pub fn and_all(&self, f: impl Fn(&mut ConditionsWithoutOr)) -> Self {
        for branch in &self.branches {
            let mut conditions = ConditionsWithoutOr {
                handle: branch.handle.clone(),
            };
            f(&mut conditions);
        }
        self.clone()
    }

    /// Forks from the group's original template transition, leaving every
    /// branch of the group untouched.
    pub fn or(&self) -> TransitionHead {
        TransitionHead {
            handle: self.handle.fork_sibling(),
        }
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }
}

/// After a composed condition series only a further disjunct is legal.
#[derive(Clone)]
pub struct ContinuationOnlyOr {
    handle: EdgeHandle,
}

impl ContinuationOnlyOr {
    pub fn or(&self) -> TransitionHead {
        TransitionHead {
            handle: self.handle.fork_sibling(),
        }
    }
}

/// AND-only condition appender handed to `when_all`/`and_all` closures.
pub struct ConditionsWithoutOr {
    handle: EdgeHandle,
}

impl ConditionsWithoutOr {
    pub fn and(&mut self, source: impl ConditionSource) -> &mut Self {
        self.handle.append(&source);
        self
    }
}
