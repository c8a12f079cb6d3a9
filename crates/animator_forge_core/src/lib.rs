//! Core data model for **animator_forge**.
//!
//! This crate holds the in-memory representation of an animator controller:
//! a parameter table plus an ordered list of layers, where each layer owns a
//! state-machine sub-graph of states and guarded transitions. Everything here
//! is plain data with synchronous mutation ops; the fluent authoring surface
//! lives in the `animator_forge` crate, and persistence is a thin RON adapter
//! in [`serial`].
//!
//! The model is deliberately engine-agnostic: motions, masks and state
//! behaviors are opaque references that an external asset store interprets.

pub mod assets;
pub mod behavior;
pub mod controller;
pub mod errors;
pub mod id;
pub mod parameter;
pub mod serial;
pub mod state_machine;
pub mod transition;

pub mod prelude {
    use super::*;
    pub use assets::{AssetContainer, MaskRef, MotionRef, SubResource, SubResourceKind};
    pub use behavior::Behavior;
    pub use controller::{Controller, Layer};
    pub use errors::{BuildError, BuildResult};
    pub use id::{LayerId, StateId, SubResourceId, TransitionId};
    pub use parameter::{ParameterDecl, ParameterKind, ParameterValue};
    pub use state_machine::{State, StateMachine};
    pub use transition::{
        Condition, ConditionMode, InterruptionSource, Transition, TransitionSettings,
        TransitionSource, TransitionTarget,
    };
}
