//! # animator_forge
//!
//! Fluent, idempotent authoring of animator-controller state machines.
//!
//! A build script obtains an [`Author`](author::Author) over a controller,
//! asks it for a layer (creating it, or wiping and reusing an existing layer
//! of the same name in place), then wires states and guarded transitions
//! through cheap fluent handles. Re-running the same script against the same
//! controller regenerates the graph without accumulating duplicate layers,
//! states or sub-resources.
//!
//! ```
//! use animator_forge::prelude::*;
//!
//! # fn demo() -> BuildResult<()> {
//! let author = Author::new(AuthorConfig::new("HandGestures", "hand_gestures"));
//! let layer = author.create_main_layer();
//!
//! let open = layer.bool_parameter("HandOpen")?;
//! let idle = layer.new_state_at("Idle", 0, 0);
//! let active = layer.new_state("Active");
//!
//! idle.transitions_to(&active).when(open.is_true());
//! active.transitions_to(&idle).when(open.is_false());
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```
//!
//! Transition guards form a small algebra: clauses chained with
//! [`when`](transitions::TransitionHead::when) and
//! [`and`](transitions::TransitionContinuation::and) are conjoined on one
//! transition, while [`or`](transitions::TransitionContinuation::or) forks a
//! settings-identical sibling transition so that the destination is reached
//! when any sibling's full clause set holds. Applying a declared OR-group
//! (e.g. [`is_any_of`](parameters::EnumIntParameter::is_any_of)) fans out
//! into one sibling per disjunct, and a subsequent `and` broadcasts to every
//! branch of the group.
//!
//! The data model lives in [`animator_forge_core`], re-exported here as
//! [`core`].

pub mod author;
pub mod conditions;
pub mod defaults;
pub mod layers;
pub mod parameters;
pub mod states;
pub mod transitions;

mod document;

pub use animator_forge_core as core;

pub mod prelude {
    pub use crate::author::{Author, AuthorConfig};
    pub use crate::conditions::{AllOf, AnyOf, Clause, ConditionSource, OrConditionSource};
    pub use crate::defaults::{Defaults, StandardDefaults};
    pub use crate::layers::LayerBuilder;
    pub use crate::parameters::{
        BoolParameter, BoolParameterGroup, EnumIntParameter, FloatParameter, FloatParameterGroup,
        IntParameter, IntParameterGroup, ParameterHandle,
    };
    pub use crate::states::StateBuilder;
    pub use crate::transitions::{
        ConditionsWithoutOr, ContinuationOnlyOr, EntryTransition, MultiTransitionContinuation,
        StateTransition, TransitionContinuation, TransitionHead,
    };
    pub use animator_forge_core::prelude::*;
}
