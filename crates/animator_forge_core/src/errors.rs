use thiserror::Error;

use crate::id::StateId;
use crate::parameter::ParameterKind;

/// Possible errors produced while mutating the controller graph.
///
/// Every mutation either fully applies or fails before touching the graph;
/// there is no partially-applied state to recover from.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("parameter {name:?} is already declared as {existing}, cannot redeclare it as {requested}")]
    ParameterKindConflict {
        name: String,
        existing: ParameterKind,
        requested: ParameterKind,
    },
    #[error("relative placement requires at least two states in the graph")]
    RelativePlacementNeedsTwoStates,
    #[error("state {0} does not exist in this graph")]
    UnknownState(StateId),
}

pub type BuildResult<T> = Result<T, BuildError>;
