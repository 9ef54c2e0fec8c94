//! Configuration errors raised while building or driving a machine.

use super::state::StateKey;
use thiserror::Error;

/// Errors raised by contract violations.
///
/// Every variant is a programmer mistake: the call that triggers it is the
/// call that must be fixed. Nothing in the runtime retries or recovers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Can't {operation} while the machine is running")]
    NotConfiguring { operation: &'static str },

    #[error("Machine is not running. Call .initialize() before .update()")]
    NotRunning,

    #[error("State {key:?} already exists in {collection}")]
    DuplicateState { key: StateKey, collection: String },

    #[error("Can't find state {key:?} in {collection}")]
    StateNotFound { key: StateKey, collection: String },

    #[error("State '{state}' is not a member of {collection}")]
    NotAMember { state: String, collection: String },

    #[error("State '{state}' is not hierarchical and has no nested states")]
    NotHierarchical { state: String },

    #[error("Can't remove start state '{state}', assign another start state first")]
    RemoveStartState { state: String },

    #[error("Start state not set in {collection}")]
    MissingStartState { collection: String },

    #[error("State '{state}' has no transitions")]
    NoTransitions { state: String },

    #[error("Transition from '{from}' to '{to}' already exists")]
    TransitionExists { from: String, to: String },

    #[error("No transition from '{from}' to '{to}'")]
    TransitionNotFound { from: String, to: String },

    #[error("The root collection has no owner; from_this() needs a nested collection")]
    NoOwner,

    #[error("Transition source state not specified. Call .from(kind, id)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(kind, id)")]
    MissingToState,

    #[error("No enabled leaf state found after a transition")]
    RunningStateLost,
}
