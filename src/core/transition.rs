//! Guarded edges between sibling states.

use super::condition::{BoxedCondition, Condition};
use super::state::StateId;
use std::fmt;

/// An outgoing edge owned by its source state.
///
/// The target is a handle into the same collection as the source (or,
/// for edges authored with `from_this()`, into the source's own nested
/// collection). The condition is owned by the edge.
pub struct Transition {
    target: StateId,
    condition: BoxedCondition,
}

impl Transition {
    pub(crate) fn new(target: StateId, condition: BoxedCondition) -> Self {
        Self { target, condition }
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    pub fn condition(&self) -> &dyn Condition {
        self.condition.as_ref()
    }

    /// Evaluate the guard.
    pub fn is_ready(&self) -> bool {
        self.condition.is_true()
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
