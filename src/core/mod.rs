//! Core state machine types and algorithms.
//!
//! This module contains the state arena and everything that walks it:
//! - State identity and hooks via [`StateKey`], [`StateKind`] and [`Hooks`]
//! - Guard conditions for transitions
//! - Structural validation and the per-tick update algorithm

pub mod condition;
mod error;
mod state;
mod transition;

pub(crate) mod collection;
pub(crate) mod tree;

pub use condition::{BoxedCondition, Condition};
pub use error::ConfigurationError;
pub use state::{Hooks, StateId, StateKey, StateKind};
pub use transition::Transition;
pub use tree::Mode;
