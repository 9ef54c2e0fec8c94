//! Hfsm: a hierarchical finite state machine runtime
//!
//! States are either leaves with enter/tick/exit hooks or containers owning
//! a nested sub-machine. Transitions are guarded edges between siblings.
//! The host configures a [`Machine`], calls [`Machine::initialize`] once and
//! then [`Machine::update`] once per tick.
//!
//! # Core Concepts
//!
//! - **States**: simple leaves and hierarchical containers, looked up by
//!   [`StateKind`](core::StateKind) and id
//! - **Transitions**: guarded edges, evaluated in declaration order
//! - **Update order**: ancestors before descendants, transitions before
//!   tick actions, at most one transition per tick
//! - **Notifications**: observers receive a [`StateChange`] whenever the
//!   running leaf changes
//!
//! # Example
//!
//! ```rust
//! use hfsm::core::Hooks;
//! use hfsm::Machine;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let in_combat = Rc::new(Cell::new(false));
//! let mut machine = Machine::new();
//! let mut root = machine.states();
//! root.add_simple("Idle", Hooks::new(), true).unwrap();
//! root.add_hierarchical("Combat", false).unwrap();
//!
//! let mut combat = root.nested("Combat").unwrap();
//! combat.add_simple("Attack", Hooks::new(), true).unwrap();
//! combat
//!     .transitions()
//!     .from_simple("Attack").unwrap()
//!     .to_simple("Attack").unwrap()
//!     .set(|| false)
//!     .unwrap();
//!
//! let mut t = root.transitions();
//! let flag = in_combat.clone();
//! t.from_simple("Idle")
//!     .unwrap()
//!     .to_hierarchical("Combat")
//!     .unwrap()
//!     .set(move || flag.get())
//!     .unwrap();
//! let flag = in_combat.clone();
//! t.from_hierarchical("Combat")
//!     .unwrap()
//!     .to_simple("Idle")
//!     .unwrap()
//!     .set(move || !flag.get())
//!     .unwrap();
//!
//! machine.initialize().unwrap();
//! assert!(!machine.update().unwrap());
//!
//! in_combat.set(true);
//! assert!(machine.update().unwrap());
//! assert_eq!(machine.current_key().unwrap().id, "Attack");
//! ```

pub mod builder;
pub mod core;
pub mod debug;
pub mod machine;
pub mod snapshot;

// Re-export commonly used types
pub use crate::builder::{StatesCollection, TransitionsHelper};
pub use crate::core::{Condition, ConfigurationError, Hooks, StateId, StateKey, StateKind};
pub use crate::machine::{ListenerId, Machine, Mode, StateChange, StateRef};
