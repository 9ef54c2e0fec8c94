//! Configuration-time API: collections of states and transition authoring.
//!
//! Both types are short-lived views borrowing the machine's state tree.
//! They are obtained from [`Machine::states`](crate::Machine::states) and
//! [`Machine::transitions`](crate::Machine::transitions).

pub mod collection;
pub mod transitions;

pub use collection::StatesCollection;
pub use transitions::TransitionsHelper;
