//! State identity, lifecycle hooks and the tagged state node.
//!
//! States live in an arena owned by the machine and are addressed by
//! [`StateId`]. A state is either a leaf ([`StateKind::Simple`]) or a
//! container ([`StateKind::Hierarchical`]) owning a nested collection.
//! Only leaves carry an `enabled` flag; a container is active exactly when
//! one of its descendants is.

use super::collection::CollectionData;
use super::transition::Transition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a state inside one machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Position of the state in the machine's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Variant tag of a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Simple,
    Hierarchical,
}

impl StateKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Simple => "StateSimple",
            Self::Hierarchical => "StateHierarchical",
        }
    }
}

/// Lookup key of a state: unique per collection.
///
/// An empty id is allowed and stands for "the unnamed state of this kind".
/// Since keys are unique, a collection holds at most one unnamed state per
/// kind.
///
/// # Example
///
/// ```rust
/// use hfsm::core::{StateKey, StateKind};
///
/// let walk = StateKey::new(StateKind::Simple, "Walk");
/// assert_eq!(walk.to_string(), "Walk");
///
/// let unnamed = StateKey::new(StateKind::Hierarchical, "");
/// assert_eq!(unnamed.to_string(), "StateHierarchical");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub kind: StateKind,
    pub id: String,
}

impl StateKey {
    pub fn new(kind: StateKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn simple(id: impl Into<String>) -> Self {
        Self::new(StateKind::Simple, id)
    }

    pub fn hierarchical(id: impl Into<String>) -> Self {
        Self::new(StateKind::Hierarchical, id)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            f.write_str(self.kind.label())
        } else {
            f.write_str(&self.id)
        }
    }
}

pub(crate) type Hook = Box<dyn FnMut()>;

/// Side-effect callbacks attached to a state.
///
/// Every hook is optional. Simple states use all four; hierarchical states
/// ignore `on_tick` since they have no tick action of their own.
///
/// # Example
///
/// ```rust
/// use hfsm::core::Hooks;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let entered = Rc::new(Cell::new(0));
/// let counter = entered.clone();
/// let hooks = Hooks::new()
///     .on_enter(move || counter.set(counter.get() + 1))
///     .on_exit(|| {});
/// # let _ = hooks;
/// ```
#[derive(Default)]
pub struct Hooks {
    pub(crate) enter: Option<Hook>,
    pub(crate) tick: Option<Hook>,
    pub(crate) exit: Option<Hook>,
    pub(crate) dispose: Option<Hook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.enter = Some(Box::new(f));
        self
    }

    pub fn on_tick<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.tick = Some(Box::new(f));
        self
    }

    pub fn on_exit<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.exit = Some(Box::new(f));
        self
    }

    /// Runs once when the machine is disposed.
    pub fn on_dispose<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.dispose = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_enter", &self.enter.is_some())
            .field("on_tick", &self.tick.is_some())
            .field("on_exit", &self.exit.is_some())
            .field("on_dispose", &self.dispose.is_some())
            .finish()
    }
}

pub(crate) fn call(hook: &mut Option<Hook>) {
    if let Some(f) = hook.as_mut() {
        f();
    }
}

/// Variant payload. `enabled` exists only on leaves.
pub(crate) enum StateBody {
    Simple { enabled: bool },
    Hierarchical(CollectionData),
}

pub(crate) struct StateNode {
    pub(crate) key: StateKey,
    /// Enclosing hierarchical state, `None` at the root.
    pub(crate) parent: Option<StateId>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) hooks: Hooks,
    pub(crate) body: StateBody,
}

impl StateNode {
    pub(crate) fn simple(id: String, hooks: Hooks) -> Self {
        Self {
            key: StateKey::new(StateKind::Simple, id),
            parent: None,
            transitions: Vec::new(),
            hooks,
            body: StateBody::Simple { enabled: false },
        }
    }

    pub(crate) fn hierarchical(this: StateId, id: String, hooks: Hooks) -> Self {
        Self {
            key: StateKey::new(StateKind::Hierarchical, id),
            parent: None,
            transitions: Vec::new(),
            hooks,
            body: StateBody::Hierarchical(CollectionData::new(Some(this))),
        }
    }

    pub(crate) fn nested(&self) -> Option<&CollectionData> {
        match &self.body {
            StateBody::Hierarchical(nested) => Some(nested),
            StateBody::Simple { .. } => None,
        }
    }

    pub(crate) fn nested_mut(&mut self) -> Option<&mut CollectionData> {
        match &mut self.body {
            StateBody::Hierarchical(nested) => Some(nested),
            StateBody::Simple { .. } => None,
        }
    }

    pub(crate) fn transition_to(&self, target: StateId) -> Option<usize> {
        self.transitions.iter().position(|t| t.target() == target)
    }
}
