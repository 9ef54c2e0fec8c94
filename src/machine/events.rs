//! State-change notifications and the listener registry.

use crate::core::{StateId, StateKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A state as reported to observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRef {
    pub id: StateId,
    pub key: StateKey,
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}

/// Emitted once per tick in which the running leaf changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub previous: StateRef,
    pub current: StateRef,
    /// Number of the `update()` call that applied the change, from 1.
    pub tick: u64,
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.previous, self.current)
    }
}

/// Handle returned by [`Machine::subscribe`](crate::Machine::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StateChange)>;

#[derive(Default)]
pub(crate) struct Listeners {
    next: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Notify in subscription order.
    pub(crate) fn emit(&mut self, change: &StateChange) {
        for (_, listener) in &mut self.entries {
            listener(change);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
