//! Observers for inspecting a running machine.
//!
//! [`DebugView`] subscribes to state changes and keeps the strings an
//! inspector panel shows: the current state, the last transition and an
//! optional pause request raised on every change.

mod history;

pub use history::{TransitionHistory, TransitionRecord};

use crate::machine::{ListenerId, Machine, StateChange};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct ViewState {
    current: String,
    previous: Option<String>,
    transition: String,
    pause_on_change: bool,
    paused: bool,
    history: TransitionHistory,
}

impl ViewState {
    fn observe(&mut self, change: &StateChange) {
        self.previous = Some(change.previous.to_string());
        self.current = change.current.to_string();
        self.transition = change.to_string();
        self.history.record(TransitionRecord::from_change(change));
        if self.pause_on_change {
            self.paused = true;
            tracing::warn!(
                target: "hfsm::debug",
                transition = %self.transition,
                "paused on state change"
            );
        }
    }
}

/// State-change observer for inspector tooling.
///
/// Cloning a view shares the same underlying state.
///
/// # Example
///
/// ```rust
/// use hfsm::core::Hooks;
/// use hfsm::debug::DebugView;
/// use hfsm::Machine;
///
/// let mut machine = Machine::new();
/// let mut states = machine.states();
/// states.add_simple("A", Hooks::new(), true).unwrap();
/// states.add_simple("B", Hooks::new(), false).unwrap();
/// let mut t = states.transitions();
/// t.from_simple("A").unwrap().to_simple("B").unwrap().set(|| true).unwrap();
/// t.from_simple("B").unwrap().to_simple("A").unwrap().set(|| false).unwrap();
/// machine.initialize().unwrap();
///
/// let view = DebugView::attach(&mut machine);
/// assert_eq!(view.current(), "A");
/// machine.update().unwrap();
/// assert_eq!(view.transition(), "A => B");
/// ```
#[derive(Clone, Debug)]
pub struct DebugView {
    state: Rc<RefCell<ViewState>>,
    listener: ListenerId,
}

impl DebugView {
    /// Subscribe to `machine`, seeding the current state string.
    pub fn attach(machine: &mut Machine) -> Self {
        let state = Rc::new(RefCell::new(ViewState {
            current: machine
                .current_key()
                .map(ToString::to_string)
                .unwrap_or_default(),
            ..ViewState::default()
        }));
        let sink = Rc::clone(&state);
        let listener = machine.subscribe(move |change| sink.borrow_mut().observe(change));
        Self { state, listener }
    }

    /// Stop observing. Returns false if already detached.
    pub fn detach(&self, machine: &mut Machine) -> bool {
        machine.unsubscribe(self.listener)
    }

    pub fn current(&self) -> String {
        self.state.borrow().current.clone()
    }

    pub fn previous(&self) -> Option<String> {
        self.state.borrow().previous.clone()
    }

    /// `"previous => current"` for the last change, empty before any.
    pub fn transition(&self) -> String {
        self.state.borrow().transition.clone()
    }

    pub fn set_pause_on_change(&self, pause: bool) {
        self.state.borrow_mut().pause_on_change = pause;
    }

    /// True once a change was observed with pause-on-change set. The host
    /// stops ticking until [`resume`](Self::resume).
    pub fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    pub fn resume(&self) {
        self.state.borrow_mut().paused = false;
    }

    pub fn history(&self) -> TransitionHistory {
        self.state.borrow().history.clone()
    }
}
