//! The root driver: configuration entry points, initialization and ticking.

mod events;

pub use crate::core::Mode;
pub use events::{ListenerId, StateChange, StateRef};

use crate::builder::{StatesCollection, TransitionsHelper};
use crate::core::collection::Scope;
use crate::core::tree::StateTree;
use crate::core::{ConfigurationError, StateId, StateKey};
use crate::snapshot::MachineSnapshot;
use events::Listeners;

/// Hierarchical state machine.
///
/// Configure states and transitions while in [`Mode::Configuring`], call
/// [`initialize`](Self::initialize) once, then call
/// [`update`](Self::update) once per tick.
///
/// # Example
///
/// ```rust
/// use hfsm::core::Hooks;
/// use hfsm::Machine;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let go = Rc::new(Cell::new(false));
/// let mut machine = Machine::new();
/// {
///     let mut states = machine.states();
///     states.add_simple("Red", Hooks::new(), true).unwrap();
///     states.add_simple("Green", Hooks::new(), false).unwrap();
///     let flag = go.clone();
///     states
///         .transitions()
///         .from_simple("Red").unwrap()
///         .to_simple("Green").unwrap()
///         .set(move || flag.get())
///         .unwrap();
///     let flag = go.clone();
///     states
///         .transitions()
///         .from_simple("Green").unwrap()
///         .to_simple("Red").unwrap()
///         .set(move || !flag.get())
///         .unwrap();
/// }
/// machine.initialize().unwrap();
///
/// assert!(!machine.update().unwrap());
/// go.set(true);
/// assert!(machine.update().unwrap());
/// assert_eq!(machine.current_key().unwrap().id, "Green");
/// ```
pub struct Machine {
    tree: StateTree,
    current: Option<StateId>,
    started: bool,
    ticks: u64,
    listeners: Listeners,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            tree: StateTree::new(),
            current: None,
            started: false,
            ticks: 0,
            listeners: Listeners::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.tree.mode()
    }

    /// The root collection.
    pub fn states(&mut self) -> StatesCollection<'_> {
        StatesCollection::new(&mut self.tree, Scope::Root)
    }

    /// Transition authoring in the root collection.
    pub fn transitions(&mut self) -> TransitionsHelper<'_> {
        TransitionsHelper::new(&mut self.tree, Scope::Root)
    }

    /// Validate the whole tree and switch to [`Mode::Running`].
    ///
    /// The current state becomes the root start state. Its enter hook runs
    /// on the first [`update`](Self::update).
    pub fn initialize(&mut self) -> Result<(), ConfigurationError> {
        self.tree.ensure_configuring("initialize")?;
        self.tree.validate_start_states(Scope::Root)?;
        self.tree.validate_transitions(Scope::Root)?;

        let start = self
            .tree
            .collection(Scope::Root)?
            .start
            .ok_or(ConfigurationError::MissingStartState {
                collection: "root".to_string(),
            })?;
        self.current = Some(start);
        self.tree.set_running();

        tracing::info!(
            target: "hfsm::machine",
            start = %self.tree.name(start),
            "machine initialized"
        );
        Ok(())
    }

    /// Advance one tick. Returns true if the current state changed.
    ///
    /// At most one transition fires per call. On the first call the start
    /// state is entered, which moves the current state from a hierarchical
    /// start state down to its running leaf; that counts as a change. When
    /// the current state changes, subscribers are notified once before this
    /// returns.
    pub fn update(&mut self) -> Result<bool, ConfigurationError> {
        if self.tree.mode() != Mode::Running {
            return Err(ConfigurationError::NotRunning);
        }
        let previous = self.current.ok_or(ConfigurationError::NotRunning)?;
        let mut current = previous;

        if !self.started {
            self.tree.start(current);
            self.started = true;
            current = self.running_leaf()?;
        }

        self.ticks += 1;
        let fired = self.tree.update(current);
        let next = if fired { self.running_leaf()? } else { current };
        self.current = Some(next);
        if !fired && next == previous {
            return Ok(false);
        }

        let change = StateChange {
            previous: self.state_ref(previous)?,
            current: self.state_ref(next)?,
            tick: self.ticks,
        };
        tracing::debug!(
            target: "hfsm::machine",
            from = %change.previous,
            to = %change.current,
            tick = self.ticks,
            listeners = self.listeners.len(),
            "state changed"
        );
        self.listeners.emit(&change);
        Ok(true)
    }

    fn running_leaf(&self) -> Result<StateId, ConfigurationError> {
        self.tree
            .find_running_state(Scope::Root)
            .ok_or(ConfigurationError::RunningStateLost)
    }

    fn state_ref(&self, id: StateId) -> Result<StateRef, ConfigurationError> {
        let key = self
            .tree
            .key(id)
            .cloned()
            .ok_or(ConfigurationError::RunningStateLost)?;
        Ok(StateRef { id, key })
    }

    /// Register a state-change observer.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&StateChange) + 'static,
    {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Returns false if the listener was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// The running leaf, or the root start state before the first tick.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn current_key(&self) -> Option<&StateKey> {
        self.current.and_then(|id| self.tree.key(id))
    }

    pub fn state_key(&self, id: StateId) -> Option<&StateKey> {
        self.tree.key(id)
    }

    /// The hierarchical state enclosing `id`, if any.
    pub fn parent_of(&self, id: StateId) -> Option<StateId> {
        self.tree.parent(id)
    }

    pub fn is_active(&self, id: StateId) -> bool {
        self.tree.is_active(id)
    }

    /// Number of `update()` calls so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot::capture(&self.tree, self.current)
    }

    /// Release every state's resources through its dispose hook.
    pub fn dispose(mut self) {
        tracing::debug!(target: "hfsm::machine", ticks = self.ticks, "machine disposed");
        self.tree.dispose(Scope::Root);
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
