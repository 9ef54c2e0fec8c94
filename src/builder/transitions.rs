//! Builder for authoring transitions inside one collection.

use crate::core::collection::Scope;
use crate::core::tree::StateTree;
use crate::core::{Condition, ConfigurationError, StateId, StateKey, StateKind, Transition};

/// Fluent helper bound to one collection.
///
/// Select a source with one of the `from*` methods and a destination with
/// one of the `to*` methods, then finish with [`set`](Self::set),
/// [`exists`](Self::exists), [`get`](Self::get) or
/// [`remove`](Self::remove). Finishing calls clear the selection, whether
/// they succeed or not.
///
/// # Example
///
/// ```rust
/// use hfsm::core::Hooks;
/// use hfsm::Machine;
///
/// let mut machine = Machine::new();
/// let mut states = machine.states();
/// states.add_simple("Idle", Hooks::new(), true).unwrap();
/// states.add_simple("Walk", Hooks::new(), false).unwrap();
///
/// let mut transitions = states.transitions();
/// transitions
///     .from_simple("Idle").unwrap()
///     .to_simple("Walk").unwrap()
///     .set(|| true).unwrap();
///
/// assert!(transitions.from_simple("Idle").unwrap().to_simple("Walk").unwrap().exists());
/// ```
pub struct TransitionsHelper<'a> {
    tree: &'a mut StateTree,
    scope: Scope,
    from: Option<StateId>,
    to: Option<StateId>,
}

impl<'a> TransitionsHelper<'a> {
    pub(crate) fn new(tree: &'a mut StateTree, scope: Scope) -> Self {
        Self {
            tree,
            scope,
            from: None,
            to: None,
        }
    }

    pub fn from(&mut self, kind: StateKind, id: &str) -> Result<&mut Self, ConfigurationError> {
        let state = self.lookup(kind, id)?;
        self.from = Some(state);
        Ok(self)
    }

    pub fn from_simple(&mut self, id: &str) -> Result<&mut Self, ConfigurationError> {
        self.from(StateKind::Simple, id)
    }

    pub fn from_hierarchical(&mut self, id: &str) -> Result<&mut Self, ConfigurationError> {
        self.from(StateKind::Hierarchical, id)
    }

    pub fn from_state(&mut self, state: StateId) -> Result<&mut Self, ConfigurationError> {
        self.member(state)?;
        self.from = Some(state);
        Ok(self)
    }

    /// Select the hierarchical state owning this collection as the source.
    pub fn from_this(&mut self) -> Result<&mut Self, ConfigurationError> {
        match self.scope.owner() {
            Some(owner) => {
                self.from = Some(owner);
                Ok(self)
            }
            None => {
                self.reset();
                Err(ConfigurationError::NoOwner)
            }
        }
    }

    pub fn to(&mut self, kind: StateKind, id: &str) -> Result<&mut Self, ConfigurationError> {
        let state = self.lookup(kind, id)?;
        self.to = Some(state);
        Ok(self)
    }

    pub fn to_simple(&mut self, id: &str) -> Result<&mut Self, ConfigurationError> {
        self.to(StateKind::Simple, id)
    }

    pub fn to_hierarchical(&mut self, id: &str) -> Result<&mut Self, ConfigurationError> {
        self.to(StateKind::Hierarchical, id)
    }

    pub fn to_state(&mut self, state: StateId) -> Result<&mut Self, ConfigurationError> {
        self.member(state)?;
        self.to = Some(state);
        Ok(self)
    }

    /// Add the selected edge. Fails if it already exists.
    pub fn set<C>(&mut self, condition: C) -> Result<&mut Self, ConfigurationError>
    where
        C: Condition + 'static,
    {
        let (from, to) = self.take_selection()?;
        self.tree.add_transition(from, to, Box::new(condition))?;
        Ok(self)
    }

    pub fn exists(&mut self) -> bool {
        match self.take_selection() {
            Ok((from, to)) => self.tree.transition(from, to).is_some(),
            Err(_) => false,
        }
    }

    pub fn get(&mut self) -> Result<&Transition, ConfigurationError> {
        let (from, to) = self.take_selection()?;
        let tree: &StateTree = self.tree;
        tree.transition(from, to)
            .ok_or_else(|| ConfigurationError::TransitionNotFound {
                from: tree.name(from),
                to: tree.name(to),
            })
    }

    pub fn remove(&mut self) -> Result<&mut Self, ConfigurationError> {
        let (from, to) = self.take_selection()?;
        self.tree.remove_transition(from, to)?;
        Ok(self)
    }

    fn lookup(&mut self, kind: StateKind, id: &str) -> Result<StateId, ConfigurationError> {
        let found = self.tree.get(self.scope, &StateKey::new(kind, id));
        if found.is_err() {
            self.reset();
        }
        found
    }

    fn member(&mut self, state: StateId) -> Result<(), ConfigurationError> {
        let checked = self.tree.ensure_member(self.scope, state);
        if checked.is_err() {
            self.reset();
        }
        checked
    }

    fn take_selection(&mut self) -> Result<(StateId, StateId), ConfigurationError> {
        let selection = (self.from.take(), self.to.take());
        match selection {
            (Some(from), Some(to)) => Ok((from, to)),
            (None, _) => Err(ConfigurationError::MissingFromState),
            (Some(_), None) => Err(ConfigurationError::MissingToState),
        }
    }

    fn reset(&mut self) {
        self.from = None;
        self.to = None;
    }
}
