//! Public view over one collection of sibling states.

use crate::builder::transitions::TransitionsHelper;
use crate::core::collection::Scope;
use crate::core::tree::StateTree;
use crate::core::{ConfigurationError, Hooks, StateId, StateKey, StateKind};

/// An ordered registry of sibling states: the machine root or the nested
/// sub-machine of one hierarchical state.
///
/// Mutations are only accepted while the machine is configuring. Queries
/// work in both modes.
pub struct StatesCollection<'a> {
    tree: &'a mut StateTree,
    scope: Scope,
}

impl<'a> StatesCollection<'a> {
    pub(crate) fn new(tree: &'a mut StateTree, scope: Scope) -> Self {
        Self { tree, scope }
    }

    /// Add a simple state with the given hooks.
    pub fn add_simple(
        &mut self,
        id: impl Into<String>,
        hooks: Hooks,
        is_start: bool,
    ) -> Result<StateId, ConfigurationError> {
        self.tree.add_simple(self.scope, id.into(), hooks, is_start)
    }

    /// Add a hierarchical state. Fill its sub-machine with [`Self::nested`].
    pub fn add_hierarchical(
        &mut self,
        id: impl Into<String>,
        is_start: bool,
    ) -> Result<StateId, ConfigurationError> {
        self.add_hierarchical_with(id, Hooks::new(), is_start)
    }

    /// Add a hierarchical state with enter/exit hooks.
    pub fn add_hierarchical_with(
        &mut self,
        id: impl Into<String>,
        hooks: Hooks,
        is_start: bool,
    ) -> Result<StateId, ConfigurationError> {
        self.tree.add_hierarchical(self.scope, id.into(), hooks, is_start)
    }

    pub fn set_start_state(&mut self, state: StateId) -> Result<&mut Self, ConfigurationError> {
        self.tree.set_start(self.scope, state)?;
        Ok(self)
    }

    pub fn set_start(
        &mut self,
        kind: StateKind,
        id: &str,
    ) -> Result<&mut Self, ConfigurationError> {
        let state = self.get_state(kind, id)?;
        self.set_start_state(state)
    }

    /// Remove a member. The start state must be reassigned first.
    pub fn remove(&mut self, state: StateId) -> Result<&mut Self, ConfigurationError> {
        self.tree.remove(self.scope, state)?;
        Ok(self)
    }

    pub fn remove_by_key(
        &mut self,
        kind: StateKind,
        id: &str,
    ) -> Result<&mut Self, ConfigurationError> {
        let state = self.get_state(kind, id)?;
        self.remove(state)
    }

    pub fn get_state(&self, kind: StateKind, id: &str) -> Result<StateId, ConfigurationError> {
        self.tree.get(self.scope, &StateKey::new(kind, id))
    }

    pub fn try_get_state(&self, kind: StateKind, id: &str) -> Option<StateId> {
        self.tree.try_get(self.scope, &StateKey::new(kind, id))
    }

    pub fn get_simple(&self, id: &str) -> Result<StateId, ConfigurationError> {
        self.get_state(StateKind::Simple, id)
    }

    pub fn get_hierarchical(&self, id: &str) -> Result<StateId, ConfigurationError> {
        self.get_state(StateKind::Hierarchical, id)
    }

    /// Members in declaration order.
    pub fn states(&self) -> Vec<StateId> {
        self.tree
            .collection(self.scope)
            .map(|data| data.states.clone())
            .unwrap_or_default()
    }

    pub fn start_state(&self) -> Option<StateId> {
        self.tree.collection(self.scope).ok().and_then(|data| data.start)
    }

    /// The hierarchical state owning this collection, `None` at the root.
    pub fn owner(&self) -> Option<StateId> {
        self.scope.owner()
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.tree
            .collection(self.scope)
            .is_ok_and(|data| data.contains(state))
    }

    pub fn key(&self, state: StateId) -> Option<&StateKey> {
        self.tree.key(state)
    }

    pub fn is_active(&self, state: StateId) -> bool {
        self.tree.is_active(state)
    }

    /// The enabled leaf anywhere below this collection.
    pub fn find_running_state(&self) -> Option<StateId> {
        self.tree.find_running_state(self.scope)
    }

    pub fn validate_start_states_recursively(&self) -> Result<(), ConfigurationError> {
        self.tree.validate_start_states(self.scope)
    }

    pub fn validate_all_states_have_transitions(&self) -> Result<(), ConfigurationError> {
        self.tree.validate_transitions(self.scope)
    }

    /// Open the sub-machine of the hierarchical member `id`.
    pub fn nested(&mut self, id: &str) -> Result<StatesCollection<'_>, ConfigurationError> {
        let owner = self.get_hierarchical(id)?;
        self.nested_by_id(owner)
    }

    pub fn nested_by_id(
        &mut self,
        owner: StateId,
    ) -> Result<StatesCollection<'_>, ConfigurationError> {
        self.tree.ensure_member(self.scope, owner)?;
        let scope = Scope::Nested(owner);
        self.tree.collection(scope)?;
        Ok(StatesCollection::new(self.tree, scope))
    }

    /// Turn this view into the nested collection of member `id`.
    pub fn into_nested(self, id: &str) -> Result<StatesCollection<'a>, ConfigurationError> {
        let owner = self.get_hierarchical(id)?;
        let scope = Scope::Nested(owner);
        self.tree.collection(scope)?;
        Ok(StatesCollection::new(self.tree, scope))
    }

    /// The collection enclosing this collection's owner. `None` at the root.
    pub fn parent(self) -> Option<StatesCollection<'a>> {
        let owner = self.scope.owner()?;
        let scope = match self.tree.parent(owner) {
            Some(grandparent) => Scope::Nested(grandparent),
            None => Scope::Root,
        };
        Some(StatesCollection::new(self.tree, scope))
    }

    /// Transition authoring bound to this collection.
    pub fn transitions(&mut self) -> TransitionsHelper<'_> {
        TransitionsHelper::new(self.tree, self.scope)
    }
}
