//! The state arena and every algorithm that walks it.
//!
//! All states of a machine live in one `Vec`, addressed by [`StateId`].
//! Collections hold ordered member handles; child-to-parent links are plain
//! handles used for upward traversal during [`StateTree::update`].

use super::collection::{CollectionData, Scope};
use super::condition::BoxedCondition;
use super::error::ConfigurationError;
use super::state::{call, Hooks, StateBody, StateId, StateKey, StateNode};
use super::transition::Transition;
use serde::{Deserialize, Serialize};

/// Lifecycle mode gating structural mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Configuring,
    Running,
}

#[derive(Default)]
pub(crate) struct StateTree {
    nodes: Vec<StateNode>,
    root: CollectionData,
    mode: Mode,
}

impl StateTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn set_running(&mut self) {
        self.mode = Mode::Running;
    }

    pub(crate) fn ensure_configuring(
        &self,
        operation: &'static str,
    ) -> Result<(), ConfigurationError> {
        match self.mode {
            Mode::Configuring => Ok(()),
            Mode::Running => Err(ConfigurationError::NotConfiguring { operation }),
        }
    }

    pub(crate) fn node(&self, id: StateId) -> Option<&StateNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn key(&self, id: StateId) -> Option<&StateKey> {
        self.node(id).map(|node| &node.key)
    }

    pub(crate) fn parent(&self, id: StateId) -> Option<StateId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Display name of a state, for errors and logs.
    pub(crate) fn name(&self, id: StateId) -> String {
        self.key(id)
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("#{}", id.0))
    }

    pub(crate) fn describe(&self, scope: Scope) -> String {
        match scope {
            Scope::Root => "root".to_string(),
            Scope::Nested(owner) => format!("'{}'", self.name(owner)),
        }
    }

    pub(crate) fn collection(&self, scope: Scope) -> Result<&CollectionData, ConfigurationError> {
        match scope {
            Scope::Root => Ok(&self.root),
            Scope::Nested(owner) => self
                .node(owner)
                .and_then(StateNode::nested)
                .ok_or_else(|| ConfigurationError::NotHierarchical {
                    state: self.name(owner),
                }),
        }
    }

    fn collection_mut(&mut self, scope: Scope) -> Result<&mut CollectionData, ConfigurationError> {
        match scope {
            Scope::Root => Ok(&mut self.root),
            Scope::Nested(owner) => {
                let state = self.name(owner);
                self.nodes
                    .get_mut(owner.0)
                    .and_then(StateNode::nested_mut)
                    .ok_or(ConfigurationError::NotHierarchical { state })
            }
        }
    }

    pub(crate) fn ensure_member(
        &self,
        scope: Scope,
        id: StateId,
    ) -> Result<(), ConfigurationError> {
        if self.collection(scope)?.contains(id) {
            Ok(())
        } else {
            Err(ConfigurationError::NotAMember {
                state: self.name(id),
                collection: self.describe(scope),
            })
        }
    }

    // Structure

    pub(crate) fn add_simple(
        &mut self,
        scope: Scope,
        id: String,
        hooks: Hooks,
        is_start: bool,
    ) -> Result<StateId, ConfigurationError> {
        let key = StateKey::simple(id.clone());
        self.insert(scope, key, is_start, move |_| StateNode::simple(id, hooks))
    }

    pub(crate) fn add_hierarchical(
        &mut self,
        scope: Scope,
        id: String,
        hooks: Hooks,
        is_start: bool,
    ) -> Result<StateId, ConfigurationError> {
        let key = StateKey::hierarchical(id.clone());
        self.insert(scope, key, is_start, move |this| {
            StateNode::hierarchical(this, id, hooks)
        })
    }

    fn insert<F>(
        &mut self,
        scope: Scope,
        key: StateKey,
        is_start: bool,
        make: F,
    ) -> Result<StateId, ConfigurationError>
    where
        F: FnOnce(StateId) -> StateNode,
    {
        self.ensure_configuring("add a state")?;
        if self.try_get(scope, &key).is_some() {
            return Err(ConfigurationError::DuplicateState {
                key,
                collection: self.describe(scope),
            });
        }
        // Resolve the collection before growing the arena.
        self.collection(scope)?;

        let id = StateId(self.nodes.len());
        let mut node = make(id);
        node.parent = scope.owner();
        self.nodes.push(node);

        let data = self.collection_mut(scope)?;
        data.states.push(id);
        if is_start {
            data.start = Some(id);
        }

        tracing::debug!(
            target: "hfsm::tree",
            state = %key,
            kind = ?key.kind,
            collection = %self.describe(scope),
            is_start,
            "state added"
        );
        Ok(id)
    }

    pub(crate) fn set_start(
        &mut self,
        scope: Scope,
        id: StateId,
    ) -> Result<(), ConfigurationError> {
        self.ensure_configuring("set a start state")?;
        self.ensure_member(scope, id)?;
        self.collection_mut(scope)?.start = Some(id);
        Ok(())
    }

    /// Remove a member and every transition that targets it.
    pub(crate) fn remove(&mut self, scope: Scope, id: StateId) -> Result<(), ConfigurationError> {
        self.ensure_configuring("remove a state")?;
        self.ensure_member(scope, id)?;
        let data = self.collection(scope)?;
        if data.start == Some(id) {
            return Err(ConfigurationError::RemoveStartState {
                state: self.name(id),
            });
        }

        let mut sources = data.states.clone();
        sources.extend(data.owner);
        for source in sources {
            if let Some(node) = self.nodes.get_mut(source.0) {
                node.transitions.retain(|t| t.target() != id);
            }
        }
        self.collection_mut(scope)?.states.retain(|&member| member != id);

        tracing::debug!(
            target: "hfsm::tree",
            state = %self.name(id),
            collection = %self.describe(scope),
            "state removed"
        );
        Ok(())
    }

    pub(crate) fn try_get(&self, scope: Scope, key: &StateKey) -> Option<StateId> {
        let data = self.collection(scope).ok()?;
        data.states
            .iter()
            .copied()
            .find(|&id| self.key(id) == Some(key))
    }

    pub(crate) fn get(&self, scope: Scope, key: &StateKey) -> Result<StateId, ConfigurationError> {
        self.try_get(scope, key)
            .ok_or_else(|| ConfigurationError::StateNotFound {
                key: key.clone(),
                collection: self.describe(scope),
            })
    }

    // Transitions

    pub(crate) fn transition(&self, from: StateId, to: StateId) -> Option<&Transition> {
        let node = self.node(from)?;
        node.transition_to(to).map(|index| &node.transitions[index])
    }

    pub(crate) fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        condition: BoxedCondition,
    ) -> Result<(), ConfigurationError> {
        self.ensure_configuring("add a transition")?;
        if self.transition(from, to).is_some() {
            return Err(ConfigurationError::TransitionExists {
                from: self.name(from),
                to: self.name(to),
            });
        }
        let from_name = self.name(from);
        let node = self
            .nodes
            .get_mut(from.0)
            .ok_or(ConfigurationError::MissingFromState)?;
        node.transitions.push(Transition::new(to, condition));
        tracing::debug!(
            target: "hfsm::tree",
            from = %from_name,
            to = %self.name(to),
            "transition added"
        );
        Ok(())
    }

    pub(crate) fn remove_transition(
        &mut self,
        from: StateId,
        to: StateId,
    ) -> Result<(), ConfigurationError> {
        self.ensure_configuring("remove a transition")?;
        let not_found = ConfigurationError::TransitionNotFound {
            from: self.name(from),
            to: self.name(to),
        };
        let node = self.nodes.get_mut(from.0).ok_or(not_found.clone())?;
        let index = node.transition_to(to).ok_or(not_found)?;
        node.transitions.remove(index);
        Ok(())
    }

    // Validation

    pub(crate) fn validate_start_states(&self, scope: Scope) -> Result<(), ConfigurationError> {
        let data = self.collection(scope)?;
        if data.start.is_none() {
            return Err(ConfigurationError::MissingStartState {
                collection: self.describe(scope),
            });
        }
        for &id in &data.states {
            if self.is_hierarchical(id) {
                self.validate_start_states(Scope::Nested(id))?;
            }
        }
        Ok(())
    }

    pub(crate) fn validate_transitions(&self, scope: Scope) -> Result<(), ConfigurationError> {
        let data = self.collection(scope)?;
        for &id in &data.states {
            if self.is_hierarchical(id) {
                self.validate_transitions(Scope::Nested(id))?;
            }
            let has_transitions = self.node(id).is_some_and(|node| !node.transitions.is_empty());
            if !has_transitions {
                return Err(ConfigurationError::NoTransitions {
                    state: self.name(id),
                });
            }
        }
        Ok(())
    }

    // Runtime

    pub(crate) fn is_hierarchical(&self, id: StateId) -> bool {
        self.node(id).and_then(StateNode::nested).is_some()
    }

    /// A leaf is active while enabled; a container while any child is.
    pub(crate) fn is_active(&self, id: StateId) -> bool {
        match self.node(id).map(|node| &node.body) {
            Some(StateBody::Simple { enabled }) => *enabled,
            Some(StateBody::Hierarchical(nested)) => {
                nested.states.iter().any(|&child| self.is_active(child))
            }
            None => false,
        }
    }

    /// Depth-first search, in declaration order, for the enabled leaf.
    pub(crate) fn find_running_state(&self, scope: Scope) -> Option<StateId> {
        let data = self.collection(scope).ok()?;
        for &id in &data.states {
            match self.node(id).map(|node| &node.body) {
                Some(StateBody::Simple { enabled: true }) => return Some(id),
                Some(StateBody::Hierarchical(_)) => {
                    if let Some(found) = self.find_running_state(Scope::Nested(id)) {
                        return Some(found);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Enter a state. Containers enter their nested start state right away.
    pub(crate) fn start(&mut self, id: StateId) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        tracing::trace!(target: "hfsm::tree", state = %node.key, "enter");
        call(&mut node.hooks.enter);
        let nested_start = match &mut node.body {
            StateBody::Simple { enabled } => {
                *enabled = true;
                None
            }
            StateBody::Hierarchical(nested) => nested.start,
        };
        if let Some(child) = nested_start {
            self.start(child);
        }
    }

    /// Exit a state. Containers shut down their active branch first.
    pub(crate) fn disable(&mut self, id: StateId) {
        self.exit_nested(id);
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        tracing::trace!(target: "hfsm::tree", state = %node.key, "exit");
        call(&mut node.hooks.exit);
        if let StateBody::Simple { enabled } = &mut node.body {
            *enabled = false;
        }
    }

    fn exit_nested(&mut self, id: StateId) {
        let children = match self.node(id).and_then(StateNode::nested) {
            Some(nested) => nested.states.clone(),
            None => return,
        };
        for child in children {
            if self.is_active(child) {
                self.disable(child);
            }
        }
    }

    /// Update a state for one tick. Returns true if a transition fired
    /// here or anywhere up the ancestor chain.
    ///
    /// Ancestors are updated first and pre-empt everything below them;
    /// own transitions are checked before the tick action.
    pub(crate) fn update(&mut self, id: StateId) -> bool {
        if let Some(parent) = self.parent(id) {
            if self.update(parent) {
                return true;
            }
        }

        let ready = self
            .node(id)
            .and_then(|node| node.transitions.iter().find(|t| t.is_ready()))
            .map(Transition::target);
        if let Some(target) = ready {
            self.fire(id, target);
            return true;
        }

        if let Some(node) = self.nodes.get_mut(id.0) {
            if let StateBody::Simple { .. } = node.body {
                call(&mut node.hooks.tick);
            }
        }
        false
    }

    fn fire(&mut self, from: StateId, to: StateId) {
        tracing::debug!(
            target: "hfsm::tree",
            from = %self.name(from),
            to = %self.name(to),
            "transition fired"
        );
        // An owner targeting its own child restarts the sub-machine in place.
        if self.parent(to) == Some(from) {
            self.exit_nested(from);
        } else {
            self.disable(from);
        }
        self.start(to);
    }

    /// Run every dispose hook, depth-first in declaration order.
    pub(crate) fn dispose(&mut self, scope: Scope) {
        let members = match self.collection(scope) {
            Ok(data) => data.states.clone(),
            Err(_) => return,
        };
        for id in members {
            if let Some(node) = self.nodes.get_mut(id.0) {
                call(&mut node.hooks.dispose);
            }
            if self.is_hierarchical(id) {
                self.dispose(Scope::Nested(id));
            }
        }
    }
}
