//! Membership data of one collection of sibling states.

use super::state::StateId;

/// Where a collection lives: at the machine root or inside a hierarchical
/// state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scope {
    Root,
    Nested(StateId),
}

impl Scope {
    pub(crate) fn owner(self) -> Option<StateId> {
        match self {
            Self::Root => None,
            Self::Nested(owner) => Some(owner),
        }
    }
}

/// Ordered members of a collection, in declaration order.
#[derive(Debug, Default)]
pub(crate) struct CollectionData {
    pub(crate) states: Vec<StateId>,
    pub(crate) start: Option<StateId>,
    pub(crate) owner: Option<StateId>,
}

impl CollectionData {
    pub(crate) fn new(owner: Option<StateId>) -> Self {
        Self {
            states: Vec::new(),
            start: None,
            owner,
        }
    }

    pub(crate) fn contains(&self, id: StateId) -> bool {
        self.states.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_owner() {
        assert_eq!(Scope::Nested(StateId(2)).owner(), Some(StateId(2)));
        assert_eq!(Scope::Root.owner(), None);
    }

    #[test]
    fn membership() {
        let mut data = CollectionData::new(None);
        data.states.push(StateId(0));
        assert!(data.contains(StateId(0)));
        assert!(!data.contains(StateId(1)));
    }
}
