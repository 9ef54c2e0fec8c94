//! Read-only pictures of a machine for inspection tooling.
//!
//! A snapshot records the structure of the whole tree (kinds, ids, start
//! states, transition targets) together with the active branch and the
//! current leaf. It holds no hooks or conditions and cannot be turned
//! back into a machine.

use crate::core::collection::Scope;
use crate::core::tree::StateTree;
use crate::core::{Mode, StateId, StateKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    pub mode: Mode,

    /// Running leaf, or the root start state before the first tick
    pub current: Option<StateKey>,

    pub root: CollectionSnapshot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    /// Owning hierarchical state, `None` at the root
    pub owner: Option<StateKey>,
    pub start: Option<StateKey>,
    pub states: Vec<StateSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub key: StateKey,
    pub active: bool,
    /// Transition targets in evaluation order
    pub transitions: Vec<StateKey>,
    /// Sub-machine of a hierarchical state
    pub nested: Option<CollectionSnapshot>,
}

impl MachineSnapshot {
    pub(crate) fn capture(tree: &StateTree, current: Option<StateId>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            timestamp: Utc::now(),
            mode: tree.mode(),
            current: current.and_then(|id| tree.key(id)).cloned(),
            root: capture_collection(tree, Scope::Root),
        }
    }

    /// Keys of the active states from the root down to the running leaf.
    pub fn active_path(&self) -> Vec<&StateKey> {
        let mut path = Vec::new();
        let mut collection = Some(&self.root);
        while let Some(current) = collection {
            collection = None;
            if let Some(state) = current.states.iter().find(|s| s.active) {
                path.push(&state.key);
                collection = state.nested.as_ref();
            }
        }
        path
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(SnapshotError::Encode)
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Encode)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json).map_err(SnapshotError::Decode)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

fn capture_collection(tree: &StateTree, scope: Scope) -> CollectionSnapshot {
    let Ok(data) = tree.collection(scope) else {
        return CollectionSnapshot {
            owner: None,
            start: None,
            states: Vec::new(),
        };
    };

    let states = data
        .states
        .iter()
        .filter_map(|&id| {
            let node = tree.node(id)?;
            Some(StateSnapshot {
                key: node.key.clone(),
                active: tree.is_active(id),
                transitions: node
                    .transitions
                    .iter()
                    .filter_map(|t| tree.key(t.target()).cloned())
                    .collect(),
                nested: node
                    .nested()
                    .map(|_| capture_collection(tree, Scope::Nested(id))),
            })
        })
        .collect();

    CollectionSnapshot {
        owner: scope.owner().and_then(|id| tree.key(id)).cloned(),
        start: data.start.and_then(|id| tree.key(id)).cloned(),
        states,
    }
}
