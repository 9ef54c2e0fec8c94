//! Timestamped record of observed state changes.

use crate::core::StateKey;
use crate::machine::StateChange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single observed change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The leaf being left
    pub from: StateKey,
    /// The leaf now running
    pub to: StateKey,
    /// When the change was observed
    pub timestamp: DateTime<Utc>,
    /// The machine tick that applied the change
    pub tick: u64,
}

impl TransitionRecord {
    pub fn from_change(change: &StateChange) -> Self {
        Self {
            from: change.previous.key.clone(),
            to: change.current.key.clone(),
            timestamp: Utc::now(),
            tick: change.tick,
        }
    }
}

/// Ordered history of state changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: Vec<TransitionRecord>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: TransitionRecord) {
        self.records.push(record);
    }

    /// Leaves visited: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<&StateKey> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Time between the first and last recorded change.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
