//! Persisted snapshot of already-announced promotions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PromotionRecord;

/// The set of promotions announced by previous runs, keyed by record id.
///
/// Backed by a `BTreeMap` so serialization order is deterministic and a
/// load/save round trip reproduces the file byte for byte.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Snapshot {
    records: BTreeMap<String, PromotionRecord>,
}

impl Snapshot {
    /// Create an empty snapshot (the cold-start state).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from records; a later record with a duplicate id
    /// replaces the earlier one.
    pub fn from_records(records: impl IntoIterator<Item = PromotionRecord>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    /// Insert or replace a record under its id.
    pub fn insert(&mut self, record: PromotionRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&PromotionRecord> {
        self.records.get(id)
    }

    /// Whether a record with this id is tracked.
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in id order.
    pub fn records(&self) -> impl Iterator<Item = &PromotionRecord> {
        self.records.values()
    }
}
