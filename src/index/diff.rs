//! Pending changes to a range tree
//!
//! Imports and repairs never mutate the tree while scanning it. They record
//! what they want in a `RangeDiff` and apply it once the scan is over. A
//! later update for the same key replaces an earlier one.

use std::collections::BTreeMap;

use super::tree::RangeEntry;
use crate::codec::RangeKey;

/// A single pending change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeUpdate {
    /// Store this entry under the key, replacing any existing one
    Insert(RangeEntry),
    /// Remove the entry under the key
    Remove,
}

/// Ordered set of pending changes
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RangeDiff {
    updates: BTreeMap<RangeKey, RangeUpdate>,
}

impl RangeDiff {
    /// Creates an empty diff
    pub fn new() -> Self {
        Self {
            updates: BTreeMap::new(),
        }
    }

    /// Schedule an insert
    pub fn insert(&mut self, key: RangeKey, entry: RangeEntry) {
        self.updates.insert(key, RangeUpdate::Insert(entry));
    }

    /// Schedule a removal
    pub fn remove(&mut self, key: RangeKey) {
        self.updates.insert(key, RangeUpdate::Remove);
    }

    /// Pending update for a key, if any
    pub fn get(&self, key: &RangeKey) -> Option<&RangeUpdate> {
        self.updates.get(key)
    }

    /// Number of pending updates
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

impl IntoIterator for RangeDiff {
    type Item = (RangeKey, RangeUpdate);
    type IntoIter = std::collections::btree_map::IntoIter<RangeKey, RangeUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}
