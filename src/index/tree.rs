//! BTreeMap-based range tree
//!
//! Each record is stored under the key of its start address and first
//! validity day. The value holds the other two corners and the code.

use std::collections::BTreeMap;

use super::diff::{RangeDiff, RangeUpdate};
use crate::codec::{DayNumber, RangeKey};

/// Import generation counter
pub type Generation = u64;

/// One stored record. Start address and first day live in the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    /// Last address of the range (inclusive)
    pub end_address: u32,
    /// Last snapshot day the record is valid for (inclusive)
    pub last_day: DayNumber,
    /// Assigned two-letter code
    pub code: String,
    /// Generation of the import batch that last inserted, reconfirmed or merged this record
    pub touched: Generation,
}

impl RangeEntry {
    /// Create a new entry
    pub fn new(
        end_address: u32,
        last_day: DayNumber,
        code: impl Into<String>,
        touched: Generation,
    ) -> Self {
        Self {
            end_address,
            last_day,
            code: code.into(),
            touched,
        }
    }
}

/// Ordered collection of disjoint range records.
#[derive(Debug, Default, Clone)]
pub struct RangeTree {
    tree: BTreeMap<RangeKey, RangeEntry>,
}

impl RangeTree {
    /// Creates a new empty tree
    pub fn new() -> Self {
        Self {
            tree: BTreeMap::new(),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the tree holds no records
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Get the record stored under `key`
    pub fn get(&self, key: &RangeKey) -> Option<&RangeEntry> {
        self.tree.get(key)
    }

    /// Insert a record directly, replacing any record under the same key.
    ///
    /// Only used when loading an already repaired database.
    pub fn insert(&mut self, key: RangeKey, entry: RangeEntry) {
        self.tree.insert(key, entry);
    }

    /// Iterate all records in ascending key order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&RangeKey, &RangeEntry)> {
        self.tree.iter()
    }

    /// Iterate records in descending key order, starting at the last key
    /// whose start address is `address`.
    pub fn scan_down_from(&self, address: u32) -> impl Iterator<Item = (&RangeKey, &RangeEntry)> {
        self.tree.range(..=RangeKey::last_for(address)).rev()
    }

    /// Apply a diff in one step.
    ///
    /// Returns `(inserted, removed)` counts.
    pub fn apply(&mut self, diff: RangeDiff) -> (usize, usize) {
        let mut inserted = 0;
        let mut removed = 0;
        for (key, update) in diff {
            match update {
                RangeUpdate::Insert(entry) => {
                    self.tree.insert(key, entry);
                    inserted += 1;
                }
                RangeUpdate::Remove => {
                    if self.tree.remove(&key).is_some() {
                        removed += 1;
                    }
                }
            }
        }
        (inserted, removed)
    }
}
