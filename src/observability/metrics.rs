//! Usage counters for a combined database
//!
//! - Counters only, monotonic
//! - Atomic, so lookups can count through `&self`

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters kept by a `Database`
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Ranges passed to the importer
    range_imports: AtomicU64,
    /// Records visited while planning imports
    range_import_keys_visited: AtomicU64,
    /// Ranges dropped because of a conflicting code
    range_conflicts: AtomicU64,
    /// Ranges dropped because of a malformed code
    malformed_codes: AtomicU64,
    /// Address lookups answered
    address_lookups: AtomicU64,
    /// Records visited while answering lookups
    address_lookup_keys_visited: AtomicU64,
    /// Repair passes that had a pending date
    repair_runs: AtomicU64,
    /// Time spent in repair passes
    repair_micros: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one imported range and the records its planning visited
    pub fn record_range_import(&self, keys_visited: u64) {
        self.range_imports.fetch_add(1, Ordering::Relaxed);
        self.range_import_keys_visited
            .fetch_add(keys_visited, Ordering::Relaxed);
    }

    /// Count a conflicting range
    pub fn increment_range_conflicts(&self) {
        self.range_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a range with a malformed code
    pub fn increment_malformed_codes(&self) {
        self.malformed_codes.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one lookup and the records it visited
    pub fn record_lookup(&self, keys_visited: u64) {
        self.address_lookups.fetch_add(1, Ordering::Relaxed);
        self.address_lookup_keys_visited
            .fetch_add(keys_visited, Ordering::Relaxed);
    }

    /// Count one repair pass and its duration
    pub fn record_repair(&self, micros: u64) {
        self.repair_runs.fetch_add(1, Ordering::Relaxed);
        self.repair_micros.fetch_add(micros, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            range_imports: self.range_imports.load(Ordering::Relaxed),
            range_import_keys_visited: self.range_import_keys_visited.load(Ordering::Relaxed),
            range_conflicts: self.range_conflicts.load(Ordering::Relaxed),
            malformed_codes: self.malformed_codes.load(Ordering::Relaxed),
            address_lookups: self.address_lookups.load(Ordering::Relaxed),
            address_lookup_keys_visited: self
                .address_lookup_keys_visited
                .load(Ordering::Relaxed),
            repair_runs: self.repair_runs.load(Ordering::Relaxed),
            repair_micros: self.repair_micros.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub range_imports: u64,
    pub range_import_keys_visited: u64,
    pub range_conflicts: u64,
    pub malformed_codes: u64,
    pub address_lookups: u64,
    pub address_lookup_keys_visited: u64,
    pub repair_runs: u64,
    pub repair_micros: u64,
}
