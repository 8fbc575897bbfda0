//! Temporal range database
//!
//! Holds the range records, the catalog of known snapshot days and source
//! files, and the generation counter used by the repair pass.
//!
//! # Lifecycle
//!
//! Snapshots are imported one day at a time: every source file for a day
//! goes through [`Database::import_range`], then [`Database::repair`] runs
//! once. Lookups are only meaningful between batches.
//!
//! Mutation takes `&mut self`. Lookups take `&self` and may run from several
//! threads once importing has stopped.

mod catalog;
mod importer;
mod lookup;
mod repair;

use std::fmt;

pub use catalog::{date_from_file_name, SnapshotCatalog, SourceFile};
pub use importer::ImportOutcome;
pub use repair::RepairReport;

use crate::codec::{number_to_address, number_to_date, DayNumber, RangeKey};
use crate::index::{Generation, RangeEntry, RangeTree};
use crate::observability::MetricsRegistry;

/// The combined range database
#[derive(Debug)]
pub struct Database {
    tree: RangeTree,
    catalog: SnapshotCatalog,
    generation: Generation,
    metrics: MetricsRegistry,
}

impl Database {
    /// Creates an empty database
    pub fn new() -> Self {
        Self {
            tree: RangeTree::new(),
            catalog: SnapshotCatalog::new(),
            generation: 1,
            metrics: MetricsRegistry::new(),
        }
    }

    /// Range records
    pub fn tree(&self) -> &RangeTree {
        &self.tree
    }

    /// Known snapshot days and source files
    pub fn catalog(&self) -> &SnapshotCatalog {
        &self.catalog
    }

    pub(crate) fn catalog_mut(&mut self) -> &mut SnapshotCatalog {
        &mut self.catalog
    }

    /// Current generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Usage counters
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Number of range records
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the database holds no records
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Insert a record read back from a saved database.
    ///
    /// The record is trusted as already repaired. Its days become known
    /// days but are never pending.
    pub(crate) fn restore_record(
        &mut self,
        start: u32,
        end: u32,
        code: &str,
        first: DayNumber,
        last: DayNumber,
    ) {
        self.catalog.restore_date(first);
        self.catalog.restore_date(last);
        self.tree
            .insert(RangeKey::new(start, first), RangeEntry::new(end, last, code, 0));
    }

    /// Human-readable overview: known days, record count, counters and the
    /// first `limit` records.
    pub fn summary(&self, limit: usize) -> Summary<'_> {
        Summary { db: self, limit }
    }
}

/// [`Database::summary`] output, rendered through `Display`
pub struct Summary<'a> {
    db: &'a Database,
    limit: usize,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = &self.db.catalog;
        let tree = &self.db.tree;

        writeln!(f, "known dates: {}", catalog.date_count())?;
        if let (Some(first), Some(last)) = (catalog.dates().next(), catalog.dates().next_back()) {
            writeln!(
                f,
                "date range: {} - {}",
                number_to_date(first),
                number_to_date(last)
            )?;
        }
        writeln!(f, "known sources: {}", catalog.source_count())?;
        writeln!(f, "records: {}", tree.len())?;

        let stats = self.db.metrics.snapshot();
        writeln!(
            f,
            "range imports: {} ({} keys visited)",
            stats.range_imports, stats.range_import_keys_visited
        )?;
        writeln!(
            f,
            "address lookups: {} ({} keys visited)",
            stats.address_lookups, stats.address_lookup_keys_visited
        )?;
        writeln!(f, "repairs: {} ({} us)", stats.repair_runs, stats.repair_micros)?;

        for (key, entry) in tree.iter().take(self.limit) {
            writeln!(
                f,
                "{} - {} {} {} - {}",
                number_to_address(key.address()),
                number_to_address(entry.end_address),
                entry.code,
                number_to_date(key.day()),
                number_to_date(entry.last_day)
            )?;
        }
        if tree.len() > self.limit {
            writeln!(f, "... {} more", tree.len() - self.limit)?;
        }
        Ok(())
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Database({} records, {} dates, {} sources)",
            self.tree.len(),
            self.catalog.date_count(),
            self.catalog.source_count()
        )
    }
}
