//! Known snapshot dates and source files
//!
//! The catalog answers "which snapshot applies to this day" for lookups,
//! "which snapshots neighbour this day" for merge-on-import, and "which
//! days were introduced since the last repair" for the repair pass.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Bound;

use crate::codec::{date_to_number, number_to_date, CodecError, CodecResult, DayNumber};

/// One imported source file and the snapshot day it belongs to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceFile {
    /// Snapshot day
    pub day: DayNumber,
    /// File name, without directories
    pub name: String,
}

impl SourceFile {
    /// Create a source record
    pub fn new(day: DayNumber, name: impl Into<String>) -> Self {
        Self {
            day,
            name: name.into(),
        }
    }

    /// Persisted identifier, `yyyymmdd!name`
    pub fn id(&self) -> String {
        format!("{}!{}", number_to_date(self.day), self.name)
    }

    /// Parse a persisted identifier.
    ///
    /// Accepts `yyyymmdd!name`, and bare names that end in `yyyymmdd` as
    /// registry files do.
    pub fn parse_id(id: &str) -> CodecResult<Self> {
        if let Some((date, name)) = id.split_once('!') {
            if let Ok(day) = date_to_number(date) {
                return Ok(Self::new(day, name));
            }
        }
        let day = date_from_file_name(id)?;
        Ok(Self::new(day, id))
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Snapshot day taken from the last 8 characters of a file name
pub fn date_from_file_name(name: &str) -> CodecResult<DayNumber> {
    let split = name
        .char_indices()
        .rev()
        .nth(7)
        .map(|(i, _)| i)
        .ok_or_else(|| CodecError::InvalidDate(name.to_string()))?;
    date_to_number(&name[split..])
}

/// KnownDates and KnownSources, plus the days still awaiting repair
#[derive(Debug, Default, Clone)]
pub struct SnapshotCatalog {
    dates: BTreeSet<DayNumber>,
    sources: BTreeSet<SourceFile>,
    pending: BTreeSet<DayNumber>,
}

impl SnapshotCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a snapshot day seen during import.
    ///
    /// Returns true if the day is new; new days are pending repair.
    pub fn register_date(&mut self, day: DayNumber) -> bool {
        let added = self.dates.insert(day);
        if added {
            self.pending.insert(day);
        }
        added
    }

    /// Register a day from an already repaired database. Never pending.
    pub fn restore_date(&mut self, day: DayNumber) {
        self.dates.insert(day);
    }

    /// Register a source file
    pub fn register_source(&mut self, source: SourceFile) {
        self.sources.insert(source);
    }

    /// Whether a file with this name was imported before
    pub fn is_known_source(&self, name: &str) -> bool {
        self.sources.iter().any(|s| s.name == name)
    }

    /// Whether this exact source, name and day, was imported before
    pub fn contains_source(&self, source: &SourceFile) -> bool {
        self.sources.contains(source)
    }

    /// Known sources, ordered by day then name
    pub fn sources(&self) -> impl Iterator<Item = &SourceFile> {
        self.sources.iter()
    }

    /// Number of known sources
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Known snapshot days, ascending
    pub fn dates(&self) -> impl DoubleEndedIterator<Item = DayNumber> + '_ {
        self.dates.iter().copied()
    }

    /// Number of known snapshot days
    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    /// Whether `day` is a known snapshot day
    pub fn contains_date(&self, day: DayNumber) -> bool {
        self.dates.contains(&day)
    }

    /// Known days within `[first, last]`
    pub fn dates_between(
        &self,
        first: DayNumber,
        last: DayNumber,
    ) -> impl Iterator<Item = DayNumber> + '_ {
        self.dates.range(first..=last).copied()
    }

    /// Latest snapshot day strictly before `day`
    pub fn previous_date(&self, day: DayNumber) -> Option<DayNumber> {
        self.dates.range(..day).next_back().copied()
    }

    /// Earliest snapshot day strictly after `day`
    pub fn next_date(&self, day: DayNumber) -> Option<DayNumber> {
        self.dates
            .range((Bound::Excluded(day), Bound::Unbounded))
            .next()
            .copied()
    }

    /// Snapshot that answers queries for `day`: the latest one on or before
    /// it, or the earliest known one if `day` predates all snapshots.
    pub fn resolve_snapshot(&self, day: DayNumber) -> Option<DayNumber> {
        self.dates
            .range(..=day)
            .next_back()
            .or_else(|| self.dates.iter().next())
            .copied()
    }

    /// Whether any day is awaiting repair
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Days awaiting repair
    pub fn pending(&self) -> &BTreeSet<DayNumber> {
        &self.pending
    }

    /// Take and clear the days awaiting repair
    pub fn take_pending(&mut self) -> BTreeSet<DayNumber> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DayNumber {
        date_to_number(s).unwrap()
    }

    #[test]
    fn test_register_date_marks_pending_once() {
        let mut catalog = SnapshotCatalog::new();
        assert!(catalog.register_date(day("20120901")));
        assert!(!catalog.register_date(day("20120901")));
        assert_eq!(catalog.pending().len(), 1);

        let taken = catalog.take_pending();
        assert_eq!(taken.len(), 1);
        assert!(!catalog.has_pending());
        assert!(!catalog.register_date(day("20120901")));
        assert!(!catalog.has_pending());
    }

    #[test]
    fn test_restore_date_not_pending() {
        let mut catalog = SnapshotCatalog::new();
        catalog.restore_date(day("20120901"));
        assert!(catalog.contains_date(day("20120901")));
        assert!(!catalog.has_pending());
    }

    #[test]
    fn test_neighbours() {
        let mut catalog = SnapshotCatalog::new();
        for d in ["20120901", "20121001", "20121101"] {
            catalog.register_date(day(d));
        }
        assert_eq!(catalog.previous_date(day("20121001")), Some(day("20120901")));
        assert_eq!(catalog.next_date(day("20121001")), Some(day("20121101")));
        assert_eq!(catalog.previous_date(day("20120901")), None);
        assert_eq!(catalog.next_date(day("20121101")), None);
        assert_eq!(catalog.next_date(u16::MAX), None);
    }

    #[test]
    fn test_resolve_snapshot_clamps_to_earliest() {
        let mut catalog = SnapshotCatalog::new();
        assert_eq!(catalog.resolve_snapshot(day("20120901")), None);

        catalog.register_date(day("20120901"));
        catalog.register_date(day("20121001"));
        assert_eq!(catalog.resolve_snapshot(day("19920901")), Some(day("20120901")));
        assert_eq!(catalog.resolve_snapshot(day("20120915")), Some(day("20120901")));
        assert_eq!(catalog.resolve_snapshot(day("20121001")), Some(day("20121001")));
        assert_eq!(catalog.resolve_snapshot(day("20220901")), Some(day("20121001")));
    }

    #[test]
    fn test_source_id_roundtrip() {
        let source = SourceFile::new(day("20120901"), "delegated-arin-20120901");
        assert_eq!(source.id(), "20120901!delegated-arin-20120901");
        assert_eq!(SourceFile::parse_id(&source.id()).unwrap(), source);
    }

    #[test]
    fn test_source_id_without_date_prefix() {
        let source = SourceFile::parse_id("delegated-ripencc-20121001").unwrap();
        assert_eq!(source.day, day("20121001"));
        assert_eq!(source.name, "delegated-ripencc-20121001");

        assert!(SourceFile::parse_id("notes.txt").is_err());
        assert!(SourceFile::parse_id("x").is_err());
    }

    #[test]
    fn test_source_id_name_may_contain_bang() {
        let source = SourceFile::new(day("20120901"), "a!b");
        assert_eq!(SourceFile::parse_id(&source.id()).unwrap(), source);
    }

    #[test]
    fn test_is_known_source() {
        let mut catalog = SnapshotCatalog::new();
        catalog.register_source(SourceFile::new(day("20120901"), "delegated-arin-20120901"));
        assert!(catalog.is_known_source("delegated-arin-20120901"));
        assert!(!catalog.is_known_source("delegated-apnic-20120901"));
    }

    #[test]
    fn test_contains_source_checks_day() {
        let name = "GeoLiteCity-Blocks.csv+GeoLiteCity-Location.csv";
        let mut catalog = SnapshotCatalog::new();
        catalog.register_source(SourceFile::new(day("20120901"), name));
        assert!(catalog.contains_source(&SourceFile::new(day("20120901"), name)));
        assert!(!catalog.contains_source(&SourceFile::new(day("20121001"), name)));
    }
}
