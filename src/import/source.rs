//! Importing files and directories of registry snapshots
//!
//! Files are grouped by the snapshot day in their name. Days are imported
//! in ascending order and the repair pass runs after each day.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::errors::{ImportError, ImportResult};
use super::registry::{import_registry_file, FileReport};
use crate::codec::{number_to_date, DayNumber};
use crate::database::{date_from_file_name, Database};
use crate::observability::{log_event_with_fields, Event, ObservationScope};

/// Suffixes of signature, digest and compressed files
pub const DEFAULT_IGNORED_SUFFIXES: [&str; 6] = [".md5", ".md5.gz", ".asc", ".asc.gz", ".gz", ".bz2"];

/// Options for a path import
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Files whose names end in one of these are skipped
    pub ignored_suffixes: Vec<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            ignored_suffixes: DEFAULT_IGNORED_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ImportOptions {
    fn is_ignored(&self, name: &str) -> bool {
        self.ignored_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

/// Outcome of a path import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Files imported
    pub imported: usize,
    /// Files skipped: ignored suffix or already known
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
    /// Ranges applied
    pub ranges_applied: usize,
    /// Ranges dropped
    pub ranges_dropped: usize,
    /// Lines that did not parse
    pub malformed_lines: usize,
    /// Snapshot days repaired
    pub repaired_dates: Vec<String>,
}

impl ImportReport {
    /// Add the counts of another report
    pub fn merge(&mut self, other: ImportReport) {
        self.imported += other.imported;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.ranges_applied += other.ranges_applied;
        self.ranges_dropped += other.ranges_dropped;
        self.malformed_lines += other.malformed_lines;
        self.repaired_dates.extend(other.repaired_dates);
    }
}

/// Collect regular files below `path`, sorted by path
pub(super) fn collect_files(path: &Path, files: &mut Vec<PathBuf>) -> ImportResult<()> {
    let metadata = fs::metadata(path).map_err(|e| ImportError::read_failed(path.display(), e))?;
    if !metadata.is_dir() {
        files.push(path.to_path_buf());
        return Ok(());
    }

    let entries = fs::read_dir(path).map_err(|e| ImportError::read_failed(path.display(), e))?;
    let mut children = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ImportError::read_failed(path.display(), e))?;
        children.push(entry.path());
    }
    children.sort();
    for child in children {
        collect_files(&child, files)?;
    }
    Ok(())
}

pub(super) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(super) fn skip(report: &mut ImportReport, path: &Path, reason: &str) {
    log_event_with_fields(
        Event::SourceSkipped,
        &[
            ("path", path.display().to_string().as_str()),
            ("reason", reason),
        ],
    );
    report.skipped += 1;
}

pub(super) fn imported(report: &mut ImportReport, source: &str, file_report: FileReport) {
    log_event_with_fields(
        Event::SourceImported,
        &[
            ("source", source),
            ("applied", file_report.applied.to_string().as_str()),
            ("dropped", file_report.dropped.to_string().as_str()),
        ],
    );
    report.imported += 1;
    report.ranges_applied += file_report.applied;
    report.ranges_dropped += file_report.dropped;
    report.malformed_lines += file_report.malformed_lines;
}

pub(super) fn fail(report: &mut ImportReport, path: &Path, err: &ImportError) {
    log_event_with_fields(
        Event::SourceFailed,
        &[
            ("path", path.display().to_string().as_str()),
            ("error", err.to_string().as_str()),
        ],
    );
    report.failed += 1;
}

/// Import a file or a directory tree of registry files.
///
/// Failures are counted and logged; they do not stop other files. Only an
/// unreadable `path` itself is an error.
pub fn import_path(
    db: &mut Database,
    path: &Path,
    options: &ImportOptions,
) -> ImportResult<ImportReport> {
    let scope = ObservationScope::with_fields(
        "IMPORT",
        &[("path", path.display().to_string().as_str())],
    );

    let mut files = Vec::new();
    if let Err(err) = collect_files(path, &mut files) {
        scope.fail(&err.to_string());
        return Err(err);
    }

    let mut report = ImportReport::default();
    let mut by_day: BTreeMap<DayNumber, Vec<(String, PathBuf)>> = BTreeMap::new();

    for file in files {
        let name = file_name(&file);
        if options.is_ignored(&name) {
            skip(&mut report, &file, "unsupported file type");
            continue;
        }
        if db.catalog().is_known_source(&name) {
            skip(&mut report, &file, "already imported");
            continue;
        }
        match date_from_file_name(&name) {
            Ok(day) => by_day.entry(day).or_default().push((name, file)),
            Err(_) => fail(&mut report, &file, &ImportError::invalid_source_name(&name)),
        }
    }

    for (_, mut group) in by_day {
        group.sort();
        for (name, file) in group {
            match import_registry_file(db, &file) {
                Ok(Some(file_report)) => imported(&mut report, &name, file_report),
                Ok(None) => skip(&mut report, &file, "already imported"),
                Err(err) => fail(&mut report, &file, &err),
            }
        }

        let repair = db.repair();
        report
            .repaired_dates
            .extend(repair.repaired_dates.into_iter().map(number_to_date));
    }

    scope.complete_with_fields(&[
        ("imported", report.imported.to_string().as_str()),
        ("skipped", report.skipped.to_string().as_str()),
        ("failed", report.failed.to_string().as_str()),
    ]);
    Ok(report)
}
