//! GeoLite City CSV snapshots
//!
//! A snapshot is one directory holding `GeoLiteCity-Blocks.csv` and
//! `GeoLiteCity-Location.csv`. Blocks map integer address ranges to location
//! ids, and locations map ids to country codes. Neither file carries a date,
//! so the snapshot day is the UTC modification day of the blocks file.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{ImportError, ImportResult};
use super::registry::{read_lines, FileReport};
use super::source::{collect_files, fail, file_name, imported, skip, ImportReport};
use crate::codec::{day_from_system_time, number_to_date, DayNumber};
use crate::database::{Database, ImportOutcome, SourceFile};
use crate::observability::ObservationScope;

/// Address blocks file
pub const BLOCKS_FILE_NAME: &str = "GeoLiteCity-Blocks.csv";

/// Locations file
pub const LOCATION_FILE_NAME: &str = "GeoLiteCity-Location.csv";

/// Source name of every GeoLite City snapshot; snapshots differ by day
pub const GEOLITE_SOURCE_NAME: &str = "GeoLiteCity-Blocks.csv+GeoLiteCity-Location.csv";

/// One parsed line of the locations file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationLine {
    /// Copyright notice, column header or empty line
    Skip,
    /// A location and its lowercased country code
    Location { id: u32, code: String },
}

/// One parsed line of the blocks file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLine {
    /// Copyright notice, column header or empty line
    Skip,
    /// Inclusive address range and its location id
    Block { start: u32, end: u32, location: u32 },
}

fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"')
}

fn parse_number(field: &str) -> ImportResult<u32> {
    field
        .parse::<u32>()
        .map_err(|_| ImportError::malformed_line(format!("invalid number: {}", field)))
}

/// Parse one line of `GeoLiteCity-Location.csv`
///
/// `locId,country,region,city,...`; only the first two fields are used.
pub fn parse_location_line(line: &str) -> ImportResult<LocationLine> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with("Copyright") || line.starts_with("locId") {
        return Ok(LocationLine::Skip);
    }

    let mut parts = line.split(',');
    let (Some(id), Some(code)) = (parts.next(), parts.next()) else {
        return Err(ImportError::malformed_line("expected locId and country fields"));
    };
    Ok(LocationLine::Location {
        id: parse_number(unquote(id))?,
        code: unquote(code).to_lowercase(),
    })
}

/// Parse one line of `GeoLiteCity-Blocks.csv`
///
/// Data lines are quoted: `"startIpNum","endIpNum","locId"`.
pub fn parse_block_line(line: &str) -> ImportResult<BlockLine> {
    let line = line.trim_end();
    if !line.starts_with('"') {
        return Ok(BlockLine::Skip);
    }

    let parts: Vec<&str> = line.split(',').map(unquote).collect();
    if parts.len() < 3 {
        return Err(ImportError::malformed_line(format!(
            "expected 3 fields, found {}",
            parts.len()
        )));
    }
    let start = parse_number(parts[0])?;
    let end = parse_number(parts[1])?;
    if end < start {
        return Err(ImportError::malformed_line(format!(
            "range ends before it starts: {}-{}",
            start, end
        )));
    }
    Ok(BlockLine::Block {
        start,
        end,
        location: parse_number(parts[2])?,
    })
}

/// Snapshot day of a blocks file: the UTC day it was last modified
pub fn snapshot_day(blocks: &Path) -> ImportResult<DayNumber> {
    let modified = fs::metadata(blocks)
        .and_then(|m| m.modified())
        .map_err(|e| ImportError::read_failed(blocks.display(), e))?;
    day_from_system_time(modified)
        .map_err(|e| ImportError::invalid_snapshot_date(blocks.display(), e))
}

/// Import one blocks/location pair.
///
/// Returns `Ok(None)` if a GeoLite City snapshot for the same day was
/// imported before. Both files are read in full before the first range is
/// imported. Blocks whose location is unknown count as malformed lines.
pub fn import_geolite_pair(
    db: &mut Database,
    blocks: &Path,
    location: &Path,
) -> ImportResult<Option<FileReport>> {
    let day = snapshot_day(blocks)?;
    if db
        .catalog()
        .contains_source(&SourceFile::new(day, GEOLITE_SOURCE_NAME))
    {
        return Ok(None);
    }

    let location_lines = read_lines(location)?;
    let block_lines = read_lines(blocks)?;
    let mut report = FileReport::default();

    let mut locations: HashMap<u32, String> = HashMap::new();
    for (index, line) in location_lines.iter().enumerate() {
        match parse_location_line(line) {
            Ok(LocationLine::Skip) => {}
            Ok(LocationLine::Location { id, code }) => {
                locations.insert(id, code);
            }
            Err(err) => report.malformed(location, err.at_line(index + 1)),
        }
    }

    for (index, line) in block_lines.iter().enumerate() {
        let (start, end, location_id) = match parse_block_line(line) {
            Ok(BlockLine::Skip) => continue,
            Ok(BlockLine::Block {
                start,
                end,
                location,
            }) => (start, end, location),
            Err(err) => {
                report.malformed(blocks, err.at_line(index + 1));
                continue;
            }
        };
        let Some(code) = locations.get(&location_id) else {
            let err = ImportError::malformed_line(format!("unknown location id: {}", location_id));
            report.malformed(blocks, err.at_line(index + 1));
            continue;
        };

        let count = u64::from(end) - u64::from(start) + 1;
        match db.import_range(GEOLITE_SOURCE_NAME, code, start, count, day) {
            ImportOutcome::Applied { .. } => report.applied += 1,
            _ => report.dropped += 1,
        }
    }

    Ok(Some(report))
}

/// Import every GeoLite City snapshot below `path`.
///
/// Files are grouped by directory. A directory with both CSV files is one
/// snapshot; any other file is skipped. Snapshots are imported in ascending
/// day order with a repair pass after each day. In the report a pair counts
/// as one imported or skipped source.
pub fn import_geolite_path(db: &mut Database, path: &Path) -> ImportResult<ImportReport> {
    let scope = ObservationScope::with_fields(
        "GEOLITE_IMPORT",
        &[("path", path.display().to_string().as_str())],
    );

    let mut files = Vec::new();
    if let Err(err) = collect_files(path, &mut files) {
        scope.fail(&err.to_string());
        return Err(err);
    }

    let mut report = ImportReport::default();
    let mut by_directory: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        if !file_name(&file).ends_with(".csv") {
            skip(&mut report, &file, "unsupported file type");
            continue;
        }
        let directory = file.parent().map(Path::to_path_buf).unwrap_or_default();
        by_directory.entry(directory).or_default().push(file);
    }

    let mut by_day: BTreeMap<DayNumber, Vec<(PathBuf, PathBuf)>> = BTreeMap::new();
    for files in by_directory.into_values() {
        let find = |name: &str| files.iter().find(|f| file_name(f) == name).cloned();
        let (Some(blocks), Some(location)) = (find(BLOCKS_FILE_NAME), find(LOCATION_FILE_NAME))
        else {
            for file in &files {
                skip(&mut report, file, "no blocks/location pair");
            }
            continue;
        };
        for file in files.iter().filter(|f| **f != blocks && **f != location) {
            skip(&mut report, file, "unrecognized file");
        }
        match snapshot_day(&blocks) {
            Ok(day) => by_day.entry(day).or_default().push((blocks, location)),
            Err(err) => fail(&mut report, &blocks, &err),
        }
    }

    for pairs in by_day.into_values() {
        for (blocks, location) in pairs {
            match import_geolite_pair(db, &blocks, &location) {
                Ok(Some(file_report)) => imported(&mut report, GEOLITE_SOURCE_NAME, file_report),
                Ok(None) => skip(&mut report, &blocks, "already imported"),
                Err(err) => fail(&mut report, &blocks, &err),
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
