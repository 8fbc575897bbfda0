//! Regional registry statistics files
//!
//! Lines look like `registry|CC|type|start|value|date|status`. Only `ipv4`
//! lines carry ranges; `value` is the number of addresses.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::errors::{ImportError, ImportResult};
use crate::codec::address_to_number;
use crate::database::{date_from_file_name, Database, ImportOutcome};
use crate::observability::{log_event_with_fields, Event};

/// One parsed registry line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryLine {
    /// Comment, version, summary or non-IPv4 line
    Skip,
    /// An IPv4 allocation
    Range {
        /// Lowercased country code
        code: String,
        /// First address
        start: u32,
        /// Number of addresses
        count: u64,
    },
}

/// Parse one line of a registry statistics file
pub fn parse_registry_line(line: &str) -> ImportResult<RegistryLine> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
        return Ok(RegistryLine::Skip);
    }

    let parts: Vec<&str> = line.split('|').collect();
    if parts[0] == "2" {
        return Ok(RegistryLine::Skip);
    }
    if parts.len() < 5 {
        return Err(ImportError::malformed_line(format!(
            "expected at least 5 fields, found {}",
            parts.len()
        )));
    }
    if parts[1] == "*" || parts[2] != "ipv4" {
        return Ok(RegistryLine::Skip);
    }

    let start = address_to_number(parts[3])
        .map_err(|e| ImportError::malformed_line(e.to_string()))?;
    let count = parts[4]
        .parse::<u64>()
        .map_err(|_| ImportError::malformed_line(format!("invalid count: {}", parts[4])))?;

    Ok(RegistryLine::Range {
        code: parts[1].to_lowercase(),
        start,
        count,
    })
}

/// Tally of one imported file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Ranges applied to the database
    pub applied: usize,
    /// Ranges dropped: conflicts, malformed codes, empty or out of bounds
    pub dropped: usize,
    /// Lines that did not parse
    pub malformed_lines: usize,
}

impl FileReport {
    /// Log and count a line that did not parse
    pub(crate) fn malformed(&mut self, path: &Path, err: ImportError) {
        log_event_with_fields(
            Event::MalformedLine,
            &[
                ("path", path.display().to_string().as_str()),
                ("error", err.to_string().as_str()),
            ],
        );
        self.malformed_lines += 1;
    }
}

/// Read every line of `path`, decoding invalid UTF-8 lossily.
///
/// Reading finishes before any range is imported, so an I/O error leaves
/// the database untouched and the file can be retried.
pub(crate) fn read_lines(path: &Path) -> ImportResult<Vec<String>> {
    let file = File::open(path).map_err(|e| ImportError::read_failed(path.display(), e))?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ImportError::read_failed(path.display(), e))?;
        if read == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }
    Ok(lines)
}

/// Import one registry file.
///
/// Returns `Ok(None)` if a file with this name was imported before. The
/// caller runs the repair pass once all files of the snapshot day are in.
pub fn import_registry_file(db: &mut Database, path: &Path) -> ImportResult<Option<FileReport>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if db.catalog().is_known_source(&name) {
        return Ok(None);
    }
    let day = date_from_file_name(&name).map_err(|_| ImportError::invalid_source_name(&name))?;

    let parsed: Vec<ImportResult<RegistryLine>> = read_lines(path)?
        .iter()
        .map(|line| parse_registry_line(line))
        .collect();

    let mut report = FileReport::default();
    for (index, line) in parsed.into_iter().enumerate() {
        match line {
            Ok(RegistryLine::Skip) => {}
            Ok(RegistryLine::Range { code, start, count }) => {
                match db.import_range(&name, &code, start, count, day) {
                    ImportOutcome::Applied { .. } => report.applied += 1,
                    _ => report.dropped += 1,
                }
            }
            Err(err) => report.malformed(path, err.at_line(index + 1)),
        }
    }

    Ok(Some(report))
}
