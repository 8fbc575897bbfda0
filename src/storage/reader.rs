//! Combined database reader
//!
//! The file is trusted as already repaired: records go straight into the
//! tree, no merge or repair runs. Any line that does not parse aborts the
//! load and no partially filled database is returned.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use crate::codec::{address_to_number, date_to_number};
use crate::database::{Database, SourceFile};
use crate::observability::{log_event_with_fields, Event};

/// Load a combined database from `path`.
pub fn load(path: &Path) -> StorageResult<Database> {
    let file = File::open(path).map_err(|e| {
        StorageError::read_failed(format!("Failed to open file: {}", path.display()), e)
    })?;

    match read_database(BufReader::new(file)) {
        Ok(db) => {
            log_event_with_fields(
                Event::LoadComplete,
                &[
                    ("path", path.display().to_string().as_str()),
                    ("records", db.len().to_string().as_str()),
                    ("dates", db.catalog().date_count().to_string().as_str()),
                ],
            );
            Ok(db)
        }
        Err(err) => {
            log_event_with_fields(
                Event::LoadFailed,
                &[
                    ("path", path.display().to_string().as_str()),
                    ("error", err.to_string().as_str()),
                ],
            );
            Err(err)
        }
    }
}

/// Parse the text form of a combined database
pub fn read_database<R: BufRead>(reader: R) -> StorageResult<Database> {
    let mut db = Database::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| {
            StorageError::read_failed(format!("Failed to read line {}", line_number), e)
        })?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if let Some(id) = line.strip_prefix('!') {
            let source = SourceFile::parse_id(id).map_err(|e| {
                StorageError::corruption_at_line(line_number, format!("invalid source: {}", e))
            })?;
            db.catalog_mut().restore_date(source.day);
            db.catalog_mut().register_source(source);
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 5 {
            return Err(StorageError::corruption_at_line(
                line_number,
                format!("expected 5 fields, found {}", fields.len()),
            ));
        }

        let corrupt = |e: crate::codec::CodecError| {
            StorageError::corruption_at_line(line_number, e.to_string())
        };
        let start = address_to_number(fields[0]).map_err(corrupt)?;
        let end = address_to_number(fields[1]).map_err(corrupt)?;
        let code = fields[2];
        let first = date_to_number(fields[3]).map_err(corrupt)?;
        let last = date_to_number(fields[4]).map_err(corrupt)?;

        if end < start || last < first {
            return Err(StorageError::corruption_at_line(
                line_number,
                "range or validity interval is inverted",
            ));
        }
        if code.chars().count() != 2 {
            return Err(StorageError::corruption_at_line(
                line_number,
                format!("invalid code: {}", code),
            ));
        }

        db.restore_record(start, end, code, first, last);
    }

    Ok(db)
}
