//! Combined database writer
//!
//! Layout:
//! - one header line per known source: `!yyyymmdd!fileName`
//! - one line per record in ascending key order:
//!   `start,end,code,firstYYYYMMDD,lastYYYYMMDD`

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use crate::codec::{number_to_address, number_to_date};
use crate::database::Database;
use crate::observability::{log_event_with_fields, Event};

/// Save `db` to `path`, replacing any existing file.
///
/// Creates parent directories if needed.
pub fn save(db: &Database, path: &Path) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create directory: {}", parent.display()),
                    e,
                )
            })?;
        }
    }

    let file = File::create(path).map_err(|e| {
        StorageError::write_failed(format!("Failed to create file: {}", path.display()), e)
    })?;
    let mut out = BufWriter::new(file);

    write_database(db, &mut out)
        .and_then(|_| out.flush())
        .map_err(|e| {
            StorageError::write_failed(format!("Failed to write: {}", path.display()), e)
        })?;

    log_event_with_fields(
        Event::SaveComplete,
        &[
            ("path", path.display().to_string().as_str()),
            ("records", db.len().to_string().as_str()),
        ],
    );
    Ok(())
}

/// Write the text form of `db`
pub fn write_database<W: Write>(db: &Database, out: &mut W) -> std::io::Result<()> {
    for source in db.catalog().sources() {
        writeln!(out, "!{}", source.id())?;
    }
    for (key, entry) in db.tree().iter() {
        writeln!(
            out,
            "{},{},{},{},{}",
            number_to_address(key.address()),
            number_to_address(entry.end_address),
            entry.code,
            number_to_date(key.day()),
            number_to_date(entry.last_day)
        )?;
    }
    Ok(())
}
