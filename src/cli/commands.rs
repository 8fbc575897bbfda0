//! CLI command implementations
//!
//! Every command loads the configuration first and applies its log level.
//! `import` is the only command that writes the combined database.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use super::args::{Cli, Command, ImportFormat};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;
use crate::codec::number_to_date;
use crate::database::Database;
use crate::import::{import_geolite_path, import_path, ImportReport};
use crate::observability::{log_event_with_fields, Event};
use crate::storage;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a command and print its response
pub fn run_command(cmd: Command) -> CliResult<()> {
    let data = execute(cmd)?;
    write_response(data)
}

/// Run a command and return the response data
pub fn execute(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Import {
            config,
            format,
            paths,
        } => import(&config, format, &paths),
        Command::Lookup {
            config,
            address,
            date,
        } => lookup(&config, &address, &date),
        Command::Info { config, limit } => info(&config, limit),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    config.apply_log_level()?;
    Ok(config)
}

/// Load the combined database, which must already exist
fn open_existing(config: &Config) -> CliResult<Database> {
    let path = config.database_path();
    if !path.exists() {
        return Err(CliError::not_found(path.display()));
    }
    Ok(storage::load(path)?)
}

/// Import snapshot files into the combined database
///
/// The database is loaded if it exists, extended, and saved back. Nothing
/// is saved if any path cannot be read.
pub fn import(config_path: &Path, format: ImportFormat, paths: &[PathBuf]) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let db_path = config.database_path();

    let mut db = if db_path.exists() {
        storage::load(db_path)?
    } else {
        Database::new()
    };

    let options = config.import_options();
    let mut report = ImportReport::default();
    for path in paths {
        let path_report = match format {
            ImportFormat::Registry => import_path(&mut db, path, &options)?,
            ImportFormat::Geolite => import_geolite_path(&mut db, path)?,
        };
        report.merge(path_report);
    }

    storage::save(&db, db_path)?;

    let mut data = serde_json::to_value(&report)?;
    if let Value::Object(fields) = &mut data {
        fields.insert("records".to_string(), json!(db.len()));
        fields.insert("dates".to_string(), json!(db.catalog().date_count()));
        fields.insert(
            "metrics".to_string(),
            serde_json::to_value(db.metrics().snapshot())?,
        );
    }
    Ok(data)
}

/// Look up one address on one date
pub fn lookup(config_path: &Path, address: &str, date: &str) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let db = open_existing(&config)?;

    let code = db.lookup_address(address, date)?;
    log_event_with_fields(
        Event::LookupExecuted,
        &[
            ("address", address),
            ("date", date),
            ("code", code.as_deref().unwrap_or("")),
        ],
    );

    Ok(json!({
        "address": address,
        "date": date,
        "code": code,
    }))
}

/// Summarize the combined database
pub fn info(config_path: &Path, limit: Option<usize>) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let db = open_existing(&config)?;
    let limit = limit.unwrap_or(config.summary_limit);

    let catalog = db.catalog();
    Ok(json!({
        "records": db.len(),
        "dates": catalog.date_count(),
        "sources": catalog.source_count(),
        "first_date": catalog.dates().next().map(number_to_date),
        "last_date": catalog.dates().next_back().map(number_to_date),
        "summary": db.summary(limit).to_string(),
    }))
}
