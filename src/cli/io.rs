//! JSON output for the CLI
//!
//! Each command prints exactly one JSON object on stdout. Logs go to
//! stderr.

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Envelope for a successful command
pub fn ok_envelope(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Envelope for a failed command
pub fn error_envelope(err: &CliError) -> Value {
    json!({
        "status": "error",
        "code": err.code_str(),
        "message": err.message()
    })
}

fn emit(response: &Value) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    emit(&ok_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(err: &CliError) -> CliResult<()> {
    emit(&error_envelope(err))
}
