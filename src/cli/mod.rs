//! CLI module for georange
//!
//! Provides command-line interface for:
//! - import: Add registry or GeoLite City snapshots to the combined database
//! - lookup: Resolve one address on one date
//! - info: Summarize the combined database

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, ImportFormat};
pub use commands::{execute, import, info, lookup, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_envelope, ok_envelope, write_error, write_response};
