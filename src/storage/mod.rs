//! Storage subsystem for georange
//!
//! Persists a combined database as a line-oriented text file and reads it
//! back.
//!
//! # Design Principles
//!
//! - Whole-file writes, records in ascending key order
//! - A saved database is already repaired; loading never re-runs import logic
//! - Any unparseable line fails the load, with its line number

mod errors;
mod reader;
mod writer;

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use reader::{load, read_database};
pub use writer::{save, write_database};
