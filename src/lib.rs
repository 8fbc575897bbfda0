//! georange - A temporal IPv4 range database
//!
//! Combines dated registry snapshots into one store of address ranges with
//! validity intervals, answering "which code owned this address on this
//! day".
//!
//! ```ignore
//! use georange::Database;
//!
//! let mut db = Database::new();
//! db.import_range_str("delegated-arin-20120901", "us", "3.0.0.0", 1 << 24, "20120901")?;
//! db.repair();
//! assert_eq!(db.lookup_address("3.1.2.3", "20120901")?.as_deref(), Some("us"));
//! ```

pub mod cli;
pub mod codec;
pub mod database;
pub mod import;
pub mod index;
pub mod observability;
pub mod storage;

pub use database::{Database, ImportOutcome, RepairReport};
