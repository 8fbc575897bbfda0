//! Range store subsystem for georange
//!
//! Holds the combined database as one ordered tree of disjoint
//! (address range × validity interval) records.
//!
//! # Design Principles
//!
//! - Deterministic: BTreeMap ordering by packed `RangeKey`
//! - Scan-then-mutate: changes are collected in a `RangeDiff` while
//!   iterating and applied in one step afterwards
//!
//! # Invariants
//!
//! - Non-overlap: any two records are disjoint in address or in validity
//! - Descending scans from `RangeKey::last_for(address)` see every record
//!   that can contain `address`

mod diff;
mod tree;

pub use diff::{RangeDiff, RangeUpdate};
pub use tree::{Generation, RangeEntry, RangeTree};
