//! Codec subsystem for georange
//!
//! Converts between the textual forms used at the edges (dotted-quad
//! addresses, `yyyymmdd` dates) and the compact integers stored in the
//! range tree.
//!
//! # Design Principles
//!
//! - Pure functions and `Copy` value types, no shared mutable state
//! - Order-preserving: key ordering equals `(address, day)` ordering
//! - Malformed input is an explicit `CodecError`, never a panic

mod address;
mod date;
mod errors;
mod key;

pub use address::{address_to_number, number_to_address};
pub use date::{
    date_to_number, day_from_system_time, number_to_date, DayNumber, EPOCH_DATE_FORMAT,
};
pub use errors::{CodecError, CodecResult};
pub use key::RangeKey;
