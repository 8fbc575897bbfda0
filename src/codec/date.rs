//! `yyyymmdd` date conversion
//!
//! Dates are stored as whole days since 1970-01-01 (UTC) in a `u16`, which
//! leaves room for the 16 low bits of a `RangeKey`.

use std::time::SystemTime;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::errors::{CodecError, CodecResult};

/// Whole days since 1970-01-01
pub type DayNumber = u16;

/// chrono format string for `yyyymmdd`
pub const EPOCH_DATE_FORMAT: &str = "%Y%m%d";

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Convert a `yyyymmdd` date to its day number.
pub fn date_to_number(date: &str) -> CodecResult<DayNumber> {
    let trimmed = date.trim();
    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::InvalidDate(date.to_string()));
    }
    let parsed = NaiveDate::parse_from_str(trimmed, EPOCH_DATE_FORMAT)
        .map_err(|_| CodecError::InvalidDate(date.to_string()))?;
    let days = parsed.signed_duration_since(epoch()).num_days();
    DayNumber::try_from(days).map_err(|_| CodecError::DateOutOfRange(date.to_string()))
}

/// Convert a day number back to `yyyymmdd`.
pub fn number_to_date(day: DayNumber) -> String {
    (epoch() + Duration::days(i64::from(day)))
        .format(EPOCH_DATE_FORMAT)
        .to_string()
}

/// Day number of the UTC calendar day containing `time`.
///
/// Used for sources that carry no date in their name, such as a file's
/// modification time.
pub fn day_from_system_time(time: SystemTime) -> CodecResult<DayNumber> {
    let date = DateTime::<Utc>::from(time).date_naive();
    let days = date.signed_duration_since(epoch()).num_days();
    DayNumber::try_from(days)
        .map_err(|_| CodecError::DateOutOfRange(date.format(EPOCH_DATE_FORMAT).to_string()))
}
