//! Range import
//!
//! Adding one snapshot range may split existing records, extend the
//! validity of matching neighbours, and create records for addresses that
//! had no coverage. All of this is planned into a `RangeDiff` during a
//! descending scan and applied afterwards.

use super::catalog::SourceFile;
use super::Database;
use crate::codec::{
    address_to_number, date_to_number, number_to_address, number_to_date, CodecResult, DayNumber,
    RangeKey,
};
use crate::index::{Generation, RangeDiff, RangeEntry};
use crate::observability::{log_event_with_fields, Event};

/// Result of importing one range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The diff was applied
    Applied {
        /// Records written (new, split or merged)
        inserted: usize,
        /// Records removed by merges
        removed: usize,
    },
    /// Another code already owns part of the range on that day. Nothing changed.
    Conflict {
        /// Code that keeps the range
        existing: String,
    },
    /// The code is not two characters long. Nothing changed.
    MalformedCode,
    /// The range covers no addresses. Nothing changed.
    EmptyRange,
    /// The range runs past 255.255.255.255. Nothing changed.
    OutOfBounds,
}

impl ImportOutcome {
    /// Whether the store was updated
    pub fn is_applied(&self) -> bool {
        matches!(self, ImportOutcome::Applied { .. })
    }
}

/// Planned changes, or the code that blocks the import
enum Plan {
    Apply(RangeDiff),
    Conflict(String),
}

/// Range still waiting to be written, addresses widened so the cursor can
/// step below address zero.
struct Pending {
    start: i64,
    end: i64,
    first: DayNumber,
    last: DayNumber,
}

fn key(address: i64, day: DayNumber) -> RangeKey {
    RangeKey::new(address as u32, day)
}

impl Database {
    /// Import one range of a snapshot.
    ///
    /// `count` is the number of addresses starting at `start`. The caller
    /// must run [`Database::repair`] once every source for `day` has been
    /// imported, before looking anything up.
    pub fn import_range(
        &mut self,
        source: &str,
        code: &str,
        start: u32,
        count: u64,
        day: DayNumber,
    ) -> ImportOutcome {
        if code.chars().count() != 2 {
            self.metrics.increment_malformed_codes();
            return ImportOutcome::MalformedCode;
        }
        if count == 0 {
            return ImportOutcome::EmptyRange;
        }
        let end = u64::from(start) + count - 1;
        let Ok(end) = u32::try_from(end) else {
            return ImportOutcome::OutOfBounds;
        };

        self.catalog.register_date(day);
        self.catalog.register_source(SourceFile::new(day, source));

        let (plan, keys_visited) = self.plan_range(day, code, start, end);
        self.metrics.record_range_import(keys_visited);

        match plan {
            Plan::Apply(diff) => {
                let (inserted, removed) = self.tree.apply(diff);
                ImportOutcome::Applied { inserted, removed }
            }
            Plan::Conflict(existing) => {
                self.metrics.increment_range_conflicts();
                log_event_with_fields(
                    Event::RangeConflict,
                    &[
                        ("source", source),
                        ("start", number_to_address(start).as_str()),
                        ("end", number_to_address(end).as_str()),
                        ("date", number_to_date(day).as_str()),
                        ("code", code),
                        ("existing", existing.as_str()),
                    ],
                );
                ImportOutcome::Conflict { existing }
            }
        }
    }

    /// Import one range given in textual form
    pub fn import_range_str(
        &mut self,
        source: &str,
        code: &str,
        start: &str,
        count: u64,
        date: &str,
    ) -> CodecResult<ImportOutcome> {
        let start = address_to_number(start)?;
        let day = date_to_number(date)?;
        Ok(self.import_range(source, code, start, count, day))
    }

    /// Plan the changes that add `[start, end]` with `code` on `day`.
    ///
    /// Returns the plan and the number of records visited.
    fn plan_range(&self, day: DayNumber, code: &str, start: u32, end: u32) -> (Plan, u64) {
        let generation: Generation = self.generation;
        let previous = self.catalog.previous_date(day);
        let next = self.catalog.next_date(day);

        let start_i = i64::from(start);
        let end_i = i64::from(end);
        let fresh = |start: i64, end: i64| Pending {
            start,
            end,
            first: day,
            last: day,
        };

        let mut diff = RangeDiff::new();
        let mut pending = fresh(start_i, end_i);
        let mut visited = 0u64;

        for (e_key, entry) in self.tree.scan_down_from(end) {
            visited += 1;

            let mut e_start = i64::from(e_key.address());
            let mut e_end = i64::from(entry.end_address);
            let e_first = e_key.day();
            let e_last = entry.last_day;
            let e_code = entry.code.as_str();

            // Pending part lies entirely above this record
            if pending.start > e_end && pending.end >= start_i {
                diff.insert(
                    key(pending.start, pending.first),
                    RangeEntry::new(pending.end as u32, pending.last, code, generation),
                );
                pending = fresh(start_i, pending.start - 1);
            }

            // Pending part sticks out above this record
            if pending.end > e_end && pending.end >= start_i {
                diff.insert(
                    key(e_end + 1, day),
                    RangeEntry::new(pending.end as u32, day, code, generation),
                );
                pending = fresh(start_i, e_end);
            }

            if e_end < start_i {
                break;
            }

            // Cut off the part of the record above the new range
            if e_start <= end_i && e_end > end_i {
                diff.insert(
                    key(end_i + 1, e_first),
                    RangeEntry::new(e_end as u32, e_last, e_code, entry.touched),
                );
                diff.insert(
                    key(e_start, e_first),
                    RangeEntry::new(end, e_last, e_code, entry.touched),
                );
                e_end = end_i;
            }

            // Cut off the part of the record below the new range
            if e_start < start_i && e_end >= start_i {
                diff.insert(
                    key(e_start, e_first),
                    RangeEntry::new(start - 1, e_last, e_code, entry.touched),
                );
                diff.insert(
                    key(start_i, e_first),
                    RangeEntry::new(e_end as u32, e_last, e_code, entry.touched),
                );
                e_start = start_i;
            }

            pending.start = e_start;
            pending.end = e_end;

            if e_first <= day && e_last >= day {
                if e_code != code {
                    return (Plan::Conflict(e_code.to_string()), visited);
                }
                // Already represented; rewritten below as reconfirmed
                pending.first = e_first;
                pending.last = e_last;
            }

            if e_code == code {
                if Some(e_last) == previous {
                    pending.first = e_first;
                    diff.remove(key(e_start, e_first));
                } else if Some(e_first) == next {
                    pending.last = e_last;
                    diff.remove(key(e_start, e_first));
                }
            }
        }

        while pending.end >= start_i {
            diff.insert(
                key(pending.start, pending.first),
                RangeEntry::new(pending.end as u32, pending.last, code, generation),
            );
            pending = fresh(start_i, pending.start - 1);
        }

        (Plan::Apply(diff), visited)
    }
}
