//! Repair pass
//!
//! A record that was not touched while a new snapshot day was imported was
//! not reconfirmed on that day. If its validity interval spans the day, the
//! record is split around it so it no longer claims the day.

use std::collections::BTreeSet;

use super::Database;
use crate::codec::{number_to_date, DayNumber, RangeKey};
use crate::index::{RangeDiff, RangeEntry};
use crate::observability::{log_event_with_fields, Event, Timer};

/// What one repair pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Days that were new since the previous pass
    pub repaired_dates: Vec<DayNumber>,
    /// Records that had to be narrowed or split
    pub records_split: usize,
    /// Records written in their place
    pub records_written: usize,
}

impl RepairReport {
    /// Whether the pass had nothing to do
    pub fn is_noop(&self) -> bool {
        self.repaired_dates.is_empty()
    }
}

/// Maximal runs of known days in `days` that avoid every `excluded` day
fn runs_excluding(
    days: impl Iterator<Item = DayNumber>,
    excluded: &BTreeSet<DayNumber>,
) -> Vec<(DayNumber, DayNumber)> {
    let mut runs = Vec::new();
    let mut run: Option<(DayNumber, DayNumber)> = None;

    for day in days {
        if excluded.contains(&day) {
            if let Some(done) = run.take() {
                runs.push(done);
            }
        } else {
            run = Some(match run {
                Some((first, _)) => (first, day),
                None => (day, day),
            });
        }
    }

    if let Some(done) = run {
        runs.push(done);
    }
    runs
}

impl Database {
    /// Run the repair pass for the days introduced since the last pass.
    ///
    /// Must be called once after every source file of a snapshot day has
    /// been imported. Without a new day this only advances the generation.
    pub fn repair(&mut self) -> RepairReport {
        let pending = self.catalog.take_pending();
        let generation = self.generation;
        self.generation += 1;

        if pending.is_empty() {
            return RepairReport::default();
        }

        let timer = Timer::new();
        let dates: Vec<String> = pending.iter().map(|d| number_to_date(*d)).collect();
        let dates = dates.join(",");
        log_event_with_fields(Event::RepairBegin, &[("dates", dates.as_str())]);

        let mut diff = RangeDiff::new();
        let mut records_split = 0;

        for (key, entry) in self.tree.iter() {
            if entry.touched >= generation {
                continue;
            }
            let first = key.day();
            let last = entry.last_day;
            if pending.range(first..=last).next().is_none() {
                continue;
            }

            records_split += 1;
            diff.remove(*key);
            for (run_first, run_last) in
                runs_excluding(self.catalog.dates_between(first, last), &pending)
            {
                diff.insert(
                    RangeKey::new(key.address(), run_first),
                    RangeEntry::new(entry.end_address, run_last, entry.code.clone(), entry.touched),
                );
            }
        }

        let (records_written, _) = self.tree.apply(diff);
        self.metrics.record_repair(timer.elapsed_micros());

        log_event_with_fields(
            Event::RepairComplete,
            &[
                ("dates", dates.as_str()),
                ("records_split", records_split.to_string().as_str()),
                ("records_written", records_written.to_string().as_str()),
                ("elapsed_ms", timer.elapsed_ms().as_str()),
            ],
        );

        RepairReport {
            repaired_dates: pending.into_iter().collect(),
            records_split,
            records_written,
        }
    }
}
