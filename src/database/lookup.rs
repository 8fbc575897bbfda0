//! Point-in-time lookup

use super::Database;
use crate::codec::{address_to_number, date_to_number, CodecResult, DayNumber};

impl Database {
    /// Code that owned `address` on `day`, as seen by the latest snapshot on
    /// or before `day`. Days before the first snapshot use the first one.
    pub fn lookup(&self, address: u32, day: DayNumber) -> Option<String> {
        let snapshot = self.catalog.resolve_snapshot(day)?;
        let mut visited = 0u64;
        let mut found = None;

        for (key, entry) in self.tree.scan_down_from(address) {
            visited += 1;
            if entry.end_address < address || entry.last_day < snapshot {
                break;
            }
            if key.day() > snapshot {
                continue;
            }
            found = Some(entry.code.clone());
            break;
        }

        self.metrics.record_lookup(visited);
        found
    }

    /// Lookup with a dotted-quad address and a `yyyymmdd` date.
    ///
    /// Unknown addresses give `Ok(None)`; malformed input is an error.
    pub fn lookup_address(&self, address: &str, date: &str) -> CodecResult<Option<String>> {
        let address = address_to_number(address)?;
        let day = date_to_number(date)?;
        Ok(self.lookup(address, day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_range() -> Database {
        let mut db = Database::new();
        db.import_range_str("arin", "us", "3.0.0.0", 1 << 24, "20120901")
            .unwrap();
        db.repair();
        db
    }

    #[test]
    fn test_empty_database_finds_nothing() {
        let db = Database::new();
        assert_eq!(db.lookup_address("3.0.0.0", "20120901").unwrap(), None);
    }

    #[test]
    fn test_bounds_of_single_range() {
        let db = single_range();
        assert_eq!(db.lookup_address("2.255.255.255", "20120901").unwrap(), None);
        assert_eq!(
            db.lookup_address("3.0.0.0", "20120901").unwrap().as_deref(),
            Some("us")
        );
        assert_eq!(
            db.lookup_address("3.255.255.255", "20120901").unwrap().as_deref(),
            Some("us")
        );
        assert_eq!(db.lookup_address("4.0.0.0", "20120901").unwrap(), None);
    }

    #[test]
    fn test_dates_clamp_to_known_snapshots() {
        let db = single_range();
        // before the first snapshot
        assert_eq!(
            db.lookup_address("3.0.0.1", "20000101").unwrap().as_deref(),
            Some("us")
        );
        // after the last snapshot
        assert_eq!(
            db.lookup_address("3.0.0.1", "20200101").unwrap().as_deref(),
            Some("us")
        );
    }

    #[test]
    fn test_lookup_counts_visited_keys() {
        let db = single_range();
        db.lookup_address("3.0.0.1", "20120901").unwrap();
        db.lookup_address("2.0.0.1", "20120901").unwrap();

        let stats = db.metrics().snapshot();
        assert_eq!(stats.address_lookups, 2);
        assert_eq!(stats.address_lookup_keys_visited, 1);
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let db = single_range();
        assert!(db.lookup_address("3.0.0", "20120901").is_err());
        assert!(db.lookup_address("3.0.0.0", "2012091").is_err());
        assert!(db.lookup_address("3.0.0.0", "20121301").is_err());
    }

    #[test]
    fn test_newer_record_hides_older_one() {
        let mut db = single_range();
        db.import_range_str("arin", "ca", "3.0.0.0", 1 << 24, "20121001")
            .unwrap();
        db.repair();

        assert_eq!(
            db.lookup_address("3.0.0.1", "20120915").unwrap().as_deref(),
            Some("us")
        );
        assert_eq!(
            db.lookup_address("3.0.0.1", "20121001").unwrap().as_deref(),
            Some("ca")
        );
    }
}
