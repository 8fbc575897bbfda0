//! Registry Import Tests
//!
//! Tests for:
//! - Directory imports group files by snapshot day and repair after each day
//! - Import order on disk does not change the result
//! - Files already in the catalog are skipped
//! - Signature, digest and compressed files are skipped
//! - Undecodable bytes never abort a file

use georange::import::{import_path, ImportOptions};
use georange::Database;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn write(dir: &Path, name: &str, lines: &[&str]) {
    let mut body = String::new();
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    fs::write(dir.join(name), body).unwrap();
}

fn header(registry: &str, date: &str) -> String {
    format!("2|{}|1347937201|3|19700101|{}|-0400", registry, date)
}

/// Three snapshots where 3.0.0.0/8 disappears on 20121001
fn write_missing_range_snapshots(dir: &Path) {
    let h = header("arin", "20120901");
    write(
        dir,
        "delegated-arin-20120901",
        &[
            h.as_str(),
            "arin|*|ipv4|*|1|summary",
            "arin|US|ipv4|3.0.0.0|16777216|19880223|allocated",
        ],
    );
    let h = header("arin", "20121001");
    write(
        dir,
        "delegated-arin-20121001",
        &[
            h.as_str(),
            "arin|US|ipv4|6.0.0.0|16777216|19940201|allocated",
        ],
    );
    let h = header("arin", "20121101");
    write(
        dir,
        "delegated-arin-20121101",
        &[
            h.as_str(),
            "arin|US|ipv4|3.0.0.0|16777216|19880223|allocated",
            "arin|US|asn|1|1|19910906|assigned",
            "arin|US|ipv6|2001:400::|32|19990803|allocated",
        ],
    );
}

// =============================================================================
// Directory imports
// =============================================================================

#[test]
fn test_directory_import_repairs_per_day() {
    let temp_dir = TempDir::new().unwrap();
    write_missing_range_snapshots(temp_dir.path());

    let mut db = Database::new();
    let report = import_path(&mut db, temp_dir.path(), &ImportOptions::default()).unwrap();

    assert_eq!(report.imported, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(
        report.repaired_dates,
        vec!["20120901", "20121001", "20121101"]
    );
    assert_eq!(db.len(), 3);
    assert_eq!(
        db.lookup_address("3.127.0.0", "20120901").unwrap().as_deref(),
        Some("us")
    );
    assert_eq!(db.lookup_address("3.127.0.0", "20121001").unwrap(), None);
    assert_eq!(
        db.lookup_address("3.127.0.0", "20121101").unwrap().as_deref(),
        Some("us")
    );
}

#[test]
fn test_files_of_one_day_are_repaired_together() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "delegated-arin-20120901",
        &["arin|US|ipv4|3.0.0.0|16777216|19880223|allocated"],
    );
    write(
        temp_dir.path(),
        "delegated-arin-20121001",
        &["arin|US|ipv4|3.0.0.0|16777216|19880223|allocated"],
    );
    // a second registry on the same day must not split the arin range
    write(
        temp_dir.path(),
        "delegated-ripencc-20121001",
        &["ripencc|DE|ipv4|5.0.0.0|256|20000101|allocated"],
    );

    let mut db = Database::new();
    let report = import_path(&mut db, temp_dir.path(), &ImportOptions::default()).unwrap();

    assert_eq!(report.imported, 3);
    assert_eq!(report.repaired_dates, vec!["20120901", "20121001"]);
    assert_eq!(db.len(), 2);
    assert_eq!(
        db.lookup_address("3.0.0.1", "20121001").unwrap().as_deref(),
        Some("us")
    );
    assert_eq!(
        db.lookup_address("5.0.0.1", "20121001").unwrap().as_deref(),
        Some("de")
    );
}

#[test]
fn test_separate_imports_match_directory_import() {
    let all = TempDir::new().unwrap();
    write_missing_range_snapshots(all.path());
    let mut together = Database::new();
    import_path(&mut together, all.path(), &ImportOptions::default()).unwrap();

    let mut one_by_one = Database::new();
    for name in [
        "delegated-arin-20120901",
        "delegated-arin-20121001",
        "delegated-arin-20121101",
    ] {
        import_path(&mut one_by_one, &all.path().join(name), &ImportOptions::default()).unwrap();
    }

    let records = |db: &Database| -> Vec<_> {
        db.tree()
            .iter()
            .map(|(k, e)| (*k, e.end_address, e.code.clone(), e.last_day))
            .collect()
    };
    assert_eq!(records(&together), records(&one_by_one));
}

// =============================================================================
// Skipped files
// =============================================================================

#[test]
fn test_reimport_skips_known_sources() {
    let temp_dir = TempDir::new().unwrap();
    write_missing_range_snapshots(temp_dir.path());

    let mut db = Database::new();
    import_path(&mut db, temp_dir.path(), &ImportOptions::default()).unwrap();
    let before = db.len();

    let report = import_path(&mut db, temp_dir.path(), &ImportOptions::default()).unwrap();
    assert_eq!(report.imported, 0);
    assert_eq!(report.skipped, 3);
    assert!(report.repaired_dates.is_empty());
    assert_eq!(db.len(), before);
}

#[test]
fn test_ignored_suffixes_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let line = ["arin|US|ipv4|3.0.0.0|256|19880223|allocated"];
    write(temp_dir.path(), "delegated-arin-20120901.md5", &line);
    write(temp_dir.path(), "delegated-arin-20120901.asc", &line);
    write(temp_dir.path(), "delegated-arin-20120901.bz2", &line);
    write(temp_dir.path(), "delegated-arin-20120901.gz", &line);

    let mut db = Database::new();
    let report = import_path(&mut db, temp_dir.path(), &ImportOptions::default()).unwrap();

    assert_eq!(report.imported, 0);
    assert_eq!(report.skipped, 4);
    assert!(db.is_empty());
}

#[test]
fn test_custom_ignored_suffixes() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "delegated-arin-20120901",
        &["arin|US|ipv4|3.0.0.0|256|19880223|allocated"],
    );

    let options = ImportOptions {
        ignored_suffixes: vec!["20120901".to_string()],
    };
    let mut db = Database::new();
    let report = import_path(&mut db, temp_dir.path(), &options).unwrap();
    assert_eq!(report.skipped, 1);
    assert!(db.is_empty());
}

#[test]
fn test_malformed_lines_do_not_stop_the_file() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "delegated-arin-20120901",
        &[
            "arin|US|ipv4|3.0.0.0|not-a-number|19880223|allocated",
            "arin|US|ipv4",
            "arin|CA|ipv4|4.0.0.0|256|19880223|allocated",
        ],
    );

    let mut db = Database::new();
    let report = import_path(&mut db, temp_dir.path(), &ImportOptions::default()).unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.malformed_lines, 2);
    assert_eq!(
        db.lookup_address("4.0.0.1", "20120901").unwrap().as_deref(),
        Some("ca")
    );
}

#[test]
fn test_invalid_utf8_does_not_fail_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut body = Vec::new();
    body.extend_from_slice(b"arin|US|ipv4|3.0.0.0|256|19880223|allocated\n");
    body.extend_from_slice(b"arin|CA|ipv4|4.0.0.0|256|19880223|allocated|\xff\n");
    body.extend_from_slice(b"arin|US|ipv4|5.0.0.0|256|19880223|allocated\n");
    fs::write(temp_dir.path().join("delegated-arin-20120901"), body).unwrap();

    let mut db = Database::new();
    let report = import_path(&mut db, temp_dir.path(), &ImportOptions::default()).unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.ranges_applied, 3);
    assert_eq!(
        db.lookup_address("5.0.0.1", "20120901").unwrap().as_deref(),
        Some("us")
    );
}
