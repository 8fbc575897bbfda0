//! Persistence Tests
//!
//! Tests for:
//! - Round-trip: a saved and reloaded database answers every lookup the
//!   same way and saves back to identical text
//! - A loaded database is already repaired and accepts further imports
//! - Unparseable files fail the whole load

use georange::storage::{load, save, write_database};
use georange::Database;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn sample_database() -> Database {
    let mut db = Database::new();
    let batches: [(&str, &[(&str, &str, u64)]); 3] = [
        (
            "20120901",
            &[("us", "3.0.0.0", 16777216), ("ca", "4.0.0.0", 65536)],
        ),
        (
            "20121001",
            &[("us", "3.0.0.0", 16777216), ("de", "6.0.0.0", 256)],
        ),
        (
            "20121101",
            &[("us", "3.0.0.0", 8388608), ("ca", "4.0.0.0", 65536)],
        ),
    ];

    for (date, ranges) in batches {
        let source = format!("delegated-test-{}", date);
        for (code, start, count) in ranges {
            db.import_range_str(&source, code, start, *count, date)
                .unwrap();
        }
        db.repair();
    }
    db
}

fn text_of(db: &Database) -> String {
    let mut out = Vec::new();
    write_database(db, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// =============================================================================
// Round-trip
// =============================================================================

#[test]
fn test_roundtrip_preserves_lookups() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("combined.txt");
    let db = sample_database();

    save(&db, &path).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(loaded.len(), db.len());
    assert_eq!(loaded.catalog().date_count(), 3);
    assert_eq!(loaded.catalog().source_count(), 3);

    for address in ["2.255.255.255", "3.0.0.0", "3.200.0.0", "4.0.0.1", "4.1.0.0", "6.0.0.1"] {
        for date in ["20120801", "20120901", "20121001", "20121015", "20121101", "20130101"] {
            assert_eq!(
                loaded.lookup_address(address, date).unwrap(),
                db.lookup_address(address, date).unwrap(),
                "lookup({}, {})",
                address,
                date
            );
        }
    }
}

#[test]
fn test_roundtrip_text_is_stable() {
    let temp_dir = create_temp_dir();
    let first = temp_dir.path().join("first.txt");
    let second = temp_dir.path().join("second.txt");

    save(&sample_database(), &first).unwrap();
    save(&load(&first).unwrap(), &second).unwrap();

    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_expected_records_are_written() {
    let text = text_of(&sample_database());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "!20120901!delegated-test-20120901",
            "!20121001!delegated-test-20121001",
            "!20121101!delegated-test-20121101",
            "3.0.0.0,3.127.255.255,us,20120901,20121101",
            "3.128.0.0,3.255.255.255,us,20120901,20121001",
            "4.0.0.0,4.0.255.255,ca,20120901,20120901",
            "4.0.0.0,4.0.255.255,ca,20121101,20121101",
            "6.0.0.0,6.0.0.255,de,20121001,20121001",
        ]
    );
}

// =============================================================================
// Loaded database state
// =============================================================================

#[test]
fn test_loaded_database_accepts_new_snapshot() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("combined.txt");
    save(&sample_database(), &path).unwrap();

    let mut db = load(&path).unwrap();
    assert!(!db.catalog().has_pending());

    db.import_range_str("delegated-test-20121201", "us", "6.0.0.0", 256, "20121201")
        .unwrap();
    db.repair();

    assert_eq!(
        db.lookup_address("3.0.0.1", "20121201").unwrap(),
        None
    );
    assert_eq!(
        db.lookup_address("6.0.0.1", "20121201").unwrap().as_deref(),
        Some("us")
    );
    assert_eq!(
        db.lookup_address("6.0.0.1", "20121001").unwrap().as_deref(),
        Some("de")
    );
}

#[test]
fn test_legacy_header_without_date_prefix() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("combined.txt");
    fs::write(
        &path,
        "!delegated-arin-20120901\n3.0.0.0,3.255.255.255,us,20120901,20120901\n",
    )
    .unwrap();

    let db = load(&path).unwrap();
    assert!(db.catalog().is_known_source("delegated-arin-20120901"));
    assert_eq!(
        text_of(&db),
        "!20120901!delegated-arin-20120901\n3.0.0.0,3.255.255.255,us,20120901,20120901\n"
    );
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_corrupt_file_fails_load() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("combined.txt");
    fs::write(
        &path,
        "3.0.0.0,3.255.255.255,us,20120901,20120901\nnot a record\n",
    )
    .unwrap();

    let err = load(&path).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.details(), Some("line: 2"));
}

#[test]
fn test_missing_file_fails_load() {
    let temp_dir = create_temp_dir();
    let result = load(&temp_dir.path().join("missing.txt"));
    assert!(result.is_err());
}
