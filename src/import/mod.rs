//! Import subsystem for georange
//!
//! Reads regional registry statistics files and GeoLite City CSV snapshots
//! into a [`Database`].
//!
//! [`Database`]: crate::database::Database
//!
//! # Design Principles
//!
//! - A registry file name ends in its snapshot day (`delegated-arin-20120901`)
//! - A GeoLite City snapshot is dated by its blocks file's modification day
//! - A file already in the catalog is never imported twice
//! - One bad line or one bad file never aborts the rest of the import
//! - The repair pass runs once per snapshot day, after all its files

mod errors;
mod geolite;
mod registry;
mod source;

pub use errors::{ImportError, ImportErrorCode, ImportResult, Severity};
pub use geolite::{
    import_geolite_pair, import_geolite_path, parse_block_line, parse_location_line, snapshot_day,
    BlockLine, LocationLine, BLOCKS_FILE_NAME, GEOLITE_SOURCE_NAME, LOCATION_FILE_NAME,
};
pub use registry::{import_registry_file, parse_registry_line, FileReport, RegistryLine};
pub use source::{import_path, ImportOptions, ImportReport, DEFAULT_IGNORED_SUFFIXES};
