//! Import error types
//!
//! Error codes:
//! - GEO_IMPORT_READ_FAILED (ERROR severity)
//! - GEO_IMPORT_MALFORMED_LINE (WARN severity)
//! - GEO_IMPORT_INVALID_SOURCE_NAME (ERROR severity)
//! - GEO_IMPORT_INVALID_SNAPSHOT_DATE (ERROR severity)

use std::fmt;
use std::io;

/// Severity levels for import errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The line is skipped, the file continues
    Warn,
    /// The file is not imported
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warn => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Import-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportErrorCode {
    /// Snapshot file could not be read
    GeoImportReadFailed,
    /// Registry line does not parse
    GeoImportMalformedLine,
    /// File name does not end in a snapshot date
    GeoImportInvalidSourceName,
    /// Modification time does not give a usable snapshot day
    GeoImportInvalidSnapshotDate,
}

impl ImportErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ImportErrorCode::GeoImportReadFailed => "GEO_IMPORT_READ_FAILED",
            ImportErrorCode::GeoImportMalformedLine => "GEO_IMPORT_MALFORMED_LINE",
            ImportErrorCode::GeoImportInvalidSourceName => "GEO_IMPORT_INVALID_SOURCE_NAME",
            ImportErrorCode::GeoImportInvalidSnapshotDate => "GEO_IMPORT_INVALID_SNAPSHOT_DATE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ImportErrorCode::GeoImportReadFailed => Severity::Error,
            ImportErrorCode::GeoImportMalformedLine => Severity::Warn,
            ImportErrorCode::GeoImportInvalidSourceName => Severity::Error,
            ImportErrorCode::GeoImportInvalidSnapshotDate => Severity::Error,
        }
    }
}

impl fmt::Display for ImportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Import error with context
#[derive(Debug)]
pub struct ImportError {
    code: ImportErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl ImportError {
    /// Create a read failure for `path`
    pub fn read_failed(path: impl fmt::Display, source: io::Error) -> Self {
        Self {
            code: ImportErrorCode::GeoImportReadFailed,
            message: format!("Failed to read {}", path),
            details: None,
            source: Some(source),
        }
    }

    /// Create a malformed line error
    pub fn malformed_line(reason: impl Into<String>) -> Self {
        Self {
            code: ImportErrorCode::GeoImportMalformedLine,
            message: reason.into(),
            details: None,
            source: None,
        }
    }

    /// Create an error for a file name that carries no snapshot date
    pub fn invalid_source_name(name: &str) -> Self {
        Self {
            code: ImportErrorCode::GeoImportInvalidSourceName,
            message: format!("File name does not end in yyyymmdd: {}", name),
            details: None,
            source: None,
        }
    }

    /// Create an error for a file whose modification day is unusable
    pub fn invalid_snapshot_date(path: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self {
            code: ImportErrorCode::GeoImportInvalidSnapshotDate,
            message: format!("No snapshot day for {}", path),
            details: Some(reason.to_string()),
            source: None,
        }
    }

    /// Attach a 1-based line number
    pub fn at_line(mut self, line: usize) -> Self {
        self.details = Some(format!("line: {}", line));
        self
    }

    /// Returns the error code
    pub fn code(&self) -> ImportErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;
