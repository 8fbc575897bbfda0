//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::codec::CodecError;
use crate::import::ImportError;
use crate::storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, files)
    IoError,
    /// Malformed address or date on the command line
    InvalidInput,
    /// Combined database does not exist yet
    NotFound,
    /// Combined database could not be read or written
    StorageFailed,
    /// An import path could not be read
    ImportFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "GEO_CLI_CONFIG_ERROR",
            Self::IoError => "GEO_CLI_IO_ERROR",
            Self::InvalidInput => "GEO_CLI_INVALID_INPUT",
            Self::NotFound => "GEO_CLI_NOT_FOUND",
            Self::StorageFailed => "GEO_CLI_STORAGE_FAILED",
            Self::ImportFailed => "GEO_CLI_IMPORT_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    fn with_source(
        code: CliErrorCode,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Combined database missing
    pub fn not_found(path: impl fmt::Display) -> Self {
        Self::new(
            CliErrorCode::NotFound,
            format!("Combined database not found: {}. Run 'georange import' first.", path),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::with_source(CliErrorCode::IoError, e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<CodecError> for CliError {
    fn from(e: CodecError) -> Self {
        Self::with_source(CliErrorCode::InvalidInput, e)
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::with_source(CliErrorCode::StorageFailed, e)
    }
}

impl From<ImportError> for CliError {
    fn from(e: ImportError) -> Self {
        Self::with_source(CliErrorCode::ImportFailed, e)
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
