//! Codec error types

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while converting addresses and dates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Address is not a dotted-quad IPv4 address
    #[error("Invalid IPv4 address: '{0}'")]
    InvalidAddress(String),

    /// Date is not in yyyymmdd format
    #[error("Invalid date '{0}', expected yyyymmdd")]
    InvalidDate(String),

    /// Date parses but cannot be stored as a day number
    #[error("Date '{0}' is outside the supported range 19700101..=21490606")]
    DateOutOfRange(String),
}

impl CodecError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::InvalidAddress(_) => "GEO_CODEC_INVALID_ADDRESS",
            CodecError::InvalidDate(_) => "GEO_CODEC_INVALID_DATE",
            CodecError::DateOutOfRange(_) => "GEO_CODEC_DATE_OUT_OF_RANGE",
        }
    }
}
