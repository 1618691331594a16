//! Error types for studycal.

use thiserror::Error;

/// Errors that can occur in studycal operations.
#[derive(Error, Debug)]
pub enum StudycalError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Could not parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Event index {index} out of range for {date} (has {len})")]
    OutOfRange {
        date: String,
        index: usize,
        len: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StudycalError {
    pub fn is_parse(&self) -> bool {
        matches!(self, StudycalError::Parse { .. })
    }
}

/// Result type alias for studycal operations.
pub type StudycalResult<T> = Result<T, StudycalError>;
