//! Error types for mindstory-core

use thiserror::Error;

/// Main error type for the mindstory-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Input that does not describe a valid instant
    #[error("invalid timestamp: {input:?}")]
    InvalidTimestamp { input: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid_timestamp(input: impl Into<String>) -> Self {
        Error::InvalidTimestamp {
            input: input.into(),
        }
    }
}

/// Result type alias for mindstory-core
pub type Result<T> = std::result::Result<T, Error>;
