//! Error types for keepsake core.

use thiserror::Error;

/// Errors produced by codecs, frames and name validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A caller-supplied argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A value could not be serialized.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Persisted bytes could not be turned back into a value.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl CoreError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a corruption error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt(message.into())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
