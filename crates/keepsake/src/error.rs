//! Error types for keepsake.

use keepsake_core::CoreError;
use keepsake_store::StoreError;
use thiserror::Error;

/// Errors that can occur while opening or driving a vault.
#[derive(Debug, Error)]
pub enum KeepsakeError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The vault configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A blocking store call could not be joined.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl KeepsakeError {
    /// Whether the underlying store had already been closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_closed())
    }
}

impl From<CoreError> for KeepsakeError {
    fn from(e: CoreError) -> Self {
        Self::Store(e.into())
    }
}

/// Result type for keepsake operations.
pub type Result<T> = std::result::Result<T, KeepsakeError>;
