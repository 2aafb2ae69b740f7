//! Error types for the store module.

use std::path::{Path, PathBuf};

use keepsake_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Bad capacity, user namespace or path.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The store directory could not be created or is not writable.
    #[error("cannot initialize store at {path}: {source}")]
    Initialization {
        path: PathBuf,
        #[source]
        source: Box<StoreError>,
    },

    /// The filesystem refused access.
    #[error("permission denied at {path}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure during normal operation.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted file could not be decoded.
    #[error("corrupt record at {path}: {reason}")]
    CorruptRecord { path: PathBuf, reason: String },

    /// Bytes failed to decode where no file is involved.
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// A value could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store has been closed.
    #[error("store is closed")]
    StoreClosed,
}

impl StoreError {
    /// Wrap an I/O error with path context, splitting out permission failures.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path, source }
        } else {
            Self::Io { path, source }
        }
    }

    /// Wrap a failure that happened while opening a store.
    pub fn initialization(path: impl Into<PathBuf>, source: StoreError) -> Self {
        Self::Initialization {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Attach a file path to a codec or frame error.
    pub fn from_core(path: &Path, err: CoreError) -> Self {
        match err {
            CoreError::Corrupt(reason) => Self::CorruptRecord {
                path: path.to_path_buf(),
                reason,
            },
            other => other.into(),
        }
    }

    /// Whether this is the post-close failure.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::StoreClosed)
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            CoreError::Encoding(msg) => Self::Serialization(msg),
            CoreError::Corrupt(reason) => Self::Corrupt(reason),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
