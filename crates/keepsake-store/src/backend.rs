//! Backend trait: the filesystem primitives a store is built on.
//!
//! This trait lets the stores stay agnostic of where bytes go. Implementations
//! include the real filesystem ([`FsBackend`](crate::FsBackend)) and an
//! in-process map ([`MemoryBackend`](crate::MemoryBackend)) for tests.

use std::path::{Path, PathBuf};

use keepsake_core::Seq;

use crate::error::Result;

/// One record file found by [`Backend::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFile {
    /// Sequence number embedded in the file name.
    pub seq: Seq,
    /// Full path of the file.
    pub path: PathBuf,
}

/// Byte-level persistence per logical record.
///
/// # Guarantees
///
/// - `write_atomic` never leaves a partially written file under the final
///   name: after a crash either the old or the new content is visible.
/// - `list` reflects the directory at call time and is ordered by sequence
///   number ascending. Calling it again re-reads current state.
/// - `remove` and `ensure_dir` are idempotent.
pub trait Backend: Send + Sync {
    /// Create `path` and all missing parents.
    fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Replace the content of `path` atomically.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// Read the whole content of `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Whether `path` currently exists.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Record files in `dir`, ordered by sequence number ascending.
    ///
    /// Files whose names do not encode a sequence number are ignored.
    fn list(&self, dir: &Path) -> Result<Vec<RecordFile>>;

    /// Delete `path`. Removing an absent file is not an error.
    fn remove(&self, path: &Path) -> Result<()>;

    /// Delete leftovers of interrupted atomic writes in `dir`.
    ///
    /// Returns how many files were removed.
    fn sweep_partial(&self, dir: &Path) -> Result<usize>;
}
