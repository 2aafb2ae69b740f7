//! In-memory implementation of the Backend trait.
//!
//! This is primarily for testing. It has the same semantics as the
//! filesystem backend but keeps everything in a map with no persistence.
//! Clones share the same contents, so a test can hand one clone to a store
//! and inspect the "disk" through another.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;

use crate::backend::{Backend, RecordFile};
use crate::error::{Result, StoreError};
use crate::layout;

/// In-memory backend.
///
/// Thread-safe via RwLock. All data is lost when the last clone is dropped.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<MemoryBackendInner>>,
}

#[derive(Default)]
struct MemoryBackendInner {
    /// Directories that exist.
    dirs: BTreeSet<PathBuf>,

    /// File contents by full path.
    files: BTreeMap<PathBuf, Bytes>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place raw bytes at `path`, creating parent directories.
    ///
    /// Bypasses the atomic write path, for planting damaged files in tests.
    pub fn insert_raw(&self, path: impl Into<PathBuf>, bytes: impl Into<Bytes>) {
        let path = path.into();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = path.parent() {
            inner.add_dir_chain(parent);
        }
        inner.files.insert(path, bytes.into());
    }

    /// Current content of `path`, if any.
    pub fn contents(&self, path: &Path) -> Option<Bytes> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.files.get(path).cloned()
    }

    /// Number of files directly inside `dir`.
    pub fn file_count(&self, dir: &Path) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.files.keys().filter(|p| p.parent() == Some(dir)).count()
    }
}

impl MemoryBackendInner {
    fn add_dir_chain(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn files_in<'a>(&'a self, dir: &'a Path) -> impl Iterator<Item = (&'a PathBuf, &'a str)> + 'a {
        self.files.keys().filter_map(move |path| {
            if path.parent() != Some(dir) {
                return None;
            }
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|name| (path, name))
        })
    }
}

fn not_found(path: &Path) -> StoreError {
    StoreError::io(path, IoError::new(ErrorKind::NotFound, "no such file"))
}

impl Backend for MemoryBackend {
    fn ensure_dir(&self, path: &Path) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.files.contains_key(path) {
            return Err(StoreError::io(
                path,
                IoError::new(ErrorKind::AlreadyExists, "exists and is not a directory"),
            ));
        }
        inner.add_dir_chain(path);
        Ok(())
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let parent_exists = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => inner.dirs.contains(parent),
            _ => true,
        };
        if !parent_exists {
            return Err(not_found(path));
        }
        inner
            .files
            .insert(path.to_path_buf(), Bytes::copy_from_slice(bytes));
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .files
            .get(path)
            .map(|b| b.to_vec())
            .ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.files.contains_key(path) || inner.dirs.contains(path))
    }

    fn list(&self, dir: &Path) -> Result<Vec<RecordFile>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut files: Vec<RecordFile> = inner
            .files_in(dir)
            .filter_map(|(path, name)| {
                layout::parse_record_file_name(name).map(|seq| RecordFile {
                    seq,
                    path: path.clone(),
                })
            })
            .collect();
        files.sort_by_key(|f| f.seq);
        Ok(files)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.files.remove(path);
        Ok(())
    }

    fn sweep_partial(&self, dir: &Path) -> Result<usize> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let stale: Vec<PathBuf> = inner
            .files_in(dir)
            .filter(|(_, name)| layout::is_temp_name(name))
            .map(|(path, _)| path.clone())
            .collect();
        for path in &stale {
            inner.files.remove(path);
        }
        Ok(stale.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_core::Seq;

    #[test]
    fn test_write_requires_dir() {
        let backend = MemoryBackend::new();
        let path = Path::new("/data/alice/x.rec");

        assert!(backend.write_atomic(path, b"x").is_err());
        backend.ensure_dir(Path::new("/data/alice")).unwrap();
        backend.write_atomic(path, b"x").unwrap();
        assert_eq!(backend.read(path).unwrap(), b"x");
    }

    #[test]
    fn test_ensure_dir_over_file_is_io_error() {
        let backend = MemoryBackend::new();
        backend.insert_raw("/data/taken", &b"x"[..]);

        let err = backend.ensure_dir(Path::new("/data/taken")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_list_is_scoped_and_ordered() {
        let backend = MemoryBackend::new();
        let alice = Path::new("/data/alice");
        let bob = Path::new("/data/bob");
        backend.ensure_dir(alice).unwrap();
        backend.ensure_dir(bob).unwrap();

        for seq in [3u64, 1, 2] {
            backend
                .write_atomic(&alice.join(layout::record_file_name(Seq(seq))), b"a")
                .unwrap();
        }
        backend
            .write_atomic(&bob.join(layout::record_file_name(Seq(7))), b"b")
            .unwrap();

        let seqs: Vec<u64> = backend.list(alice).unwrap().iter().map(|f| f.seq.get()).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(backend.list(bob).unwrap().len(), 1);
    }

    #[test]
    fn test_clones_share_contents() {
        let backend = MemoryBackend::new();
        let observer = backend.clone();
        backend.insert_raw("/data/a/config.json", &b"{}"[..]);

        assert_eq!(observer.file_count(Path::new("/data/a")), 1);
        backend.remove(Path::new("/data/a/config.json")).unwrap();
        backend.remove(Path::new("/data/a/config.json")).unwrap();
        assert_eq!(observer.file_count(Path::new("/data/a")), 0);
    }
}
