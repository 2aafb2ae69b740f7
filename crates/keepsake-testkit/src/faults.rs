//! Fault injection.
//!
//! Wraps any backend and fails selected operations on demand, to drive the
//! store's failure contracts: a failed add leaves no trace, a failed
//! eviction does not undo the add.

use std::io::{Error as IoError, ErrorKind};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use keepsake_store::{Backend, RecordFile, Result, StoreError};

/// A backend whose writes and removes can be switched to fail.
pub struct FaultyBackend<B> {
    inner: B,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
    writes: AtomicUsize,
    removes: AtomicUsize,
}

impl<B: Backend> FaultyBackend<B> {
    /// Wrap `inner` with all faults off.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
            fail_removes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
        }
    }

    /// Make every `write_atomic` fail (or succeed again).
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Make every `remove` fail (or succeed again).
    pub fn fail_removes(&self, on: bool) {
        self.fail_removes.store(on, Ordering::SeqCst);
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Successful removes so far.
    pub fn remove_count(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn injected(path: &Path, what: &str) -> StoreError {
    StoreError::io(path, IoError::new(ErrorKind::Other, format!("injected {} failure", what)))
}

impl<B: Backend> Backend for FaultyBackend<B> {
    fn ensure_dir(&self, path: &Path) -> Result<()> {
        self.inner.ensure_dir(path)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected(path, "write"));
        }
        self.inner.write_atomic(path, bytes)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.inner.read(path)
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        self.inner.exists(path)
    }

    fn list(&self, dir: &Path) -> Result<Vec<RecordFile>> {
        self.inner.list(dir)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(injected(path, "remove"));
        }
        self.inner.remove(path)?;
        self.removes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn sweep_partial(&self, dir: &Path) -> Result<usize> {
        self.inner.sweep_partial(dir)
    }
}
