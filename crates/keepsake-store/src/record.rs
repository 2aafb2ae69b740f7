//! Bounded record store: the most recent N records of one entity kind for
//! one user.
//!
//! Every record is one sealed file named after its sequence number. The
//! in-memory index mirrors the directory, is rebuilt from a listing at open,
//! and is only ever mutated under the exclusive lock after the corresponding
//! file operation succeeded.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use keepsake_core::{frame, CborCodec, Codec, CoreError, Seq, UserNamespace};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{Backend, RecordFile};
use crate::error::{Result, StoreError};
use crate::fs::FsBackend;
use crate::layout::{StoreHandle, PROBE_NAME};
use crate::lifecycle::Lifecycle;

/// A capacity-bounded, persistent collection of `T` for one user.
///
/// Cloning is cheap and clones share the same index and lock, so every
/// holder observes one consistent view of the store.
///
/// # Eviction
///
/// Strict FIFO by sequence number: once an add pushes the count past
/// `capacity`, the lowest sequence numbers are removed until the count
/// equals `capacity`.
pub struct RecordStore<T, C = CborCodec> {
    shared: Arc<Shared<T, C>>,
}

struct Shared<T, C> {
    handle: StoreHandle,
    capacity: usize,
    codec: C,
    backend: Arc<dyn Backend>,
    lifecycle: Lifecycle<Index<T>>,
}

struct Index<T> {
    /// Retained records by sequence number.
    entries: BTreeMap<Seq, T>,

    /// Sequence number for the next add. `None` once the sequence space is
    /// used up.
    next_seq: Option<Seq>,

    /// Files skipped at open because they failed to decode.
    corrupt: BTreeSet<Seq>,
}

impl<T> Index<T> {
    /// Drop the oldest entries until at most `capacity` remain.
    ///
    /// Once the store is full, corrupt files older than the oldest retained
    /// record are removed as well. A file that cannot be removed is logged and
    /// left behind; the next open finds it and evicts it again.
    fn evict_overflow(&mut self, capacity: usize, handle: &StoreHandle, backend: &dyn Backend) -> usize {
        let mut evicted = 0;
        while self.entries.len() > capacity {
            let Some((seq, _)) = self.entries.pop_first() else {
                break;
            };
            remove_record(handle, backend, seq);
            evicted += 1;
        }

        if self.entries.len() == capacity {
            if let Some(&oldest) = self.entries.keys().next() {
                let rest = self.corrupt.split_off(&oldest);
                for seq in std::mem::replace(&mut self.corrupt, rest) {
                    remove_record(handle, backend, seq);
                    evicted += 1;
                }
            }
        }
        evicted
    }
}

impl<T> RecordStore<T, CborCodec>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Open the store for `user` under `root` on the local filesystem.
    ///
    /// Records live in `<root>/<user>/`. The directory is created if needed
    /// and existing records are loaded.
    pub fn open(root: impl Into<PathBuf>, user: &str, capacity: usize) -> Result<Self> {
        let user = UserNamespace::new(user)?;
        Self::open_with(
            StoreHandle::new(root, user),
            capacity,
            CborCodec,
            Arc::new(FsBackend::new()),
        )
    }
}

impl<T, C> RecordStore<T, C>
where
    T: Clone + Send + Sync,
    C: Codec<T>,
{
    /// Open a store with an explicit codec and backend.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `capacity` is zero.
    /// - `Initialization` if the directory cannot be created, is not
    ///   writable, or cannot be listed or read.
    ///
    /// Records that fail to decode are skipped and logged.
    pub fn open_with(
        handle: StoreHandle,
        capacity: usize,
        codec: C,
        backend: Arc<dyn Backend>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(StoreError::InvalidArgument(
                "capacity must be at least 1".into(),
            ));
        }

        let dir = handle.dir();
        let init = |e: StoreError| StoreError::initialization(&dir, e);

        backend.ensure_dir(&dir).map_err(init)?;
        probe_writable(backend.as_ref(), &dir).map_err(init)?;
        backend.sweep_partial(&dir).map_err(init)?;

        let files = backend.list(&dir).map_err(init)?;
        let mut entries = BTreeMap::new();
        let mut corrupt = BTreeSet::new();
        let mut next_seq = Some(Seq::FIRST);

        for file in files {
            next_seq = file.seq.next();
            match load_record(&codec, backend.as_ref(), &file) {
                Ok(value) => {
                    entries.insert(file.seq, value);
                }
                Err(StoreError::CorruptRecord { path, reason }) => {
                    tracing::warn!(path = %path.display(), %reason, "skipping corrupt record");
                    corrupt.insert(file.seq);
                }
                Err(e) => return Err(init(e)),
            }
        }

        let skipped = corrupt.len();
        let mut index = Index {
            entries,
            next_seq,
            corrupt,
        };
        let evicted = index.evict_overflow(capacity, &handle, backend.as_ref());

        tracing::debug!(
            dir = %dir.display(),
            user = %handle.user(),
            loaded = index.entries.len(),
            skipped,
            evicted,
            next_seq = ?index.next_seq,
            "opened record store"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                handle,
                capacity,
                codec,
                backend,
                lifecycle: Lifecycle::new(index),
            }),
        })
    }

    /// Persist a new record and return its sequence number.
    ///
    /// The record is visible to `list` only once its file is durably written.
    /// If the count then exceeds capacity, the oldest records are evicted;
    /// eviction failures are logged and do not undo the add.
    ///
    /// # Errors
    ///
    /// - `StoreClosed` after [`close`](Self::close).
    /// - `Serialization` if the codec rejects the value.
    /// - `Io` / `PermissionDenied` if the file cannot be written. The store
    ///   is left exactly as it was.
    /// - `InvalidArgument` if the sequence space is exhausted.
    pub fn add(&self, value: T) -> Result<Seq> {
        let shared = &*self.shared;
        if shared.lifecycle.is_closed() {
            return Err(StoreError::StoreClosed);
        }

        let framed = frame::seal(&shared.codec.encode(&value)?);

        shared.lifecycle.write(move |index| {
            let seq = index.next_seq.ok_or_else(|| {
                StoreError::InvalidArgument(format!(
                    "sequence numbers exhausted in {}",
                    shared.handle.dir().display()
                ))
            })?;
            let path = shared.handle.record_path(seq);
            shared.backend.write_atomic(&path, &framed)?;

            index.entries.insert(seq, value);
            index.next_seq = seq.next();
            tracing::trace!(path = %path.display(), %seq, "added record");

            let evicted =
                index.evict_overflow(shared.capacity, &shared.handle, shared.backend.as_ref());
            if evicted > 0 {
                tracing::debug!(dir = %shared.handle.root().display(), evicted, "evicted oldest records");
            }
            Ok(seq)
        })
    }

    /// Snapshot of retained records, newest first.
    pub fn list(&self) -> Result<Vec<T>> {
        self.shared
            .lifecycle
            .read(|index| Ok(index.entries.values().rev().cloned().collect()))
    }

    /// Number of retained records.
    pub fn len(&self) -> Result<usize> {
        self.shared.lifecycle.read(|index| Ok(index.entries.len()))
    }

    /// Whether no records are retained.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Close the store.
    ///
    /// Waits for any in-flight add, then releases the index. Every later
    /// operation fails with `StoreClosed`. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        if let Some(index) = self.shared.lifecycle.close() {
            tracing::info!(
                dir = %self.shared.handle.dir().display(),
                retained = index.entries.len(),
                "closed record store"
            );
        }
        Ok(())
    }
}

impl<T, C> RecordStore<T, C> {
    /// Maximum number of retained records.
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Identity of this store.
    pub fn handle(&self) -> &StoreHandle {
        &self.shared.handle
    }

    /// Whether [`close`](RecordStore::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.shared.lifecycle.is_closed()
    }
}

impl<T, C> Clone for RecordStore<T, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, C> fmt::Debug for RecordStore<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("handle", &self.shared.handle)
            .field("capacity", &self.shared.capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Read, unseal and decode one record file.
fn load_record<T, C: Codec<T>>(codec: &C, backend: &dyn Backend, file: &RecordFile) -> Result<T> {
    let bytes = backend.read(&file.path)?;
    let decoded = frame::open(&bytes).and_then(|payload| codec.decode(payload));
    decoded.map_err(|e: CoreError| StoreError::from_core(&file.path, e))
}

/// Delete one record file, logging instead of failing.
fn remove_record(handle: &StoreHandle, backend: &dyn Backend, seq: Seq) {
    let path = handle.record_path(seq);
    if let Err(e) = backend.remove(&path) {
        tracing::warn!(path = %path.display(), %seq, error = %e, "failed to remove evicted record");
    }
}

/// Prove the directory accepts writes before any record depends on it.
fn probe_writable(backend: &dyn Backend, dir: &Path) -> Result<()> {
    let probe = dir.join(PROBE_NAME);
    backend.write_atomic(&probe, &[])?;
    backend.remove(&probe)
}
