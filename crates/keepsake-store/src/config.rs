//! Single-slot configuration store.
//!
//! The degenerate case of a record store: capacity one, and a write replaces
//! the slot instead of appending. The slot is one plain file (by default
//! pretty-printed JSON, so it stays hand-editable). Replacement goes through
//! an atomic rename, so the old file disappears only once the new one is
//! durable and there is never a moment without a valid config on disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use keepsake_core::{Codec, JsonCodec, UserNamespace};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::Backend;
use crate::error::{Result, StoreError};
use crate::fs::FsBackend;
use crate::layout::{self, CONFIG_FILE};
use crate::lifecycle::Lifecycle;

/// Persistent holder of one configuration value.
///
/// Cloning is cheap and clones share the same slot.
pub struct ConfigStore<T, C = JsonCodec> {
    shared: Arc<Shared<T, C>>,
}

struct Shared<T, C> {
    path: PathBuf,
    codec: C,
    backend: Arc<dyn Backend>,
    lifecycle: Lifecycle<Option<T>>,
}

impl<T> ConfigStore<T, JsonCodec>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Open the slot stored at exactly `path` on the local filesystem.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(path, JsonCodec::pretty(), Arc::new(FsBackend::new()))
    }

    /// Open the slot for `user` at `<root>/<user>/config.json`.
    pub fn open_in(root: impl AsRef<Path>, user: &str) -> Result<Self> {
        let user = UserNamespace::new(user)?;
        Self::open(root.as_ref().join(user.as_str()).join(CONFIG_FILE))
    }
}

impl<T, C> ConfigStore<T, C>
where
    T: Clone + Send + Sync,
    C: Codec<T>,
{
    /// Open a slot with an explicit codec and backend.
    ///
    /// The parent directory is created if needed. A slot that fails to decode
    /// is logged and treated as never set.
    pub fn open_with(path: impl Into<PathBuf>, codec: C, backend: Arc<dyn Backend>) -> Result<Self> {
        let path = path.into();
        if path.file_name().is_none() {
            return Err(StoreError::InvalidArgument(format!(
                "config path {} does not name a file",
                path.display()
            )));
        }

        let init = |e: StoreError| StoreError::initialization(&path, e);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            backend.ensure_dir(parent).map_err(init)?;
        }
        backend.remove(&layout::temp_path(&path)).map_err(init)?;

        let value = if backend.exists(&path).map_err(init)? {
            let bytes = backend.read(&path).map_err(init)?;
            match codec.decode(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt config");
                    None
                }
            }
        } else {
            None
        };

        tracing::debug!(path = %path.display(), found = value.is_some(), "opened config store");

        Ok(Self {
            shared: Arc::new(Shared {
                path,
                codec,
                backend,
                lifecycle: Lifecycle::new(value),
            }),
        })
    }

    /// Replace the stored value.
    ///
    /// The new value is visible to `get` only after it is durably written.
    /// On failure the previous value stays in place, in memory and on disk.
    pub fn set(&self, value: T) -> Result<()> {
        let shared = &*self.shared;
        if shared.lifecycle.is_closed() {
            return Err(StoreError::StoreClosed);
        }

        let bytes = shared.codec.encode(&value)?;

        shared.lifecycle.write(move |slot| {
            shared.backend.write_atomic(&shared.path, &bytes)?;
            *slot = Some(value);
            tracing::trace!(path = %shared.path.display(), "replaced config");
            Ok(())
        })
    }

    /// The current value, or `None` if it was never set.
    pub fn get(&self) -> Result<Option<T>> {
        self.shared.lifecycle.read(|slot| Ok(slot.clone()))
    }

    /// The current value, or `T::default()` if it was never set.
    pub fn get_or_default(&self) -> Result<T>
    where
        T: Default,
    {
        Ok(self.get()?.unwrap_or_default())
    }

    /// Close the store. Same contract as [`RecordStore::close`](crate::RecordStore::close).
    pub fn close(&self) -> Result<()> {
        if self.shared.lifecycle.close().is_some() {
            tracing::info!(path = %self.shared.path.display(), "closed config store");
        }
        Ok(())
    }
}

impl<T, C> ConfigStore<T, C> {
    /// Location of the slot file.
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Whether [`close`](ConfigStore::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.shared.lifecycle.is_closed()
    }
}

impl<T, C> Clone for ConfigStore<T, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, C> fmt::Debug for ConfigStore<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.shared.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Settings {
        output_dir: String,
        block_size: u32,
    }

    fn settings(output_dir: &str, block_size: u32) -> Settings {
        Settings {
            output_dir: output_dir.to_string(),
            block_size,
        }
    }

    #[test]
    fn test_unset_slot() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::<Settings>::open(dir.path().join("config.json")).unwrap();

        assert_eq!(store.get().unwrap(), None);
        assert_eq!(store.get_or_default().unwrap(), Settings::default());
    }

    #[test]
    fn test_set_replaces_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::<Settings>::open(&path).unwrap();

        store.set(settings("/recovered", 512)).unwrap();
        store.set(settings("/elsewhere", 4096)).unwrap();

        assert_eq!(store.get().unwrap(), Some(settings("/elsewhere", 4096)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        let on_disk: Settings = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk, settings("/elsewhere", 4096));
    }

    #[test]
    fn test_reopen_reads_slot() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::<Settings>::open_in(dir.path(), "alice").unwrap();
        store.set(settings("/a", 1)).unwrap();
        store.close().unwrap();

        let store = ConfigStore::<Settings>::open_in(dir.path(), "alice").unwrap();
        assert_eq!(store.get().unwrap(), Some(settings("/a", 1)));
        assert_eq!(store.path(), dir.path().join("alice").join("config.json"));

        let bob = ConfigStore::<Settings>::open_in(dir.path(), "bob").unwrap();
        assert_eq!(bob.get().unwrap(), None);
    }

    #[test]
    fn test_corrupt_slot_reads_as_unset() {
        let backend = MemoryBackend::new();
        backend.insert_raw("/data/config.json", &b"{ not json"[..]);

        let store = ConfigStore::<Settings>::open_with(
            "/data/config.json",
            JsonCodec::new(),
            Arc::new(backend.clone()),
        )
        .unwrap();
        assert_eq!(store.get().unwrap(), None);

        store.set(settings("/fixed", 8)).unwrap();
        let bytes = backend.contents(Path::new("/data/config.json")).unwrap();
        let fixed: Settings = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(fixed, settings("/fixed", 8));
    }

    #[test]
    fn test_stale_temp_removed() {
        let backend = MemoryBackend::new();
        backend.insert_raw("/data/config.json.tmp", &b"half"[..]);

        let _store = ConfigStore::<Settings>::open_with(
            "/data/config.json",
            JsonCodec::new(),
            Arc::new(backend.clone()),
        )
        .unwrap();
        assert_eq!(backend.file_count(Path::new("/data")), 0);
    }

    #[test]
    fn test_failed_set_keeps_previous() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("cfg");
        let store = ConfigStore::<Settings>::open(nested.join("config.json")).unwrap();
        store.set(settings("/old", 1)).unwrap();

        std::fs::remove_dir_all(&nested).unwrap();

        assert!(store.set(settings("/new", 2)).is_err());
        assert_eq!(store.get().unwrap(), Some(settings("/old", 1)));
    }

    #[test]
    fn test_operations_after_close() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::<Settings>::open(dir.path().join("config.json")).unwrap();

        store.close().unwrap();
        store.close().unwrap();

        assert!(store.get().unwrap_err().is_closed());
        assert!(store.set(settings("/x", 1)).unwrap_err().is_closed());
    }
}
