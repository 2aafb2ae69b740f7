//! Async interfaces over the blocking stores.
//!
//! The stores do synchronous filesystem I/O. Callers living on a tokio
//! runtime (UI event handlers, API bindings) talk to them through these
//! traits, which move each call onto the blocking pool via `spawn_blocking`
//! so a slow fsync never stalls the runtime.
//!
//! The traits also give components a seam to depend on
//! (`Arc<dyn HistoryStore<ScanRecord>>`) instead of a concrete store.

use async_trait::async_trait;
use keepsake_core::{Codec, Seq};
use keepsake_store::{ConfigStore, RecordStore};

use crate::error::Result;

/// Async access to a bounded record history.
///
/// Method names match the inherent blocking methods on [`RecordStore`];
/// call through the trait (`HistoryStore::add(&store, v)`) or a trait object
/// to get the async version.
#[async_trait]
pub trait HistoryStore<T>: Send + Sync {
    /// Persist a new record. See [`RecordStore::add`].
    async fn add(&self, value: T) -> Result<Seq>;

    /// Snapshot of retained records, newest first.
    async fn list(&self) -> Result<Vec<T>>;

    /// Close the store, waiting for any in-flight write.
    async fn close(&self) -> Result<()>;
}

/// Async access to a configuration slot.
#[async_trait]
pub trait SettingsStore<T>: Send + Sync {
    /// The current value, or `None` if never set.
    async fn get(&self) -> Result<Option<T>>;

    /// Replace the stored value.
    async fn set(&self, value: T) -> Result<()>;

    /// Close the store.
    async fn close(&self) -> Result<()>;
}

#[async_trait]
impl<T, C> HistoryStore<T> for RecordStore<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Codec<T> + 'static,
{
    async fn add(&self, value: T) -> Result<Seq> {
        let store = self.clone();
        Ok(tokio::task::spawn_blocking(move || store.add(value)).await??)
    }

    async fn list(&self) -> Result<Vec<T>> {
        let store = self.clone();
        Ok(tokio::task::spawn_blocking(move || store.list()).await??)
    }

    async fn close(&self) -> Result<()> {
        let store = self.clone();
        Ok(tokio::task::spawn_blocking(move || store.close()).await??)
    }
}

#[async_trait]
impl<T, C> SettingsStore<T> for ConfigStore<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Codec<T> + 'static,
{
    async fn get(&self) -> Result<Option<T>> {
        let store = self.clone();
        Ok(tokio::task::spawn_blocking(move || store.get()).await??)
    }

    async fn set(&self, value: T) -> Result<()> {
        let store = self.clone();
        Ok(tokio::task::spawn_blocking(move || store.set(value)).await??)
    }

    async fn close(&self) -> Result<()> {
        let store = self.clone();
        Ok(tokio::task::spawn_blocking(move || store.close()).await??)
    }
}
