//! The Vault: every store an application needs for one user, opened together
//! and closed together.
//!
//! ```text
//! <data_dir>/<history_kind>/<user>/<seq>.rec
//! <data_dir>/<settings_kind>/<user>/<settings_file>
//! ```
//!
//! The vault owns no global state. The host resolves `data_dir` and `user`,
//! opens a vault at startup, hands store clones to whatever needs them, and
//! calls [`Vault::close`] once during shutdown.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use keepsake_core::{CborCodec, JsonCodec, UserNamespace};
use keepsake_store::{Backend, ConfigStore, FsBackend, RecordStore, StoreHandle};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::VaultConfig;
use crate::error::Result;

/// History and settings stores for one user.
///
/// `H` is the history record type, `S` the settings type.
#[derive(Debug)]
pub struct Vault<H, S> {
    data_dir: PathBuf,
    user: UserNamespace,
    history: RecordStore<H>,
    settings: ConfigStore<S>,
}

impl<H, S> Vault<H, S>
where
    H: Serialize + DeserializeOwned + Clone + Send + Sync,
    S: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Open the vault for `user` under `data_dir` on the local filesystem.
    pub fn open(data_dir: impl Into<PathBuf>, user: &str, config: &VaultConfig) -> Result<Self> {
        Self::open_with_backend(data_dir, user, config, Arc::new(FsBackend::new()))
    }

    /// Open the vault over an explicit backend.
    ///
    /// If the settings slot fails to open, the already opened history store
    /// is closed again before the error is returned.
    pub fn open_with_backend(
        data_dir: impl Into<PathBuf>,
        user: &str,
        config: &VaultConfig,
        backend: Arc<dyn Backend>,
    ) -> Result<Self> {
        let data_dir = data_dir.into();
        let (history_kind, settings_kind) = config.validate()?;
        let user = UserNamespace::new(user)?;

        let history = RecordStore::open_with(
            StoreHandle::in_data_dir(&data_dir, &history_kind, user.clone()),
            config.history_capacity,
            CborCodec,
            Arc::clone(&backend),
        )?;

        let settings_path = data_dir
            .join(settings_kind.as_str())
            .join(user.as_str())
            .join(&config.settings_file);
        let settings = match ConfigStore::open_with(settings_path, JsonCodec::pretty(), backend) {
            Ok(settings) => settings,
            Err(e) => {
                history.close()?;
                return Err(e.into());
            }
        };

        tracing::info!(
            data_dir = %data_dir.display(),
            user = %user,
            history_capacity = config.history_capacity,
            "opened vault"
        );

        Ok(Self {
            data_dir,
            user,
            history,
            settings,
        })
    }

    /// Close every store.
    ///
    /// All stores are closed even if one fails; the first error is returned.
    /// Calling this again is a no-op.
    pub fn close(&self) -> Result<()> {
        let settings = self.settings.close();
        let history = self.history.close();
        settings?;
        history?;
        Ok(())
    }
}

impl<H, S> Vault<H, S> {
    /// A handle to the history store.
    pub fn history(&self) -> RecordStore<H> {
        self.history.clone()
    }

    /// A handle to the settings slot.
    pub fn settings(&self) -> ConfigStore<S> {
        self.settings.clone()
    }

    /// The application data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The owning user.
    pub fn user(&self) -> &UserNamespace {
        &self.user
    }

    /// Whether every store has been closed.
    pub fn is_closed(&self) -> bool {
        self.history.is_closed() && self.settings.is_closed()
    }
}
