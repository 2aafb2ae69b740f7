//! Vault configuration.

use keepsake_core::StoreKind;
use keepsake_store::layout;
use serde::{Deserialize, Serialize};

use crate::error::{KeepsakeError, Result};

/// Default number of history records kept per user.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Where and how much a [`Vault`](crate::Vault) stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Directory name for the history store under the data dir.
    pub history_kind: String,
    /// Records retained per user before the oldest are evicted.
    pub history_capacity: usize,
    /// Directory name for the settings slot under the data dir.
    pub settings_kind: String,
    /// File name of the settings slot.
    pub settings_file: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            history_kind: "scan_history".to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            settings_kind: "config".to_string(),
            settings_file: layout::CONFIG_FILE.to_string(),
        }
    }
}

impl VaultConfig {
    /// Override the history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Override the history directory name.
    pub fn with_history_kind(mut self, kind: impl Into<String>) -> Self {
        self.history_kind = kind.into();
        self
    }

    /// Check the configuration and resolve the store kinds.
    pub(crate) fn validate(&self) -> Result<(StoreKind, StoreKind)> {
        if self.history_capacity == 0 {
            return Err(KeepsakeError::InvalidConfig(
                "history_capacity must be at least 1".into(),
            ));
        }

        let history = StoreKind::new(&self.history_kind)
            .map_err(|e| KeepsakeError::InvalidConfig(e.to_string()))?;
        let settings = StoreKind::new(&self.settings_kind)
            .map_err(|e| KeepsakeError::InvalidConfig(e.to_string()))?;
        if history == settings {
            return Err(KeepsakeError::InvalidConfig(format!(
                "history and settings share the directory {:?}",
                self.history_kind
            )));
        }

        StoreKind::new(&self.settings_file)
            .map_err(|e| KeepsakeError::InvalidConfig(e.to_string()))?;
        if layout::is_temp_name(&self.settings_file) {
            return Err(KeepsakeError::InvalidConfig(format!(
                "settings_file {:?} looks like a temp file",
                self.settings_file
            )));
        }

        Ok((history, settings))
    }
}
