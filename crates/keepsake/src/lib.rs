//! # Keepsake
//!
//! The persistence backbone of a desktop application: a per-user history of
//! recent records and a per-user configuration slot, both on the local
//! filesystem, with no database engine involved.
//!
//! ## Overview
//!
//! - **History**: a capacity-bounded record store. The newest `capacity`
//!   records survive restarts; older ones are evicted in insertion order.
//! - **Settings**: a single-slot store that is replaced atomically on write.
//! - **Vault**: opens both for one user under one data directory and closes
//!   both at shutdown.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use keepsake::{Vault, VaultConfig};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct ScanRecord {
//!     device: String,
//!     files_found: u64,
//! }
//!
//! #[derive(Clone, Default, Serialize, Deserialize)]
//! struct Settings {
//!     output_dir: String,
//! }
//!
//! fn example() -> keepsake::Result<()> {
//!     let vault = Vault::<ScanRecord, Settings>::open(
//!         "/home/alice/.local/share/app",
//!         "alice",
//!         &VaultConfig::default(),
//!     )?;
//!
//!     let history = vault.history();
//!     history.add(ScanRecord { device: "/dev/sdb".into(), files_found: 3 })?;
//!     let recent = history.list()?;
//!
//!     vault.settings().set(Settings { output_dir: "/tmp/out".into() })?;
//!
//!     // On shutdown:
//!     vault.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `keepsake::core` - Codecs, frames, identity types
//! - `keepsake::store` - Record and config stores, backends

pub mod async_store;
pub mod config;
pub mod error;
pub mod vault;

// Re-export component crates
pub use keepsake_core as core;
pub use keepsake_store as store;

// Re-export main types for convenience
pub use async_store::{HistoryStore, SettingsStore};
pub use config::{VaultConfig, DEFAULT_HISTORY_CAPACITY};
pub use error::{KeepsakeError, Result};
pub use vault::Vault;

// Re-export commonly used component types
pub use keepsake_core::{CborCodec, Codec, JsonCodec, Seq, UserNamespace};
pub use keepsake_store::{
    Backend, ConfigStore, FsBackend, MemoryBackend, RecordStore, StoreError, StoreHandle,
};
