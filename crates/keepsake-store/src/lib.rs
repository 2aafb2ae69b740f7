//! # Keepsake Store
//!
//! Bounded, crash-tolerant persistence for application records and a
//! single configuration slot, built directly on the filesystem.
//!
//! ## Overview
//!
//! A [`RecordStore`] keeps the most recent `capacity` records of one entity
//! kind for one user and evicts the oldest once the bound is exceeded. A
//! [`ConfigStore`] holds exactly one value and replaces it on every write.
//! Both sit on the [`Backend`] trait, with [`FsBackend`] for real use and
//! [`MemoryBackend`] for tests.
//!
//! ## Key Types
//!
//! - [`RecordStore`] - Capacity-bounded, newest-first record history
//! - [`ConfigStore`] - Single-slot configuration value
//! - [`StoreHandle`] - `(root, user)` identity of a record store
//! - [`Backend`] - Filesystem primitives (atomic write, ordered listing)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use keepsake_store::{ConfigStore, RecordStore};
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
//! fn example() -> keepsake_store::Result<()> {
//!     let history = RecordStore::<ScanRecord>::open("data/scan_history", "alice", 100)?;
//!     history.add(ScanRecord { device: "/dev/sdb".into(), files_found: 12 })?;
//!     let newest_first = history.list()?;
//!
//!     let config = ConfigStore::<Settings>::open("data/config.json")?;
//!     let settings = config.get_or_default()?;
//!
//!     history.close()?;
//!     config.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No partial visibility**: the index changes only after the file write succeeded
//! - **Strict FIFO eviction**: lowest sequence number goes first
//! - **Corruption is local**: an undecodable record is skipped at load, not fatal
//! - **Explicit lifecycle**: after `close`, every operation returns `StoreClosed`

pub mod backend;
pub mod config;
pub mod error;
pub mod fs;
pub mod layout;
mod lifecycle;
pub mod memory;
pub mod record;

pub use backend::{Backend, RecordFile};
pub use config::ConfigStore;
pub use error::{Result, StoreError};
pub use fs::FsBackend;
pub use layout::StoreHandle;
pub use memory::MemoryBackend;
pub use record::RecordStore;
