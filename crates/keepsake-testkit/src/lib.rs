//! # Keepsake Testkit
//!
//! Testing utilities for keepsake.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Entities**: Sample record and settings types shaped like a disk scanner's
//! - **Generators**: Proptest strategies for those types and for user names
//! - **Fixtures**: Temp-dir backed vaults that clean up after themselves
//! - **Faults**: A backend wrapper that fails writes or removes on demand
//!
//! ## Fixtures
//!
//! ```rust
//! use keepsake_testkit::fixtures::TestVault;
//! use keepsake_testkit::entities::ScanRecord;
//!
//! let fixture = TestVault::new("alice", 3);
//! fixture.vault.history().add(ScanRecord::sample(1)).unwrap();
//! let reopened = fixture.reopen("alice");
//! assert_eq!(reopened.history().len().unwrap(), 1);
//! ```
//!
//! ## Fault Injection
//!
//! ```rust
//! use keepsake_testkit::faults::FaultyBackend;
//! use keepsake_store::MemoryBackend;
//!
//! let backend = FaultyBackend::new(MemoryBackend::new());
//! backend.fail_writes(true);
//! ```

pub mod entities;
pub mod faults;
pub mod fixtures;
pub mod generators;

pub use entities::{AppSettings, ScanRecord, ScanStatus};
pub use faults::FaultyBackend;
pub use fixtures::{init_tracing, TestVault};
pub use generators::{app_settings, scan_record, user_name};
