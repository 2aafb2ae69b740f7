//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::Path;

use keepsake::{Vault, VaultConfig};
use tempfile::TempDir;
use tracing_subscriber::filter::LevelFilter;

use crate::entities::{AppSettings, ScanRecord};

/// The vault type used across tests.
pub type TestVaultInner = Vault<ScanRecord, AppSettings>;

/// A vault rooted in a temp directory that is deleted on drop.
pub struct TestVault {
    pub dir: TempDir,
    pub config: VaultConfig,
    pub vault: TestVaultInner,
}

impl TestVault {
    /// Open a vault for `user` with the given history capacity.
    pub fn new(user: &str, capacity: usize) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let config = VaultConfig::default().with_history_capacity(capacity);
        let vault = Vault::open(dir.path(), user, &config).expect("open vault");
        Self { dir, config, vault }
    }

    /// The data directory.
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Close the current vault and open `user`'s vault on the same data dir,
    /// simulating an application restart.
    pub fn reopen(&self, user: &str) -> TestVaultInner {
        self.vault.close().expect("close vault");
        self.open_user(user)
    }

    /// Open another vault on the same data dir without closing this one.
    pub fn open_user(&self, user: &str) -> TestVaultInner {
        Vault::open(self.dir.path(), user, &self.config).expect("open vault")
    }

    /// Add `count` sample records, numbered from `start`.
    pub fn add_samples(&self, start: u32, count: u32) {
        let history = self.vault.history();
        for n in start..start + count {
            history.add(ScanRecord::sample(n)).expect("add sample");
        }
    }
}

/// Install a test-friendly tracing subscriber once per process.
///
/// Writes through the test harness so output is captured per test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(LevelFilter::DEBUG)
        .try_init();
}
