//! End-to-end behavior of a vault on the real filesystem: layout, restarts,
//! user isolation and shutdown.

use std::fs;

use keepsake::{KeepsakeError, StoreError, Vault, VaultConfig};
use keepsake_testkit::{app_settings, init_tracing, scan_record, AppSettings, ScanRecord, TestVault};
use proptest::prelude::*;
use tempfile::TempDir;

fn ids(records: &[ScanRecord]) -> Vec<u32> {
    records.iter().map(|r| r.files_recovered).collect()
}

#[test]
fn test_layout_on_disk() {
    init_tracing();
    let fixture = TestVault::new("alice", 10);
    fixture.add_samples(1, 2);
    fixture
        .vault
        .settings()
        .set(AppSettings::default())
        .unwrap();

    let history_dir = fixture.data_dir().join("scan_history").join("alice");
    let mut names: Vec<String> = fs::read_dir(&history_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["00000000000000000001.rec", "00000000000000000002.rec"]
    );

    let config_path = fixture
        .data_dir()
        .join("config")
        .join("alice")
        .join("config.json");
    let on_disk: AppSettings = serde_json::from_slice(&fs::read(config_path).unwrap()).unwrap();
    assert_eq!(on_disk, AppSettings::default());
}

#[test]
fn test_capacity_scenario() {
    init_tracing();
    let fixture = TestVault::new("alice", 3);
    let history = fixture.vault.history();

    for n in [1, 2, 3, 4] {
        history.add(ScanRecord::sample(n)).unwrap();
    }

    assert_eq!(ids(&history.list().unwrap()), vec![4, 3, 2]);
    let dir = fixture.data_dir().join("scan_history").join("alice");
    assert_eq!(fs::read_dir(dir).unwrap().count(), 3);
}

#[test]
fn test_records_survive_restart() {
    init_tracing();
    let fixture = TestVault::new("alice", 5);
    fixture.add_samples(10, 3);
    fixture
        .vault
        .settings()
        .set(AppSettings {
            dark_mode: true,
            ..AppSettings::default()
        })
        .unwrap();

    let reopened = fixture.reopen("alice");
    assert_eq!(ids(&reopened.history().list().unwrap()), vec![12, 11, 10]);
    assert!(reopened.settings().get().unwrap().unwrap().dark_mode);

    reopened.history().add(ScanRecord::sample(13)).unwrap();
    assert_eq!(reopened.history().len().unwrap(), 4);
}

#[test]
fn test_eviction_across_restart() {
    init_tracing();
    let fixture = TestVault::new("alice", 2);
    fixture.add_samples(0, 2);

    let reopened = fixture.reopen("alice");
    reopened.history().add(ScanRecord::sample(2)).unwrap();
    assert_eq!(ids(&reopened.history().list().unwrap()), vec![2, 1]);
}

#[test]
fn test_users_never_see_each_other() {
    init_tracing();
    let fixture = TestVault::new("alice", 10);
    fixture.add_samples(0, 4);
    fixture
        .vault
        .settings()
        .set(AppSettings {
            output_dir: "/alice/out".into(),
            ..AppSettings::default()
        })
        .unwrap();

    let bob = fixture.open_user("bob");
    assert!(bob.history().list().unwrap().is_empty());
    assert_eq!(bob.settings().get().unwrap(), None);

    bob.history().add(ScanRecord::sample(99)).unwrap();
    assert_eq!(fixture.vault.history().len().unwrap(), 4);
    assert!(!ids(&fixture.vault.history().list().unwrap()).contains(&99));
}

#[test]
fn test_config_slot_scenario() {
    init_tracing();
    let fixture = TestVault::new("alice", 10);
    let settings = fixture.vault.settings();
    assert_eq!(settings.get().unwrap(), None);

    let cfg1 = AppSettings {
        block_size: 1024,
        ..AppSettings::default()
    };
    let cfg2 = AppSettings {
        block_size: 4096,
        ..AppSettings::default()
    };
    settings.set(cfg1).unwrap();
    settings.set(cfg2.clone()).unwrap();

    assert_eq!(settings.get().unwrap(), Some(cfg2));
    let dir = fixture.data_dir().join("config").join("alice");
    assert_eq!(fs::read_dir(dir).unwrap().count(), 1);
}

#[test]
fn test_close_is_final_and_idempotent() {
    init_tracing();
    let fixture = TestVault::new("alice", 10);
    let history = fixture.vault.history();
    let settings = fixture.vault.settings();
    history.add(ScanRecord::sample(1)).unwrap();

    fixture.vault.close().unwrap();
    fixture.vault.close().unwrap();
    assert!(fixture.vault.is_closed());

    assert!(matches!(history.add(ScanRecord::sample(2)), Err(StoreError::StoreClosed)));
    assert!(matches!(history.list(), Err(StoreError::StoreClosed)));
    assert!(matches!(settings.get(), Err(StoreError::StoreClosed)));
    assert!(matches!(
        settings.set(AppSettings::default()),
        Err(StoreError::StoreClosed)
    ));
    history.close().unwrap();
    settings.close().unwrap();
}

#[test]
fn test_invalid_inputs() {
    let dir = TempDir::new().unwrap();

    let err = Vault::<ScanRecord, AppSettings>::open(dir.path(), "a/b", &VaultConfig::default())
        .unwrap_err();
    assert!(matches!(err, KeepsakeError::Store(StoreError::InvalidArgument(_))));

    let config = VaultConfig::default().with_history_capacity(0);
    let err = Vault::<ScanRecord, AppSettings>::open(dir.path(), "alice", &config).unwrap_err();
    assert!(matches!(err, KeepsakeError::InvalidConfig(_)));
}

#[test]
fn test_unusable_data_dir() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    fs::write(&data_dir, b"a file, not a directory").unwrap();

    let err = Vault::<ScanRecord, AppSettings>::open(&data_dir, "alice", &VaultConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        KeepsakeError::Store(StoreError::Initialization { .. })
    ));
}

#[test]
fn test_corrupt_history_file_is_skipped() {
    init_tracing();
    let fixture = TestVault::new("alice", 10);
    fixture.add_samples(0, 3);
    fixture.vault.close().unwrap();

    let victim = fixture
        .data_dir()
        .join("scan_history")
        .join("alice")
        .join("00000000000000000002.rec");
    let mut bytes = fs::read(&victim).unwrap();
    bytes.truncate(bytes.len() / 2);
    fs::write(&victim, bytes).unwrap();

    let reopened = fixture.open_user("alice");
    assert_eq!(ids(&reopened.history().list().unwrap()), vec![2, 0]);
}

#[test]
fn test_interrupted_write_is_invisible() {
    init_tracing();
    let fixture = TestVault::new("alice", 10);
    fixture.add_samples(0, 1);
    fixture.vault.close().unwrap();

    let dir = fixture.data_dir().join("scan_history").join("alice");
    fs::write(dir.join("00000000000000000002.rec.tmp"), b"half a rec").unwrap();

    let reopened = fixture.open_user("alice");
    assert_eq!(reopened.history().len().unwrap(), 1);
    assert!(!dir.join("00000000000000000002.rec.tmp").exists());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_restart_preserves_tail(
        records in prop::collection::vec(scan_record(), 0..12),
        settings in app_settings(),
        capacity in 1usize..6,
    ) {
        let fixture = TestVault::new("alice", capacity);
        for record in &records {
            fixture.vault.history().add(record.clone()).unwrap();
        }
        fixture.vault.settings().set(settings.clone()).unwrap();

        let reopened = fixture.reopen("alice");
        let expected: Vec<ScanRecord> = records.iter().rev().take(capacity).cloned().collect();
        prop_assert_eq!(reopened.history().list().unwrap(), expected);
        prop_assert_eq!(reopened.settings().get().unwrap(), Some(settings));
    }
}
