//! Async adapters driven from a tokio runtime.

use std::sync::Arc;

use keepsake::{HistoryStore, SettingsStore};
use keepsake_testkit::{init_tracing, AppSettings, ScanRecord, TestVault};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_history_through_trait_object() {
    init_tracing();
    let fixture = TestVault::new("alice", 3);
    let history: Arc<dyn HistoryStore<ScanRecord>> = Arc::new(fixture.vault.history());

    for n in 0..5 {
        history.add(ScanRecord::sample(n)).await.unwrap();
    }

    let ids: Vec<u32> = history
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.files_recovered)
        .collect();
    assert_eq!(ids, vec![4, 3, 2]);

    history.close().await.unwrap();
    let err = history.list().await.unwrap_err();
    assert!(err.is_closed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_async_adds() {
    init_tracing();
    let fixture = TestVault::new("alice", 1_000);
    let history = fixture.vault.history();

    let mut tasks = Vec::new();
    for n in 0..32u32 {
        let history = history.clone();
        tasks.push(tokio::spawn(async move {
            HistoryStore::add(&history, ScanRecord::sample(n)).await
        }));
    }
    let mut seqs = Vec::new();
    for task in tasks {
        seqs.push(task.await.unwrap().unwrap().get());
    }
    seqs.sort_unstable();

    assert_eq!(seqs, (1..=32).collect::<Vec<_>>());
    assert_eq!(history.len().unwrap(), 32);
}

#[tokio::test]
async fn test_settings_through_trait() {
    init_tracing();
    let fixture = TestVault::new("alice", 3);
    let settings: Arc<dyn SettingsStore<AppSettings>> = Arc::new(fixture.vault.settings());

    assert_eq!(settings.get().await.unwrap(), None);
    let value = AppSettings {
        output_dir: "/mnt/recovered".into(),
        ..AppSettings::default()
    };
    settings.set(value.clone()).await.unwrap();
    assert_eq!(settings.get().await.unwrap(), Some(value));

    settings.close().await.unwrap();
    settings.close().await.unwrap();
    assert!(settings.get().await.unwrap_err().is_closed());
}
