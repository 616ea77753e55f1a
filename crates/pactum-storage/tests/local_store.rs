use std::collections::HashMap;

use pactum_storage::error::StorageError;
use pactum_storage::{LocalStore, ObjectStore};

async fn seeded_store() -> (tempfile::TempDir, LocalStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    for key in ["incoming/b.pdf", "incoming/a.pdf", "incoming/2025/c.pdf", "processed/d.pdf"] {
        store
            .store(key.as_bytes().to_vec(), key, &HashMap::new())
            .await
            .unwrap();
    }
    (dir, store)
}

#[tokio::test]
async fn store_then_fetch_returns_same_bytes() {
    let (_dir, store) = seeded_store().await;
    let locator = store
        .store(b"%PDF-1.7".to_vec(), "incoming/new.pdf", &HashMap::new())
        .await
        .unwrap();

    assert!(locator.starts_with("file://"));
    assert!(locator.ends_with("incoming/new.pdf"));
    assert_eq!(store.fetch("incoming/new.pdf").await.unwrap(), b"%PDF-1.7");
}

#[tokio::test]
async fn fetch_missing_is_not_found() {
    let (_dir, store) = seeded_store().await;
    let err = store.fetch("incoming/missing.pdf").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { ref key } if key == "incoming/missing.pdf"));
}

#[tokio::test]
async fn list_is_sorted_and_prefix_scoped() {
    let (_dir, store) = seeded_store().await;
    let keys: Vec<String> = store
        .list("incoming/")
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.key)
        .collect();

    assert_eq!(
        keys,
        vec!["incoming/2025/c.pdf", "incoming/a.pdf", "incoming/b.pdf"]
    );
}

#[tokio::test]
async fn list_of_missing_prefix_is_empty() {
    let (_dir, store) = seeded_store().await;
    assert!(store.list("failed/").await.unwrap().is_empty());
}

#[tokio::test]
async fn relocate_moves_object_between_prefixes() {
    let (_dir, store) = seeded_store().await;
    store
        .relocate("incoming/a.pdf", "processed/a.pdf")
        .await
        .unwrap();

    assert!(store.fetch("incoming/a.pdf").await.unwrap_err().is_not_found());
    assert_eq!(store.fetch("processed/a.pdf").await.unwrap(), b"incoming/a.pdf");
}

#[tokio::test]
async fn relocate_of_missing_source_leaves_destination_absent() {
    let (_dir, store) = seeded_store().await;
    let err = store
        .relocate("incoming/ghost.pdf", "failed/ghost.pdf")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(store.fetch("failed/ghost.pdf").await.unwrap_err().is_not_found());
}
