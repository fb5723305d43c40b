use super::{DocumentStore, StoreLocation, SCHEMA_VERSION};
use crate::document::CanvasDocument;
use crate::error::Error;

use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

fn make_doc(id: &str, name: &str, timestamp: i64) -> CanvasDocument {
    let mut doc = CanvasDocument::new(id, name).with_theme("dark");
    doc.timestamp = timestamp;
    doc
}

async fn user_version(store: &DocumentStore) -> i64 {
    let pool = store.pool().await.unwrap();
    sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn index_names(store: &DocumentStore) -> Vec<String> {
    let pool = store.pool().await.unwrap();
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master
         WHERE type = 'index' AND tbl_name = 'drawings' AND name LIKE 'idx_%'
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_initialize_creates_schema() {
    let store = DocumentStore::in_memory();
    assert!(!store.is_initialized());

    store.initialize().await.unwrap();
    assert!(store.is_initialized());
    assert_eq!(user_version(&store).await, SCHEMA_VERSION);
    assert_eq!(
        index_names(&store).await,
        vec!["idx_drawings_name", "idx_drawings_timestamp"]
    );
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let store = DocumentStore::in_memory();
    store.initialize().await.unwrap();
    store.upsert(&make_doc("a", "A", 1)).await.unwrap();

    // A second call must not reopen (which would lose the in-memory data)
    store.initialize().await.unwrap();
    assert!(store.get("a").await.unwrap().is_some());
}

#[tokio::test]
async fn test_concurrent_initialize_converges() {
    let store = Arc::new(DocumentStore::in_memory());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.initialize().await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    store.upsert(&make_doc("a", "A", 1)).await.unwrap();
    assert_eq!(store.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_operations_auto_initialize() {
    let store = DocumentStore::in_memory();
    assert!(store.get("missing").await.unwrap().is_none());
    assert!(store.is_initialized());
}

#[tokio::test]
async fn test_upsert_and_get_roundtrip() {
    let store = DocumentStore::in_memory();
    let mut doc = make_doc("my-canvas", "My Canvas", 1_700_000_000_123);
    doc.elements = vec![
        json!({ "id": "e1", "type": "ellipse", "x": 10.25, "y": -3, "points": [[0, 0], [1, 2]] }),
        json!({ "id": "e2", "type": "text", "text": "héllo ✏️", "locked": false }),
    ];
    doc.app_state = json!({ "theme": "light", "zoom": { "value": 1.5 }, "gridSize": null });
    doc.files.insert(
        "file-1".into(),
        json!({ "mimeType": "image/png", "dataURL": "data:image/png;base64,AAAA" }),
    );

    store.upsert(&doc).await.unwrap();

    let loaded = store.get("my-canvas").await.unwrap().unwrap();
    assert_eq!(loaded, doc);
}

#[tokio::test]
async fn test_upsert_replaces_whole_record() {
    let store = DocumentStore::in_memory();
    let mut doc = make_doc("a", "First", 1);
    doc.elements.push(json!({ "id": "old" }));
    doc.files.insert("f".into(), json!({}));
    store.upsert(&doc).await.unwrap();

    let replacement = make_doc("a", "Second", 2);
    store.upsert(&replacement).await.unwrap();

    let loaded = store.get("a").await.unwrap().unwrap();
    assert_eq!(loaded, replacement);
    assert!(loaded.elements.is_empty());
    assert!(loaded.files.is_empty());
    assert_eq!(store.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_missing_is_none() {
    let store = DocumentStore::in_memory();
    assert!(store.get("never-written").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete() {
    let store = DocumentStore::in_memory();
    store.upsert(&make_doc("a", "A", 1)).await.unwrap();
    store.upsert(&make_doc("b", "B", 2)).await.unwrap();

    store.delete("a").await.unwrap();
    assert!(store.get("a").await.unwrap().is_none());
    assert!(store.get("b").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_absent_is_noop() {
    let store = DocumentStore::in_memory();
    store.delete("ghost").await.unwrap();
    assert!(store.get("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_all() {
    let store = DocumentStore::in_memory();
    assert!(store.get_all().await.unwrap().is_empty());

    for (id, ts) in [("a", 3), ("b", 1), ("c", 2)] {
        store.upsert(&make_doc(id, id, ts)).await.unwrap();
    }

    let mut ids: Vec<_> = store
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let doc = make_doc("kept", "Kept", 42);

    {
        let store = DocumentStore::in_dir(dir.path());
        store.upsert(&doc).await.unwrap();
        store.close().await;
    }

    let store = DocumentStore::in_dir(dir.path());
    assert_eq!(
        store.location(),
        &StoreLocation::File(dir.path().join("drawbook.db"))
    );
    assert_eq!(store.get("kept").await.unwrap(), Some(doc));
}

#[tokio::test]
async fn test_upgrade_keeps_earlier_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    // A version-0 database: the table exists but no indexes and no stamp
    {
        let url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePoolOptions::new().connect(&url).await.unwrap();
        sqlx::query(
            "CREATE TABLE drawings (
                id TEXT PRIMARY KEY, name TEXT NOT NULL, elements TEXT NOT NULL,
                app_state TEXT NOT NULL, files TEXT NOT NULL, timestamp INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO drawings VALUES ('old', 'Old', '[{\"id\":\"x\"}]', '{\"theme\":\"light\"}', '{}', 7)",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool.close().await;
    }

    let store = DocumentStore::at_path(path.clone());
    store.initialize().await.unwrap();

    assert_eq!(user_version(&store).await, SCHEMA_VERSION);
    assert_eq!(index_names(&store).await.len(), 2);

    let old = store.get("old").await.unwrap().unwrap();
    assert_eq!(old.name, "Old");
    assert_eq!(old.elements, vec![json!({ "id": "x" })]);
    assert_eq!(old.theme(), Some("light"));
    assert_eq!(old.timestamp, 7);
}

#[tokio::test]
async fn test_newer_schema_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    {
        let url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePoolOptions::new().connect(&url).await.unwrap();
        sqlx::query("PRAGMA user_version = 99")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;
    }

    let store = DocumentStore::at_path(path.clone());
    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)));
    assert!(!store.is_initialized());

    // Writes surface the same failure instead of touching the file
    let err = store.upsert(&make_doc("a", "A", 1)).await.unwrap_err();
    assert_eq!(err.code(), "store_unavailable");
}

#[tokio::test]
async fn test_unopenable_path_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is needed
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let store = DocumentStore::in_dir(&blocker.join("nested"));
    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)));
}
