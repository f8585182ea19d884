use std::path::PathBuf;

use venuekit_storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("venuekit-storage-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let _ = std::fs::remove_file(&dir);
    dir.join("storage.json")
}

#[tokio::test]
async fn memory_store_round_trips_and_removes() {
    let store = MemoryStore::new();
    assert_eq!(store.get("userCity").await.unwrap(), None);

    store.set("userCity", "Mumbai").await.unwrap();
    assert_eq!(store.get("userCity").await.unwrap().as_deref(), Some("Mumbai"));

    store.remove("userCity").await.unwrap();
    store.remove("userCity").await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn memory_store_clones_share_entries() {
    let store: MemoryStore = [("userCity", "Delhi")].into_iter().collect();
    let handle = store.clone();
    handle.set("userCity", "Pune").await.unwrap();
    assert_eq!(store.get("userCity").await.unwrap().as_deref(), Some("Pune"));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let path = scratch_file("reopen");

    let store = FileStore::new(&path);
    assert_eq!(store.get("userCity").await.unwrap(), None);
    store.set("userCity", "Bengaluru").await.unwrap();
    store
        .set("userLocation", r#"{"latitude":12.97,"longitude":77.59}"#)
        .await
        .unwrap();
    assert!(path.exists());

    let reopened = FileStore::new(&path);
    assert_eq!(
        reopened.get("userCity").await.unwrap().as_deref(),
        Some("Bengaluru")
    );
    reopened.remove("userCity").await.unwrap();

    let again = FileStore::new(&path);
    assert_eq!(again.get("userCity").await.unwrap(), None);
    assert!(again.get("userLocation").await.unwrap().is_some());
}

#[tokio::test]
async fn corrupt_file_is_reported() {
    let path = scratch_file("corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"not json").unwrap();

    let store = FileStore::new(&path);
    assert!(matches!(
        store.get("userCity").await,
        Err(StorageError::Serde(_))
    ));
}

#[tokio::test]
async fn failed_write_leaves_no_phantom_value() {
    let path = scratch_file("failed-write");
    let dir = path.parent().unwrap().to_path_buf();

    let store = FileStore::new(&path);
    assert_eq!(store.get("userCity").await.unwrap(), None);

    // A regular file where the directory should be makes the write fail.
    std::fs::write(&dir, b"in the way").unwrap();
    assert!(store.set("userCity", "Pune").await.is_err());
    assert_eq!(store.get("userCity").await.unwrap(), None);

    std::fs::remove_file(&dir).unwrap();
    store.set("userCity", "Pune").await.unwrap();
    assert!(path.exists());

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get("userCity").await.unwrap().as_deref(), Some("Pune"));
}

#[tokio::test]
async fn failed_remove_keeps_value() {
    let path = scratch_file("failed-remove");
    let store = FileStore::new(&path);
    store.set("userCity", "Nagpur").await.unwrap();

    // Swap the directory for a regular file so the rewrite cannot land.
    let dir = path.parent().unwrap().to_path_buf();
    std::fs::remove_dir_all(&dir).unwrap();
    std::fs::write(&dir, b"in the way").unwrap();

    assert!(store.remove("userCity").await.is_err());
    assert_eq!(store.get("userCity").await.unwrap().as_deref(), Some("Nagpur"));

    std::fs::remove_file(&dir).unwrap();
}
