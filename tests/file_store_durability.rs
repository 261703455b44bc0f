//! File Store Durability Tests
//!
//! - Acknowledged writes survive reopen
//! - Tombstones survive reopen
//! - Corruption halts open instead of being skipped
//! - Compaction keeps exactly the live users

use std::fs;
use std::path::PathBuf;

use roadie_user::model::User;
use roadie_user::store::{FileUserStore, StoreError, UserRecord, UserStore};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn log_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data").join("users.dat")
}

fn alice() -> User {
    User::new("u1")
        .with_field("Name", "Alice")
        .with_field("Email", "alice@example.com")
}

// =============================================================================
// Reopen
// =============================================================================

#[tokio::test]
async fn test_users_survive_reopen() {
    let dir = create_temp_data_dir();

    {
        let store = FileUserStore::open(&log_path(&dir)).unwrap();
        store.insert(alice()).await.unwrap();
        store.insert(User::new("u2")).await.unwrap();
    }

    let store = FileUserStore::open(&log_path(&dir)).unwrap();
    assert_eq!(store.len().unwrap(), 2);
    assert_eq!(store.find_by_key("u1").await.unwrap(), Some(alice()));
}

#[tokio::test]
async fn test_latest_replace_wins_after_reopen() {
    let dir = create_temp_data_dir();

    {
        let store = FileUserStore::open(&log_path(&dir)).unwrap();
        store.insert(alice()).await.unwrap();
        store
            .replace(User::new("u1").with_field("Name", "Alicia"))
            .await
            .unwrap();
    }

    let store = FileUserStore::open(&log_path(&dir)).unwrap();
    let user = store.find_by_key("u1").await.unwrap().unwrap();
    assert_eq!(user.profile["Name"], "Alicia");
    assert!(user.profile.get("Email").is_none());
}

#[tokio::test]
async fn test_tombstone_survives_reopen() {
    let dir = create_temp_data_dir();

    {
        let store = FileUserStore::open(&log_path(&dir)).unwrap();
        store.insert(alice()).await.unwrap();
        store.remove(&alice()).await.unwrap();
    }

    let store = FileUserStore::open(&log_path(&dir)).unwrap();
    assert!(store.find_by_key("u1").await.unwrap().is_none());
    assert!(store.is_empty().unwrap());

    // The key is free again
    store.insert(User::new("u1")).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_and_missing_are_rejected() {
    let dir = create_temp_data_dir();
    let store = FileUserStore::open(&log_path(&dir)).unwrap();
    store.insert(alice()).await.unwrap();

    let dup = store.insert(alice()).await.unwrap_err();
    assert!(matches!(dup, StoreError::DuplicateKey(k) if k == "u1"));

    let missing = store.replace(User::new("u9")).await.unwrap_err();
    assert!(matches!(missing, StoreError::MissingRecord(k) if k == "u9"));

    let missing = store.remove(&User::new("u9")).await.unwrap_err();
    assert!(matches!(missing, StoreError::MissingRecord(_)));
}

// =============================================================================
// Corruption
// =============================================================================

#[tokio::test]
async fn test_flipped_byte_fails_open() {
    let dir = create_temp_data_dir();
    let path = log_path(&dir);

    {
        let store = FileUserStore::open(&path).unwrap();
        store.insert(alice()).await.unwrap();
    }

    let mut contents = fs::read(&path).unwrap();
    let mid = contents.len() / 2;
    contents[mid] ^= 0xFF;
    fs::write(&path, contents).unwrap();

    let err = FileUserStore::open(&path).unwrap_err();
    assert!(
        matches!(err, StoreError::Corruption { offset: 0, .. }),
        "expected corruption at offset 0, got: {}",
        err
    );
    assert_eq!(err.code(), "USER_STORE_CORRUPTION");
}

#[tokio::test]
async fn test_corruption_reports_offset_of_damaged_record() {
    let dir = create_temp_data_dir();
    let path = log_path(&dir);

    {
        let store = FileUserStore::open(&path).unwrap();
        store.insert(User::new("u1")).await.unwrap();
        store.insert(User::new("u2")).await.unwrap();
    }

    let first_len = UserRecord::put(&User::new("u1")).unwrap().serialize().len();
    let mut contents = fs::read(&path).unwrap();
    let last = contents.len() - 1;
    contents[last] ^= 0xFF;
    fs::write(&path, contents).unwrap();

    match FileUserStore::open(&path).unwrap_err() {
        StoreError::Corruption { offset, .. } => assert_eq!(offset, first_len as u64),
        other => panic!("expected corruption, got: {}", other),
    }
}

#[tokio::test]
async fn test_truncated_tail_fails_open() {
    let dir = create_temp_data_dir();
    let path = log_path(&dir);

    {
        let store = FileUserStore::open(&path).unwrap();
        store.insert(alice()).await.unwrap();
    }

    let contents = fs::read(&path).unwrap();
    fs::write(&path, &contents[..contents.len() - 3]).unwrap();

    assert!(matches!(
        FileUserStore::open(&path),
        Err(StoreError::Corruption { .. })
    ));
}

// =============================================================================
// Compaction
// =============================================================================

#[tokio::test]
async fn test_compaction_keeps_live_users_only() {
    let dir = create_temp_data_dir();
    let path = log_path(&dir);

    {
        let store = FileUserStore::open(&path).unwrap();
        store.insert(alice()).await.unwrap();
        store.insert(User::new("u2")).await.unwrap();
        store
            .replace(User::new("u1").with_field("Name", "Alicia"))
            .await
            .unwrap();
        store.remove(&User::new("u2")).await.unwrap();

        let before = store.log_size().unwrap();
        store.compact().await.unwrap();
        let after = store.log_size().unwrap();

        assert!(after < before);
        assert_eq!(after, fs::metadata(&path).unwrap().len());

        // Appends after compaction land in the new log
        store.insert(User::new("u3")).await.unwrap();
    }

    let store = FileUserStore::open(&path).unwrap();
    assert_eq!(store.len().unwrap(), 2);
    assert_eq!(
        store.find_by_key("u1").await.unwrap().unwrap().profile["Name"],
        "Alicia"
    );
    assert!(store.find_by_key("u2").await.unwrap().is_none());
    assert!(store.find_by_key("u3").await.unwrap().is_some());
}
