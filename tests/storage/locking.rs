//! Advisory file locking between store handles.

use burrow::{lock_path, OpenOptions};

use crate::common::*;

#[test]
fn second_writer_is_refused() {
    let store = TestStore::new();
    let _first = store.open();
    assert!(matches!(
        Database::open(&store.path),
        Err(StoreError::Locked(_))
    ));
}

#[test]
fn writer_excludes_readers() {
    let store = TestStore::new();
    let _writer = store.open();
    assert!(matches!(
        Database::open_read_only(&store.path),
        Err(StoreError::Locked(_))
    ));
}

#[test]
fn readers_share_and_exclude_writer() {
    let store = TestStore::new();
    drop(store.open());

    let r1 = store.open_read_only();
    let r2 = store.open_read_only();
    assert!(r1.is_read_only() && r2.is_read_only());
    assert!(matches!(
        Database::open(&store.path),
        Err(StoreError::Locked(_))
    ));

    drop(r1);
    drop(r2);
    assert!(Database::open(&store.path).is_ok());
}

#[test]
fn lock_released_when_last_handle_drops() {
    let store = TestStore::new();
    let db = store.open();
    let nav = Navigator::new(db.clone());
    drop(db);
    assert!(matches!(
        Database::open(&store.path),
        Err(StoreError::Locked(_))
    ));

    drop(nav);
    assert!(OpenOptions::new().open(&store.path).is_ok());
}

#[test]
fn lock_file_sits_next_to_store() {
    let store = TestStore::new();
    let _db = store.open();
    let lock = lock_path(&store.path);
    assert_eq!(lock.parent(), store.path.parent());
    assert!(lock.exists());
}

#[test]
fn locked_error_is_store_unavailable() {
    let store = TestStore::new();
    let _first = store.open();
    let err = Database::open(&store.path).unwrap_err();
    let err = Error::from(err);
    assert!(err.is_store_failure());
    assert!(err.to_string().contains("test.db"));
}
