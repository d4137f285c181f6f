use std::fs;

use answer_client::{
    FileSessionStore, MemorySessionStore, SessionStore, SESSION_FILENAME,
};
use answer_core::SessionId;
use tempfile::TempDir;

#[test]
fn file_store_creates_once_and_reuses() {
    let temp = TempDir::new().unwrap();
    let mut store = FileSessionStore::new(temp.path().join("state"));

    let first = store.load_or_create().unwrap();
    assert!(!first.as_str().is_empty());
    assert!(temp.path().join("state").join(SESSION_FILENAME).is_file());

    // A new store over the same directory sees the persisted value.
    let mut reopened = FileSessionStore::new(temp.path().join("state"));
    assert_eq!(reopened.load_or_create().unwrap(), first);
}

#[test]
fn file_store_rotate_persists_distinct_id() {
    let temp = TempDir::new().unwrap();
    let mut store = FileSessionStore::new(temp.path());
    let first = store.load_or_create().unwrap();

    let second = store.rotate().unwrap();
    assert_ne!(first, second);
    assert_eq!(store.load_or_create().unwrap(), second);

    let mut reopened = FileSessionStore::new(temp.path());
    assert_eq!(reopened.load_or_create().unwrap(), second);
}

#[test]
fn corrupt_session_file_is_replaced() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(SESSION_FILENAME), "not ron at all (").unwrap();

    let mut store = FileSessionStore::new(temp.path());
    let id = store.load_or_create().unwrap();
    assert!(!id.as_str().is_empty());

    let content = fs::read_to_string(temp.path().join(SESSION_FILENAME)).unwrap();
    assert!(content.contains(id.as_str()));
}

#[test]
fn state_dir_that_is_a_file_fails() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let mut store = FileSessionStore::new(file_path);
    assert!(store.load_or_create().is_err());
}

#[test]
fn memory_store_rotates() {
    let mut store = MemorySessionStore::with_id(SessionId::new("fixed"));
    assert_eq!(store.load_or_create().unwrap(), SessionId::new("fixed"));

    let rotated = store.rotate().unwrap();
    assert_ne!(rotated, SessionId::new("fixed"));
    assert_eq!(store.load_or_create().unwrap(), rotated);
}
