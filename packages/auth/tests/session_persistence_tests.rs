// ABOUTME: Integration tests for the file-backed credential session
// ABOUTME: Tests durability of the user token across reopen and volatility of the admin token

use std::fs;

use modview_auth::{FileTokenStore, Session, TokenPersistence};
use tempfile::TempDir;

fn store_in(temp_dir: &TempDir) -> FileTokenStore {
    FileTokenStore::new(temp_dir.path().join(".modview").join("credentials.toml"))
}

#[test]
fn test_user_token_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let mut session = Session::open(store_in(&temp_dir));
    assert!(!session.restored_from_storage());
    session.set_user_token("  abc123  ").unwrap();
    session.set_admin_token("admin-token");
    drop(session);

    let reopened = Session::open(store_in(&temp_dir));
    assert!(reopened.restored_from_storage());
    assert_eq!(reopened.user_token(), Some("abc123"));
    assert_eq!(reopened.admin_token(), None);
}

#[test]
fn test_file_holds_only_the_user_token() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    let mut session = Session::open(store.clone());
    session.set_user_token("abc123").unwrap();
    session.set_admin_token("admin-token");

    let content = fs::read_to_string(store.path()).unwrap();
    assert!(content.contains("abc123"));
    assert!(!content.contains("admin-token"));
}

#[test]
fn test_blank_token_does_not_touch_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    let mut session = Session::open(store.clone());
    assert!(session.set_user_token("   ").is_err());
    assert!(!store.path().exists());

    session.set_user_token("abc123").unwrap();
    let before = fs::read_to_string(store.path()).unwrap();
    assert!(session.set_user_token("").is_err());
    let after = fs::read_to_string(store.path()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_corrupt_file_opens_empty_session() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "[[[").unwrap();

    let mut session = Session::open(store.clone());
    assert_eq!(session.user_token(), None);

    // The next write replaces the corrupt file
    session.set_user_token("fresh").unwrap();
    assert_eq!(store.load().unwrap(), Some("fresh".to_string()));
}

#[test]
fn test_clear_user_token_removes_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    let mut session = Session::open(store.clone());
    session.set_user_token("abc123").unwrap();
    session.clear_user_token().unwrap();

    assert_eq!(session.user_token(), None);
    assert!(!store.path().exists());
    assert!(!Session::open(store).restored_from_storage());
}
