//! Integration tests: session_file.

use std::fs;

use tempfile::TempDir;
use visvas_admin::storage::FileStorage;
use visvas_shared::{
    models::{Role, SessionUser},
    session::{KeyValueStorage, TOKEN_KEY, USER_KEY},
    SessionStore,
};

fn admin() -> SessionUser {
    SessionUser {
        id: "u-1".to_string(),
        email: "admin@visvas.com".to_string(),
        role: Role::Admin,
    }
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = TempDir::new().expect("temp dir");
    let storage = FileStorage::new(dir.path().join("session.json"));

    assert_eq!(storage.get(TOKEN_KEY), None);
    assert!(!SessionStore::new(storage).is_authenticated());
}

#[test]
fn session_survives_a_new_process() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("session.json");

    SessionStore::new(FileStorage::new(&path))
        .set("token-1", &admin())
        .expect("store session");

    let reopened = SessionStore::new(FileStorage::new(&path));
    let session = reopened.get().expect("session persisted");
    assert_eq!(session.token, "token-1");
    assert_eq!(session.user, admin());
    assert!(reopened.is_admin());
}

#[test]
fn clearing_removes_both_keys_and_the_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.json");
    let store = SessionStore::new(FileStorage::new(&path));
    store.set("token-1", &admin()).expect("store session");

    store.clear();

    let storage = FileStorage::new(&path);
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(storage.get(USER_KEY), None);
    assert!(!path.exists());
}

#[test]
fn corrupt_file_reads_as_logged_out() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.json");
    fs::write(&path, "not json").expect("write garbage");

    let store = SessionStore::new(FileStorage::new(&path));
    assert!(store.get().is_none());

    store.set("token-2", &admin()).expect("overwrite garbage");
    assert_eq!(store.token().as_deref(), Some("token-2"));
}

#[cfg(unix)]
#[test]
fn session_file_is_private_to_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.json");
    fs::write(&path, "{}").expect("seed file");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("loosen mode");

    SessionStore::new(FileStorage::new(&path))
        .set("token-3", &admin())
        .expect("store session");

    let mode = fs::metadata(&path).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    let fresh = dir.path().join("fresh").join("session.json");
    SessionStore::new(FileStorage::new(&fresh))
        .set("token-4", &admin())
        .expect("store session");
    let mode = fs::metadata(&fresh).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
