//! File-backed token store: partial updates, durability across instances,
//! and credential-file permissions.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use mindwell_api::auth::{FileTokenStore, TokenStore, TokenStoreConfig, TokenUpdate};

fn temp_store() -> (TempDir, FileTokenStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = FileTokenStore::new(TokenStoreConfig::new(dir.path().to_path_buf()));
    (dir, store)
}

fn seed_both(store: &FileTokenStore) {
    store
        .save(
            &TokenUpdate::new()
                .access_token(Some("a1"))
                .refresh_token(Some("r1")),
        )
        .expect("save should succeed");
}

#[test]
fn partial_update_leaves_other_field_untouched() {
    let (_dir, store) = temp_store();
    seed_both(&store);

    store
        .save(&TokenUpdate::new().access_token(Some("a2")))
        .unwrap();

    let pair = store.load().unwrap();
    assert_eq!(pair.access_token.as_deref(), Some("a2"));
    assert_eq!(pair.refresh_token.as_deref(), Some("r1"));
}

#[test]
fn explicit_none_deletes_a_single_entry() {
    let (_dir, store) = temp_store();
    seed_both(&store);

    store.save(&TokenUpdate::new().access_token(None)).unwrap();

    let pair = store.load().unwrap();
    assert_eq!(pair.access_token, None);
    assert_eq!(pair.refresh_token.as_deref(), Some("r1"));
}

#[test]
fn pair_survives_a_new_store_instance() {
    let (dir, store) = temp_store();
    seed_both(&store);
    drop(store);

    let reopened = FileTokenStore::new(TokenStoreConfig::new(dir.path().to_path_buf()));
    let pair = reopened.load().unwrap();
    assert_eq!(pair.access_token.as_deref(), Some("a1"));
    assert_eq!(pair.refresh_token.as_deref(), Some("r1"));
}

#[test]
fn clear_removes_everything() {
    let (_dir, store) = temp_store();
    seed_both(&store);

    store.clear().unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn credentials_file_is_owner_readable_only() {
    use std::os::unix::fs::PermissionsExt;

    let (dir, store) = temp_store();
    seed_both(&store);

    let path = dir.path().join("credentials.toml");
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
