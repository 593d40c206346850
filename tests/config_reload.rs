//! Hot reload of the configuration document.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use sign_gateway::config::{ConfigStore, ConfigWatcher};

/// Wait for `condition`, polling every few milliseconds.
fn eventually(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    condition()
}

#[test]
fn test_watcher_picks_up_valid_edit() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path());
    let store = Arc::new(ConfigStore::open(path.clone()).unwrap());
    assert!(store.signature_by_id("added").is_none());

    let handle = ConfigWatcher::new(store.clone()).spawn();
    std::thread::sleep(Duration::from_millis(200));

    let edited = common::config_document(Some("added"));
    std::fs::write(&path, edited.to_string()).unwrap();

    assert!(eventually(Duration::from_secs(5), || store
        .signature_by_id("added")
        .is_some()));
    handle.join();
}

#[test]
fn test_malformed_edit_keeps_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path());
    let store = Arc::new(ConfigStore::open(path.clone()).unwrap());
    let before = store.current();

    let handle = ConfigWatcher::new(store.clone()).spawn();
    std::thread::sleep(Duration::from_millis(200));

    std::fs::write(&path, r#"{"signature": [{"id": "broken"}]"#).unwrap();
    std::thread::sleep(Duration::from_millis(500));

    assert!(Arc::ptr_eq(&before, &store.current()));
    assert!(store.signature_by_id("1").is_some());

    // A later valid edit is still picked up.
    std::fs::write(&path, common::config_document(Some("fixed")).to_string()).unwrap();
    assert!(eventually(Duration::from_secs(5), || store
        .signature_by_id("fixed")
        .is_some()));
    handle.join();
}

#[test]
fn test_edit_of_other_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path());
    let store = Arc::new(ConfigStore::open(path).unwrap());
    let before = store.current();

    let handle = ConfigWatcher::new(store.clone()).spawn();
    std::thread::sleep(Duration::from_millis(200));

    std::fs::write(dir.path().join("notes.txt"), "unrelated").unwrap();
    std::thread::sleep(Duration::from_millis(300));

    assert!(Arc::ptr_eq(&before, &store.current()));
    handle.join();
}

#[test]
fn test_watcher_stops_within_bounded_time() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ConfigStore::open(common::write_config(dir.path())).unwrap());

    let handle = ConfigWatcher::new(store).spawn();
    std::thread::sleep(Duration::from_millis(100));
    assert!(!handle.is_finished());

    let requested = Instant::now();
    handle.stop();
    assert!(eventually(Duration::from_secs(1), || handle.is_finished()));
    assert!(requested.elapsed() < Duration::from_secs(1));
    handle.join();
}

#[test]
fn test_invalid_document_is_fatal_at_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gateway-conf.json");

    let mut document = common::config_document(None);
    document["ca"][0]["crl"] = serde_json::json!("");
    std::fs::write(&path, document.to_string()).unwrap();

    assert!(ConfigStore::open(path).is_err());
}
