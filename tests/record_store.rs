//! Record store integration tests.
//!
//! These tests exercise the raw collection surface (get/set of JSON
//! records), the legacy `prototypes` alias, and the durability of the
//! redb backend across clean closes and simulated crashes.
//!
//! # Crash Simulation
//!
//! A crash is simulated by dropping the `IgniteDb` handle without calling
//! `close()`. redb commits durably inside each write transaction, so data
//! from completed saves must survive the drop.

use ignitedb::{Config, IgniteDb, RawRecord, Role, User};
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

/// Helper: open an IgniteDb at the given path with default config.
fn open_db(path: &std::path::Path) -> IgniteDb {
    IgniteDb::open(path, Config::default()).unwrap()
}

/// Helper: build a raw record from a JSON object literal.
fn raw(value: serde_json::Value) -> RawRecord {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("test record must be an object, got {}", other),
    }
}

// ============================================================================
// Raw surface
// ============================================================================

#[test]
fn test_round_trip_preserves_unknown_fields() {
    let db = IgniteDb::open_in_memory(Config::default()).unwrap();

    // Comments have no migration steps, so the record must come back
    // byte-for-byte, including fields this build has never heard of.
    let record = raw(json!({
        "id": "c-1",
        "startupId": "startup-001",
        "authorId": "u-1",
        "body": "Love this idea",
        "futureField": { "nested": [1, 2, 3] }
    }));
    db.save_records("comments", vec![record.clone()]).unwrap();

    let loaded = db.records("comments").unwrap();
    assert_eq!(loaded, vec![record]);
}

#[test]
fn test_missing_collection_reads_empty() {
    let db = IgniteDb::open_in_memory(Config::default()).unwrap();
    assert!(db.records("notifications").unwrap().is_empty());
}

#[test]
fn test_unknown_collection_name_rejected() {
    let db = IgniteDb::open_in_memory(Config::default()).unwrap();

    assert!(db.records("widgets").unwrap_err().is_validation());
    let err = db.save_records("widgets", vec![]).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_prototypes_alias_reads_startups() {
    let db = IgniteDb::open_in_memory(Config::default()).unwrap();

    let record = raw(json!({
        "id": "startup-legacy",
        "ownerId": "u-1",
        "name": "Written via alias",
        "schemaVersion": 2
    }));
    db.save_records("prototypes", vec![record]).unwrap();

    let via_canonical = db.records("startups").unwrap();
    assert_eq!(via_canonical.len(), 1);
    assert_eq!(via_canonical[0].get("name"), Some(&json!("Written via alias")));

    // And the other direction.
    db.save_records("startups", vec![]).unwrap();
    assert!(db.records("prototypes").unwrap().is_empty());
}

#[test]
fn test_typed_saves_store_camel_case_wire_shape() {
    let db = IgniteDb::open_in_memory(Config::default()).unwrap();
    db.save_users(&[User::new("Ada", "ada@example.com", Role::Innovator)])
        .unwrap();

    let records = db.records("users").unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].contains_key("createdAt"), "wire shape is camelCase");
    assert!(records[0].contains_key("schemaVersion"));
}

// ============================================================================
// Durability
// ============================================================================

#[test]
fn test_data_survives_normal_close() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("durable.db");

    let db = open_db(&path);
    db.save_records(
        "notifications",
        vec![raw(json!({ "id": "n-1", "userId": "u-1", "title": "Hi" }))],
    )
    .unwrap();
    db.close().unwrap();

    let db = open_db(&path);
    let loaded = db.records("notifications").unwrap();
    assert_eq!(loaded.len(), 1, "Data must survive a normal close");
    assert_eq!(loaded[0].get("title"), Some(&json!("Hi")));
    db.close().unwrap();
}

#[test]
fn test_data_survives_crash() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crash.db");

    {
        let db = open_db(&path);
        db.save_records(
            "notifications",
            vec![raw(json!({ "id": "n-1", "userId": "u-1", "title": "Hi" }))],
        )
        .unwrap();
        // NO close() -- simulates a crash (drop without flush)
    }

    let db = open_db(&path);
    assert_eq!(
        db.records("notifications").unwrap().len(),
        1,
        "Committed data must survive a crash (drop without close)"
    );
    db.close().unwrap();
}

#[test]
fn test_session_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.db");

    let founder = User::new("Ada", "ada@example.com", Role::Innovator);
    let db = open_db(&path);
    db.save_session(&founder).unwrap();
    db.close().unwrap();

    let db = open_db(&path);
    let session = db.session().unwrap().expect("session should persist");
    assert_eq!(session.id, founder.id);
    assert_eq!(session.name, "Ada");
    db.close().unwrap();
}

#[test]
fn test_metadata_tracks_opens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("meta.db");

    let db = open_db(&path);
    let created = db.metadata().created_at;
    db.close().unwrap();

    std::thread::sleep(std::time::Duration::from_millis(5));

    let db = open_db(&path);
    assert_eq!(db.metadata().created_at, created, "creation time is stable");
    assert!(
        db.metadata().last_opened_at > created,
        "reopen must refresh last_opened_at"
    );
    db.close().unwrap();
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_readers_see_whole_arrays() {
    let db = Arc::new(IgniteDb::open_in_memory(Config::default()).unwrap());

    let batch: Vec<RawRecord> = (0..20)
        .map(|i| raw(json!({ "id": format!("c-{i}"), "body": "hello" })))
        .collect();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let db = Arc::clone(&db);
        handles.push(std::thread::spawn(move || {
            for _ in 0..50 {
                let loaded = db.records("comments").unwrap();
                // Collection writes are atomic: a reader sees nothing or
                // the full batch, never a partial array.
                assert!(loaded.is_empty() || loaded.len() == 20, "got {}", loaded.len());
            }
        }));
    }

    for _ in 0..10 {
        db.save_records("comments", batch.clone()).unwrap();
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
