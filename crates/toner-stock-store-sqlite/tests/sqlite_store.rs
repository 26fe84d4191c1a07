// toner-stock-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Store Tests
// Description: Validate SQLite TonerCollection behavior.
// Purpose: Ensure durable persistence, key semantics, and integrity checks.
// Dependencies: toner-stock-store-sqlite, toner-stock-core, rusqlite, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Conformance tests for the SQLite-backed toner collection. Exercises
//! durability across reopen, duplicate-key rejection, update counts, and
//! fail-closed reads against tampered rows.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use rusqlite::Connection;
use rusqlite::params;
use serde_json::json;
use tempfile::TempDir;
use toner_stock_core::HandlerError;
use toner_stock_core::RequestMethod;
use toner_stock_core::SharedTonerCollection;
use toner_stock_core::StoreError;
use toner_stock_core::TonerCollection;
use toner_stock_core::TonerHandlers;
use toner_stock_core::TonerId;
use toner_stock_core::TonerRecord;
use toner_stock_core::TonerReply;
use toner_stock_core::TonerRequest;
use toner_stock_store_sqlite::SqliteStoreConfig;
use toner_stock_store_sqlite::SqliteStoreError;
use toner_stock_store_sqlite::SqliteTonerCollection;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn sample(id: &str, quantity: u32) -> TonerRecord {
    TonerRecord {
        id: TonerId::new(id),
        quantity,
        is_color: false,
        is_high_capacity: false,
        is_generic: true,
        alternatives: Vec::new(),
    }
}

fn store_for(path: &Path) -> SqliteTonerCollection {
    let mut config = SqliteStoreConfig::new(path);
    config.busy_timeout_ms = 1_000;
    SqliteTonerCollection::new(&config).expect("store init")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn sqlite_store_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("toners.sqlite"));
    let record = sample("HP26A", 5);
    store.insert(&record).unwrap();
    let document = store.find_by_id(&record.id).unwrap().expect("document");
    assert_eq!(TonerRecord::strict_parse(&document).unwrap(), record);
    assert!(store.find_by_id(&TonerId::new("CE285A")).unwrap().is_none());
}

#[test]
fn sqlite_store_lists_in_insertion_order() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("toners.sqlite"));
    for id in ["TN2420", "HP26A", "CE285A"] {
        store.insert(&sample(id, 1)).unwrap();
    }
    let ids: Vec<String> = store
        .find_all()
        .unwrap()
        .iter()
        .map(|document| document["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["TN2420", "HP26A", "CE285A"]);
}

#[test]
fn sqlite_store_rejects_duplicate_ids() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("toners.sqlite"));
    store.insert(&sample("HP26A", 5)).unwrap();
    let err = store.insert(&sample("HP26A", 7)).unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert_eq!(store.find_all().unwrap().len(), 1);
}

#[test]
fn sqlite_store_update_reports_affected_rows() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("toners.sqlite"));
    let id = TonerId::new("HP26A");
    assert_eq!(store.update_by_id(&id, &sample("HP26A", 0)).unwrap(), 0);
    assert!(store.find_all().unwrap().is_empty());

    store.insert(&sample("HP26A", 5)).unwrap();
    assert_eq!(store.update_by_id(&id, &sample("HP26A", 0)).unwrap(), 1);
    let document = store.find_by_id(&id).unwrap().unwrap();
    assert_eq!(document["quantity"], json!(0));
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("toners.sqlite");
    store_for(&path).insert(&sample("HP26A", 5)).unwrap();
    let reopened = store_for(&path);
    assert_eq!(reopened.find_all().unwrap().len(), 1);
}

#[test]
fn sqlite_store_rejects_directory_path() {
    let temp = TempDir::new().unwrap();
    let err = SqliteTonerCollection::new(&SqliteStoreConfig::new(temp.path())).err().unwrap();
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn sqlite_store_rejects_unknown_schema_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("toners.sqlite");
    drop(store_for(&path));
    let connection = Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = 99", params![]).unwrap();
    drop(connection);
    let err = SqliteTonerCollection::new(&SqliteStoreConfig::new(&path)).err().unwrap();
    assert!(matches!(err, SqliteStoreError::VersionMismatch(_)));
}

#[test]
fn sqlite_store_fails_closed_on_non_json_document() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("toners.sqlite");
    let store = store_for(&path);
    let connection = Connection::open(&path).unwrap();
    connection
        .execute(
            "INSERT INTO toners (id, document, updated_at) VALUES (?1, ?2, 0)",
            params!["HP26A", b"not json".to_vec()],
        )
        .unwrap();
    let err = store.find_by_id(&TonerId::new("HP26A")).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
    assert!(matches!(store.find_all().unwrap_err(), StoreError::Corrupt(_)));
}

#[test]
fn sqlite_store_fails_closed_on_key_mismatch() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("toners.sqlite");
    let store = store_for(&path);
    store.insert(&sample("HP26A", 5)).unwrap();
    let connection = Connection::open(&path).unwrap();
    connection.execute("UPDATE toners SET id = 'CE285A' WHERE id = 'HP26A'", params![]).unwrap();
    let err = store.find_by_id(&TonerId::new("CE285A")).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn schema_drift_surfaces_as_malformed_record_through_handlers() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("toners.sqlite");
    let store = store_for(&path);
    store.insert(&sample("CE285A", 2)).unwrap();
    let drifted = json!({ "id": "HP26A", "quantity": "lots" });
    let connection = Connection::open(&path).unwrap();
    connection
        .execute(
            "INSERT INTO toners (id, document, updated_at) VALUES (?1, ?2, 0)",
            params!["HP26A", serde_json::to_vec(&drifted).unwrap()],
        )
        .unwrap();

    let handlers = TonerHandlers::new(SharedTonerCollection::from_collection(store));
    let err = handlers.handle_get(&TonerRequest::new(RequestMethod::Get, "all")).unwrap_err();
    assert!(matches!(err, HandlerError::MalformedRecord(_)));
    let reply = handlers.handle_get(&TonerRequest::new(RequestMethod::Get, "CE285A")).unwrap();
    assert_eq!(reply, TonerReply::Record(sample("CE285A", 2)));
}

#[test]
fn handlers_scenario_over_sqlite() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("toners.sqlite"));
    let handlers = TonerHandlers::new(SharedTonerCollection::from_collection(store));
    let created = sample("HP26A", 5);
    let body = created.to_document().unwrap();
    handlers
        .handle_create(&TonerRequest::new(RequestMethod::Post, "HP26A").with_body(body.clone()))
        .unwrap();
    let err = handlers
        .handle_create(&TonerRequest::new(RequestMethod::Post, "HP26A").with_body(body))
        .unwrap_err();
    assert!(matches!(err, HandlerError::Conflict(_)));

    let updated = sample("HP26A", 0);
    handlers
        .handle_update(
            &TonerRequest::new(RequestMethod::Put, "HP26A")
                .with_body(updated.to_document().unwrap()),
        )
        .unwrap();
    let listing = handlers.handle_get(&TonerRequest::new(RequestMethod::Get, "all")).unwrap();
    assert_eq!(listing, TonerReply::Records(vec![updated]));
}
