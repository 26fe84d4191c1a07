// toner-stock-core/tests/proptest_record.rs
// ============================================================================
// Module: Record Property Tests
// Description: Property-based checks for the record schema and handlers.
// Purpose: Ensure create/get and update/get laws hold for arbitrary records.
// Dependencies: toner-stock-core, proptest, serde_json
// ============================================================================

//! ## Overview
//! Generates arbitrary valid toner records and checks the round-trip and
//! full-replace laws through the handlers, plus the id-mismatch guard.

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

use proptest::prelude::*;
use toner_stock_core::HandlerError;
use toner_stock_core::InMemoryTonerCollection;
use toner_stock_core::RequestMethod;
use toner_stock_core::SharedTonerCollection;
use toner_stock_core::TonerCollection;
use toner_stock_core::TonerHandlers;
use toner_stock_core::TonerId;
use toner_stock_core::TonerRecord;
use toner_stock_core::TonerReply;
use toner_stock_core::TonerRequest;

// ============================================================================
// SECTION: Strategies
// ============================================================================

fn toner_id() -> impl Strategy<Value = String> {
    "[A-Z]{2,4}[0-9]{2,4}[A-Z]?"
}

fn toner_record(id: String) -> impl Strategy<Value = TonerRecord> {
    (
        any::<u32>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(toner_id(), 0..4),
    )
        .prop_map(move |(quantity, is_color, is_high_capacity, is_generic, alternatives)| {
            TonerRecord {
                id: TonerId::new(id.clone()),
                quantity,
                is_color,
                is_high_capacity,
                is_generic,
                alternatives: alternatives.into_iter().map(TonerId::new).collect(),
            }
        })
}

fn record_pair() -> impl Strategy<Value = (TonerRecord, TonerRecord)> {
    toner_id().prop_flat_map(|id| (toner_record(id.clone()), toner_record(id)))
}

fn handlers() -> (TonerHandlers, InMemoryTonerCollection) {
    let collection = InMemoryTonerCollection::new();
    (TonerHandlers::new(SharedTonerCollection::from_collection(collection.clone())), collection)
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn safe_parse_accepts_serialized_records((record, _) in record_pair()) {
        let document = record.to_document().unwrap();
        prop_assert_eq!(TonerRecord::safe_parse(&document).unwrap(), record);
    }

    #[test]
    fn create_then_get_returns_submitted_record((record, _) in record_pair()) {
        let (handlers, _) = handlers();
        let id = record.id.clone();
        let body = record.to_document().unwrap();
        handlers.handle_create(&TonerRequest::new(RequestMethod::Post, id.clone()).with_body(body)).unwrap();
        let fetched = handlers.handle_get(&TonerRequest::new(RequestMethod::Get, id)).unwrap();
        prop_assert_eq!(fetched, TonerReply::Record(record));
    }

    #[test]
    fn update_replaces_previous_record((original, replacement) in record_pair()) {
        let (handlers, _) = handlers();
        let id = original.id.clone();
        handlers
            .handle_create(
                &TonerRequest::new(RequestMethod::Post, id.clone())
                    .with_body(original.to_document().unwrap()),
            )
            .unwrap();
        handlers
            .handle_update(
                &TonerRequest::new(RequestMethod::Put, id.clone())
                    .with_body(replacement.to_document().unwrap()),
            )
            .unwrap();
        let fetched = handlers.handle_get(&TonerRequest::new(RequestMethod::Get, id)).unwrap();
        prop_assert_eq!(fetched, TonerReply::Record(replacement));
    }

    #[test]
    fn mismatched_path_id_never_mutates((record, _) in record_pair(), path in toner_id()) {
        prop_assume!(path != record.id.as_str());
        let (handlers, collection) = handlers();
        let body = record.to_document().unwrap();
        let err = handlers
            .handle_create(&TonerRequest::new(RequestMethod::Post, path).with_body(body))
            .unwrap_err();
        prop_assert!(matches!(err, HandlerError::BadRequest(_)));
        prop_assert!(collection.find_all().unwrap().is_empty());
    }
}
