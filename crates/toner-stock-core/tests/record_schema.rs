// toner-stock-core/tests/record_schema.rs
// ============================================================================
// Module: Record Schema Tests
// Description: Validate safe and strict parsing of toner records.
// Purpose: Ensure untrusted payloads fail with field-level errors.
// Dependencies: toner-stock-core, serde_json
// ============================================================================

//! ## Overview
//! Exercises [`TonerRecord::safe_parse`] and [`TonerRecord::strict_parse`]
//! against well-formed, missing, mistyped, and out-of-range payloads.

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

use serde_json::Value;
use serde_json::json;
use toner_stock_core::TonerId;
use toner_stock_core::TonerRecord;
use toner_stock_core::ValidationError;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn hp26a() -> Value {
    json!({
        "id": "HP26A",
        "quantity": 5,
        "isColor": false,
        "isGeneric": true,
        "isHighCapacity": false,
        "alternatives": []
    })
}

fn with_field(field: &str, value: Value) -> Value {
    let mut payload = hp26a();
    payload.as_object_mut().unwrap().insert(field.to_string(), value);
    payload
}

fn without_field(field: &str) -> Value {
    let mut payload = hp26a();
    payload.as_object_mut().unwrap().remove(field);
    payload
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn safe_parse_accepts_well_formed_record() {
    let record = TonerRecord::safe_parse(&hp26a()).unwrap();
    assert_eq!(record.id, TonerId::new("HP26A"));
    assert_eq!(record.quantity, 5);
    assert!(!record.is_color);
    assert!(record.is_generic);
    assert!(!record.is_high_capacity);
    assert!(record.alternatives.is_empty());
}

#[test]
fn safe_parse_ignores_unknown_fields() {
    let payload = with_field("_id", json!("64b7f0c2a1"));
    let record = TonerRecord::safe_parse(&payload).unwrap();
    assert_eq!(record.id.as_str(), "HP26A");
}

#[test]
fn safe_parse_keeps_alternative_order_and_duplicates() {
    let payload = with_field("alternatives", json!(["CF226X", "HP26A", "CF226X"]));
    let record = TonerRecord::safe_parse(&payload).unwrap();
    let ids: Vec<&str> = record.alternatives.iter().map(TonerId::as_str).collect();
    assert_eq!(ids, vec!["CF226X", "HP26A", "CF226X"]);
}

#[test]
fn safe_parse_names_missing_fields() {
    for field in ["id", "quantity", "isColor", "isGeneric", "isHighCapacity", "alternatives"] {
        let err = TonerRecord::safe_parse(&without_field(field)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: field.to_string()
            }
        );
    }
}

#[test]
fn safe_parse_names_mistyped_fields() {
    let cases = [
        ("id", json!(26)),
        ("quantity", json!("5")),
        ("isColor", json!("no")),
        ("isGeneric", json!(1)),
        ("isHighCapacity", json!(null)),
        ("alternatives", json!("CF226X")),
    ];
    for (field, value) in cases {
        let err = TonerRecord::safe_parse(&with_field(field, value)).unwrap_err();
        assert_eq!(err.field(), Some(field), "field {field}");
    }
}

#[test]
fn safe_parse_rejects_negative_and_fractional_quantity() {
    for value in [json!(-1), json!(2.5)] {
        let err = TonerRecord::safe_parse(&with_field("quantity", value)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "quantity"));
    }
}

#[test]
fn safe_parse_names_bad_alternative_index() {
    let payload = with_field("alternatives", json!(["CF226X", 7]));
    let err = TonerRecord::safe_parse(&payload).unwrap_err();
    assert_eq!(err.field(), Some("alternatives[1]"));
}

#[test]
fn safe_parse_rejects_non_objects() {
    let err = TonerRecord::safe_parse(&json!(["HP26A"])).unwrap_err();
    assert_eq!(
        err,
        ValidationError::NotAnObject {
            found: "an array"
        }
    );
    assert_eq!(err.field(), None);
}

#[test]
fn strict_parse_reports_document_id() {
    let err = TonerRecord::strict_parse(&without_field("quantity")).unwrap_err();
    assert_eq!(err.id.as_deref(), Some("HP26A"));
    assert!(err.to_string().contains("HP26A"));
    assert!(err.to_string().contains("quantity"));
}

#[test]
fn serialized_record_uses_camel_case_fields() {
    let record = TonerRecord::safe_parse(&hp26a()).unwrap();
    assert_eq!(record.to_document().unwrap(), hp26a());
}
