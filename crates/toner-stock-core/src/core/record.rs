// toner-stock-core/src/core/record.rs
// ============================================================================
// Module: Toner Record Schema
// Description: Canonical toner record shape and its validation entry points.
// Purpose: Turn untrusted JSON into well-typed records with field-level errors.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`TonerRecord`] is the single entity of the inventory. Two validation
//! modes are offered over arbitrary JSON:
//! - [`TonerRecord::safe_parse`] for client-submitted payloads. Failures are an
//!   expected outcome and name the offending field.
//! - [`TonerRecord::strict_parse`] for documents read back from the store. A
//!   failure there means the store holds malformed data.
//!
//! Fields not named by the schema are ignored so that store-side metadata does
//! not break reads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::TonerId;

// ============================================================================
// SECTION: Field Names
// ============================================================================

/// Wire name of the identifier field.
pub const FIELD_ID: &str = "id";
/// Wire name of the stock quantity field.
pub const FIELD_QUANTITY: &str = "quantity";
/// Wire name of the color flag.
pub const FIELD_IS_COLOR: &str = "isColor";
/// Wire name of the high-capacity flag.
pub const FIELD_IS_HIGH_CAPACITY: &str = "isHighCapacity";
/// Wire name of the generic flag.
pub const FIELD_IS_GENERIC: &str = "isGeneric";
/// Wire name of the alternatives list.
pub const FIELD_ALTERNATIVES: &str = "alternatives";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Inventory entry for one toner cartridge type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TonerRecord {
    /// Cartridge identifier; primary key of the collection.
    pub id: TonerId,
    /// Units currently in stock.
    pub quantity: u32,
    /// Whether the cartridge prints in color.
    pub is_color: bool,
    /// Whether the cartridge is a high-capacity variant.
    pub is_high_capacity: bool,
    /// Whether the cartridge is a generic (non-OEM) product.
    pub is_generic: bool,
    /// Identifiers of compatible substitute cartridges, in display order.
    pub alternatives: Vec<TonerId>,
}

/// Schema validation failure for a toner payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The payload is not a JSON object.
    #[error("toner record must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON kind that was found instead.
        found: &'static str,
    },
    /// A required field is absent.
    #[error("missing field `{field}`")]
    MissingField {
        /// Offending field name.
        field: String,
    },
    /// A field is present with the wrong type or an unrepresentable value.
    #[error("field `{field}` must be {expected}, found {found}")]
    InvalidField {
        /// Offending field name (array elements carry their index).
        field: String,
        /// Human-readable description of the expected type.
        expected: &'static str,
        /// Description of the value that was found.
        found: String,
    },
}

impl ValidationError {
    /// Returns the offending field name when the failure is field-scoped.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotAnObject {
                ..
            } => None,
            Self::MissingField {
                field,
            }
            | Self::InvalidField {
                field,
                ..
            } => Some(field),
        }
    }
}

/// Stored document that does not satisfy the record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed stored toner record {}: {source}", .id.as_deref().unwrap_or("<unknown id>"))]
pub struct MalformedRecord {
    /// Identifier of the document when it could be read.
    pub id: Option<String>,
    /// Underlying schema failure.
    pub source: ValidationError,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

impl TonerRecord {
    /// Validates an untrusted payload without treating failure as a fault.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first field that does not match
    /// the schema.
    pub fn safe_parse(value: &Value) -> Result<Self, ValidationError> {
        let Value::Object(fields) = value else {
            return Err(ValidationError::NotAnObject {
                found: json_kind(value),
            });
        };
        Ok(Self {
            id: TonerId::new(require_string(fields, FIELD_ID)?),
            quantity: require_quantity(fields)?,
            is_color: require_bool(fields, FIELD_IS_COLOR)?,
            is_high_capacity: require_bool(fields, FIELD_IS_HIGH_CAPACITY)?,
            is_generic: require_bool(fields, FIELD_IS_GENERIC)?,
            alternatives: require_id_list(fields, FIELD_ALTERNATIVES)?,
        })
    }

    /// Validates a document read back from the store.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecord`] when the stored document violates the
    /// schema; callers surface this as an internal fault.
    pub fn strict_parse(value: &Value) -> Result<Self, MalformedRecord> {
        Self::safe_parse(value).map_err(|source| MalformedRecord {
            id: value.get(FIELD_ID).and_then(Value::as_str).map(str::to_string),
            source,
        })
    }

    /// Serializes the record into its JSON document form.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the named field or a missing-field error.
fn require<'a>(fields: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ValidationError> {
    fields.get(field).ok_or_else(|| ValidationError::MissingField {
        field: field.to_string(),
    })
}

/// Reads a required string field.
fn require_string(fields: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match require(fields, field)? {
        Value::String(text) => Ok(text.clone()),
        other => Err(invalid(field, "a string", other)),
    }
}

/// Reads a required boolean field.
fn require_bool(fields: &Map<String, Value>, field: &str) -> Result<bool, ValidationError> {
    match require(fields, field)? {
        Value::Bool(flag) => Ok(*flag),
        other => Err(invalid(field, "a boolean", other)),
    }
}

/// Reads the quantity field as a non-negative 32-bit integer.
fn require_quantity(fields: &Map<String, Value>) -> Result<u32, ValidationError> {
    let value = require(fields, FIELD_QUANTITY)?;
    let expected = "a non-negative integer";
    let Value::Number(number) = value else {
        return Err(invalid(FIELD_QUANTITY, expected, value));
    };
    number.as_u64().and_then(|raw| u32::try_from(raw).ok()).ok_or_else(|| {
        ValidationError::InvalidField {
            field: FIELD_QUANTITY.to_string(),
            expected,
            found: number.to_string(),
        }
    })
}

/// Reads a required array of identifier strings.
fn require_id_list(
    fields: &Map<String, Value>,
    field: &str,
) -> Result<Vec<TonerId>, ValidationError> {
    let value = require(fields, field)?;
    let Value::Array(items) = value else {
        return Err(invalid(field, "an array of strings", value));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(text) => Ok(TonerId::new(text.clone())),
            other => Err(invalid(&format!("{field}[{index}]"), "a string", other)),
        })
        .collect()
}

/// Builds an invalid-field error describing the found JSON kind.
fn invalid(field: &str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        expected,
        found: json_kind(found).to_string(),
    }
}

/// Returns a short label for a JSON value's kind.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use serde_json::json;

    use super::*;

    #[test]
    fn json_kind_labels_every_variant() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!(true)), "a boolean");
        assert_eq!(json_kind(&json!(1)), "a number");
        assert_eq!(json_kind(&json!("x")), "a string");
        assert_eq!(json_kind(&json!([])), "an array");
        assert_eq!(json_kind(&json!({})), "an object");
    }

    #[test]
    fn quantity_rejects_values_beyond_u32() {
        let fields = json!({ "quantity": u64::from(u32::MAX) + 1 });
        let err = require_quantity(fields.as_object().unwrap()).unwrap_err();
        assert_eq!(err.field(), Some(FIELD_QUANTITY));
    }
}
