// toner-stock-core/src/runtime/handlers.rs
// ============================================================================
// Module: Toner Request Handlers
// Description: List/Get, Create, and Update handlers over the toner gateway.
// Purpose: Translate method, path identifier, and body into gateway calls.
// Dependencies: crate::{core, interfaces, runtime::store}, serde, thiserror
// ============================================================================

//! ## Overview
//! [`TonerHandlers`] implements the three toner API operations. Each handler
//! is a pure translation layer: it checks the request shape, validates the
//! payload through the record schema, and performs at most one existence
//! check plus one write through [`SharedTonerCollection`]. Handlers keep no
//! state between requests. Every failure is returned as a [`HandlerError`];
//! nothing is logged and swallowed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::MalformedRecord;
use crate::core::TonerId;
use crate::core::TonerRecord;
use crate::core::ValidationError;
use crate::core::record::FIELD_ID;
use crate::interfaces::StoreError;
use crate::interfaces::TonerCollection;
use crate::runtime::store::SharedTonerCollection;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path token that selects the whole collection on the read route.
pub const ALL_TONERS_TOKEN: &str = "all";
/// Message returned when the path and body identifiers differ.
const ID_MISMATCH_MESSAGE: &str = "ID in URL and body do not match";
/// Message returned when no record matches the identifier.
const NOT_FOUND_MESSAGE: &str = "Toner not found";
/// Message returned when Create targets an existing identifier.
const ALREADY_EXISTS_MESSAGE: &str = "Toner already exists";
/// Message returned when Create targets the listing token.
const RESERVED_ID_MESSAGE: &str = "Toner ID 'all' is reserved for the listing";
/// Accepted-method message for the read route.
const GET_ONLY_MESSAGE: &str = "This route only accepts get requests";
/// Accepted-method message for the create route.
const POST_ONLY_MESSAGE: &str =
    "This route only accepts post requests with a toner object in the body";
/// Accepted-method message for the update route.
const PUT_ONLY_MESSAGE: &str =
    "This route only accepts put requests with a toner object in the body";

// ============================================================================
// SECTION: Request Types
// ============================================================================

/// Request method as seen by the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMethod {
    /// Read request.
    Get,
    /// Create request.
    Post,
    /// Full-replace update request.
    Put,
    /// Any other method, kept verbatim for error reporting.
    Other(String),
}

impl RequestMethod {
    /// Parses an HTTP method token (case-sensitive, as HTTP requires).
    #[must_use]
    pub fn parse(method: &str) -> Self {
        match method {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the method token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-agnostic toner request.
#[derive(Debug, Clone, PartialEq)]
pub struct TonerRequest {
    /// Request method.
    pub method: RequestMethod,
    /// Identifier taken from the request path.
    pub path_id: TonerId,
    /// Parsed JSON body, when one was sent.
    pub body: Option<Value>,
}

impl TonerRequest {
    /// Creates a request without a body.
    #[must_use]
    pub fn new(method: RequestMethod, path_id: impl Into<TonerId>) -> Self {
        Self {
            method,
            path_id: path_id.into(),
            body: None,
        }
    }

    /// Attaches a JSON body to the request.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the `id` string carried by the body, if any.
    fn body_id(&self) -> Option<&str> {
        self.body.as_ref().and_then(|body| body.get(FIELD_ID)).and_then(Value::as_str)
    }
}

/// Successful handler payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TonerReply {
    /// A single record.
    Record(TonerRecord),
    /// Every record in the collection.
    Records(Vec<TonerRecord>),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Handler outcomes other than success.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Wrong method or inconsistent path/body identifiers.
    #[error("{0}")]
    BadRequest(String),
    /// No record exists for the identifier.
    #[error("{0}")]
    NotFound(String),
    /// Submitted payload does not match the record schema.
    #[error("invalid toner record: {0}")]
    Validation(#[from] ValidationError),
    /// Create targeted an identifier that already exists.
    #[error("{0}")]
    Conflict(String),
    /// Stored data no longer matches the record schema.
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecord),
    /// Gateway failure.
    #[error(transparent)]
    Store(StoreError),
}

impl HandlerError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::MalformedRecord(_) => "malformed_record",
            Self::Store(_) => "store",
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict(_) => Self::Conflict(ALREADY_EXISTS_MESSAGE.to_string()),
            other => Self::Store(other),
        }
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Toner API handlers over a shared collection handle.
#[derive(Clone)]
pub struct TonerHandlers {
    /// Gateway to the toner collection.
    collection: SharedTonerCollection,
}

impl TonerHandlers {
    /// Creates handlers over the given collection.
    #[must_use]
    pub const fn new(collection: SharedTonerCollection) -> Self {
        Self {
            collection,
        }
    }

    /// Handles `GET /toner/{id|all}`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::BadRequest`] for non-GET methods,
    /// [`HandlerError::NotFound`] for unknown identifiers, and
    /// [`HandlerError::MalformedRecord`] when any stored document fails strict
    /// parsing.
    pub fn handle_get(&self, request: &TonerRequest) -> Result<TonerReply, HandlerError> {
        if request.method != RequestMethod::Get {
            return Err(HandlerError::BadRequest(GET_ONLY_MESSAGE.to_string()));
        }
        if request.path_id.as_str() == ALL_TONERS_TOKEN {
            let records = self
                .collection
                .find_all()?
                .iter()
                .map(TonerRecord::strict_parse)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(TonerReply::Records(records));
        }
        let document = self
            .collection
            .find_by_id(&request.path_id)?
            .ok_or_else(|| HandlerError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;
        Ok(TonerReply::Record(TonerRecord::strict_parse(&document)?))
    }

    /// Handles `POST /toner/{id}/add`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::BadRequest`] for non-POST methods, an
    /// identifier mismatch, or the reserved listing identifier,
    /// [`HandlerError::Validation`] for invalid bodies,
    /// and [`HandlerError::Conflict`] when the identifier is taken.
    pub fn handle_create(&self, request: &TonerRequest) -> Result<TonerReply, HandlerError> {
        if request.method != RequestMethod::Post {
            return Err(HandlerError::BadRequest(POST_ONLY_MESSAGE.to_string()));
        }
        ensure_matching_ids(request)?;
        if request.path_id.as_str() == ALL_TONERS_TOKEN {
            return Err(HandlerError::BadRequest(RESERVED_ID_MESSAGE.to_string()));
        }
        let record = validated_body(request)?;
        if self.collection.find_by_id(&record.id)?.is_some() {
            return Err(HandlerError::Conflict(ALREADY_EXISTS_MESSAGE.to_string()));
        }
        self.collection.insert(&record)?;
        Ok(TonerReply::Record(record))
    }

    /// Handles `PUT /toner/{id}/put`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::BadRequest`] for non-PUT methods or an
    /// identifier mismatch, [`HandlerError::NotFound`] when no record exists,
    /// and [`HandlerError::Validation`] for invalid bodies.
    pub fn handle_update(&self, request: &TonerRequest) -> Result<TonerReply, HandlerError> {
        if request.method != RequestMethod::Put {
            return Err(HandlerError::BadRequest(PUT_ONLY_MESSAGE.to_string()));
        }
        ensure_matching_ids(request)?;
        if self.collection.find_by_id(&request.path_id)?.is_none() {
            return Err(HandlerError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
        let record = validated_body(request)?;
        // Record removed out-of-band between the check and the write.
        if self.collection.update_by_id(&record.id, &record)? == 0 {
            return Err(HandlerError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
        Ok(TonerReply::Record(record))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects requests whose body `id` differs from the path identifier.
fn ensure_matching_ids(request: &TonerRequest) -> Result<(), HandlerError> {
    if request.body_id() == Some(request.path_id.as_str()) {
        Ok(())
    } else {
        Err(HandlerError::BadRequest(ID_MISMATCH_MESSAGE.to_string()))
    }
}

/// Safe-parses the request body; a missing body fails as a non-object.
fn validated_body(request: &TonerRequest) -> Result<TonerRecord, HandlerError> {
    let body = request.body.as_ref().unwrap_or(&Value::Null);
    Ok(TonerRecord::safe_parse(body)?)
}
