// toner-stock-server/src/audit.rs
// ============================================================================
// Module: Toner Audit Logging
// Description: Structured audit events for toner request handling.
// Purpose: Emit one JSON line per handled request without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for toner request
//! logging. Events are serialized as single JSON lines so deployments can route
//! them to their preferred logging pipeline. Request bodies are never logged;
//! only the route, the path identifier, and the outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TonerOutcome {
    /// Handler produced a record or listing.
    Ok,
    /// Handler or transport rejected the request.
    Error,
}

/// Toner request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct TonerAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method as received.
    pub method: String,
    /// Route template that matched.
    pub route: &'static str,
    /// Toner identifier from the path.
    pub toner_id: String,
    /// Request outcome.
    pub outcome: TonerOutcome,
    /// HTTP status code returned.
    pub status: u16,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
}

/// Inputs required to construct a toner audit event.
pub struct TonerAuditEventParams {
    /// HTTP method as received.
    pub method: String,
    /// Route template that matched.
    pub route: &'static str,
    /// Toner identifier from the path.
    pub toner_id: String,
    /// Request outcome.
    pub outcome: TonerOutcome,
    /// HTTP status code returned.
    pub status: u16,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
}

/// Server lifecycle notice payload.
#[derive(Debug, Clone, Serialize)]
pub struct ServerNoticeEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Notice kind label.
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl TonerAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: TonerAuditEventParams) -> Self {
        Self {
            event: "toner_request",
            timestamp_ms: now_millis(),
            method: params.method,
            route: params.route,
            toner_id: params.toner_id,
            outcome: params.outcome,
            status: params.status,
            error_kind: params.error_kind,
            request_bytes: params.request_bytes,
        }
    }
}

impl ServerNoticeEvent {
    /// Creates a new notice with a consistent timestamp.
    #[must_use]
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            event: "server_notice",
            timestamp_ms: now_millis(),
            kind,
            message: message.into(),
        }
    }
}

/// Returns the current unix epoch in milliseconds.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for toner request events.
pub trait TonerAuditSink: Send + Sync {
    /// Record a request audit event.
    fn record(&self, event: &TonerAuditEvent);

    /// Record a server lifecycle notice.
    fn record_notice(&self, _event: &ServerNoticeEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct TonerStderrAuditSink;

impl TonerAuditSink for TonerStderrAuditSink {
    fn record(&self, event: &TonerAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_notice(&self, event: &ServerNoticeEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct TonerFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl TonerFileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized payload as a line.
    fn append(&self, payload: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl TonerAuditSink for TonerFileAuditSink {
    fn record(&self, event: &TonerAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.append(&payload);
        }
    }

    fn record_notice(&self, event: &ServerNoticeEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.append(&payload);
        }
    }
}

/// No-op audit sink.
pub struct TonerNoopAuditSink;

impl TonerAuditSink for TonerNoopAuditSink {
    fn record(&self, _event: &TonerAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
