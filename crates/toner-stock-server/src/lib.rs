// toner-stock-server/src/lib.rs
// ============================================================================
// Module: Toner Stock Server Library
// Description: HTTP transport and audit logging for the toner API.
// Purpose: Serve the toner handlers over axum.
// Dependencies: toner-stock-core, toner-stock-config, toner-stock-store-sqlite, axum
// ============================================================================

//! ## Overview
//! `toner-stock-server` builds the configured toner collection, wires it into
//! the core handlers, and serves them over HTTP. Request outcomes are written
//! as JSON-line audit events.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::ServerNoticeEvent;
pub use audit::TonerAuditEvent;
pub use audit::TonerAuditEventParams;
pub use audit::TonerAuditSink;
pub use audit::TonerFileAuditSink;
pub use audit::TonerNoopAuditSink;
pub use audit::TonerOutcome;
pub use audit::TonerStderrAuditSink;
pub use server::ServerError;
pub use server::TonerServer;
