// toner-stock-core/src/lib.rs
// ============================================================================
// Module: Toner Stock Core Library
// Description: Public API surface for the Toner Stock core.
// Purpose: Expose the record schema, gateway interface, and request handlers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Toner Stock core owns the request-validation-and-persistence path shared by
//! the toner API routes. It is transport-agnostic: HTTP servers and tests hand
//! it a [`TonerRequest`] and receive a [`TonerReply`] or a [`HandlerError`].
//! Persistence goes exclusively through the [`TonerCollection`] gateway.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::StoreError;
pub use interfaces::TonerCollection;
pub use runtime::ALL_TONERS_TOKEN;
pub use runtime::HandlerError;
pub use runtime::InMemoryTonerCollection;
pub use runtime::RequestMethod;
pub use runtime::SharedTonerCollection;
pub use runtime::TonerHandlers;
pub use runtime::TonerReply;
pub use runtime::TonerRequest;
