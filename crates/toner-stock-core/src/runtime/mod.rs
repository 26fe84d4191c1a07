// toner-stock-core/src/runtime/mod.rs
// ============================================================================
// Module: Toner Stock Runtime
// Description: Request handlers and reference gateway implementations.
// Purpose: Group runtime components behind a single re-export surface.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules hold the three toner request handlers and the in-memory
//! gateway used by tests and local runs. Every transport calls into the same
//! handlers.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod handlers;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use handlers::ALL_TONERS_TOKEN;
pub use handlers::HandlerError;
pub use handlers::RequestMethod;
pub use handlers::TonerHandlers;
pub use handlers::TonerReply;
pub use handlers::TonerRequest;
pub use store::InMemoryTonerCollection;
pub use store::SharedTonerCollection;
