// toner-stock-core/src/core/mod.rs
// ============================================================================
// Module: Toner Stock Core Types
// Description: Identifier and record types for toner inventory.
// Purpose: Group the data model behind a single re-export surface.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types define the toner record and its identifier.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod identifiers;
pub mod record;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::TonerId;
pub use record::MalformedRecord;
pub use record::TonerRecord;
pub use record::ValidationError;
