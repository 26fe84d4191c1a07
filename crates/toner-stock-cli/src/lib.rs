// toner-stock-cli/src/lib.rs
// ============================================================================
// Module: Toner Stock CLI Library
// Description: Shared helpers for the Toner Stock command-line interface.
// Purpose: Provide the API client and table rendering for the binary and tests.
// Dependencies: reqwest, toner-stock-core
// ============================================================================

//! ## Overview
//! This library houses the inventory client used by the `list`, `add`, and
//! `edit` commands, plus the drafting and table helpers that shape their
//! input and output. The binary entry point (`src/main.rs`) dispatches to them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod inventory;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ClientError;
pub use client::TonerApiClient;
pub use inventory::DraftError;
pub use inventory::TonerDraft;
pub use inventory::render_stock_table;
