// toner-stock-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Toner Collection
// Description: Durable TonerCollection backend using SQLite WAL.
// Purpose: Provide production persistence for toner documents.
// Dependencies: toner-stock-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`TonerCollection`] implementation that
//! stores each toner record as a JSON document keyed by its identifier.
//! Database contents are treated as untrusted on read.
//!
//! [`TonerCollection`]: toner_stock_core::TonerCollection

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_DOCUMENT_BYTES;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::SqliteTonerCollection;
