// toner-stock-config/src/lib.rs
// ============================================================================
// Module: Toner Stock Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for toner-stock.toml semantics.
// Dependencies: toner-stock-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `toner-stock-config` defines the configuration model for the Toner Stock
//! service: server bind and body limits, store backend selection, and audit
//! logging. Validation is strict and fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
