// toner-stock-core/src/interfaces/mod.rs
// ============================================================================
// Module: Toner Stock Interfaces
// Description: Backend-agnostic persistence gateway for toner documents.
// Purpose: Define the only seam through which request handlers reach storage.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`TonerCollection`] abstracts the single toner collection. Reads return raw
//! JSON documents so the caller decides how strictly to validate them; writes
//! take already-validated [`TonerRecord`] values. Implementations must treat
//! the store as the single source of truth: no client-side caching and no
//! assumption of exclusive access.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::TonerId;
use crate::core::TonerRecord;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Persistence gateway errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("toner store io error: {0}")]
    Io(String),
    /// Store data is corrupted.
    #[error("toner store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("toner store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("toner store invalid data: {0}")]
    Invalid(String),
    /// A document with the same identifier already exists.
    #[error("toner store conflict: {0}")]
    Conflict(String),
    /// Store reported an error.
    #[error("toner store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Gateway over the single collection of toner documents.
pub trait TonerCollection {
    /// Returns every document in the collection in store-native order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be read.
    fn find_all(&self) -> Result<Vec<Value>, StoreError>;

    /// Returns the document whose `id` field matches exactly.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be read.
    fn find_by_id(&self, id: &TonerId) -> Result<Option<Value>, StoreError>;

    /// Inserts one document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the store's key semantics reject
    /// a duplicate identifier, or another [`StoreError`] on failure.
    fn insert(&self, record: &TonerRecord) -> Result<(), StoreError>;

    /// Replaces every field of the document with the given `id` and returns
    /// the number of documents affected (zero when none matched).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn update_by_id(&self, id: &TonerId, record: &TonerRecord) -> Result<u64, StoreError>;
}
