// toner-stock-core/src/runtime/store.rs
// ============================================================================
// Module: Toner Stock In-Memory Collection
// Description: Simple in-memory toner collection for tests and local demos.
// Purpose: Provide a deterministic gateway implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides [`InMemoryTonerCollection`], a document list guarded by
//! a mutex, and [`SharedTonerCollection`], the clonable handle the request
//! handlers hold. The in-memory collection keeps insertion order and enforces
//! identifier uniqueness the way a unique index would. It is not intended for
//! production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;

use crate::core::TonerId;
use crate::core::TonerRecord;
use crate::core::record::FIELD_ID;
use crate::interfaces::StoreError;
use crate::interfaces::TonerCollection;

// ============================================================================
// SECTION: In-Memory Collection
// ============================================================================

/// In-memory toner collection for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTonerCollection {
    /// Documents in insertion order, protected by a mutex.
    documents: Arc<Mutex<Vec<Value>>>,
}

impl InMemoryTonerCollection {
    /// Creates an empty in-memory collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a collection seeded with raw documents.
    ///
    /// Documents are stored as given, without schema validation, so callers
    /// can model data that drifted from the record shape.
    #[must_use]
    pub fn with_documents(documents: Vec<Value>) -> Self {
        Self {
            documents: Arc::new(Mutex::new(documents)),
        }
    }
}

impl TonerCollection for InMemoryTonerCollection {
    fn find_all(&self) -> Result<Vec<Value>, StoreError> {
        let guard = self
            .documents
            .lock()
            .map_err(|_| StoreError::Store("toner collection mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn find_by_id(&self, id: &TonerId) -> Result<Option<Value>, StoreError> {
        let guard = self
            .documents
            .lock()
            .map_err(|_| StoreError::Store("toner collection mutex poisoned".to_string()))?;
        Ok(guard.iter().find(|document| document_matches(document, id)).cloned())
    }

    fn insert(&self, record: &TonerRecord) -> Result<(), StoreError> {
        let document = record.to_document().map_err(|err| StoreError::Invalid(err.to_string()))?;
        let mut guard = self
            .documents
            .lock()
            .map_err(|_| StoreError::Store("toner collection mutex poisoned".to_string()))?;
        if guard.iter().any(|existing| document_matches(existing, &record.id)) {
            return Err(StoreError::Conflict(format!("duplicate toner id {}", record.id)));
        }
        guard.push(document);
        drop(guard);
        Ok(())
    }

    fn update_by_id(&self, id: &TonerId, record: &TonerRecord) -> Result<u64, StoreError> {
        let document = record.to_document().map_err(|err| StoreError::Invalid(err.to_string()))?;
        let mut guard = self
            .documents
            .lock()
            .map_err(|_| StoreError::Store("toner collection mutex poisoned".to_string()))?;
        let Some(slot) = guard.iter_mut().find(|existing| document_matches(existing, id)) else {
            return Ok(0);
        };
        *slot = document;
        drop(guard);
        Ok(1)
    }
}

/// Returns true when the document's `id` field equals the identifier.
fn document_matches(document: &Value, id: &TonerId) -> bool {
    document.get(FIELD_ID).and_then(Value::as_str) == Some(id.as_str())
}

// ============================================================================
// SECTION: Shared Collection
// ============================================================================

/// Shared toner collection backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedTonerCollection {
    /// Inner collection implementation.
    inner: Arc<dyn TonerCollection + Send + Sync>,
}

impl SharedTonerCollection {
    /// Wraps a collection in a shared, clonable handle.
    #[must_use]
    pub fn from_collection(collection: impl TonerCollection + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(collection),
        }
    }

    /// Wraps an existing shared collection.
    #[must_use]
    pub const fn new(collection: Arc<dyn TonerCollection + Send + Sync>) -> Self {
        Self {
            inner: collection,
        }
    }
}

impl TonerCollection for SharedTonerCollection {
    fn find_all(&self) -> Result<Vec<Value>, StoreError> {
        self.inner.find_all()
    }

    fn find_by_id(&self, id: &TonerId) -> Result<Option<Value>, StoreError> {
        self.inner.find_by_id(id)
    }

    fn insert(&self, record: &TonerRecord) -> Result<(), StoreError> {
        self.inner.insert(record)
    }

    fn update_by_id(&self, id: &TonerId, record: &TonerRecord) -> Result<u64, StoreError> {
        self.inner.update_by_id(id, record)
    }
}
