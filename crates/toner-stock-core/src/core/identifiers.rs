// toner-stock-core/src/core/identifiers.rs
// ============================================================================
// Module: Toner Identifiers
// Description: Opaque identifier for a toner cartridge type.
// Purpose: Provide a strongly typed, serializable key with a stable string form.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`TonerId`] is the primary key of the toner collection. It serializes as a
//! plain string. Case normalization is the caller's job: the server compares
//! identifiers exactly, and clients upper-case them before building a path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Toner cartridge identifier (for example `HP26A`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TonerId(String);

impl TonerId {
    /// Creates a new toner identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates an identifier normalized to upper case.
    #[must_use]
    pub fn normalized(id: &str) -> Self {
        Self(id.trim().to_uppercase())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TonerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TonerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TonerId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for TonerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
