//! Common types for the index adapter.
//!
//! These types are shared by the adapter, the engine port, and the rebuild
//! machinery, and are always available regardless of which engine is
//! plugged in.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collate::{Collation, KeyType};

/// An opaque, immutable reference to a stored record.
///
/// The index never owns the referenced record; it only associates the
/// reference with keys. Two references are the same association target
/// exactly when their identifiers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef(String);

impl RecordRef {
    /// Create a reference from a record identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying record identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The set of record references associated with one canonical key.
///
/// Membership is unordered and duplicate-free. An empty set and an absent
/// entry are the same observable outcome.
pub type ValueSet = HashSet<RecordRef>;

/// Index configuration.
///
/// Callers provide this when creating an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index name, used in errors and diagnostics.
    pub name: String,

    /// Declared key type; put rejects keys of any other type.
    #[serde(default)]
    pub key_type: KeyType,

    /// Collation applied to every key before engine delegation.
    #[serde(default)]
    pub collation: Collation,

    /// Populate the engine from the record source at creation time.
    #[serde(default = "default_true")]
    pub populate_on_create: bool,
}

fn default_true() -> bool {
    true
}

impl IndexConfig {
    /// Configuration with defaults for everything but the name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_type: KeyType::default(),
            collation: Collation::default(),
            populate_on_create: default_true(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
