//! Search engine port and the in-process fallback engine.
//!
//! This module defines the `SearchEngine` trait that all engine
//! implementations must satisfy, plus `MemoryEngine`, an in-process
//! hash-map engine.
//!
//! # Engines
//!
//! - `MemoryEngine`: in-process map, used as fallback and in tests
//! - external full-text engines live out of tree behind the same trait
//!
//! The adapter never calls a mutating operation without holding the locks
//! in [`crate::locks::LockCoordinator`]; an engine may still apply its own
//! internal synchronization, since it is shared across all callers of one
//! index.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;
use yndex_core::{Error, Result};

use crate::collate::{Collation, Key, KeyType};
use crate::types::{RecordRef, ValueSet};

/// Callback surface an engine holds to reach back into the index that
/// manages it.
///
/// The binding is a back-reference, not an ownership relation: engines
/// store it as a `Weak` handle, set exactly once at index creation.
pub trait ManagedIndex: Send + Sync {
    /// Name of the managing index.
    fn name(&self) -> &str;

    /// Declared key type of the managing index.
    fn key_type(&self) -> KeyType;

    /// Collation of the managing index.
    fn collation(&self) -> Collation;
}

/// Abstract search engine behind the index adapter.
///
/// Implementations own storage and lookup of key → value-set
/// associations. Keys arrive already collated.
pub trait SearchEngine: Send + Sync {
    /// Store the value set for a key, replacing any existing set.
    fn put(&self, key: &Key, values: ValueSet) -> Result<()>;

    /// Look up the value set for a key. `None` when the key has no entry.
    fn get(&self, key: &Key) -> Result<Option<ValueSet>>;

    /// Disassociate one record reference from a key's value set.
    ///
    /// Returns `false` when the pair was not associated. Only called when
    /// [`supports_removal`](Self::supports_removal) reports `true`.
    fn remove(&self, key: &Key, rref: &RecordRef) -> Result<bool>;

    /// Drop every association. Rebuild calls this before repopulating.
    fn clear(&self) -> Result<()>;

    /// Whether this engine can remove a single reference from a key's
    /// value set. Engines without this capability degrade `remove` to a
    /// "not removed" answer at the adapter.
    fn supports_removal(&self) -> bool;

    /// Bind the managing index into the engine.
    ///
    /// Happens exactly once, at index creation, before the engine receives
    /// any other call. A second bind fails with [`Error::AlreadyBound`].
    fn bind_managed_index(&self, index: Weak<dyn ManagedIndex>) -> Result<()>;

    /// Signal that a structural rebuild is starting (`true`) or has
    /// finished (`false`), so the engine can suppress or redirect
    /// concurrent traffic.
    fn set_rebuilding(&self, rebuilding: bool);

    /// Engine name for diagnostics.
    fn name(&self) -> &str;
}

/// In-process hash-map engine.
///
/// Used as a fallback when no full-text engine is configured, and as the
/// engine in tests. Associations live in a map under a readers-writer
/// lock; the adapter's lock discipline still governs all traffic.
pub struct MemoryEngine {
    entries: RwLock<HashMap<Key, ValueSet>>,
    managed: OnceLock<Weak<dyn ManagedIndex>>,
    rebuilding: AtomicBool,
    removal_supported: bool,
}

impl MemoryEngine {
    /// Create an engine with full capabilities.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            managed: OnceLock::new(),
            rebuilding: AtomicBool::new(false),
            removal_supported: true,
        }
    }

    /// Variant without value-scoped removal.
    ///
    /// Models engines that only ever accumulate; the adapter degrades
    /// `remove` against it to `Ok(false)`.
    pub fn append_only() -> Self {
        Self {
            removal_supported: false,
            ..Self::new()
        }
    }

    /// Whether the engine is currently flagged as rebuilding.
    pub fn is_rebuilding(&self) -> bool {
        self.rebuilding.load(Ordering::Acquire)
    }

    /// The managing index bound at creation, if still alive.
    pub fn managed_index(&self) -> Option<Arc<dyn ManagedIndex>> {
        self.managed.get().and_then(Weak::upgrade)
    }

    /// Number of keys currently holding a value set.
    pub fn key_count(&self) -> usize {
        self.entries.read().len()
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine for MemoryEngine {
    fn put(&self, key: &Key, values: ValueSet) -> Result<()> {
        self.entries.write().insert(key.clone(), values);
        Ok(())
    }

    fn get(&self, key: &Key) -> Result<Option<ValueSet>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn remove(&self, key: &Key, rref: &RecordRef) -> Result<bool> {
        if !self.removal_supported {
            return Ok(false);
        }
        let mut entries = self.entries.write();
        match entries.get_mut(key) {
            Some(values) => Ok(values.remove(rref)),
            None => Ok(false),
        }
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn supports_removal(&self) -> bool {
        self.removal_supported
    }

    fn bind_managed_index(&self, index: Weak<dyn ManagedIndex>) -> Result<()> {
        self.managed
            .set(index)
            .map_err(|_| Error::already_bound(self.name()))
    }

    fn set_rebuilding(&self, rebuilding: bool) {
        self.rebuilding.store(rebuilding, Ordering::Release);
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl fmt::Debug for MemoryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryEngine")
            .field("keys", &self.key_count())
            .field("removal_supported", &self.removal_supported)
            .field("rebuilding", &self.is_rebuilding())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
