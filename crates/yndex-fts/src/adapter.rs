//! The index adapter.
//!
//! `SearchIndex` composes the collator, the lock coordinator, the rebuild
//! machinery, and the engine port: it validates index state, collates
//! keys, acquires the correct lock class, delegates to the engine, and
//! normalizes absent results.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use yndex_core::{Error, Result};

use crate::collate::{Collation, Key, KeyType};
use crate::engine::{ManagedIndex, SearchEngine};
use crate::locks::LockCoordinator;
use crate::rebuild::{
    LogProgress, ProgressListener, RebuildState, RebuildingGuard, RecordSource, repopulate,
};
use crate::types::{IndexConfig, RecordRef, ValueSet};

/// A secondary index backed by a pluggable search engine.
///
/// One key maps to a set of [`RecordRef`]s. Every key passes through the
/// configured [`Collation`] before reaching the engine, and every
/// operation runs under the lock discipline described in [`crate::locks`].
///
/// Cloning is cheap; clones share the same underlying index state, so one
/// index can be driven from many threads.
#[derive(Clone)]
pub struct SearchIndex {
    inner: Arc<IndexInner>,
}

struct IndexInner {
    name: String,
    key_type: KeyType,
    collation: Collation,
    engine: Arc<dyn SearchEngine>,
    source: Arc<dyn RecordSource>,
    locks: LockCoordinator,
    rebuild_required: AtomicBool,
    state: Mutex<RebuildState>,
}

impl ManagedIndex for IndexInner {
    fn name(&self) -> &str {
        &self.name
    }

    fn key_type(&self) -> KeyType {
        self.key_type
    }

    fn collation(&self) -> Collation {
        self.collation
    }
}

impl SearchIndex {
    /// Create an index over the given engine and record source.
    ///
    /// The index binds itself into the engine first, exactly once, so the
    /// engine never receives traffic without a managed-index binding.
    /// When `config.populate_on_create` is set, creation finishes with an
    /// initial [`rebuild`](Self::rebuild).
    pub fn create(
        config: IndexConfig,
        engine: Arc<dyn SearchEngine>,
        source: Arc<dyn RecordSource>,
    ) -> Result<Self> {
        let populate = config.populate_on_create;
        let inner = Arc::new(IndexInner {
            name: config.name,
            key_type: config.key_type,
            collation: config.collation,
            engine,
            source,
            locks: LockCoordinator::new(),
            rebuild_required: AtomicBool::new(false),
            state: Mutex::new(RebuildState::Normal),
        });

        let managed: Arc<dyn ManagedIndex> = inner.clone();
        inner.engine.bind_managed_index(Arc::downgrade(&managed))?;

        let index = Self { inner };
        if populate {
            index.rebuild(&LogProgress)?;
        }
        Ok(index)
    }

    /// Associate a single record reference with a key.
    ///
    /// Replaces whatever value set existed for the key; it does not
    /// merge. Callers that need multi-value accumulation must have
    /// already obtained the existing set. Returns the index for fluent
    /// chaining; any failure propagates as an error.
    pub fn put(&self, key: Key, rref: RecordRef) -> Result<&Self> {
        self.check_for_rebuild()?;
        let key = self.inner.collation.collate(key);

        let _gate = self.inner.locks.modification();
        let _lock = self.inner.locks.exclusive();

        self.check_for_key_type(&key)?;
        log::debug!("index '{}': put {key} -> {rref}", self.inner.name);
        self.inner.engine.put(&key, ValueSet::from([rref]))?;
        Ok(self)
    }

    /// Look up the value set for a key.
    ///
    /// Returns an empty set when the key has no entry: "no matches" and
    /// "empty set" are the same observable outcome. Reads take only the
    /// shared lock, never the modification gate.
    pub fn get(&self, key: Key) -> Result<ValueSet> {
        self.check_for_rebuild()?;
        let key = self.inner.collation.collate(key);

        let _lock = self.inner.locks.shared();

        let values = self.inner.engine.get(&key)?;
        Ok(values.unwrap_or_default())
    }

    /// Disassociate one record reference from a key.
    ///
    /// Value-scoped: other references sharing the key are untouched.
    /// Returns `false` when the pair was not associated, and also when
    /// the bound engine does not support value-scoped removal, which is
    /// a degraded capability, not an error.
    pub fn remove(&self, key: Key, rref: &RecordRef) -> Result<bool> {
        self.check_for_rebuild()?;
        let key = self.inner.collation.collate(key);

        let _gate = self.inner.locks.modification();
        let _lock = self.inner.locks.exclusive();

        if !self.inner.engine.supports_removal() {
            log::debug!(
                "index '{}': engine '{}' has no removal support, reporting not removed",
                self.inner.name,
                self.inner.engine.name()
            );
            return Ok(false);
        }
        self.inner.engine.remove(&key, rref)
    }

    /// Rebuild the index from the authoritative record source.
    ///
    /// Holds the modification gate for the whole rebuild, so no ordinary
    /// mutation is observed mid-rebuild and rebuild never runs
    /// concurrently with itself. The engine's rebuilding flag is raised
    /// for the duration and cleared on every exit path, including
    /// failure. A successful rebuild clears the rebuild-required flag and
    /// returns the number of record associations indexed.
    pub fn rebuild(&self, listener: &dyn ProgressListener) -> Result<u64> {
        let inner = &*self.inner;
        log::info!("index '{}': rebuild starting", inner.name);

        let _gate = inner.locks.modification();
        let _flag = RebuildingGuard::raise(inner.engine.as_ref(), &inner.state);

        let outcome = {
            let _lock = inner.locks.exclusive();
            repopulate(
                inner.engine.as_ref(),
                inner.source.as_ref(),
                inner.key_type,
                inner.collation,
                listener,
            )
        };

        listener.on_completion(outcome.is_ok());
        match outcome {
            Ok(count) => {
                inner.rebuild_required.store(false, Ordering::Release);
                log::info!(
                    "index '{}': rebuild indexed {count} record associations",
                    inner.name
                );
                Ok(count)
            }
            Err(err) => {
                log::warn!("index '{}': rebuild failed: {err}", inner.name);
                Err(err)
            }
        }
    }

    /// Mark the index structurally invalid.
    ///
    /// Every public operation fails with [`Error::RebuildRequired`] until
    /// a successful [`rebuild`](Self::rebuild) clears the flag.
    pub fn mark_rebuild_required(&self) {
        self.inner.rebuild_required.store(true, Ordering::Release);
    }

    /// Whether the index currently requires a rebuild.
    pub fn is_rebuild_required(&self) -> bool {
        self.inner.rebuild_required.load(Ordering::Acquire)
    }

    /// Current structural state.
    pub fn rebuild_state(&self) -> RebuildState {
        *self.inner.state.lock()
    }

    /// Index name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Declared key type.
    pub fn key_type(&self) -> KeyType {
        self.inner.key_type
    }

    /// Configured collation.
    pub fn collation(&self) -> Collation {
        self.inner.collation
    }

    fn check_for_rebuild(&self) -> Result<()> {
        if self.is_rebuild_required() {
            return Err(Error::rebuild_required(&self.inner.name));
        }
        Ok(())
    }

    fn check_for_key_type(&self, key: &Key) -> Result<()> {
        if key.key_type() != self.inner.key_type {
            return Err(Error::invalid_key_type(
                &self.inner.name,
                self.inner.key_type,
                key.key_type(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchIndex")
            .field("name", &self.inner.name)
            .field("key_type", &self.inner.key_type)
            .field("collation", &self.inner.collation)
            .field("engine", &self.inner.engine.name())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
