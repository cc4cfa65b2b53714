//! Rebuild orchestration.
//!
//! Rebuild re-derives every key → value-set association from the
//! authoritative record source and repopulates the engine. For the whole
//! duration the engine is told a rebuild is in flight via its rebuilding
//! flag; the flag is raised and cleared by a scope guard, so no exit path
//! can leave it stuck.

use std::collections::HashMap;

use parking_lot::Mutex;
use yndex_core::Result;

use crate::collate::{Collation, Key, KeyType};
use crate::engine::SearchEngine;
use crate::types::{RecordRef, ValueSet};

/// Structural state of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildState {
    /// Normal traffic.
    Normal,
    /// A structural rebuild is in flight.
    Rebuilding,
}

/// Progress callbacks for long-running rebuilds.
///
/// All methods default to no-ops; implement the ones you need.
pub trait ProgressListener: Send + Sync {
    /// Called once before repopulation starts, with the number of record
    /// associations about to be processed.
    fn on_begin(&self, total: u64) {
        let _ = total;
    }

    /// Called after each record association is processed.
    fn on_progress(&self, processed: u64) {
        let _ = processed;
    }

    /// Called once when the rebuild finishes, successfully or not.
    fn on_completion(&self, success: bool) {
        let _ = success;
    }
}

/// Listener that reports rebuild progress through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressListener for LogProgress {
    fn on_begin(&self, total: u64) {
        log::info!("rebuild started: {total} record associations to process");
    }

    fn on_completion(&self, success: bool) {
        if success {
            log::info!("rebuild finished");
        } else {
            log::warn!("rebuild failed");
        }
    }
}

/// Authoritative view of the record store, scanned during rebuild.
pub trait RecordSource: Send + Sync {
    /// Every (key, record reference) association the index should hold.
    fn scan(&self) -> Result<Vec<(Key, RecordRef)>>;
}

impl RecordSource for Vec<(Key, RecordRef)> {
    fn scan(&self) -> Result<Vec<(Key, RecordRef)>> {
        Ok(self.clone())
    }
}

/// Raises the rebuilding flag on construction and clears it on drop.
///
/// Drop runs on every exit path, so neither the engine nor the index can
/// be left flagged as rebuilding after a failed rebuild.
pub(crate) struct RebuildingGuard<'a> {
    engine: &'a dyn SearchEngine,
    state: &'a Mutex<RebuildState>,
}

impl<'a> RebuildingGuard<'a> {
    pub(crate) fn raise(engine: &'a dyn SearchEngine, state: &'a Mutex<RebuildState>) -> Self {
        *state.lock() = RebuildState::Rebuilding;
        engine.set_rebuilding(true);
        Self { engine, state }
    }
}

impl Drop for RebuildingGuard<'_> {
    fn drop(&mut self) {
        self.engine.set_rebuilding(false);
        *self.state.lock() = RebuildState::Normal;
    }
}

/// Clear the engine and repopulate it from the record source.
///
/// Associations are merged per canonical key, so two records sharing a
/// key end up in one value set. Records whose key type does not match the
/// declared type are skipped with a warning rather than failing the
/// rebuild. Returns the number of record associations indexed.
pub(crate) fn repopulate(
    engine: &dyn SearchEngine,
    source: &dyn RecordSource,
    key_type: KeyType,
    collation: Collation,
    listener: &dyn ProgressListener,
) -> Result<u64> {
    let associations = source.scan()?;
    listener.on_begin(associations.len() as u64);

    engine.clear()?;

    let mut merged: HashMap<Key, ValueSet> = HashMap::new();
    let mut indexed = 0u64;
    let mut skipped = 0u64;

    for (key, rref) in associations {
        let key = collation.collate(key);
        if key.key_type() != key_type {
            log::warn!(
                "skipping record {rref}: key {key} is {}, index expects {key_type}",
                key.key_type()
            );
            skipped += 1;
            continue;
        }
        merged.entry(key).or_default().insert(rref);
        indexed += 1;
        listener.on_progress(indexed);
    }

    for (key, values) in merged {
        engine.put(&key, values)?;
    }

    if skipped > 0 {
        log::warn!("rebuild skipped {skipped} record associations with mismatched key types");
    }

    Ok(indexed)
}

// ============================================================================
// Tests
// ============================================================================
