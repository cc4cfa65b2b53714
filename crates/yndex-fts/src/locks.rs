//! Lock coordination for index operations.
//!
//! Two lock classes govern access to the engine:
//!
//! - the **modification gate**, a mutex separating ordinary mutations from
//!   structural rebuilds: put/remove hold it around their critical
//!   section, rebuild holds it for the whole rebuild duration;
//! - the **shared/exclusive lock**, classic readers-writer discipline over
//!   engine state: get takes shared, put/remove and the repopulation
//!   section of rebuild take exclusive.
//!
//! Acquisition order is always gate first, then exclusive. Guards release
//! in reverse order when they drop, on every exit path, so a failure
//! inside a critical section can never wedge the index. Blocking is
//! strictly on lock acquisition; there is no timeout or cancellation
//! semantic at this layer.

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Coordinates the modification gate and the shared/exclusive lock for
/// one index.
#[derive(Debug, Default)]
pub struct LockCoordinator {
    gate: Mutex<()>,
    state: RwLock<()>,
}

/// Held while an ordinary mutation or a structural rebuild is in flight.
#[must_use = "the gate is released as soon as the guard drops"]
pub struct ModificationGuard<'a> {
    _inner: MutexGuard<'a, ()>,
}

/// Held while reading engine state. Any number may coexist.
#[must_use = "the lock is released as soon as the guard drops"]
pub struct SharedGuard<'a> {
    _inner: RwLockReadGuard<'a, ()>,
}

/// Held while mutating engine state. Excludes readers and other writers.
#[must_use = "the lock is released as soon as the guard drops"]
pub struct ExclusiveGuard<'a> {
    _inner: RwLockWriteGuard<'a, ()>,
}

impl LockCoordinator {
    /// Create a coordinator with both locks free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the modification gate is free, then take it.
    pub fn modification(&self) -> ModificationGuard<'_> {
        ModificationGuard {
            _inner: self.gate.lock(),
        }
    }

    /// Block until no writer holds the state lock, then take a shared
    /// slot.
    pub fn shared(&self) -> SharedGuard<'_> {
        SharedGuard {
            _inner: self.state.read(),
        }
    }

    /// Block until the state lock is completely free, then take it
    /// exclusively.
    pub fn exclusive(&self) -> ExclusiveGuard<'_> {
        ExclusiveGuard {
            _inner: self.state.write(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_guards_coexist() {
        let locks = LockCoordinator::new();
        let a = locks.shared();
        let b = locks.shared();
        drop(a);
        drop(b);
    }

    #[test]
    fn test_exclusive_releases_on_drop() {
        let locks = LockCoordinator::new();
        {
            let _guard = locks.exclusive();
        }
        // Would deadlock if the first guard leaked.
        let _guard = locks.exclusive();
    }

    #[test]
    fn test_gate_is_independent_of_state_lock() {
        let locks = LockCoordinator::new();
        let _gate = locks.modification();
        let _shared = locks.shared();
    }

    #[test]
    fn test_mutation_acquisition_order() {
        let locks = LockCoordinator::new();
        let gate = locks.modification();
        let exclusive = locks.exclusive();
        // Reverse release order, as the adapter's drop order produces.
        drop(exclusive);
        drop(gate);
        let _gate = locks.modification();
    }
}
