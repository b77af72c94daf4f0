//! Per-tracked-number mutual exclusion.
//!
//! Without this, two events for the same number arriving together can both
//! see "no thread" and both create one. Holding a number's lock from thread
//! resolution until the resulting action has run closes that race within a
//! single process. Events for different numbers never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::types::TrackedNumber;

/// A set of async locks keyed by tracked number.
///
/// Entries are created on demand and pruned once nobody holds or awaits them.
#[derive(Debug, Default)]
pub struct NumberLocks {
    locks: Mutex<HashMap<TrackedNumber, Arc<AsyncMutex<()>>>>,
}

/// Held while a number is being reconciled. Dropping it releases the lock.
#[derive(Debug)]
pub struct NumberGuard {
    _guard: OwnedMutexGuard<()>,
}

impl NumberLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `number`.
    pub async fn acquire(&self, number: TrackedNumber) -> NumberGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Only the map's own reference left: no holder, no waiter.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(number).or_default())
        };

        NumberGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of entries currently tracked, including idle ones not yet pruned.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
