//! Per-record mutual exclusion.
//!
//! Every operation on a character runs while holding that character's
//! lock, so operations on one character are serialized and different
//! characters proceed in parallel. Buildings get their own locks for
//! occupancy updates. Lock order is always character, then building.
//! A key's entry lives only while someone holds or waits on it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use deadcity_logic::constants::{BuildingId, CharacterId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    Character(CharacterId),
    Building(BuildingId),
}

#[derive(Debug, Default)]
pub struct LockRegistry {
    slots: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: LockKey) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key).or_default())
    }

    /// Give back our handle and drop the map's entry once nobody else
    /// holds or waits on it. Handles are only cloned and released under
    /// the map lock, so the count is exact here.
    fn evict(&self, key: LockKey, slot: Arc<Mutex<()>>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&slot) == 2 {
            slots.remove(&key);
        }
        drop(slot);
    }

    /// Run `f` while holding the lock for `key`, waiting for it if needed.
    pub fn with<R>(&self, key: LockKey, f: impl FnOnce() -> R) -> R {
        let slot = self.slot(key);
        let result = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        self.evict(key, slot);
        result
    }

    /// Like [`with`](Self::with) but gives up with `None` if the lock is held.
    pub fn try_with<R>(&self, key: LockKey, f: impl FnOnce() -> R) -> Option<R> {
        let slot = self.slot(key);
        let result = match slot.try_lock() {
            Ok(_guard) => Some(f()),
            Err(TryLockError::Poisoned(p)) => {
                let _guard = p.into_inner();
                Some(f())
            }
            Err(TryLockError::WouldBlock) => None,
        };
        self.evict(key, slot);
        result
    }

    /// Keys currently held or waited on.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
