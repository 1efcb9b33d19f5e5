//! User dismissal state.
//!
//! Held in memory for the lifetime of the set; nothing is persisted. The
//! engine takes an `Arc<DismissalSet>` so tests (and separate sessions) get
//! isolated state.

use std::collections::HashSet;

use parking_lot::Mutex;

use super::model::DismissalKey;

#[derive(Debug, Default)]
pub struct DismissalSet {
    keys: Mutex<HashSet<DismissalKey>>,
}

impl DismissalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key was not already dismissed.
    pub fn insert(&self, key: DismissalKey) -> bool {
        self.keys.lock().insert(key)
    }

    pub fn contains(&self, key: &DismissalKey) -> bool {
        self.keys.lock().contains(key)
    }

    pub fn clear(&self) {
        self.keys.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }

    /// Copy of the current keys, so derivation runs without holding the lock.
    pub fn snapshot(&self) -> HashSet<DismissalKey> {
        self.keys.lock().clone()
    }
}
