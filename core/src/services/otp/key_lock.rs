//! Per-key async mutual exclusion
//!
//! `send` and `verify` read, decide and write one record; holding the key's
//! guard across that sequence keeps counters exact under concurrent requests.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A lazily created async mutex per key
///
/// Entries are weak; a key's mutex is dropped once no guard or waiter holds
/// it, and dead entries are pruned when new keys are inserted.
pub struct KeyedLocks<K> {
    locks: StdMutex<HashMap<K, Weak<Mutex<()>>>>,
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to `key`
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            let existing = locks.get(&key).and_then(Weak::upgrade);
            match existing {
                Some(lock) => lock,
                None => {
                    locks.retain(|_, weak| weak.strong_count() > 0);
                    let lock = Arc::new(Mutex::new(()));
                    locks.insert(key, Arc::downgrade(&lock));
                    lock
                }
            }
        };

        lock.lock_owned().await
    }

    /// Number of keys with a live mutex
    pub fn active_keys(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.values().filter(|weak| weak.strong_count() > 0).count()
    }
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
