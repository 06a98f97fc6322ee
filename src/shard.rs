use crate::access::Access;
use crate::stats::ShardStats;
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use parking_lot::{Mutex, MutexGuard};
use std::hash::Hash;
use std::time::Duration;

/// A single shard: a HashMap and the mutex that guards it.
///
/// The store is only reachable through the mutex, so "this lock guards
/// exactly this store" holds by construction.
pub(crate) struct Shard<K, V> {
    map: Mutex<HashMap<K, V>>,
    stats: ShardStats,
}

impl<K, V> Shard<K, V>
where
    K: Hash + Eq,
{
    pub fn new(capacity: Option<usize>) -> Self {
        let map = match capacity {
            Some(capacity) => HashMap::with_capacity(capacity),
            None => HashMap::new(),
        };
        Self {
            map: Mutex::new(map),
            stats: ShardStats::new(),
        }
    }

    /// Acquire the shard lock, blocking until it is available.
    pub fn lock(&self) -> MutexGuard<'_, HashMap<K, V>> {
        #[cfg(feature = "lock-timing")]
        let started = std::time::Instant::now();

        let guard = self.map.lock();

        #[cfg(feature = "lock-timing")]
        self.stats
            .record_lock_wait(started.elapsed().as_nanos().min(u64::MAX as u128) as u64);
        self.stats.record_lock_acquisition();
        guard
    }

    /// Acquire the shard lock, giving up after `timeout`.
    pub fn try_lock_for(&self, timeout: Duration) -> Option<MutexGuard<'_, HashMap<K, V>>> {
        #[cfg(feature = "lock-timing")]
        let started = std::time::Instant::now();

        let guard = self.map.try_lock_for(timeout)?;

        #[cfg(feature = "lock-timing")]
        self.stats
            .record_lock_wait(started.elapsed().as_nanos().min(u64::MAX as u128) as u64);
        self.stats.record_lock_acquisition();
        Some(guard)
    }

    /// Turn a held lock into an access handle for `key`, inserting
    /// `V::default()` if the key is absent.
    pub fn vivify<'a>(&'a self, guard: MutexGuard<'a, HashMap<K, V>>, key: K) -> Access<'a, V>
    where
        V: Default,
    {
        self.stats.record_access();
        let stats = &self.stats;
        let value = MutexGuard::map(guard, |map| match map.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                stats.record_insert();
                entry.insert(V::default())
            }
        });
        Access::new(value)
    }

    /// Clone the value for `key` without creating it.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let result = self.lock().get(key).cloned();
        self.stats.record_read();
        result
    }

    /// Check if a key exists without creating it.
    pub fn contains_key(&self, key: &K) -> bool {
        let result = self.lock().contains_key(key);
        self.stats.record_read();
        result
    }

    /// Get the number of entries in this shard.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Get a snapshot of statistics for this shard.
    pub fn stats(&self) -> crate::stats::ShardOps {
        self.stats.snapshot()
    }
}
