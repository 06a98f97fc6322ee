use crate::access::Access;
use crate::config::Config;
use crate::error::Error;
use crate::key::IntegerKey;
use crate::router::Routing;
use crate::shard::Shard;
use crate::stats::{Diagnostics, ShardOps, Stats};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::time::Duration;
use tracing::debug;

/// Lock-striped concurrent map with a fixed number of shards.
///
/// Each key is routed to exactly one shard, and each shard owns a HashMap
/// behind its own mutex. Operations on keys in different shards never block
/// each other; operations on keys in the same shard (even different keys)
/// are serialized by that shard's mutex.
///
/// # Example
///
/// ```rust
/// use stripemap::ConcurrentMap;
///
/// let map = ConcurrentMap::<i32, u64>::new(8)?;
///
/// // Reading an absent key creates it with the default value.
/// *map.access(42) += 1;
/// *map.access(-42) += 1;
///
/// let plain = map.snapshot();
/// assert_eq!(plain.get(&42), Some(&1));
/// assert_eq!(plain.len(), 2);
/// # Ok::<(), stripemap::Error>(())
/// ```
pub struct ConcurrentMap<K, V> {
    shards: Vec<Shard<K, V>>,
    shard_count: NonZeroUsize,
    routing: Routing,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: IntegerKey,
{
    /// Create a map with `shard_count` shards and default routing.
    ///
    /// Fails with [`Error::InvalidConfiguration`] when `shard_count` is 0.
    pub fn new(shard_count: usize) -> Result<Self, Error> {
        Ok(Self::with_config(Config::new().shard_count(shard_count)?))
    }

    /// Create a new map with custom config.
    pub fn with_config(config: Config) -> Self {
        let shard_count = config.shard_count;
        let shards = (0..shard_count.get())
            .map(|_| Shard::new(config.capacity_per_shard))
            .collect();
        let routing = Routing::from(config.routing);

        debug!(
            shard_count = shard_count.get(),
            capacity_per_shard = ?config.capacity_per_shard,
            ?routing,
            "created concurrent map"
        );

        Self {
            shards,
            shard_count,
            routing,
        }
    }

    /// Number of shards, fixed at construction.
    pub fn shard_count(&self) -> usize {
        self.shard_count.get()
    }

    /// Index of the shard responsible for `key`.
    #[inline]
    pub fn shard_of(&self, key: K) -> usize {
        self.routing.route(key.magnitude(), self.shard_count)
    }

    #[inline]
    fn shard(&self, key: K) -> &Shard<K, V> {
        &self.shards[self.shard_of(key)]
    }

    /// Lock the shard owning `key` and return exclusive access to its value.
    ///
    /// **This is not a pure lookup.** If `key` is absent it is inserted with
    /// `V::default()` before the handle is returned, even when the caller only
    /// reads through it. Use [`get`](Self::get) for a lookup without that side
    /// effect.
    ///
    /// Blocks until the shard lock is available. The lock is held until the
    /// returned [`Access`] is dropped; holding it while calling any other
    /// method that touches the same shard on the same thread deadlocks.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stripemap::ConcurrentMap;
    ///
    /// let map = ConcurrentMap::<u64, String>::new(4)?;
    /// map.access(7).push('a');
    /// assert_eq!(*map.access(7), "a");
    /// assert_eq!(*map.access(8), ""); // created by the read
    /// assert_eq!(map.len(), 2);
    /// # Ok::<(), stripemap::Error>(())
    /// ```
    pub fn access(&self, key: K) -> Access<'_, V>
    where
        V: Default,
    {
        let shard = self.shard(key);
        shard.vivify(shard.lock(), key)
    }

    /// Like [`access`](Self::access), but gives up if the shard lock cannot
    /// be acquired within `timeout`.
    ///
    /// Returns `None` on timeout; nothing is inserted in that case.
    pub fn try_access_for(&self, key: K, timeout: Duration) -> Option<Access<'_, V>>
    where
        V: Default,
    {
        let shard = self.shard(key);
        match shard.try_lock_for(timeout) {
            Some(guard) => Some(shard.vivify(guard, key)),
            None => {
                debug!(?key, shard = self.shard_of(key), ?timeout, "shard lock timed out");
                None
            }
        }
    }

    /// Run `f` with exclusive access to the value for `key`, returning its
    /// result. The reference cannot escape the closure, so the lock is always
    /// released when `f` returns.
    ///
    /// Auto-vivifies exactly like [`access`](Self::access).
    pub fn with_value<R, F>(&self, key: K, f: F) -> R
    where
        V: Default,
        F: FnOnce(&mut V) -> R,
    {
        let mut value = self.access(key);
        f(&mut value)
    }

    /// Clone the value for `key` if present. Does not insert anything.
    ///
    /// # Deadlock
    ///
    /// Locks the key's shard like every other read here (`contains_key`,
    /// `len`, `snapshot`, ...); see [`Access`] for the rule on holding a
    /// handle on the same thread.
    pub fn get(&self, key: K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).get(&key)
    }

    /// Check whether `key` has an entry. Does not insert anything.
    pub fn contains_key(&self, key: K) -> bool {
        self.shard(key).contains_key(&key)
    }

    /// Get the total number of entries across all shards.
    ///
    /// Shards are locked one at a time, so the result is only exact when no
    /// other thread is creating entries.
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.len() == 0)
    }

    /// Number of entries in each shard, in shard order.
    pub fn shard_loads(&self) -> Vec<usize> {
        self.shards.iter().map(Shard::len).collect()
    }

    /// Merge every shard into one ordered map.
    ///
    /// Shards are visited in ascending index order; each one is locked, copied
    /// and unlocked before the next is touched. Every shard's contents are a
    /// consistent view of that shard, but with concurrent writers different
    /// shards may be captured at different instants. Use
    /// [`snapshot_atomic`](Self::snapshot_atomic) for a whole-map view.
    pub fn snapshot(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut result = BTreeMap::new();
        for shard in &self.shards {
            let map = shard.lock();
            result.extend(map.iter().map(|(key, value)| (*key, value.clone())));
        }
        debug!(entries = result.len(), atomic = false, "built snapshot");
        result
    }

    /// Merge every shard into one ordered map while holding all shard locks.
    ///
    /// Locks are taken in ascending shard index order and released after the
    /// copy, giving a single point-in-time view of the whole map. Any code
    /// that holds more than one shard lock at once must use the same
    /// ascending order to stay deadlock-free against this method.
    pub fn snapshot_atomic(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let guards: Vec<_> = self.shards.iter().map(Shard::lock).collect();
        let result: BTreeMap<K, V> = guards
            .iter()
            .flat_map(|map| map.iter().map(|(key, value)| (*key, value.clone())))
            .collect();
        drop(guards);
        debug!(entries = result.len(), atomic = true, "built snapshot");
        result
    }

    /// Get detailed statistics about the map and its shards.
    pub fn stats(&self) -> Stats {
        let shard_sizes = self.shard_loads();
        let operations: Vec<ShardOps> = self.shards.iter().map(Shard::stats).collect();
        let size = shard_sizes.iter().sum();

        Stats {
            size,
            shard_sizes,
            operations,
        }
    }

    /// Load-balance view of the map, derived from [`stats`](Self::stats).
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::from(self.stats())
    }
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: IntegerKey,
{
    /// 16 shards, modulo routing.
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl<K, V> std::fmt::Debug for ConcurrentMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentMap")
            .field("shard_count", &self.shard_count)
            .field("routing", &self.routing)
            .finish_non_exhaustive()
    }
}
