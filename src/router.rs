//! Key to shard routing.
//!
//! Every operation on a [`ConcurrentMap`](crate::ConcurrentMap) starts by
//! routing its key to exactly one shard. Routing is a pure function of the
//! key and the shard count, so a key stays on the same shard for the whole
//! life of the map.

use crate::config::{HashFunction, RoutingConfig};
use crate::hash::ShardHasher;
use crate::key::IntegerKey;
use std::num::NonZeroUsize;

/// Sign-aware modulo routing: `key mod n` for non-negative keys and
/// `(-key) mod n` for negative ones.
///
/// The negation happens on the widened magnitude, so `i64::MIN` and friends
/// route without overflow. Note that `k` and `-k` always share a shard.
///
/// Keys are read as signed integers first, so `u64` keys at or above `2^63`
/// route like the negative `i64` with the same bits: `u64::MAX` lands where
/// `-1` does. See [`IntegerKey`] for every width.
///
/// # Example
///
/// ```rust
/// use std::num::NonZeroUsize;
/// use stripemap::shard_index;
///
/// let n = NonZeroUsize::new(3).unwrap();
/// assert_eq!(shard_index(7i32, n), 1);
/// assert_eq!(shard_index(-7i32, n), 1);
/// assert!(shard_index(i64::MIN, n) < 3);
/// assert_eq!(shard_index(u64::MAX, n), 1);
/// ```
#[inline]
pub fn shard_index<K: IntegerKey>(key: K, shard_count: NonZeroUsize) -> usize {
    ModuloRouter.route(key.magnitude(), shard_count.get())
}

/// User-provided shard selection. Enables stateful or custom routing.
pub trait ShardRouter: Send + Sync {
    /// Return the shard index in `[0, shard_count)` for a key magnitude.
    ///
    /// Must be deterministic: the same inputs always produce the same index.
    fn route(&self, magnitude: u128, shard_count: usize) -> usize;
}

/// Default routing: `magnitude % shard_count`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuloRouter;

impl ShardRouter for ModuloRouter {
    #[inline]
    fn route(&self, magnitude: u128, shard_count: usize) -> usize {
        (magnitude % shard_count as u128) as usize
    }
}

/// Hashes the magnitude before taking the modulo, which spreads key sets
/// clustered on a few residues of the shard count.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashRouter {
    hasher: ShardHasher,
}

impl HashRouter {
    /// Create a hashed router using the given hash function.
    pub fn new(hash_fn: HashFunction) -> Self {
        Self {
            hasher: crate::config::create_hasher(hash_fn),
        }
    }
}

impl ShardRouter for HashRouter {
    #[inline]
    fn route(&self, magnitude: u128, shard_count: usize) -> usize {
        (self.hasher.hash_magnitude(magnitude) % shard_count as u64) as usize
    }
}

/// Resolved routing held by a map. The built-in routers are matched
/// statically; only custom routers go through dynamic dispatch.
pub(crate) enum Routing {
    Modulo,
    Hashed(HashRouter),
    Custom(Box<dyn ShardRouter>),
}

impl Routing {
    #[inline]
    pub(crate) fn route(&self, magnitude: u128, shard_count: NonZeroUsize) -> usize {
        let n = shard_count.get();
        match self {
            Routing::Modulo => ModuloRouter.route(magnitude, n),
            Routing::Hashed(router) => router.route(magnitude, n),
            Routing::Custom(router) => {
                let index = router.route(magnitude, n);
                debug_assert!(index < n, "router returned {index} for {n} shards");
                index % n
            }
        }
    }
}

impl From<RoutingConfig> for Routing {
    fn from(config: RoutingConfig) -> Self {
        match config {
            RoutingConfig::Modulo => Routing::Modulo,
            RoutingConfig::Hashed(hash_fn) => Routing::Hashed(HashRouter::new(hash_fn)),
            RoutingConfig::Custom(router) => Routing::Custom(router),
        }
    }
}

impl std::fmt::Debug for Routing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Routing::Modulo => write!(f, "Modulo"),
            Routing::Hashed(router) => write!(f, "Hashed({:?})", router.hasher),
            Routing::Custom(_) => write!(f, "Custom(...)"),
        }
    }
}
