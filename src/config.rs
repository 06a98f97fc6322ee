use crate::error::Error;
use crate::hash::ShardHasher;
use crate::key::IntegerKey;
use crate::router::ShardRouter;
use std::num::NonZeroUsize;

const DEFAULT_SHARD_COUNT: NonZeroUsize = match NonZeroUsize::new(16) {
    Some(count) => count,
    None => panic!("default shard count must be non-zero"),
};

/// Which hash function to use for hashed routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashFunction {
    /// Use ahash (default, fast and well-distributed).
    #[default]
    AHash,
    /// Use fxhash (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
}

/// Routing strategy for shard selection.
#[derive(Default)]
pub enum RoutingConfig {
    /// Default: sign-aware `|key| % shard_count`.
    #[default]
    Modulo,
    /// Hash the key magnitude first, then take the modulo.
    Hashed(HashFunction),
    /// User-provided router (e.g. stateful or custom distribution).
    Custom(Box<dyn ShardRouter>),
}

impl std::fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingConfig::Modulo => write!(f, "RoutingConfig::Modulo"),
            RoutingConfig::Hashed(hash_fn) => write!(f, "RoutingConfig::Hashed({hash_fn:?})"),
            RoutingConfig::Custom(_) => write!(f, "RoutingConfig::Custom(...)"),
        }
    }
}

/// Configuration for a ConcurrentMap instance.
///
/// The shard count is validated when it is set, so a `Config` value always
/// describes a buildable map.
#[derive(Debug)]
pub struct Config {
    pub(crate) shard_count: NonZeroUsize,
    pub(crate) capacity_per_shard: Option<usize>,
    pub(crate) routing: RoutingConfig,
}

impl Config {
    /// Create a new config with defaults (16 shards, modulo routing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shards. Any count greater than 0 is accepted.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        self.shard_count = NonZeroUsize::new(count).ok_or(Error::ZERO_SHARDS)?;
        Ok(self)
    }

    /// Set initial capacity per shard. Total capacity will be approximately
    /// `capacity_per_shard * shard_count`. Omitted by default (HashMap default).
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.capacity_per_shard = Some(capacity);
        self
    }

    /// Set the routing strategy.
    pub fn routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            capacity_per_shard: None,
            routing: RoutingConfig::Modulo,
        }
    }
}

/// Builder for creating a ConcurrentMap with custom configuration.
#[derive(Debug, Default)]
pub struct ConcurrentMapBuilder {
    config: Config,
}

impl ConcurrentMapBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shards. Fails with
    /// [`Error::InvalidConfiguration`] when `count` is 0.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        self.config = self.config.shard_count(count)?;
        Ok(self)
    }

    /// Set initial capacity per shard. Total capacity ≈ `capacity_per_shard * shard_count`.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.config = self.config.capacity_per_shard(capacity);
        self
    }

    /// Hash keys with `hash_fn` before routing them.
    pub fn hash_function(mut self, hash_fn: HashFunction) -> Self {
        self.config = self.config.routing(RoutingConfig::Hashed(hash_fn));
        self
    }

    /// Use a custom routing strategy.
    pub fn routing(mut self, routing: RoutingConfig) -> Self {
        self.config = self.config.routing(routing);
        self
    }

    /// Build a ConcurrentMap with the configured settings.
    pub fn build<K, V>(self) -> crate::ConcurrentMap<K, V>
    where
        K: IntegerKey,
    {
        crate::ConcurrentMap::with_config(self.config)
    }
}

/// Create a hash function instance based on the configuration.
pub(crate) fn create_hasher(hash_fn: HashFunction) -> ShardHasher {
    match hash_fn {
        HashFunction::AHash => ShardHasher::AHash,
        #[cfg(feature = "fxhash")]
        HashFunction::FxHash => ShardHasher::FxHash,
    }
}
