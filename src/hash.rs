use std::hash::Hasher;

/// Hash function implementation for hashed shard routing.
/// Uses an enum to avoid trait object limitations with generics.
#[derive(Debug, Clone, Copy, Default)]
pub enum ShardHasher {
    /// AHash implementation (default, fast and well-distributed).
    #[default]
    AHash,
    /// FxHash implementation (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
}

impl ShardHasher {
    /// Hash a key magnitude. Both hashers use fixed keys, so the result is
    /// stable for the lifetime of the process.
    pub fn hash_magnitude(&self, magnitude: u128) -> u64 {
        match self {
            ShardHasher::AHash => {
                let mut hasher = ahash::AHasher::default();
                hasher.write_u128(magnitude);
                hasher.finish()
            }
            #[cfg(feature = "fxhash")]
            ShardHasher::FxHash => {
                let mut hasher = fxhash::FxHasher::default();
                hasher.write_u128(magnitude);
                hasher.finish()
            }
        }
    }
}
