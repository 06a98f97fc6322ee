//! Statistics and diagnostics types.

#[cfg(feature = "metrics")]
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-shard operation statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardOps {
    /// Number of scoped accesses handed out for this shard.
    pub accesses: u64,
    /// Number of entries created by auto-vivification.
    pub inserts: u64,
    /// Number of non-vivifying lookups (`get`, `contains_key`).
    pub reads: u64,
    /// Number of lock acquisitions (0 when metrics feature disabled).
    pub lock_acquisitions: u64,
    /// Cumulative lock wait time in nanoseconds (0 when lock-timing disabled).
    pub lock_wait_nanos: u64,
}

/// Thread-safe statistics tracker for a single shard.
#[cfg(feature = "metrics")]
pub(crate) struct ShardStats {
    accesses: AtomicU64,
    inserts: AtomicU64,
    reads: AtomicU64,
    lock_acquisitions: AtomicU64,
    #[cfg(feature = "lock-timing")]
    lock_wait_nanos: AtomicU64,
}

#[cfg(feature = "metrics")]
impl ShardStats {
    pub fn new() -> Self {
        Self {
            accesses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            reads: AtomicU64::new(0),
            lock_acquisitions: AtomicU64::new(0),
            #[cfg(feature = "lock-timing")]
            lock_wait_nanos: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_access(&self) {
        self.accesses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_lock_acquisition(&self) {
        self.lock_acquisitions.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(feature = "lock-timing")]
    #[inline]
    pub fn record_lock_wait(&self, nanos: u64) {
        self.lock_wait_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ShardOps {
        ShardOps {
            accesses: self.accesses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            lock_acquisitions: self.lock_acquisitions.load(Ordering::Relaxed),
            #[cfg(feature = "lock-timing")]
            lock_wait_nanos: self.lock_wait_nanos.load(Ordering::Relaxed),
            #[cfg(not(feature = "lock-timing"))]
            lock_wait_nanos: 0,
        }
    }
}

/// Zero-sized placeholder when metrics are disabled.
#[cfg(not(feature = "metrics"))]
pub(crate) struct ShardStats;

#[cfg(not(feature = "metrics"))]
impl ShardStats {
    pub fn new() -> Self {
        ShardStats
    }

    #[inline]
    pub fn record_access(&self) {}

    #[inline]
    pub fn record_insert(&self) {}

    #[inline]
    pub fn record_read(&self) {}

    #[inline]
    pub fn record_lock_acquisition(&self) {}

    pub fn snapshot(&self) -> ShardOps {
        ShardOps::default()
    }
}

/// Aggregate statistics for a ConcurrentMap instance.
#[derive(Debug, Clone)]
pub struct Stats {
    /// Total number of entries across all shards.
    pub size: usize,
    /// Number of entries in each shard.
    pub shard_sizes: Vec<usize>,
    /// Operation counts for each shard.
    pub operations: Vec<ShardOps>,
}

/// Per-shard diagnostics snapshot.
#[derive(Debug, Clone)]
pub struct ShardDiagnostics {
    /// Number of entries in this shard.
    pub entries: usize,
    /// Operation counts (all 0 when metrics disabled).
    pub ops: ShardOps,
}

/// Structured snapshot for performance introspection.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Total number of entries across all shards.
    pub total_entries: usize,
    /// Per-shard diagnostics.
    pub shards: Vec<ShardDiagnostics>,
    /// Total accesses + reads (0 when metrics disabled).
    pub total_operations: u64,
    /// Average load (entries) per shard.
    pub avg_load_per_shard: f64,
    /// Max load / avg load ratio. 0.0 for an empty map. User interprets
    /// (e.g. threshold 2.0 for imbalance).
    pub max_load_ratio: f64,
}

impl From<Stats> for Diagnostics {
    fn from(stats: Stats) -> Self {
        let shard_count = stats.shard_sizes.len().max(1);
        let avg_load_per_shard = stats.size as f64 / shard_count as f64;
        let max_load = stats.shard_sizes.iter().copied().max().unwrap_or(0);
        let max_load_ratio = if stats.size == 0 {
            0.0
        } else {
            max_load as f64 / avg_load_per_shard
        };
        let total_operations = stats.operations.iter().map(|op| op.accesses + op.reads).sum();

        let shards = stats
            .shard_sizes
            .into_iter()
            .zip(stats.operations)
            .map(|(entries, ops)| ShardDiagnostics { entries, ops })
            .collect();

        Self {
            total_entries: stats.size,
            shards,
            total_operations,
            avg_load_per_shard,
            max_load_ratio,
        }
    }
}
