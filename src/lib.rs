//! # StripeMap
//!
//! A lock-striped concurrent map for integer keys.
//!
//! The map is split into a fixed number of shards chosen at construction.
//! Every key is routed to exactly one shard, and every shard owns its own
//! HashMap behind its own mutex. Threads working on keys in different shards
//! never wait for each other; keys that land on the same shard are
//! serialized. There is nothing lock-free here: correctness rests entirely on
//! the per-shard mutex.
//!
//! ## Features
//!
//! - **Scoped access**: [`ConcurrentMap::access`] returns a guard that holds
//!   the shard lock and dereferences to the value
//! - **Auto-vivification**: accessing an absent key creates it with
//!   `V::default()`
//! - **Snapshots**: merge all shards into a `BTreeMap`, shard by shard or
//!   atomically across the whole map
//! - **Deterministic routing**: sign-aware modulo by default, hashed or
//!   custom routing on request
//! - **Statistics**: per-shard loads, plus operation and lock counters
//!   behind the `metrics` / `lock-timing` features
//!
//! ## Example
//!
//! ```rust
//! use stripemap::ConcurrentMap;
//! use std::thread;
//!
//! let map = ConcurrentMap::<i32, u32>::new(8)?;
//!
//! thread::scope(|s| {
//!     for _ in 0..4 {
//!         s.spawn(|| {
//!             for key in -50..50 {
//!                 *map.access(key) += 1;
//!             }
//!         });
//!     }
//! });
//!
//! let plain = map.snapshot();
//! assert_eq!(plain.len(), 100);
//! assert!(plain.values().all(|&v| v == 4));
//! # Ok::<(), stripemap::Error>(())
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use stripemap::{ConcurrentMapBuilder, HashFunction};
//!
//! let map = ConcurrentMapBuilder::new()
//!     .shard_count(100)?
//!     .capacity_per_shard(64)
//!     .hash_function(HashFunction::AHash)
//!     .build::<u64, String>();
//! assert_eq!(map.shard_count(), 100);
//! # Ok::<(), stripemap::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events at `debug` level on construction,
//! snapshots and lock timeouts. It never installs a subscriber.

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Scoped access handle.
pub mod access;
/// Main ConcurrentMap implementation.
pub mod concurrent_map;
/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
/// Hash function implementations.
pub mod hash;
/// Integer key trait.
pub mod key;
/// Key to shard routing.
pub mod router;
/// Internal shard implementation.
mod shard;
/// Statistics and metrics collection.
pub mod stats;

// Re-export main types
pub use access::Access;
pub use concurrent_map::ConcurrentMap;
pub use config::{Config, ConcurrentMapBuilder, HashFunction, RoutingConfig};
pub use error::Error;
pub use key::IntegerKey;
pub use router::{shard_index, HashRouter, ModuloRouter, ShardRouter};
pub use stats::{Diagnostics, ShardDiagnostics, ShardOps, Stats};
