use std::collections::BTreeMap;
use std::time::Duration;
use stripemap::{ConcurrentMap, ConcurrentMapBuilder, Error, RoutingConfig, ShardRouter};

#[test]
fn test_new_rejects_zero_shards() {
    assert_eq!(
        ConcurrentMap::<i32, i32>::new(0).unwrap_err(),
        Error::InvalidConfiguration("shard count must be greater than 0")
    );
    assert!(ConcurrentMapBuilder::new().shard_count(0).is_err());
}

#[test]
fn test_access_creates_default_then_updates() {
    let map = ConcurrentMap::<i32, i32>::new(5).unwrap();

    assert_eq!(*map.access(10), 0);
    *map.access(10) += 1;
    *map.access(10) += 1;

    assert_eq!(*map.access(10), 2);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_read_through_access_vivifies() {
    let map = ConcurrentMap::<u64, String>::new(3).unwrap();

    let seen = map.access(99).clone();
    assert!(seen.is_empty());

    // The read left an entry behind.
    let snapshot = map.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(&99).map(String::as_str), Some(""));
}

#[test]
fn test_get_and_contains_do_not_vivify() {
    let map = ConcurrentMap::<i16, u8>::new(2).unwrap();

    assert_eq!(map.get(7), None);
    assert!(!map.contains_key(7));
    assert!(map.is_empty());
}

#[test]
fn test_snapshot_completeness() {
    let map = ConcurrentMap::<i64, i64>::new(7).unwrap();
    let keys = [-100, -7, -1, 0, 1, 7, 100, i64::MIN, i64::MAX];

    for key in keys {
        *map.access(key) = key / 2;
    }
    // Touch some keys twice; they must not duplicate.
    for key in keys.iter().take(3) {
        map.access(*key);
    }

    let expected: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k / 2)).collect();
    assert_eq!(map.snapshot(), expected);
    assert_eq!(map.snapshot_atomic(), expected);
}

#[test]
fn test_snapshot_of_empty_map() {
    let map = ConcurrentMap::<u32, u32>::new(4).unwrap();
    assert!(map.snapshot().is_empty());
    assert!(map.snapshot_atomic().is_empty());
}

#[test]
fn test_snapshot_is_a_copy() {
    let map = ConcurrentMap::<i32, Vec<i32>>::new(2).unwrap();
    map.access(1).push(1);

    let before = map.snapshot();
    map.access(1).push(2);

    assert_eq!(before[&1], vec![1]);
    assert_eq!(map.get(1), Some(vec![1, 2]));
}

#[test]
fn test_with_value() {
    let map = ConcurrentMap::<u8, Vec<&str>>::new(3).unwrap();

    let len = map.with_value(4, |v| {
        v.push("x");
        v.len()
    });
    assert_eq!(len, 1);
    assert_eq!(map.with_value(4, |v| v.len()), 1);
}

#[test]
fn test_try_access_for_succeeds_when_free() {
    let map = ConcurrentMap::<i32, i32>::new(2).unwrap();

    let mut value = map
        .try_access_for(3, Duration::from_millis(50))
        .expect("shard is free");
    *value = 11;
    drop(value);

    assert_eq!(map.get(3), Some(11));
}

#[test]
fn test_shard_loads_follow_modulo_routing() {
    let map = ConcurrentMap::<i32, ()>::new(3).unwrap();
    for key in [0, 3, -3, 1, -4, 2] {
        map.access(key);
    }
    // 0, 3, -3 -> shard 0; 1, -4 -> shard 1; 2 -> shard 2
    assert_eq!(map.shard_loads(), vec![3, 2, 1]);
}

#[test]
fn test_capacity_per_shard_does_not_change_contents() {
    let map = ConcurrentMapBuilder::new()
        .shard_count(4)
        .unwrap()
        .capacity_per_shard(1024)
        .build::<u32, u32>();

    for key in 0..10 {
        *map.access(key) = key * key;
    }
    assert_eq!(map.len(), 10);
    assert_eq!(map.get(9), Some(81));
}

#[test]
fn test_wide_unsigned_keys_share_shard_with_small_ones() {
    let map = ConcurrentMap::<u64, u8>::new(100).unwrap();
    assert_eq!(map.shard_of(u64::MAX), 1);
    assert_eq!(map.shard_of(1 << 63), 8);

    *map.access(u64::MAX) = 1;
    *map.access(1) = 2;
    assert_eq!(map.shard_loads()[1], 2);
    assert_eq!(map.get(u64::MAX), Some(1));
}

#[cfg(feature = "fxhash")]
#[test]
fn test_fx_hash_routing_round_trip() {
    use stripemap::HashFunction;

    let map = ConcurrentMapBuilder::new()
        .shard_count(12)
        .unwrap()
        .hash_function(HashFunction::FxHash)
        .build::<i64, i64>();

    for key in -200..200 {
        *map.access(key) = key * 3;
    }
    for key in -200..200 {
        assert!(map.shard_of(key) < 12);
        assert_eq!(map.get(key), Some(key * 3));
    }
    assert_eq!(map.len(), 400);
    assert_eq!(map.snapshot().len(), 400);
}

struct EverythingToLast;

impl ShardRouter for EverythingToLast {
    fn route(&self, _magnitude: u128, shard_count: usize) -> usize {
        shard_count - 1
    }
}

#[test]
fn test_custom_router() {
    let map = ConcurrentMapBuilder::new()
        .shard_count(4)
        .unwrap()
        .routing(RoutingConfig::Custom(Box::new(EverythingToLast)))
        .build::<i32, i32>();

    for key in -5..5 {
        map.access(key);
    }
    assert_eq!(map.shard_of(123), 3);
    assert_eq!(map.shard_loads(), vec![0, 0, 0, 10]);
}

#[test]
fn test_stats_and_diagnostics() {
    let map = ConcurrentMap::<u32, u32>::new(4).unwrap();
    for key in 0..8 {
        map.access(key);
    }
    // Skew shard 0.
    for key in [8, 12, 16, 20] {
        map.access(key);
    }

    let stats = map.stats();
    assert_eq!(stats.size, 12);
    assert_eq!(stats.shard_sizes, vec![6, 2, 2, 2]);
    assert_eq!(stats.operations.len(), 4);

    let diag = map.diagnostics();
    assert_eq!(diag.total_entries, 12);
    assert_eq!(diag.avg_load_per_shard, 3.0);
    assert_eq!(diag.max_load_ratio, 2.0);
}

#[cfg(feature = "metrics")]
#[test]
fn test_operation_counters() {
    let map = ConcurrentMap::<i32, i32>::new(1).unwrap();
    map.access(1);
    map.access(1);
    map.access(2);
    map.get(1);
    map.contains_key(3);

    let ops = &map.stats().operations[0];
    assert_eq!(ops.accesses, 3);
    assert_eq!(ops.inserts, 2);
    assert_eq!(ops.reads, 2);
    assert!(ops.lock_acquisitions >= 5);
}
