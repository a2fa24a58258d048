//! Integration test: read-through caching on the owning peer.
//!
//! Concurrent misses must collapse into one backing-store load, hits must
//! not touch the store, and failures must never be cached.

use std::sync::Arc;
use std::time::Duration;

use flock_integration_tests::{LoadError, TestCluster, expected_value};

const LATENCY: Duration = Duration::from_millis(50);

/// 20 concurrent readers of one cold key trigger exactly one load.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(10000)]
async fn test_concurrent_misses_load_once() {
    let c = Arc::new(TestCluster::new(&["peer1", "peer2", "peer3"], 50, 100, LATENCY));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let c = Arc::clone(&c);
        handles.push(tokio::spawn(async move { c.get("hot-key").await }));
    }
    for h in handles {
        assert_eq!(h.await.unwrap(), Ok(expected_value("hot-key")));
    }

    let owner = c.owner("hot-key");
    assert_eq!(c.peer(&owner).load_count(), 1);
    assert_eq!(c.total_loads(), 1, "only the owner loads");
    assert!(c.peer(&owner).is_cached("hot-key"));
}

/// Distinct cold keys each load once, in parallel.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(10000)]
async fn test_distinct_keys_each_load_once() {
    let c = Arc::new(TestCluster::new(&["peer1", "peer2"], 50, 100, LATENCY));

    let mut handles = Vec::new();
    for i in 0..10 {
        for _ in 0..3 {
            let c = Arc::clone(&c);
            handles.push(tokio::spawn(async move {
                let key = format!("key-{i}");
                let got = c.get(&key).await;
                (key, got)
            }));
        }
    }
    for h in handles {
        let (key, got) = h.await.unwrap();
        assert_eq!(got, Ok(expected_value(&key)));
    }

    assert_eq!(c.total_loads(), 10);
}

/// A warm key is served from the cache.
#[tokio::test]
#[ntest::timeout(10000)]
async fn test_hit_does_not_reload() {
    let c = TestCluster::new(&["peer1"], 10, 100, Duration::ZERO);

    assert_eq!(c.get("k").await, Ok(expected_value("k")));
    assert_eq!(c.get("k").await, Ok(expected_value("k")));
    assert_eq!(c.get("k").await, Ok(expected_value("k")));

    assert_eq!(c.peer("peer1").load_count(), 1);
}

/// Errors reach every caller and are not cached.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(10000)]
async fn test_errors_shared_but_not_cached() {
    let c = Arc::new(TestCluster::new(&["peer1"], 10, 100, LATENCY));

    let mut handles = Vec::new();
    for _ in 0..5 {
        let c = Arc::clone(&c);
        handles.push(tokio::spawn(async move { c.get("missing-a").await }));
    }
    for h in handles {
        assert_eq!(h.await.unwrap(), Err(LoadError("missing-a".into())));
    }
    assert_eq!(c.peer("peer1").load_count(), 1);
    assert!(!c.peer("peer1").is_cached("missing-a"));

    // The next caller tries again.
    assert!(c.get("missing-a").await.is_err());
    assert_eq!(c.peer("peer1").load_count(), 2);
}

/// A full cache evicts its least recently used key, which then reloads.
#[tokio::test]
#[ntest::timeout(10000)]
async fn test_capacity_eviction_forces_reload() {
    let c = TestCluster::new(&["peer1"], 10, 2, Duration::ZERO);
    let peer = c.peer("peer1");

    c.get("a").await.unwrap();
    c.get("b").await.unwrap();
    c.get("a").await.unwrap(); // a is now most recent
    c.get("c").await.unwrap(); // evicts b

    assert_eq!(peer.cached_len(), 2);
    assert!(peer.is_cached("a"));
    assert!(!peer.is_cached("b"));
    assert_eq!(peer.load_count(), 3);

    c.get("b").await.unwrap();
    assert_eq!(peer.load_count(), 4);
}
