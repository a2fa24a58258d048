//! Integration test: key routing and rebalancing.
//!
//! Keys must always reach the same owner, and adding a peer must move
//! only the keys that now land on it.

use std::collections::HashMap;
use std::time::Duration;

use flock::FlockConfig;
use flock_integration_tests::{TestCluster, expected_value};

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("obj-{i:04}")).collect()
}

/// Each key is loaded and cached only on its owner.
#[tokio::test]
#[ntest::timeout(10000)]
async fn test_keys_cached_on_owner_only() {
    let c = TestCluster::new(&["peer1", "peer2", "peer3"], 50, 1_000, Duration::ZERO);
    let all = keys(300);

    for key in &all {
        assert_eq!(c.get(key).await, Ok(expected_value(key)));
    }

    for key in &all {
        let owner = c.owner(key);
        for peer in c.peers() {
            assert_eq!(
                peer.is_cached(key),
                peer.id() == owner,
                "{key} cached on wrong peer {}",
                peer.id()
            );
        }
    }

    // Every peer got a share of the keyspace.
    let mut per_peer: HashMap<&str, usize> = HashMap::new();
    for peer in c.peers() {
        per_peer.insert(peer.id(), peer.load_count());
    }
    assert!(per_peer.values().all(|&n| n > 0), "unbalanced: {per_peer:?}");
    assert_eq!(c.total_loads(), all.len());
}

/// Two independently built clusters agree on every owner.
#[test]
fn test_routing_agrees_across_instances() {
    let a = TestCluster::new(&["peer1", "peer2", "peer3"], 3, 10, Duration::ZERO);
    let b = TestCluster::new(&["peer1", "peer2", "peer3"], 3, 10, Duration::ZERO);

    for key in keys(1_000) {
        let owner = a.owner(&key);
        assert!(["peer1", "peer2", "peer3"].contains(&owner.as_str()));
        assert_eq!(owner, b.owner(&key));
    }
}

/// A ring built from config routes like the cluster's own ring.
#[test]
fn test_config_built_ring_agrees_with_cluster() {
    let config = FlockConfig::from_toml(
        r#"
[ring]
replicas = 20
nodes = ["peer1", "peer2"]
"#,
    )
    .unwrap();
    let ring = config.build_ring().unwrap();
    let c = TestCluster::new(&["peer1", "peer2"], 20, 10, Duration::ZERO);

    for key in keys(500) {
        assert_eq!(ring.lookup(&key), Some(c.owner(&key).as_str()));
    }
}

/// Adding a peer moves a fraction of keys to it; everything else keeps
/// hitting the cache on its old owner.
#[tokio::test]
#[ntest::timeout(10000)]
async fn test_add_peer_moves_only_its_keys() {
    let mut c = TestCluster::new(&["peer1", "peer2", "peer3"], 100, 10_000, Duration::ZERO);
    let all = keys(2_000);

    for key in &all {
        c.get(key).await.unwrap();
    }
    assert_eq!(c.total_loads(), all.len());

    let migrations = c.add_peer("peer4", &all);

    let ratio = migrations.len() as f64 / all.len() as f64;
    assert!(
        (0.05..=0.5).contains(&ratio),
        "unexpected share of keys moved: {} ({ratio:.2})",
        migrations.len()
    );
    for m in &migrations {
        assert_eq!(m.to.as_deref(), Some("peer4"));
        assert!(!c.peer(m.from.as_deref().unwrap()).is_cached(&m.key));
    }

    // Read everything again: only migrated keys reload, and on peer4.
    for key in &all {
        assert_eq!(c.get(key).await, Ok(expected_value(key)));
    }
    assert_eq!(c.peer("peer4").load_count(), migrations.len());
    assert_eq!(c.total_loads(), all.len() + migrations.len());
}
