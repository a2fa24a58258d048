//! TOML configuration for the cache primitives.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults documented on each field.

use std::hash::Hash;
use std::path::Path;

use flock_cache::{BoundedCache, SharedCache};
use flock_placement::{HashFn, HashRing, blake3_32, crc32_ieee};
use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    /// Consistent hash ring.
    pub ring: RingSection,
    /// Local bounded cache.
    pub cache: CacheSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[ring]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RingSection {
    /// Virtual points per node. Defaults to 50.
    pub replicas: usize,
    /// Hash function name: `"crc32"` (default) or `"blake3"`.
    ///
    /// Every peer must use the same function or they will disagree on key
    /// ownership.
    pub hash: String,
    /// Initial ring members.
    pub nodes: Vec<String>,
}

impl Default for RingSection {
    fn default() -> Self {
        Self {
            replicas: 50,
            hash: "crc32".to_string(),
            nodes: Vec::new(),
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Maximum cached entries, 0 = unbounded. Defaults to 10 000.
    pub max_entries: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self { max_entries: 10_000 }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl FlockConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                Self::from_toml(&content)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Resolve the configured hash function name.
    pub fn hash_fn(&self) -> Result<HashFn, ConfigError> {
        match self.ring.hash.as_str() {
            "crc32" => Ok(crc32_ieee),
            "blake3" => Ok(blake3_32),
            other => Err(ConfigError::UnknownHasher(other.to_string())),
        }
    }

    /// Build a ring holding the configured nodes.
    pub fn build_ring(&self) -> Result<HashRing, ConfigError> {
        let mut ring = HashRing::with_hasher(self.ring.replicas, self.hash_fn()?)?;
        ring.add_nodes(&self.ring.nodes);
        Ok(ring)
    }

    /// Build an empty single-owner cache with the configured capacity.
    pub fn build_cache<K, V>(&self) -> BoundedCache<K, V>
    where
        K: Hash + Eq + Clone,
    {
        BoundedCache::new(self.cache.max_entries)
    }

    /// Build an empty thread-safe cache with the configured capacity.
    pub fn build_shared_cache<K, V>(&self) -> SharedCache<K, V>
    where
        K: Hash + Eq + Clone,
    {
        SharedCache::new(self.cache.max_entries)
    }
}
