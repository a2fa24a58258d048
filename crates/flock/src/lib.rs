//! Building blocks for a peer-distributed in-memory cache.
//!
//! A cache service built on Flock routes each key to its owning peer with
//! a [`HashRing`], serves hits from a [`BoundedCache`] (or [`SharedCache`]),
//! and funnels concurrent misses for the same key through a [`Group`] so the
//! backing store sees one load:
//!
//! ```text
//! owner = ring.lookup(key)
//! if owner is this peer:
//!     cache.get(key)  or  group.work(key, load) -> cache.add(key, value)
//! else:
//!     forward to owner
//! ```
//!
//! The primitives are independent and hold no global state. [`FlockConfig`]
//! builds them from a TOML file.

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::FlockConfig;
pub use error::ConfigError;
pub use flock_cache::{BoundedCache, EvictionCallback, Iter, SharedCache};
pub use flock_flight::Group;
pub use flock_placement::{
    HashFn, HashRing, Migration, RingError, SharedRing, blake3_32, crc32_ieee,
};
