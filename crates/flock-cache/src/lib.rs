//! Bounded recency cache for values owned by this peer.
//!
//! [`BoundedCache`] keeps at most `max_entries` entries and evicts the least
//! recently used one when a new key would exceed that bound. An optional
//! eviction callback sees every entry that leaves the cache.
//!
//! [`BoundedCache`] has no locking of its own; [`SharedCache`] puts one
//! behind a mutex for use from several threads.

mod list;
mod lru;
mod shared;

pub use list::Iter;
pub use lru::{BoundedCache, EvictionCallback};
pub use shared::SharedCache;
