//! Consistent hashing ring for routing cache keys to peers.
//!
//! Every peer is placed on a `u32` ring at several virtual positions
//! (replicas), derived from `hash(replica_index ++ peer_id)`. A key is owned
//! by the first virtual position at or after `hash(key)`, wrapping around at
//! the top of the ring. Adding a peer therefore only moves the keys that land
//! on its new arcs, roughly `1/N` of the keyspace.
//!
//! [`HashRing`] is a plain value with no internal locking. [`SharedRing`]
//! wraps one for concurrent use, publishing immutable snapshots to readers.

pub mod error;
pub mod hash;
mod ring;
mod shared;

pub use error::RingError;
pub use hash::{HashFn, blake3_32, crc32_ieee};
pub use ring::{HashRing, Migration};
pub use shared::SharedRing;
