//! Request coalescing for cache loads.
//!
//! When many callers miss the cache for the same key at once, only one of
//! them should hit the backing store. [`Group::work`] runs the computation
//! for the first caller and hands its result to everyone who asked for the
//! same key while it was running.

mod group;

pub use group::Group;
