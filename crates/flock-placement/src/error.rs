//! Error types for ring construction.

/// Errors that can occur while building a [`HashRing`](crate::HashRing).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// A ring needs at least one virtual point per node.
    #[error("replica count must be at least 1")]
    ZeroReplicas,
}
