//! Error types for loading configuration.

use flock_placement::RingError;

/// Errors that can occur while loading a [`FlockConfig`](crate::FlockConfig)
/// or building primitives from it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or has the wrong shape.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The ring parameters are invalid.
    #[error("ring error: {0}")]
    Ring(#[from] RingError),

    /// `ring.hash` names a function we do not provide.
    #[error("unknown hash function {0:?}, expected \"crc32\" or \"blake3\"")]
    UnknownHasher(String),
}
