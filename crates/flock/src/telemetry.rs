//! Logging initialization.
//!
//! The primitives only emit `tracing` events. Embedding services install
//! their own subscriber; [`init`] is a console subscriber for tests and
//! simple binaries.

use tracing_subscriber::EnvFilter;

/// Install a console `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `level` (e.g. `"info"`, `"flock_flight=trace"`).
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
