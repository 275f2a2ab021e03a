//! Logging setup
//!
//! Events are emitted with `tracing` macros throughout the crate; this module
//! only installs the subscriber.

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered at `level`.
///
/// `RUST_LOG` takes precedence over `level` when set. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level, "logging initialized");
    }
}
