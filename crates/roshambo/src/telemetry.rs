//! Logging setup.
//!
//! The library only emits `tracing` events. Whoever embeds it decides
//! where they go; this is the stock choice.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes. Safe to call more than once.
pub fn init() -> bool {
    init_with_default(DEFAULT_FILTER)
}

/// Like [`init`], with a caller-chosen fallback filter.
pub fn init_with_default(fallback: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
