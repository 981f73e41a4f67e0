//! # Logging Setup
//!
//! Structured logging configuration for host applications.
//!
//! The crate itself only emits `tracing` events (loader failures, rollback
//! and release warnings); embedding applications that already run their own
//! subscriber should skip this module entirely. `init` is a convenience for
//! hosts without one.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a formatting subscriber filtered by `RUST_LOG`, defaulting to
/// `info`. Double initialization is swallowed so tests can call it freely.
pub fn init() {
    init_with_filter("info");
}

/// Install a formatting subscriber with an explicit default filter
/// (e.g. `"capture_codec=debug"`)
pub fn init_with_filter(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init();
}
