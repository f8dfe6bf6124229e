//! Logging initialization.
//!
//! The library only emits `tracing` events; installing a subscriber is up
//! to the application. `RUST_LOG` always wins over the defaults below.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: matching runs at `info`,
/// dependencies at `warn`.
pub const DEFAULT_FILTER: &str = "warn,u_match=info";

/// Filter used by [`init_test`] when `RUST_LOG` is unset.
pub const TEST_FILTER: &str = "warn,u_match=debug";

type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs a formatted subscriber, failing if one is already set.
pub fn try_init() -> Result<(), InitError> {
    fmt()
        .with_env_filter(filter_or(DEFAULT_FILTER))
        .with_line_number(true)
        .try_init()
}

/// Installs a formatted subscriber unless the application already has one.
///
/// ```no_run
/// // RUST_LOG=u_match=debug shows every assignment and relocation.
/// u_match::logging::init();
/// ```
pub fn init() {
    if let Err(err) = try_init() {
        tracing::debug!(error = %err, "keeping existing subscriber");
    }
}

/// Routes matching events through the test harness's captured output.
///
/// Safe to call from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(filter_or(TEST_FILTER))
        .with_test_writer()
        .try_init();
}
