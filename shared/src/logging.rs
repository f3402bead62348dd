//! Logging configuration using tracing

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directive
pub const LOG_ENV: &str = "ZONEBUDDY_LOG";

const DEFAULT_FILTER: &str = "zone_buddy=info,shared=info,warn";

/// Initialize the logging subsystem
///
/// Logs go to stderr. The level is controlled by `ZONEBUDDY_LOG`.
///
/// # Examples
/// ```bash
/// ZONEBUDDY_LOG=debug cargo run -p zone_buddy
/// ZONEBUDDY_LOG=shared=trace cargo run -p zone_buddy
/// ```
///
/// Calling this twice is harmless; the second call only logs a debug line.
pub fn init() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init();

    match installed {
        Ok(()) => tracing::info!(version = env!("CARGO_PKG_VERSION"), "ZoneBuddy starting"),
        Err(e) => tracing::debug!(error = %e, "subscriber already installed"),
    }
}
