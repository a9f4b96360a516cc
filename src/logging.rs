//! Logging initialization.
//!
//! Uses the `tracing` ecosystem. Log output goes to stderr so stdout stays
//! free for the version banner.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map the CLI flags to a default filter: `debug` wins over `verbose`,
/// otherwise only warnings are shown.
pub fn default_level(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    }
}

/// Initialize the global subscriber. `RUST_LOG` overrides the flags.
pub fn init(verbose: bool, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, debug)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}
