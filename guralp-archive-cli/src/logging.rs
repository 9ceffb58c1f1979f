//! Log subscriber construction.
//!
//! The subscriber is built once in `main` and installed only for the
//! duration of the command, never as a process-wide default.

use tracing_subscriber::{fmt, fmt::time::ChronoLocal, EnvFilter};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `RUST_LOG` wins; otherwise `debug` when verbose, else the configured level.
pub fn subscriber(verbose: bool, configured: &str) -> impl tracing::Subscriber + Send + Sync {
    let fallback = if verbose { "debug" } else { configured };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_writer(std::io::stderr)
        .finish()
}
