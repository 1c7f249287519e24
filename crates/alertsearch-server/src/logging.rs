//! Tracing subscriber setup for the binary.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::LoggerOpts;

/// Level used when `RUST_LOG` is not set.
#[must_use]
pub const fn default_level(opts: &LoggerOpts) -> &'static str {
    if opts.debug {
        "trace"
    } else if opts.verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the level derived from `opts`. Debug mode
/// adds source file and line to every event.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(opts: &LoggerOpts) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(opts)));

    let (json, text) = if opts.json {
        let layer = fmt::layer()
            .json()
            .with_file(opts.debug)
            .with_line_number(opts.debug);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .with_file(opts.debug)
            .with_line_number(opts.debug);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()
}
