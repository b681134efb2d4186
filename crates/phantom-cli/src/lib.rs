//! Phantom command line - exposed as a library for testing
//!
//! The binary scans Java source roots for `@ModEntryPoint` members, runs
//! one generation pass per loader and writes adapters plus the loader's
//! descriptor into an output directory.

pub mod commands;
pub mod common;
pub mod errors;

pub use common::GlobalOpts;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter; `RUST_LOG` is the fallback
pub const LOG_ENV: &str = "PHANTOM_LOG";

/// Install the tracing subscriber for library diagnostics
///
/// Each `-v` raises the default level; an explicit filter in the
/// environment always wins.
pub fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "phantom=warn",
        1 => "phantom=debug",
        _ => "phantom=trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
