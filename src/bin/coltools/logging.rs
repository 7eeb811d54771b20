//! Diagnostic messages go to stderr through `tracing`.
//!
//! The default level is `warn`. Each `--verbose` goes one step louder,
//! `--quiet` allows only errors. `RUST_LOG` overrides both.

use std::io::{self, IsTerminal};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// map the verbosity count onto a level
pub fn level(verbosity: i8) -> Level {
    match verbosity {
        i8::MIN..=-1 => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Only the first call has any effect.
pub fn init(verbosity: i8) {
    let level = level(verbosity).as_str().to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // a second call finds a subscriber already installed, which is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .compact()
        .try_init();
}
