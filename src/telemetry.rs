//! Logging setup. Events go to stderr so stdout stays clean for the panel
//! and the shareable query string.

use std::env;
use std::io::{self, IsTerminal};

use tracing::Level;

pub(crate) const LOG_ENV: &str = "DTF_PLAYGROUND_LOG";

/// `-v` flags win over the environment; the default is `warn`.
pub(crate) fn log_level(verbosity: u8, env_value: Option<&str>) -> Level {
    match verbosity {
        0 => env_value
            .and_then(|v| v.trim().parse::<Level>().ok())
            .unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub(crate) fn init_tracing(verbosity: u8) {
    let env_value = env::var(LOG_ENV).ok();
    let level = log_level(verbosity, env_value.as_deref());
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
