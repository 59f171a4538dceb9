//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so stdout carries only the report.
//!
//! # Log Levels
//!
//! - `warn` (default): skipped rows, holiday years without lunar data
//! - `info` (`-v`): pipeline stages and counts
//! - `debug` (`-vv`): headers, holiday file details
//! - `trace` (`-vvv`): everything
//!
//! `RUST_LOG` (from the environment or `.env`) overrides the verbosity flag
//! when set.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub with_ansi: bool,
    /// `RUST_LOG`-style directives; take precedence over `level`.
    pub directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_ansi: true,
            directives: None,
        }
    }
}

impl LogConfig {
    /// Map a `-v` count to a level.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Install the global subscriber.
///
/// A second call is a no-op (the first subscriber stays installed).
pub fn init_logging(config: &LogConfig) {
    let filter = build_env_filter(config);
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(false)
        .without_time();

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(format!("payment_lag={}", config.level.as_str().to_lowercase()));
    match config.directives.as_deref().map(str::trim) {
        Some(directives) if !directives.is_empty() => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| fallback())
        }
        _ => fallback(),
    }
}
