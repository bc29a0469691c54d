//! Tracing subscriber setup.
//!
//! Structured logging through `tracing` and `tracing-subscriber`, with the
//! level taken from [`LoggingConfig`] unless `RUST_LOG` is set.
//!
//! ```no_run
//! use openxc::config::OpenXcConfig;
//! use openxc::logging;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OpenXcConfig::load_from("openxc.toml")?;
//! logging::init(&config.logging)?;
//! tracing::info!("ready");
//! # Ok(())
//! # }
//! ```

use crate::config::LoggingConfig;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Output format for log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Pretty-printed with colors (for development)
    #[default]
    Pretty,
    /// Single-line without colors
    Compact,
    /// JSON lines (for log aggregation)
    Json,
}

/// Install the global subscriber.
///
/// Idempotent: if a subscriber is already installed this returns `Ok(())`,
/// which keeps it safe to call from tests.
pub fn init(config: &LoggingConfig) -> Result<(), String> {
    let level = parse_log_level(&config.level)?;
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let layer = match config.format {
        LogFormat::Pretty => fmt::layer().pretty().with_filter(env_filter).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(false)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_filter(env_filter).boxed(),
    };

    match tracing_subscriber::registry().with(layer).try_init() {
        Ok(()) => Ok(()),
        // Already initialized: expected in tests and when embedded
        Err(e) if e.to_string().contains("already been set") => Ok(()),
        Err(e) => Err(format!("Failed to initialize tracing: {}", e)),
    }
}

/// Parse a log level name, case-insensitively.
pub fn parse_log_level(level: &str) -> Result<Level, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(format!(
            "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
            level
        )),
    }
}
