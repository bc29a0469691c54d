//! Configuration using Figment.
//!
//! Configuration is loaded from:
//! 1. a TOML file (base configuration)
//! 2. environment variables prefixed with `OPENXC_`
//!
//! ```toml
//! [source]
//! driver = "trace"
//! resource = "traces/drive-cycle.json"
//! mismatch_policy = "skip"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```
//!
//! Environment overrides use `__` between section and key, so
//! `OPENXC_SOURCE__RESOURCE=other.json` replaces `source.resource`.

use crate::datasource::DataSource;
use crate::drivers::TRACE_DRIVER;
use crate::error::{OpenXcError, Result};
use crate::ingest::MismatchPolicy;
use crate::logging::{parse_log_level, LogFormat};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "OPENXC_";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenXcConfig {
    /// Data source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which driver to open, on what, and how to treat bad values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Registered driver type
    #[serde(default = "default_driver")]
    pub driver: String,
    /// Resource passed to the driver's `open` (a file path for `trace`)
    #[serde(default)]
    pub resource: String,
    /// Handling of type mismatches during ingest
    #[serde(default)]
    pub mismatch_policy: MismatchPolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            resource: String::new(),
            mismatch_policy: MismatchPolicy::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_driver() -> String {
    TRACE_DRIVER.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl OpenXcConfig {
    /// Load from a TOML file and `OPENXC_` environment variables.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks that parsing cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.source.driver.is_empty() {
            return Err(OpenXcError::Configuration(
                "source.driver must not be empty".into(),
            ));
        }
        if self.source.resource.is_empty() {
            return Err(OpenXcError::Configuration(
                "source.resource must not be empty".into(),
            ));
        }
        parse_log_level(&self.logging.level).map_err(OpenXcError::Configuration)?;
        Ok(())
    }

    /// Open the configured data source from the process-wide registry.
    pub fn open_source(&self) -> Result<DataSource> {
        DataSource::open(&self.source.driver, &self.source.resource)
    }
}
