//! Engine configuration.
//!
//! Threshold tables and scoring weights are read from a TOML file, validated
//! once, and then passed around as immutable values. When no file is
//! configured the built-in production values are used.
//!
//! ```toml
//! [thresholds.tide]
//! warning = 2.5
//! critical = 3.0
//!
//! [thresholds.ph]
//! critical_low = 6.0
//! warning_low = 6.5
//! warning_high = 8.5
//! critical_high = 9.0
//!
//! [risk.weights]
//! high_severity_alert = 25
//! warning_sensor = 15
//! high_risk_prediction = 20
//!
//! [risk.breakpoints]
//! medium = 30
//! high = 60
//! critical = 80
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::alert::ThresholdTable;
use crate::analysis::risk::RiskConfig;
use crate::logging::{self, Component};
use crate::model::RiskError;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_VAR: &str = "COASTAL_RISK_CONFIG";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// The file is not valid TOML or does not match the expected shape.
    /// Malformed threshold tables surface here, since they are validated
    /// during deserialization.
    Parse(String),
    /// Risk breakpoints are not strictly increasing.
    InvalidBreakpoints(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::InvalidBreakpoints(msg) => write!(f, "Invalid risk breakpoints: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RiskError> for ConfigError {
    fn from(err: RiskError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub thresholds: ThresholdTable,
    pub risk: RiskConfig,
}

impl EngineConfig {
    /// Parses and validates a TOML document. Sections that are left out
    /// keep their defaults; a `[thresholds]` section replaces the whole
    /// default table. Unknown keys are an error.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        logging::info(
            Component::Config,
            None,
            &format!("Loaded configuration from {}", path.display()),
        );
        Ok(config)
    }

    /// Loads the file named by `COASTAL_RISK_CONFIG` (a `.env` file is
    /// honoured), or the defaults if the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        match env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim()),
            _ => {
                logging::debug(Component::Config, None, "Using built-in thresholds and weights");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.risk.breakpoints;
        if !(b.medium < b.high && b.high < b.critical) {
            return Err(ConfigError::InvalidBreakpoints(format!(
                "expected medium < high < critical, got {} / {} / {}",
                b.medium, b.high, b.critical
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
