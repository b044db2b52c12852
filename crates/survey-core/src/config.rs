//! Configuration for survey analysis
//!
//! Settings can come from a TOML or JSON file. Missing sections and
//! fields fall back to their defaults, so a file only needs to name
//! what it changes:
//!
//! ```toml
//! [report]
//! precision = 3
//! outcome = "clicked"
//!
//! [charts]
//! enabled = true
//! output_dir = "charts"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use survey_io::Outcome;

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "survey-analyzer";

/// Largest number of decimal places printed
pub const MAX_PRECISION: usize = 10;

/// Bounds for chart width and height in pixels
pub const MIN_CHART_DIMENSION: u32 = 100;
pub const MAX_CHART_DIMENSION: u32 = 8192;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub report: ReportConfig,
    pub charts: ChartConfig,
}

/// Report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Decimal places for coefficients, means and percentages
    pub precision: usize,
    /// Polarity for point-biserial correlations
    pub outcome: Outcome,
    /// Boolean column used to partition group means
    pub group_by: Outcome,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            outcome: Outcome::Passed,
            group_by: Outcome::Clicked,
        }
    }
}

/// Chart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub enabled: bool,
    pub output_dir: PathBuf,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: PathBuf::from("charts"),
            width: 640,
            height: 480,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a configuration file; `.json` files are read as
    /// JSON, anything else as TOML
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Default configuration file location, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load `explicit` if given, else the default file if it exists,
    /// else the built-in defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.precision > MAX_PRECISION {
            return Err(ConfigError::OutOfRange(format!(
                "report.precision must be at most {}",
                MAX_PRECISION
            )));
        }

        for (name, value) in [("width", self.charts.width), ("height", self.charts.height)] {
            if !(MIN_CHART_DIMENSION..=MAX_CHART_DIMENSION).contains(&value) {
                return Err(ConfigError::OutOfRange(format!(
                    "charts.{} must be between {} and {}",
                    name, MIN_CHART_DIMENSION, MAX_CHART_DIMENSION
                )));
            }
        }

        Ok(())
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}
