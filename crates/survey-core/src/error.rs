//! Error types for survey-core
//!
//! Statistical failures are reported in terms of the survey columns
//! involved, so callers see `training_hours` rather than `x`.

use std::path::PathBuf;
use thiserror::Error;

use survey_io::IoError;
use survey_stats::{StatsError, Variable};

use crate::config::ConfigError;

/// Main error type for analysis operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Zero records supplied
    #[error("Dataset contains no records")]
    EmptyDataset,

    /// Too few records for a significance test
    #[error("Insufficient data: need at least {required} records, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A column or the outcome is constant
    #[error("Zero variance in '{variable}': correlation is undefined")]
    ZeroVariance { variable: String },

    /// A column holds NaN or an infinity
    #[error("Non-finite value in '{variable}'")]
    NonFinite { variable: String },

    #[error("Statistics error: {0}")]
    Stats(StatsError),

    #[error("Failed to load dataset: {0}")]
    Io(#[from] IoError),

    #[error("Chart rendering failed: {0}")]
    Chart(#[from] ChartError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    /// Translate a primitive error, naming the two variables involved
    pub fn from_stats(err: StatsError, x: &str, y: &str) -> Self {
        match err {
            StatsError::EmptyDataset => AnalysisError::EmptyDataset,
            StatsError::InsufficientData { required, actual } => {
                AnalysisError::InsufficientData { required, actual }
            }
            StatsError::ZeroVariance { variable } => AnalysisError::ZeroVariance {
                variable: match variable {
                    Variable::X => x.to_string(),
                    Variable::Y => y.to_string(),
                },
            },
            StatsError::NonFinite { variable } => AnalysisError::NonFinite {
                variable: match variable {
                    Variable::X => x.to_string(),
                    Variable::Y => y.to_string(),
                },
            },
            other => AnalysisError::Stats(other),
        }
    }
}

/// Errors related to chart rendering
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Invalid dimensions: {width}x{height} (must be between {min} and {max})")]
    InvalidDimensions {
        width: u32,
        height: u32,
        min: u32,
        max: u32,
    },

    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Nothing to draw: {0}")]
    NoData(String),

    #[error("Drawing failed: {0}")]
    Drawing(String),
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Result type alias for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
