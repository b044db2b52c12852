//! Error types for statistical computations

use thiserror::Error;

/// Which input of a two-variable computation was at fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// First argument (`x`, or the continuous variable)
    X,
    /// Second argument (`y`, or the binary variable)
    Y,
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variable::X => write!(f, "x"),
            Variable::Y => write!(f, "y"),
        }
    }
}

/// Errors that can occur during statistical computations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("No data supplied")]
    EmptyDataset,

    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Zero variance in {variable}: correlation is undefined")]
    ZeroVariance { variable: Variable },

    #[error("Non-finite value in {variable}")]
    NonFinite { variable: Variable },

    #[error("Correlation coefficient {0} is outside [-1, 1]")]
    InvalidCoefficient(f64),

    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// Result type for statistical computations
pub type StatsResult<T> = Result<T, StatsError>;
