//! survey-stats - Statistical primitives for survey analysis
//!
//! This crate provides the numeric building blocks used by the analyzer:
//!
//! - **Summary**: mean, median, quantiles, spread
//! - **Correlation**: Pearson, point-biserial, correlation matrices
//! - **Significance**: two-sided p-values from the Student-t distribution
//!
//! # Conventions
//!
//! Boolean inputs are always encoded as `false -> 0.0`, `true -> 1.0`.
//! Undefined results are reported as errors, never as NaN.

pub mod correlation;
pub mod error;
pub mod summary;

pub use correlation::*;
pub use error::*;
pub use summary::*;
