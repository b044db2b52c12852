//! survey-core - Correlation analysis for phishing-awareness surveys
//!
//! Relates self-reported security habits (password strength, team
//! expectations, phishing confidence, training hours) to whether an
//! employee passed a simulated phishing test.
//!
//! # Layers
//!
//! - [`analyzer`]: pure statistics over an injected [`Dataset`]
//! - [`report`]: printable text report
//! - [`chart`]: SVG charts, kept apart from the statistics
//! - [`config`]: TOML/JSON configuration

pub mod analyzer;
pub mod colormap;
pub mod config;
pub mod error;
pub mod report;

#[cfg(feature = "charts")]
pub mod chart;

pub use analyzer::*;
pub use config::*;
pub use error::*;
pub use report::*;

pub use survey_io::{Dataset, NumericColumn, Outcome, Record};
pub use survey_stats::Correlation;
