//! Summary statistics for survey columns
//!
//! Provides the descriptive statistics printed in reports and used
//! to draw boxplots:
//! - Mean, median, quartiles
//! - Min, max, population variance and standard deviation

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult, Variable};

/// Summary statistics for a numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of values
    pub count: usize,
    /// Mean (average)
    pub mean: f64,
    /// Median (50th percentile)
    pub median: f64,
    /// Population variance
    pub variance: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// First quartile (25th percentile)
    pub q1: f64,
    /// Third quartile (75th percentile)
    pub q3: f64,
}

impl SummaryStats {
    /// Compute summary statistics from data
    pub fn from_data(data: &[f64]) -> StatsResult<Self> {
        if data.is_empty() {
            return Err(StatsError::EmptyDataset);
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(StatsError::NonFinite {
                variable: Variable::X,
            });
        }

        let count = data.len();
        let mean = data.iter().sum::<f64>() / count as f64;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        let sorted = sorted_copy(data);

        Ok(Self {
            count,
            mean,
            median: quantile_sorted(&sorted, 0.5),
            variance,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
            q1: quantile_sorted(&sorted, 0.25),
            q3: quantile_sorted(&sorted, 0.75),
        })
    }

    /// Interquartile range (q3 - q1)
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Arithmetic mean
pub fn mean(data: &[f64]) -> StatsResult<f64> {
    if data.is_empty() {
        return Err(StatsError::EmptyDataset);
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Median; the average of the two middle values for even-length input
pub fn median(data: &[f64]) -> StatsResult<f64> {
    quantile(data, 0.5)
}

/// Quantile at probability `p` in [0, 1]
///
/// Interpolates linearly between the two closest ranks, so
/// `quantile(data, 0.5)` equals the conventional median.
pub fn quantile(data: &[f64], p: f64) -> StatsResult<f64> {
    if data.is_empty() {
        return Err(StatsError::EmptyDataset);
    }
    Ok(quantile_sorted(&sorted_copy(data), p))
}

fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

// `sorted` must be non-empty
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_stats_basic() {
        let data: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let stats = SummaryStats::from_data(&data).unwrap();

        assert_eq!(stats.count, 10);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert!((stats.mean - 5.5).abs() < 1e-10);
        assert!((stats.median - 5.5).abs() < 1e-10);
        assert!((stats.variance - 8.25).abs() < 1e-10);
    }

    #[test]
    fn test_summary_stats_empty() {
        assert_eq!(SummaryStats::from_data(&[]), Err(StatsError::EmptyDataset));
    }

    #[test]
    fn test_summary_stats_non_finite() {
        assert_eq!(
            SummaryStats::from_data(&[1.0, f64::NAN, 3.0]),
            Err(StatsError::NonFinite {
                variable: Variable::X
            })
        );
        assert!(SummaryStats::from_data(&[f64::INFINITY]).is_err());
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_quartiles_interpolate() {
        let stats = SummaryStats::from_data(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.iqr(), 2.0);

        // Position 0.75 between 1.0 and 2.0
        assert!((quantile(&[1.0, 2.0, 3.0, 4.0], 0.25).unwrap() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_mean_empty() {
        assert!(mean(&[]).is_err());
        assert_eq!(mean(&[2.0, 4.0]).unwrap(), 3.0);
    }
}
