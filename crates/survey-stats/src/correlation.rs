//! Correlation coefficients and their significance
//!
//! - **Pearson**: linear correlation between two numeric variables
//! - **Point-biserial**: Pearson specialised to one binary and one
//!   continuous variable, computed from the group means directly
//! - **Significance**: two-sided p-value of a coefficient using the
//!   Student-t distribution with `n - 2` degrees of freedom

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{StatsError, StatsResult, Variable};

/// Smallest sample for which a coefficient has a defined significance
pub const MIN_SIGNIFICANCE_SAMPLES: usize = 3;

/// A correlation coefficient with its two-sided significance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    /// Coefficient in [-1, 1]
    pub r: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Number of paired observations
    pub n: usize,
}

impl Correlation {
    /// Degrees of freedom used for the significance test
    pub fn degrees_of_freedom(&self) -> usize {
        self.n.saturating_sub(2)
    }

    /// Check significance at level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Encode booleans as `false -> 0.0`, `true -> 1.0`
pub fn encode_binary(flags: &[bool]) -> Vec<f64> {
    flags.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()
}

/// Pearson correlation coefficient of `x` and `y`
pub fn pearson(x: &[f64], y: &[f64]) -> StatsResult<f64> {
    check_lengths(x.len(), y.len())?;
    if x.is_empty() {
        return Err(StatsError::EmptyDataset);
    }
    check_finite(x, Variable::X)?;
    check_finite(y, Variable::Y)?;
    check_variance(x, Variable::X)?;
    check_variance(y, Variable::Y)?;

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    finite_coefficient(cov / (sxx.sqrt() * syy.sqrt()))
}

/// Point-biserial correlation of a continuous variable against a binary one
///
/// Uses `r = (M1 - M0) / s_n * sqrt(n1 * n0) / n` where `M1`/`M0` are the
/// means of `values` where `flags` is true/false and `s_n` is the
/// population standard deviation of `values`. Requires at least
/// three observations so the significance test has degrees of freedom.
pub fn point_biserial(flags: &[bool], values: &[f64]) -> StatsResult<Correlation> {
    check_lengths(values.len(), flags.len())?;
    let n = values.len();
    if n < MIN_SIGNIFICANCE_SAMPLES {
        return Err(StatsError::InsufficientData {
            required: MIN_SIGNIFICANCE_SAMPLES,
            actual: n,
        });
    }
    check_finite(values, Variable::X)?;
    check_variance(values, Variable::X)?;

    let (mut sum1, mut n1) = (0.0, 0usize);
    let (mut sum0, mut n0) = (0.0, 0usize);
    for (&flag, &value) in flags.iter().zip(values) {
        if flag {
            sum1 += value;
            n1 += 1;
        } else {
            sum0 += value;
            n0 += 1;
        }
    }
    if n1 == 0 || n0 == 0 {
        return Err(StatsError::ZeroVariance {
            variable: Variable::Y,
        });
    }

    let nf = n as f64;
    let mean = (sum1 + sum0) / nf;
    let s_n = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf).sqrt();
    let m1 = sum1 / n1 as f64;
    let m0 = sum0 / n0 as f64;

    let r = finite_coefficient((m1 - m0) / s_n * ((n1 * n0) as f64).sqrt() / nf)?;
    let p_value = correlation_p_value(r, n)?;

    Ok(Correlation { r, p_value, n })
}

/// Two-sided p-value for a correlation coefficient `r` over `n` observations
///
/// `t = r * sqrt((n - 2) / (1 - r^2))` is mapped through the Student-t
/// survival function with `n - 2` degrees of freedom. A perfect
/// correlation yields a p-value of zero.
pub fn correlation_p_value(r: f64, n: usize) -> StatsResult<f64> {
    if n < MIN_SIGNIFICANCE_SAMPLES {
        return Err(StatsError::InsufficientData {
            required: MIN_SIGNIFICANCE_SAMPLES,
            actual: n,
        });
    }
    if !r.is_finite() || r.abs() > 1.0 {
        return Err(StatsError::InvalidCoefficient(r));
    }

    let df = (n - 2) as f64;
    let unexplained = 1.0 - r * r;
    if unexplained <= 0.0 {
        return Ok(0.0);
    }

    let t = r * (df / unexplained).sqrt();
    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;

    Ok((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// Pairwise Pearson matrix over equally long columns
///
/// The diagonal is exactly 1.0; every column must have non-zero variance.
pub fn correlation_matrix(columns: &[&[f64]]) -> StatsResult<Vec<Vec<f64>>> {
    let k = columns.len();
    let mut matrix = vec![vec![0.0; k]; k];

    for i in 0..k {
        if columns[i].is_empty() {
            return Err(StatsError::EmptyDataset);
        }
        check_finite(columns[i], Variable::X)?;
        check_variance(columns[i], Variable::X)?;
        matrix[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = pearson(columns[i], columns[j])?;
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Ok(matrix)
}

fn check_lengths(left: usize, right: usize) -> StatsResult<()> {
    if left != right {
        return Err(StatsError::LengthMismatch { left, right });
    }
    Ok(())
}

fn check_finite(data: &[f64], variable: Variable) -> StatsResult<()> {
    if data.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(StatsError::NonFinite { variable })
    }
}

/// Clamp rounding overshoot; overflowed sums surface as an error
fn finite_coefficient(r: f64) -> StatsResult<f64> {
    if r.is_finite() {
        Ok(r.clamp(-1.0, 1.0))
    } else {
        Err(StatsError::InvalidCoefficient(r))
    }
}

fn check_variance(data: &[f64], variable: Variable) -> StatsResult<()> {
    match data.first() {
        Some(first) if data.iter().any(|v| v != first) => Ok(()),
        _ => Err(StatsError::ZeroVariance { variable }),
    }
}
