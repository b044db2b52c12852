//! Correlation analyzer
//!
//! Every operation is a pure function of the dataset it is given.
//! Boolean outcomes are encoded as `false -> 0`, `true -> 1`; the
//! polarity (`Passed` or `Clicked`) is always named by the caller.

use serde::Serialize;
use std::collections::BTreeMap;

use survey_io::{Dataset, NumericColumn, Outcome};
use survey_stats::{
    correlation_matrix as pearson_matrix, encode_binary, mean, pearson,
    point_biserial as point_biserial_r, Correlation, StatsError, SummaryStats,
};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};

/// Descriptive statistics for one numeric column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: NumericColumn,
    pub stats: SummaryStats,
    /// Pearson r against `passed_phishing_test`
    pub correlation: f64,
}

impl ColumnSummary {
    pub fn mean(&self) -> f64 {
        self.stats.mean
    }

    pub fn median(&self) -> f64 {
        self.stats.median
    }
}

/// Pass rate plus per-column summaries
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub total: usize,
    pub passed: usize,
    /// `100 * passed / total`
    pub pass_percentage: f64,
    pub columns: Vec<ColumnSummary>,
}

impl SummaryReport {
    pub fn column(&self, column: NumericColumn) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Pass rate and per-column statistics
///
/// Unlike [`SummaryReport`] this stays defined when every employee shares
/// the same outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Description {
    pub total: usize,
    pub passed: usize,
    pub pass_percentage: f64,
    pub columns: BTreeMap<NumericColumn, SummaryStats>,
}

/// The results that remain when correlations are undefined
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveAnalysis {
    pub description: Description,
    pub group_means: GroupMeans,
}

/// Point-biserial results keyed by column
pub type PointBiserialResults = BTreeMap<NumericColumn, Correlation>;

/// Means of every numeric column within one outcome partition
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub value: bool,
    pub label: String,
    pub count: usize,
    pub means: BTreeMap<NumericColumn, f64>,
}

/// Records partitioned by a boolean column
#[derive(Debug, Clone, Serialize)]
pub struct GroupMeans {
    pub group: Outcome,
    /// Non-empty partitions, `false` before `true`
    pub groups: Vec<GroupSummary>,
}

impl GroupMeans {
    pub fn get(&self, value: bool) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| g.value == value)
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}

/// Pairwise Pearson correlations between the numeric columns
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: NumericColumn, b: NumericColumn) -> Option<f64> {
        let i = self.columns.iter().position(|&c| c == a)?;
        let j = self.columns.iter().position(|&c| c == b)?;
        Some(self.values[i][j])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Everything the analyzer computes for one dataset
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub summary: SummaryReport,
    pub outcome: Outcome,
    pub point_biserial: PointBiserialResults,
    pub group_means: GroupMeans,
    pub correlation_matrix: CorrelationMatrix,
}

/// Pass rate and descriptive statistics of every numeric column
pub fn describe(dataset: &Dataset) -> AnalysisResult<Description> {
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let total = dataset.len();
    let passed = dataset.count(Outcome::Passed);

    let mut columns = BTreeMap::new();
    for column in NumericColumn::ALL {
        let stats = SummaryStats::from_data(&dataset.column(column))
            .map_err(|e| AnalysisError::from_stats(e, column.name(), column.name()))?;
        columns.insert(column, stats);
    }

    Ok(Description {
        total,
        passed,
        pass_percentage: 100.0 * passed as f64 / total as f64,
        columns,
    })
}

/// Summarize every numeric column and the pass rate
///
/// Correlations are taken against `passed_phishing_test`.
pub fn summarize(dataset: &Dataset) -> AnalysisResult<SummaryReport> {
    let description = describe(dataset)?;
    let outcome = encode_binary(&dataset.outcomes(Outcome::Passed));

    let columns = description
        .columns
        .into_iter()
        .map(|(column, stats)| -> AnalysisResult<ColumnSummary> {
            let correlation = pearson(&dataset.column(column), &outcome)
                .map_err(|e| AnalysisError::from_stats(e, column.name(), Outcome::Passed.name()))?;
            Ok(ColumnSummary {
                column,
                stats,
                correlation,
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    tracing::debug!(
        total = description.total,
        passed = description.passed,
        pass_percentage = description.pass_percentage,
        "Summarized dataset"
    );

    Ok(SummaryReport {
        total: description.total,
        passed: description.passed,
        pass_percentage: description.pass_percentage,
        columns,
    })
}

/// Point-biserial correlation of every numeric column against `outcome`
pub fn point_biserial(dataset: &Dataset, outcome: Outcome) -> AnalysisResult<PointBiserialResults> {
    let flags = dataset.outcomes(outcome);

    let mut results = BTreeMap::new();
    for column in NumericColumn::ALL {
        let values = dataset.column(column);
        let correlation = point_biserial_r(&flags, &values)
            .map_err(|e| AnalysisError::from_stats(e, column.name(), outcome.name()))?;
        tracing::debug!(
            column = column.name(),
            r = correlation.r,
            p_value = correlation.p_value,
            "Point-biserial correlation"
        );
        results.insert(column, correlation);
    }

    Ok(results)
}

/// Mean of every numeric column within each value of `group`
pub fn group_means(dataset: &Dataset, group: Outcome) -> GroupMeans {
    let groups = [false, true]
        .into_iter()
        .filter_map(|value| {
            let members: Vec<_> = dataset.iter().filter(|r| r.outcome(group) == value).collect();
            if members.is_empty() {
                return None;
            }

            let means = NumericColumn::ALL
                .iter()
                .filter_map(|&column| {
                    let values: Vec<f64> = members.iter().map(|r| r.value(column)).collect();
                    mean(&values).ok().map(|m| (column, m))
                })
                .collect();

            Some(GroupSummary {
                value,
                label: group.value_label(value).to_string(),
                count: members.len(),
                means,
            })
        })
        .collect();

    GroupMeans { group, groups }
}

/// Pearson correlation matrix of the numeric columns
pub fn correlation_matrix(dataset: &Dataset) -> AnalysisResult<CorrelationMatrix> {
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let columns = NumericColumn::ALL.to_vec();
    let data: Vec<Vec<f64>> = columns.iter().map(|&c| dataset.column(c)).collect();
    let slices: Vec<&[f64]> = data.iter().map(Vec::as_slice).collect();

    let values = pearson_matrix(&slices).map_err(|e| {
        // The primitive error carries no column index
        let non_finite = matches!(e, StatsError::NonFinite { .. });
        let culprit = columns
            .iter()
            .zip(&data)
            .find(|(_, values)| {
                if non_finite {
                    values.iter().any(|v| !v.is_finite())
                } else {
                    values.iter().all(|v| *v == values[0])
                }
            })
            .map(|(c, _)| c.name())
            .unwrap_or("unknown");
        AnalysisError::from_stats(e, culprit, culprit)
    })?;

    Ok(CorrelationMatrix { columns, values })
}

/// Run the full analysis for a dataset
pub fn analyze(dataset: &Dataset, config: &AnalysisConfig) -> AnalysisResult<Analysis> {
    let summary = summarize(dataset)?;
    let point_biserial = point_biserial(dataset, config.report.outcome)?;
    let group_means = group_means(dataset, config.report.group_by);
    let correlation_matrix = correlation_matrix(dataset)?;

    tracing::info!(
        records = dataset.len(),
        outcome = config.report.outcome.name(),
        group_by = config.report.group_by.name(),
        "Analysis complete"
    );

    Ok(Analysis {
        summary,
        outcome: config.report.outcome,
        point_biserial,
        group_means,
        correlation_matrix,
    })
}

/// Descriptive statistics and group means only
///
/// Used to report what is still defined after [`analyze`] fails, for
/// example when every employee passed.
pub fn analyze_descriptive(
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> AnalysisResult<DescriptiveAnalysis> {
    Ok(DescriptiveAnalysis {
        description: describe(dataset)?,
        group_means: group_means(dataset, config.report.group_by),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_io::Record;

    fn record(sp: u8, te: u8, pc: u8, hours: f64, clicked: bool) -> Record {
        Record {
            employee_id: format!("E{}{}{}{}", sp, te, pc, hours),
            strong_passwords: sp,
            team_expectation: te,
            phishing_confidence: pc,
            training_hours: hours,
            clicked_suspicious_link: clicked,
        }
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            record(2, 3, 1, 2.0, true),
            record(5, 4, 4, 8.0, false),
            record(4, 5, 3, 5.0, false),
            record(1, 2, 2, 1.0, true),
        ])
    }

    #[test]
    fn test_summarize_pass_rate() {
        let report = summarize(&sample()).unwrap();
        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 2);
        assert!((report.pass_percentage - 50.0).abs() < 1e-12);
        assert_eq!(report.columns.len(), 4);
    }

    #[test]
    fn test_summarize_training_hours() {
        let report = summarize(&sample()).unwrap();
        let hours = report.column(NumericColumn::TrainingHours).unwrap();
        assert!((hours.mean() - 4.0).abs() < 1e-12);
        assert!((hours.median() - 3.5).abs() < 1e-12);
        assert!((hours.correlation - 5.0 / 30f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(matches!(
            summarize(&Dataset::default()),
            Err(AnalysisError::EmptyDataset)
        ));
    }

    #[test]
    fn test_describe_constant_outcome() {
        let dataset = Dataset::new(vec![
            record(2, 3, 1, 2.0, false),
            record(5, 4, 4, 8.0, false),
            record(4, 5, 3, 5.0, false),
        ]);
        assert!(matches!(
            summarize(&dataset),
            Err(AnalysisError::ZeroVariance { .. })
        ));

        let description = describe(&dataset).unwrap();
        assert_eq!(description.passed, 3);
        assert!((description.pass_percentage - 100.0).abs() < 1e-12);
        assert!((description.columns[&NumericColumn::TrainingHours].mean - 5.0).abs() < 1e-12);

        let partial = analyze_descriptive(&dataset, &AnalysisConfig::default()).unwrap();
        assert_eq!(partial.group_means.groups.len(), 1);
    }

    #[test]
    fn test_group_means_partitions() {
        let groups = group_means(&sample(), Outcome::Clicked);
        assert_eq!(groups.groups.len(), 2);
        assert_eq!(groups.total(), 4);

        let clicked = groups.get(true).unwrap();
        assert_eq!(clicked.count, 2);
        assert_eq!(clicked.label, "Clicked");
        assert!((clicked.means[&NumericColumn::TrainingHours] - 1.5).abs() < 1e-12);

        let not_clicked = groups.get(false).unwrap();
        assert!((not_clicked.means[&NumericColumn::StrongPasswords] - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_group_means_single_partition() {
        let dataset = Dataset::new(vec![record(1, 1, 1, 1.0, false), record(2, 2, 2, 2.0, false)]);
        let groups = group_means(&dataset, Outcome::Passed);
        assert_eq!(groups.groups.len(), 1);
        assert!(groups.get(false).is_none());
        assert_eq!(groups.get(true).unwrap().count, 2);
    }

    #[test]
    fn test_correlation_matrix_diagonal() {
        let matrix = correlation_matrix(&sample()).unwrap();
        assert_eq!(matrix.len(), 4);
        for column in NumericColumn::ALL {
            assert_eq!(matrix.get(column, column), Some(1.0));
        }
    }

    #[test]
    fn test_correlation_matrix_names_constant_column() {
        let dataset = Dataset::new(vec![
            record(3, 1, 1, 1.0, false),
            record(3, 2, 2, 2.0, true),
        ]);
        match correlation_matrix(&dataset) {
            Err(AnalysisError::ZeroVariance { variable }) => {
                assert_eq!(variable, "strong_passwords")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
