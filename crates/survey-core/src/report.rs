//! Printable text report

use std::fmt::{self, Write};

use survey_io::NumericColumn;
use survey_stats::SummaryStats;

use crate::analyzer::{Description, SummaryReport};

/// Width of the label column, including indentation
const LABEL_WIDTH: usize = 29;

/// Render the summary report with `precision` decimal places
pub fn render_summary(report: &SummaryReport, precision: usize) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_summary(&mut out, report, precision);
    out
}

/// Render pass rate, means and medians without correlations
pub fn render_description(description: &Description, precision: usize) -> String {
    let mut out = String::new();
    let _ = write_description(&mut out, description, precision);
    out
}

fn write_summary<W: Write>(out: &mut W, report: &SummaryReport, precision: usize) -> fmt::Result {
    write_pass_rate(out, report.passed, report.total, report.pass_percentage, precision)?;

    for column in &report.columns {
        write_column(out, column.column, &column.stats, precision)?;
        write_row(
            out,
            "Correlation (r-value):",
            &format!("{:.*}", precision, column.correlation),
        )?;
    }

    Ok(())
}

fn write_description<W: Write>(
    out: &mut W,
    description: &Description,
    precision: usize,
) -> fmt::Result {
    write_pass_rate(
        out,
        description.passed,
        description.total,
        description.pass_percentage,
        precision,
    )?;

    for (column, stats) in &description.columns {
        write_column(out, *column, stats, precision)?;
    }

    Ok(())
}

fn write_pass_rate<W: Write>(
    out: &mut W,
    passed: usize,
    total: usize,
    percentage: f64,
    precision: usize,
) -> fmt::Result {
    writeln!(out, "Employee Survey Results:")?;
    writeln!(out)?;
    writeln!(out, "   Phishing Test Results:")?;
    write_row(
        out,
        "Passed:",
        &format!("{} of {} ({:.*}%)", passed, total, precision, percentage),
    )?;
    writeln!(out)
}

fn write_column<W: Write>(
    out: &mut W,
    column: NumericColumn,
    stats: &SummaryStats,
    precision: usize,
) -> fmt::Result {
    writeln!(out, "   {}:", column.label())?;
    write_row(out, "Mean:", &format!("{:.*}", precision, stats.mean))?;
    write_row(out, "Median:", &format!("{:.*}", precision, stats.median))
}

fn write_row<W: Write>(out: &mut W, label: &str, value: &str) -> fmt::Result {
    writeln!(out, "      {:<width$}{}", label, value, width = LABEL_WIDTH - 6)
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write_summary(f, self, precision)
    }
}
