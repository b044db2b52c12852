//! survey-analyzer - Phishing survey correlation report
//!
//! Loads a survey export, prints summary statistics, group means and
//! point-biserial correlations, and optionally renders SVG charts.

mod output;

use std::path::PathBuf;

use clap::Parser;
use survey_core::{
    analyze, analyze_descriptive, chart, render_description, render_summary, AnalysisConfig,
    AnalysisError, Outcome,
};
use survey_io::load_dataset;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "survey-analyzer", version, about)]
struct Cli {
    /// Survey export to analyze (.csv, .tsv or .xlsx)
    input: PathBuf,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Outcome polarity for point-biserial correlations: passed or clicked
    #[arg(long)]
    outcome: Option<Outcome>,

    /// Boolean column used to group means: passed or clicked
    #[arg(long)]
    group_by: Option<Outcome>,

    /// Render SVG charts into this directory
    #[arg(long, value_name = "DIR")]
    charts: Option<PathBuf>,

    /// Decimal places in the report
    #[arg(long)]
    precision: Option<usize>,

    /// Print all results as one JSON document
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Merge command-line overrides into the file configuration
    fn resolve_config(&self) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
        let mut config = AnalysisConfig::discover(self.config.as_deref())?;

        if let Some(outcome) = self.outcome {
            config.report.outcome = outcome;
        }
        if let Some(group_by) = self.group_by {
            config.report.group_by = group_by;
        }
        if let Some(precision) = self.precision {
            config.report.precision = precision;
        }
        if let Some(dir) = &self.charts {
            config.charts.enabled = true;
            config.charts.output_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.resolve_config()?;
    let dataset = load_dataset(&cli.input)?;
    let analysis = match analyze(&dataset, &config) {
        Ok(analysis) => analysis,
        Err(err @ AnalysisError::ZeroVariance { .. }) => {
            // Correlations are undefined but the descriptive part is not
            let partial = analyze_descriptive(&dataset, &config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&partial)?);
            } else {
                let precision = config.report.precision;
                println!("{}", render_description(&partial.description, precision));
                println!("Group means by {}:", partial.group_means.group);
                println!("{}", output::group_means_table(&partial.group_means, precision));
            }
            tracing::warn!(error = %err, "Correlations could not be computed");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        let precision = config.report.precision;
        println!("{}", render_summary(&analysis.summary, precision));
        println!("Group means by {}:", analysis.group_means.group);
        println!("{}", output::group_means_table(&analysis.group_means, precision));
        println!();
        println!("Point-biserial correlation with {}:", analysis.outcome);
        println!(
            "{}",
            output::point_biserial_table(&analysis.point_biserial, precision)
        );
    }

    if config.charts.enabled {
        let files = chart::render_all(&analysis, &dataset, &config.charts)?;
        for file in files {
            tracing::info!(path = %file.display(), "Wrote chart");
        }
    }

    Ok(())
}

/// Log to stderr, honouring `RUST_LOG` when set
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "survey-analyzer",
            "survey.csv",
            "--outcome",
            "clicked",
            "--group-by",
            "passed",
            "--precision",
            "3",
            "--charts",
            "out",
        ])
        .unwrap();

        assert_eq!(cli.outcome, Some(Outcome::Clicked));
        assert_eq!(cli.group_by, Some(Outcome::Passed));
        assert_eq!(cli.precision, Some(3));
        assert_eq!(cli.charts, Some(PathBuf::from("out")));
        assert!(!cli.json);
    }

    #[test]
    fn test_rejects_unknown_outcome() {
        let result = Cli::try_parse_from(["survey-analyzer", "survey.csv", "--outcome", "maybe"]);
        assert!(result.is_err());
    }
}
