//! Test fixture loading utilities

use std::path::PathBuf;

use survey_io::{load_dataset, Dataset, Record};

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a survey fixture as a dataset
pub fn load_survey_fixture(name: &str) -> Dataset {
    load_dataset(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Build a dataset from (training_hours, passed) pairs; the other
/// columns vary with the row index so they never have zero variance
#[allow(dead_code)]
pub fn hours_dataset(rows: &[(f64, bool)]) -> Dataset {
    Dataset::new(
        rows.iter()
            .enumerate()
            .map(|(i, &(hours, passed))| Record {
                employee_id: format!("E{:03}", i + 1),
                strong_passwords: (i % 5 + 1) as u8,
                team_expectation: ((i + 2) % 5 + 1) as u8,
                phishing_confidence: ((i * 3) % 5 + 1) as u8,
                training_hours: hours,
                clicked_suspicious_link: !passed,
            })
            .collect(),
    )
}
