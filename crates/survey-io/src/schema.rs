//! Survey columns and outcome polarities
//!
//! The survey sheet has a fixed set of named columns. Each column is
//! accepted either under its sheet header ("Training Hours (0-10)") or
//! under its snake_case field name ("training_hours").

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::reader::{IoError, IoResult};

/// Every column a survey file must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurveyColumn {
    EmployeeId,
    StrongPasswords,
    TeamExpectation,
    PhishingConfidence,
    TrainingHours,
    ClickedSuspiciousLink,
}

impl SurveyColumn {
    pub const ALL: [SurveyColumn; 6] = [
        SurveyColumn::EmployeeId,
        SurveyColumn::StrongPasswords,
        SurveyColumn::TeamExpectation,
        SurveyColumn::PhishingConfidence,
        SurveyColumn::TrainingHours,
        SurveyColumn::ClickedSuspiciousLink,
    ];

    /// Header as exported from the survey spreadsheet
    pub fn header(&self) -> &'static str {
        match self {
            SurveyColumn::EmployeeId => "Employee ID",
            SurveyColumn::StrongPasswords => "Strong Passwords (1-5)",
            SurveyColumn::TeamExpectation => "Team Expectation (1-5)",
            SurveyColumn::PhishingConfidence => "Phishing Confidence (1-5)",
            SurveyColumn::TrainingHours => "Training Hours (0-10)",
            SurveyColumn::ClickedSuspiciousLink => "Clicked Suspicious Link (Yes/No)",
        }
    }

    /// snake_case field name
    pub fn field_name(&self) -> &'static str {
        match self {
            SurveyColumn::EmployeeId => "employee_id",
            SurveyColumn::StrongPasswords => "strong_passwords",
            SurveyColumn::TeamExpectation => "team_expectation",
            SurveyColumn::PhishingConfidence => "phishing_confidence",
            SurveyColumn::TrainingHours => "training_hours",
            SurveyColumn::ClickedSuspiciousLink => "clicked_suspicious_link",
        }
    }

    /// Check whether a file header names this column
    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header == self.header() || header == self.field_name()
    }
}

/// Check that every survey column is present in a header row
pub fn validate_headers<'a, I>(headers: I) -> IoResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().collect();
    for column in SurveyColumn::ALL {
        if !headers.iter().any(|h| column.matches(h)) {
            return Err(IoError::ColumnNotFound(column.header().to_string()));
        }
    }
    Ok(())
}

/// Coerce a survey cell to a boolean
///
/// Accepts Yes/No, true/false and 1/0, case-insensitively.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// The numeric survey columns, in report order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    StrongPasswords,
    TeamExpectation,
    PhishingConfidence,
    TrainingHours,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 4] = [
        NumericColumn::StrongPasswords,
        NumericColumn::TeamExpectation,
        NumericColumn::PhishingConfidence,
        NumericColumn::TrainingHours,
    ];

    pub fn name(&self) -> &'static str {
        self.survey_column().field_name()
    }

    /// Human-readable label for reports and charts
    pub fn label(&self) -> &'static str {
        match self {
            NumericColumn::StrongPasswords => "Strong Passwords",
            NumericColumn::TeamExpectation => "Team Expectation",
            NumericColumn::PhishingConfidence => "Phishing Confidence",
            NumericColumn::TrainingHours => "Training Hours",
        }
    }

    pub fn survey_column(&self) -> SurveyColumn {
        match self {
            NumericColumn::StrongPasswords => SurveyColumn::StrongPasswords,
            NumericColumn::TeamExpectation => SurveyColumn::TeamExpectation,
            NumericColumn::PhishingConfidence => SurveyColumn::PhishingConfidence,
            NumericColumn::TrainingHours => SurveyColumn::TrainingHours,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Polarity of the binary outcome
///
/// `Passed` and `Clicked` are complements, so correlations against one
/// are the negation of correlations against the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// `passed_phishing_test`, true when the link was not clicked
    Passed,
    /// `clicked_suspicious_link`
    Clicked,
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed_phishing_test",
            Outcome::Clicked => "clicked_suspicious_link",
        }
    }

    /// The opposite polarity
    pub fn flipped(&self) -> Outcome {
        match self {
            Outcome::Passed => Outcome::Clicked,
            Outcome::Clicked => Outcome::Passed,
        }
    }

    /// Label for one value of this outcome
    pub fn value_label(&self, value: bool) -> &'static str {
        match (self, value) {
            (Outcome::Passed, true) => "Passed",
            (Outcome::Passed, false) => "Failed",
            (Outcome::Clicked, true) => "Clicked",
            (Outcome::Clicked, false) => "Did not click",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "passed" | "passed_phishing_test" => Ok(Outcome::Passed),
            "clicked" | "clicked_suspicious_link" => Ok(Outcome::Clicked),
            other => Err(format!(
                "unknown outcome '{}' (expected 'passed' or 'clicked')",
                other
            )),
        }
    }
}
