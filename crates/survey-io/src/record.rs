//! Typed survey records and the immutable dataset

use serde::{Deserialize, Serialize};

use crate::schema::{NumericColumn, Outcome};

/// One employee's survey answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub employee_id: String,
    /// Self-rated password strength, 1-5
    pub strong_passwords: u8,
    /// Perceived team expectation, 1-5
    pub team_expectation: u8,
    /// Confidence in spotting phishing, 1-5
    pub phishing_confidence: u8,
    /// Security training received, 0-10 hours
    pub training_hours: f64,
    pub clicked_suspicious_link: bool,
}

impl Record {
    /// Derived outcome: the employee did not click the link
    pub fn passed_phishing_test(&self) -> bool {
        !self.clicked_suspicious_link
    }

    /// Value of a numeric column as f64
    pub fn value(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::StrongPasswords => f64::from(self.strong_passwords),
            NumericColumn::TeamExpectation => f64::from(self.team_expectation),
            NumericColumn::PhishingConfidence => f64::from(self.phishing_confidence),
            NumericColumn::TrainingHours => self.training_hours,
        }
    }

    /// Value of the binary outcome in the requested polarity
    pub fn outcome(&self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Passed => self.passed_phishing_test(),
            Outcome::Clicked => self.clicked_suspicious_link,
        }
    }
}

/// An ordered, read-only collection of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Extract one numeric column, in record order
    pub fn column(&self, column: NumericColumn) -> Vec<f64> {
        self.records.iter().map(|r| r.value(column)).collect()
    }

    /// Extract the outcome flags, in record order
    pub fn outcomes(&self, outcome: Outcome) -> Vec<bool> {
        self.records.iter().map(|r| r.outcome(outcome)).collect()
    }

    /// Number of records whose outcome is true
    pub fn count(&self, outcome: Outcome) -> usize {
        self.records.iter().filter(|r| r.outcome(outcome)).count()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
