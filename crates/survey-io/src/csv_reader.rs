//! CSV/TSV survey reader with type coercion

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::reader::{DatasetReader, IoError, IoResult};
use crate::record::{Dataset, Record};
use crate::schema::{parse_flag, validate_headers};

/// CSV file reader
pub struct CsvReader {
    path: String,
    metadata: HashMap<String, String>,
    delimiter: u8,
}

impl CsvReader {
    /// Open a comma-separated file
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        Self::open_with_delimiter(path, b',')
    }

    /// Open a delimited file
    pub fn open_with_delimiter(path: impl AsRef<Path>, delimiter: u8) -> IoResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let mut metadata = HashMap::new();
        metadata.insert("format".to_string(), "CSV".to_string());
        metadata.insert("delimiter".to_string(), (delimiter as char).to_string());

        Ok(Self {
            path: path.display().to_string(),
            metadata,
            delimiter,
        })
    }

    /// Parse survey records from any byte source
    pub fn parse<R: Read>(source: R, delimiter: u8) -> IoResult<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .clone();
        validate_headers(headers.iter())?;

        let mut records = Vec::new();
        for (i, result) in reader.deserialize::<SurveyRow>().enumerate() {
            // Row 1 is the header
            let row = i + 2;
            let parsed = result.map_err(|e| IoError::InvalidRecord {
                row,
                message: describe_csv_error(&e),
            })?;
            records.push(parsed.into());
        }

        tracing::debug!(records = records.len(), "Parsed survey rows");
        Ok(Dataset::new(records))
    }
}

impl DatasetReader for CsvReader {
    fn read_dataset(&self) -> IoResult<Dataset> {
        let file = File::open(&self.path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        Self::parse(BufReader::new(file), self.delimiter)
    }

    fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        if self.delimiter == b'\t' {
            "TSV"
        } else {
            "CSV"
        }
    }
}

/// One row as it appears in the file
#[derive(Debug, Deserialize)]
struct SurveyRow {
    #[serde(rename = "Employee ID", alias = "employee_id")]
    employee_id: String,
    #[serde(rename = "Strong Passwords (1-5)", alias = "strong_passwords")]
    strong_passwords: u8,
    #[serde(rename = "Team Expectation (1-5)", alias = "team_expectation")]
    team_expectation: u8,
    #[serde(rename = "Phishing Confidence (1-5)", alias = "phishing_confidence")]
    phishing_confidence: u8,
    #[serde(
        rename = "Training Hours (0-10)",
        alias = "training_hours",
        deserialize_with = "deserialize_finite"
    )]
    training_hours: f64,
    #[serde(
        rename = "Clicked Suspicious Link (Yes/No)",
        alias = "clicked_suspicious_link",
        deserialize_with = "deserialize_flag"
    )]
    clicked_suspicious_link: bool,
}

impl From<SurveyRow> for Record {
    fn from(row: SurveyRow) -> Self {
        Record {
            employee_id: row.employee_id,
            strong_passwords: row.strong_passwords,
            team_expectation: row.team_expectation,
            phishing_confidence: row.phishing_confidence,
            training_hours: row.training_hours,
            clicked_suspicious_link: row.clicked_suspicious_link,
        }
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("expected Yes/No, got '{}'", raw)))
}

fn deserialize_finite<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a finite number, got '{}'",
            value
        )))
    }
}

fn describe_csv_error(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("field {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SHEET: &str = "\
Employee ID,Strong Passwords (1-5),Team Expectation (1-5),Phishing Confidence (1-5),Training Hours (0-10),Clicked Suspicious Link (Yes/No)
E001,4,5,3,2,Yes
E002,5,4,4,8.5,No
";

    #[test]
    fn test_parse_sheet_headers() {
        let dataset = CsvReader::parse(SHEET.as_bytes(), b',').unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.employee_id, "E001");
        assert_eq!(first.strong_passwords, 4);
        assert!(first.clicked_suspicious_link);
        assert!(!first.passed_phishing_test());

        let second = &dataset.records()[1];
        assert_eq!(second.training_hours, 8.5);
        assert!(second.passed_phishing_test());
    }

    #[test]
    fn test_parse_snake_case_headers() {
        let data = "\
employee_id\tstrong_passwords\tteam_expectation\tphishing_confidence\ttraining_hours\tclicked_suspicious_link
7\t1\t2\t3\t0\tfalse
";
        let dataset = CsvReader::parse(data.as_bytes(), b'\t').unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].employee_id, "7");
        assert!(!dataset.records()[0].clicked_suspicious_link);
    }

    #[test]
    fn test_missing_column() {
        let data = "employee_id,strong_passwords\n1,2\n";
        match CsvReader::parse(data.as_bytes(), b',') {
            Err(IoError::ColumnNotFound(name)) => assert!(name.contains("Team Expectation")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_flag_reports_row() {
        let data = SHEET.replace("8.5,No", "8.5,Maybe");
        match CsvReader::parse(data.as_bytes(), b',') {
            Err(IoError::InvalidRecord { row, message }) => {
                assert_eq!(row, 3);
                assert!(message.contains("Maybe"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_number_reports_row() {
        let data = SHEET.replace("E001,4", "E001,four");
        assert!(matches!(
            CsvReader::parse(data.as_bytes(), b','),
            Err(IoError::InvalidRecord { row: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_hours_rejected() {
        for bad in ["NaN", "inf", "-inf"] {
            let data = SHEET.replace("8.5,No", &format!("{},No", bad));
            match CsvReader::parse(data.as_bytes(), b',') {
                Err(IoError::InvalidRecord { row, message }) => {
                    assert_eq!(row, 3);
                    assert!(message.contains("finite"), "{}", message);
                }
                other => panic!("{} was accepted: {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SHEET.as_bytes()).unwrap();

        let reader = CsvReader::open(file.path()).unwrap();
        assert_eq!(reader.format_name(), "CSV");
        assert_eq!(reader.metadata().get("delimiter").map(String::as_str), Some(","));
        assert_eq!(reader.read_dataset().unwrap().len(), 2);

        let dataset = crate::reader::load_dataset(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            CsvReader::open("/nonexistent/survey.csv"),
            Err(IoError::FileNotFound(_))
        ));
    }
}
