//! Excel workbook reader
//!
//! Reads the first worksheet of an `.xlsx`/`.xls` export. The first row
//! holds the headers; cells are coerced with the same rules as the CSV
//! reader, with native booleans accepted for the Yes/No column.

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashMap;
use std::path::Path;

use crate::reader::{DatasetReader, IoError, IoResult};
use crate::record::{Dataset, Record};
use crate::schema::{parse_flag, validate_headers, SurveyColumn};

/// Excel workbook reader
pub struct XlsxReader {
    path: String,
    metadata: HashMap<String, String>,
}

impl XlsxReader {
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let mut metadata = HashMap::new();
        metadata.insert("format".to_string(), "XLSX".to_string());
        metadata.insert("sheet".to_string(), "0".to_string());

        Ok(Self {
            path: path.display().to_string(),
            metadata,
        })
    }

    /// Parse survey records from a worksheet range
    pub fn parse_range(range: &Range<Data>) -> IoResult<Dataset> {
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| IoError::InvalidFormat("worksheet is empty".to_string()))?;

        let headers: Vec<String> = header_row.iter().map(|c| c.to_string()).collect();
        validate_headers(headers.iter().map(String::as_str))?;
        let layout = ColumnLayout::from_headers(&headers)?;

        let mut records = Vec::new();
        for (i, row) in rows.enumerate() {
            // Row 1 is the header
            let row_number = i + 2;
            if row.iter().all(|c| matches!(c, Data::Empty)) {
                continue;
            }
            let record = layout
                .record(row)
                .map_err(|message| IoError::InvalidRecord {
                    row: row_number,
                    message,
                })?;
            records.push(record);
        }

        tracing::debug!(records = records.len(), "Parsed worksheet rows");
        Ok(Dataset::new(records))
    }
}

impl DatasetReader for XlsxReader {
    fn read_dataset(&self) -> IoResult<Dataset> {
        let mut workbook =
            open_workbook_auto(&self.path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| IoError::InvalidFormat("workbook has no worksheets".to_string()))?
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?;
        Self::parse_range(&range)
    }

    fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        "XLSX"
    }
}

/// Position of each survey column in the header row
struct ColumnLayout {
    employee_id: usize,
    strong_passwords: usize,
    team_expectation: usize,
    phishing_confidence: usize,
    training_hours: usize,
    clicked_suspicious_link: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &[String]) -> IoResult<Self> {
        let find = |column: SurveyColumn| {
            headers
                .iter()
                .position(|h| column.matches(h))
                .ok_or_else(|| IoError::ColumnNotFound(column.header().to_string()))
        };

        Ok(Self {
            employee_id: find(SurveyColumn::EmployeeId)?,
            strong_passwords: find(SurveyColumn::StrongPasswords)?,
            team_expectation: find(SurveyColumn::TeamExpectation)?,
            phishing_confidence: find(SurveyColumn::PhishingConfidence)?,
            training_hours: find(SurveyColumn::TrainingHours)?,
            clicked_suspicious_link: find(SurveyColumn::ClickedSuspiciousLink)?,
        })
    }

    fn record(&self, row: &[Data]) -> Result<Record, String> {
        Ok(Record {
            employee_id: text(cell(row, self.employee_id), SurveyColumn::EmployeeId)?,
            strong_passwords: score(
                cell(row, self.strong_passwords),
                SurveyColumn::StrongPasswords,
            )?,
            team_expectation: score(
                cell(row, self.team_expectation),
                SurveyColumn::TeamExpectation,
            )?,
            phishing_confidence: score(
                cell(row, self.phishing_confidence),
                SurveyColumn::PhishingConfidence,
            )?,
            training_hours: number(cell(row, self.training_hours), SurveyColumn::TrainingHours)?,
            clicked_suspicious_link: flag(
                cell(row, self.clicked_suspicious_link),
                SurveyColumn::ClickedSuspiciousLink,
            )?,
        })
    }
}

/// Non-empty cell at `index`
fn cell(row: &[Data], index: usize) -> Option<&Data> {
    row.get(index).filter(|c| !matches!(c, Data::Empty))
}

fn missing(column: SurveyColumn) -> String {
    format!("{}: missing value", column.field_name())
}

fn text(cell: Option<&Data>, column: SurveyColumn) -> Result<String, String> {
    cell.map(|c| c.to_string().trim().to_string())
        .ok_or_else(|| missing(column))
}

fn number(cell: Option<&Data>, column: SurveyColumn) -> Result<f64, String> {
    let value = match cell {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            format!("{}: expected a number, got '{}'", column.field_name(), s)
        })?,
        Some(other) => {
            return Err(format!(
                "{}: expected a number, got '{}'",
                column.field_name(),
                other
            ))
        }
        None => return Err(missing(column)),
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!(
            "{}: expected a finite number, got '{}'",
            column.field_name(),
            value
        ))
    }
}

/// Likert answers are whole numbers
fn score(cell: Option<&Data>, column: SurveyColumn) -> Result<u8, String> {
    let value = number(cell, column)?;
    if value.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&value) {
        return Err(format!(
            "{}: expected a whole number, got {}",
            column.field_name(),
            value
        ));
    }
    Ok(value as u8)
}

fn flag(cell: Option<&Data>, column: SurveyColumn) -> Result<bool, String> {
    match cell {
        Some(Data::Bool(b)) => Ok(*b),
        Some(other) => parse_flag(&other.to_string()).ok_or_else(|| {
            format!(
                "{}: expected Yes/No, got '{}'",
                column.field_name(),
                other
            )
        }),
        None => Err(missing(column)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_fixtures")
            .join(name)
    }

    fn sheet(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), value);
            }
        }
        range
    }

    fn header() -> Vec<Data> {
        SurveyColumn::ALL
            .iter()
            .map(|c| Data::String(c.header().to_string()))
            .collect()
    }

    fn row(id: i64, hours: Data, clicked: Data) -> Vec<Data> {
        vec![
            Data::Int(id),
            Data::Float(4.0),
            Data::Float(3.0),
            Data::Int(2),
            hours,
            clicked,
        ]
    }

    #[test]
    fn test_read_fixture_workbook() {
        let reader = XlsxReader::open(fixture("employee_survey.xlsx")).unwrap();
        assert_eq!(reader.format_name(), "XLSX");

        let dataset = reader.read_dataset().unwrap();
        assert_eq!(dataset.len(), 5);

        let first = &dataset.records()[0];
        assert_eq!(first.employee_id, "101");
        assert_eq!(first.strong_passwords, 4);
        assert_eq!(first.training_hours, 6.0);
        assert!(!first.clicked_suspicious_link);

        let second = &dataset.records()[1];
        assert_eq!(second.training_hours, 1.5);
        assert!(second.clicked_suspicious_link);
    }

    #[test]
    fn test_load_dataset_dispatches_xlsx() {
        let dataset = crate::reader::load_dataset(fixture("employee_survey.xlsx")).unwrap();
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.count(crate::schema::Outcome::Clicked), 2);
    }

    #[test]
    fn test_parse_native_cell_types() {
        let range = sheet(vec![
            header(),
            row(1, Data::Float(2.5), Data::Bool(true)),
            row(2, Data::String("7".to_string()), Data::String("No".to_string())),
            row(3, Data::Int(0), Data::Int(1)),
        ]);

        let dataset = XlsxReader::parse_range(&range).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(dataset.records()[0].clicked_suspicious_link);
        assert_eq!(dataset.records()[1].training_hours, 7.0);
        assert!(!dataset.records()[1].clicked_suspicious_link);
        assert!(dataset.records()[2].clicked_suspicious_link);
    }

    #[test]
    fn test_blank_rows_skipped() {
        let range = sheet(vec![
            header(),
            row(1, Data::Float(2.0), Data::Bool(false)),
            vec![Data::Empty; 6],
            row(2, Data::Float(3.0), Data::Bool(true)),
        ]);
        assert_eq!(XlsxReader::parse_range(&range).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_flag_reports_row() {
        let range = sheet(vec![
            header(),
            row(1, Data::Float(2.0), Data::String("Yes".to_string())),
            row(2, Data::Float(3.0), Data::String("Maybe".to_string())),
        ]);
        match XlsxReader::parse_range(&range) {
            Err(IoError::InvalidRecord { row, message }) => {
                assert_eq!(row, 3);
                assert!(message.contains("Maybe"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_hours_rejected() {
        let range = sheet(vec![
            header(),
            row(1, Data::String("NaN".to_string()), Data::Bool(false)),
        ]);
        match XlsxReader::parse_range(&range) {
            Err(IoError::InvalidRecord { row, message }) => {
                assert_eq!(row, 2);
                assert!(message.contains("finite"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_fractional_score_rejected() {
        let mut bad = row(1, Data::Float(2.0), Data::Bool(false));
        bad[1] = Data::Float(3.5);
        let range = sheet(vec![header(), bad]);
        assert!(matches!(
            XlsxReader::parse_range(&range),
            Err(IoError::InvalidRecord { row: 2, .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let mut headers = header();
        headers.truncate(4);
        let range = sheet(vec![headers]);
        match XlsxReader::parse_range(&range) {
            Err(IoError::ColumnNotFound(name)) => assert!(name.contains("Training Hours")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            XlsxReader::open("/nonexistent/survey.xlsx"),
            Err(IoError::FileNotFound(_))
        ));
    }
}
