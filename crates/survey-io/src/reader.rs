//! Dataset reader trait and common types
//!
//! The `DatasetReader` trait provides a uniform interface for loading
//! survey datasets from different file formats.

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::record::Dataset;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for loading survey datasets from various formats
pub trait DatasetReader {
    /// Read and type every record
    fn read_dataset(&self) -> IoResult<Dataset>;

    /// Get metadata as key-value pairs
    fn metadata(&self) -> &HashMap<String, String>;

    /// Get the file path (if applicable)
    fn path(&self) -> Option<&str> {
        None
    }

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn DatasetReader>;

/// Open a file and return an appropriate reader
///
/// The format is auto-detected from the file extension.
pub fn open_file(path: impl AsRef<Path>) -> IoResult<BoxedReader> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "csv")]
        "csv" => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open(path)?))
        }

        #[cfg(feature = "csv")]
        "tsv" => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open_with_delimiter(path, b'\t')?))
        }

        #[cfg(feature = "xlsx")]
        "xlsx" | "xls" => {
            use crate::xlsx_reader::XlsxReader;
            Ok(Box::new(XlsxReader::open(path)?))
        }

        _ => Err(IoError::InvalidFormat(format!(
            "Unknown file extension: '{}' (supported: {})",
            extension,
            supported_extensions().join(", ")
        ))),
    }
}

/// Open a file and read its dataset in one step
pub fn load_dataset(path: impl AsRef<Path>) -> IoResult<Dataset> {
    let reader = open_file(path)?;
    tracing::debug!(metadata = ?reader.metadata(), "Opened survey file");
    let dataset = reader.read_dataset()?;
    tracing::info!(
        format = reader.format_name(),
        path = reader.path().unwrap_or("-"),
        records = dataset.len(),
        "Loaded survey dataset"
    );
    Ok(dataset)
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = Vec::new();

    #[cfg(feature = "csv")]
    {
        extensions.push("csv");
        extensions.push("tsv");
    }

    #[cfg(feature = "xlsx")]
    {
        extensions.push("xlsx");
        extensions.push("xls");
    }

    extensions
}
