//! survey-io - Data I/O for employee survey datasets
//!
//! This crate turns tabular survey exports into strongly typed records:
//!
//! - **Schema**: the fixed survey columns, their headers and polarities
//! - **Record / Dataset**: one typed row per employee, immutable once loaded
//! - **CSV/TSV**: delimited text readers with Yes/No coercion
//! - **XLSX**: the first worksheet of a spreadsheet export
//!
//! # Design
//!
//! All readers implement the `DatasetReader` trait. Column names are a
//! contract: a file missing any survey column is rejected at load time.

pub mod record;
pub mod reader;
pub mod schema;

#[cfg(feature = "csv")]
pub mod csv_reader;

#[cfg(feature = "xlsx")]
pub mod xlsx_reader;

pub use record::*;
pub use reader::*;
pub use schema::*;
