//! Error types for utilstat
//!
//! This module defines the error types used throughout the utilstat library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Every failure is scoped to a single upload request; nothing here is
//! retried internally. Parsing and arithmetic are deterministic, so there is
//! no transient-failure class inside the pipeline. The only failure that can
//! come from the outside world is [`UtilstatError::Persistence`], and that is
//! surfaced to the caller rather than masked.

use thiserror::Error;

/// Main error type for utilstat operations
///
/// This enum covers the whole taxonomy: upload decoding failures, schema
/// validation failures, aggregation edge cases, and failures reported by the
/// persistence collaborator.
#[derive(Error, Debug)]
pub enum UtilstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Declared file extension is not one of the supported upload kinds
    #[error("unsupported file type `{0}`: upload a CSV, TXT, or XLSX file")]
    UnsupportedFormat(String),

    /// Delimited-text parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet parsing error
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    /// Upload decoded to zero data rows
    #[error("the uploaded table contains no data rows")]
    EmptyDataset,

    /// The first record is missing a mandatory field
    #[error("invalid data format: missing required columns (expected {0})")]
    MissingRequiredColumns(String),

    /// No dated records survived aggregation, so per-day averages are undefined
    #[error("no dated records to aggregate")]
    EmptyAggregation,

    /// Requested dataset does not exist or belongs to another owner
    #[error("dataset not found or access denied")]
    DatasetNotFound,

    /// Failure reported by the persistence collaborator
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Convenience type alias for Results in utilstat
pub type Result<T> = std::result::Result<T, UtilstatError>;
