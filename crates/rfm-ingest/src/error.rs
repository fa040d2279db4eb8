//! Error types for transaction file ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a transaction file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Transaction file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File starts with a byte order mark of an unsupported encoding.
    #[error("unsupported encoding {encoding} in {path}; re-save the file as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no lines at all.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Header line is blank.
    #[error("could not detect header row in {path}")]
    NoHeaderDetected { path: PathBuf },

    /// A header cell is blank.
    #[error("CSV file {path} has an empty column name")]
    EmptyColumnName { path: PathBuf },

    /// The same header appears twice.
    #[error("CSV file {path} has duplicate column '{column}'")]
    DuplicateColumn { path: PathBuf, column: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/orders.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/orders.csv");
    }

    #[test]
    fn test_duplicate_column_display() {
        let err = IngestError::DuplicateColumn {
            path: PathBuf::from("orders.csv"),
            column: "amount".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "CSV file orders.csv has duplicate column 'amount'"
        );
    }
}
