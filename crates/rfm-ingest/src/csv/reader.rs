//! CSV file reading into text-typed Polars DataFrames.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info_span};

use crate::error::{IngestError, Result};

use super::header::{CsvHeaders, detect_delimiter, parse_csv_line};

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Options for [`read_transactions_csv_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Reject files larger than this many bytes.
    pub max_file_size: u64,
    /// Field separator; detected from the header line when `None`.
    pub delimiter: Option<u8>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_file_size: MAX_CSV_FILE_SIZE,
            delimiter: None,
        }
    }
}

fn open_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Check file size against a custom limit.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    // UTF-8 BOM is acceptable (stripped when the header is read)
    Ok(())
}

/// Reads the first line of a file, without a UTF-8 BOM.
fn read_first_line(path: &Path) -> Result<Option<String>> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let reader = BufReader::new(file);

    match reader.lines().next() {
        Some(line) => {
            let line = line.map_err(|e| IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(
                line.strip_prefix('\u{feff}').unwrap_or(&line).to_string(),
            ))
        }
        None => Ok(None),
    }
}

/// Reads and validates the header line.
///
/// Blank, empty and duplicate column names are rejected here so the engine
/// only ever sees a well-formed schema.
pub fn read_csv_schema(path: &Path, delimiter: Option<u8>) -> Result<CsvHeaders> {
    let Some(line) = read_first_line(path)? else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    if line.trim().is_empty() {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&line));
    let columns = parse_csv_line(&line, delimiter);

    let mut seen = BTreeSet::new();
    for column in &columns {
        if column.is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
        if !seen.insert(column.as_str()) {
            return Err(IngestError::DuplicateColumn {
                path: path.to_path_buf(),
                column: column.clone(),
            });
        }
    }

    Ok(CsvHeaders::new(columns, delimiter))
}

/// Reads a transaction CSV with default options.
pub fn read_transactions_csv(path: &Path) -> Result<(DataFrame, CsvHeaders)> {
    read_transactions_csv_with_options(path, ReadOptions::default())
}

/// Reads a transaction CSV into a DataFrame where every column is text.
///
/// Typing is left to the engine so that null, numeric and date problems are
/// reported with the offending column and row instead of a parser message.
pub fn read_transactions_csv_with_options(
    path: &Path,
    options: ReadOptions,
) -> Result<(DataFrame, CsvHeaders)> {
    let span = info_span!("read_csv", path = %path.display());
    let _guard = span.enter();

    check_file_size(path, options.max_file_size)?;
    validate_encoding(path)?;
    let headers = read_csv_schema(path, options.delimiter)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|parse| parse.with_separator(headers.delimiter))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        rows = df.height(),
        columns = df.width(),
        delimiter = %char::from(headers.delimiter).escape_default(),
        "loaded transaction file"
    );

    Ok((df, headers))
}
