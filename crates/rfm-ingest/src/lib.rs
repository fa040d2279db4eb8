//! Transaction data ingestion.
//!
//! Loads transaction files into Polars DataFrames for the RFM engine. Every
//! column is read as text; typing and validation of the customer, timestamp
//! and amount columns happen in the engine, which owns the error taxonomy.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rfm_ingest::read_transactions_csv;
//!
//! let (df, headers) = read_transactions_csv(Path::new("orders.csv"))?;
//! assert!(headers.contains("customer_id"));
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    CsvHeaders, MAX_CSV_FILE_SIZE, ReadOptions, check_file_size, detect_delimiter,
    parse_csv_line, read_csv_schema, read_transactions_csv, read_transactions_csv_with_options,
    validate_encoding,
};
