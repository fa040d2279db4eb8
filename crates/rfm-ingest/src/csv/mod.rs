//! CSV reading utilities.

mod header;
mod reader;

pub use header::{CsvHeaders, detect_delimiter, parse_csv_line};
pub use reader::{
    MAX_CSV_FILE_SIZE, ReadOptions, check_file_size, read_csv_schema, read_transactions_csv,
    read_transactions_csv_with_options, validate_encoding,
};
