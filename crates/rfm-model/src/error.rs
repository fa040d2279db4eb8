//! Error taxonomy shared by every stage of the engine.

use thiserror::Error;

/// Errors raised at the engine boundary.
///
/// Degenerate data (ties, skew, too few distinct values) is never reported
/// through this type; the rank assigner absorbs it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RfmError {
    /// One or more configured columns are absent from the input table.
    #[error("required column(s) missing from transaction table: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RfmError {
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            Self::Schema { missing } => Some(missing),
            Self::Validation(_) => None,
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Data or configuration problems detected before any ranking happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("cannot analyze zero customers")]
    EmptyInput,

    #[error("column '{column}' has a null value at row {row}")]
    NullValue { column: String, row: usize },

    #[error("column '{column}' has non-numeric value '{value}' at row {row}")]
    NonNumeric {
        column: String,
        value: String,
        row: usize,
    },

    #[error("column '{column}' has unparseable date '{value}' at row {row}")]
    InvalidTimestamp {
        column: String,
        value: String,
        row: usize,
    },

    #[error("bin count must be an integer of at least 2, got {0}")]
    BinCount(u32),

    #[error("segment count must be between 2 and 10, got {0}")]
    SegmentCount(u32),

    #[error("weight for {metric} must be a non-negative finite number, got {value}")]
    InvalidWeight { metric: &'static str, value: f64 },

    #[error("weights must not all be zero")]
    ZeroWeights,

    #[error("fixed intervals for {metric} must be {expected} strictly increasing finite values")]
    Intervals {
        metric: &'static str,
        expected: usize,
    },

    #[error("custom segment table must not contain an empty rank code")]
    EmptyRankCode,

    #[error("invalid analysis parameters: {0}")]
    Parameters(String),
}

pub type Result<T> = std::result::Result<T, RfmError>;
