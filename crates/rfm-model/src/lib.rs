//! Data model for RFM (Recency, Frequency, Monetary) customer segmentation.
//!
//! The types here flow through the engine in order: [`TransactionRecord`] →
//! [`CustomerMetrics`] → [`RankedMetrics`] → [`ScoredCustomer`] →
//! [`SegmentSummary`]. [`RfmParameters`] configures a run and [`RfmError`]
//! is the only error surfaced to callers.

pub mod customer;
pub mod error;
pub mod options;
pub mod segment;
pub mod summary;
pub mod transaction;

pub use customer::{CustomerMetrics, Direction, Metric, RankCode, RankedMetrics, ScoredCustomer};
pub use error::{Result, RfmError, ValidationError};
pub use options::{
    ColumnMapping, DEFAULT_BINS, DEFAULT_SEGMENTS_COUNT, MAX_SEGMENTS_COUNT, MIN_SEGMENTS_COUNT,
    MetricIntervals, RankingMethod, RecencyUnit, RfmParameters, RuleTableKind, SegmentationMode,
    Weights,
};
pub use segment::{NamedSegment, ScoreBand, SegmentLabel};
pub use summary::{
    AnalysisResult, DistributionStats, MetricDistributions, SegmentStats, SegmentSummary,
};
pub use transaction::TransactionRecord;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_missing_columns() {
        let err = RfmError::Schema {
            missing: vec!["amount".to_string(), "timestamp".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "required column(s) missing from transaction table: amount, timestamp"
        );
        assert_eq!(
            err.missing_columns(),
            Some(&["amount".to_string(), "timestamp".to_string()][..])
        );
    }

    #[test]
    fn validation_error_is_transparent() {
        let err: RfmError = ValidationError::EmptyInput.into();
        assert_eq!(err.to_string(), "cannot analyze zero customers");
        assert!(err.is_validation());
    }
}
