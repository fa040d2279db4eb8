//! Configuration options for one RFM analysis.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::customer::Metric;
use crate::error::ValidationError;
use crate::segment::NamedSegment;

pub const DEFAULT_BINS: u32 = 4;
pub const DEFAULT_SEGMENTS_COUNT: u32 = 5;
pub const MIN_SEGMENTS_COUNT: u32 = 2;
pub const MAX_SEGMENTS_COUNT: u32 = 10;

/// Names of the input columns holding the transaction fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub customer: String,
    pub timestamp: String,
    pub amount: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            customer: "customer_id".to_string(),
            timestamp: "timestamp".to_string(),
            amount: "amount".to_string(),
        }
    }
}

impl ColumnMapping {
    pub fn new(
        customer: impl Into<String>,
        timestamp: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            customer: customer.into(),
            timestamp: timestamp.into(),
            amount: amount.into(),
        }
    }

    /// Required columns in reporting order.
    pub fn required(&self) -> [&str; 3] {
        [&self.customer, &self.timestamp, &self.amount]
    }
}

/// Relative weight of each rank in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self::equal()
    }
}

impl Weights {
    pub fn new(recency: f64, frequency: f64, monetary: f64) -> Self {
        Self {
            recency,
            frequency,
            monetary,
        }
    }

    pub fn equal() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Recency => self.recency,
            Metric::Frequency => self.frequency,
            Metric::Monetary => self.monetary,
        }
    }

    pub fn total(&self) -> f64 {
        self.recency + self.frequency + self.monetary
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for metric in Metric::ALL {
            let value = self.get(metric);
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidWeight {
                    metric: metric.as_str(),
                    value,
                });
            }
        }
        if self.total() <= 0.0 {
            return Err(ValidationError::ZeroWeights);
        }
        Ok(())
    }
}

/// How recency is counted between the last purchase and the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyUnit {
    #[default]
    CalendarDays,
    /// Monday to Friday only.
    BusinessDays,
}

/// Caller-supplied cut points for fixed-interval ranking.
///
/// A metric without cut points falls back to equal-width intervals between
/// its observed minimum and maximum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricIntervals {
    pub recency: Option<Vec<f64>>,
    pub frequency: Option<Vec<f64>>,
    pub monetary: Option<Vec<f64>>,
}

impl MetricIntervals {
    pub fn get(&self, metric: Metric) -> Option<&[f64]> {
        match metric {
            Metric::Recency => self.recency.as_deref(),
            Metric::Frequency => self.frequency.as_deref(),
            Metric::Monetary => self.monetary.as_deref(),
        }
    }

    fn validate(&self, bins: u32) -> Result<(), ValidationError> {
        let expected = bins as usize - 1;
        for metric in Metric::ALL {
            let Some(edges) = self.get(metric) else {
                continue;
            };
            let increasing = edges.windows(2).all(|pair| pair[0] < pair[1]);
            let finite = edges.iter().all(|edge| edge.is_finite());
            if edges.len() != expected || !increasing || !finite {
                return Err(ValidationError::Intervals {
                    metric: metric.as_str(),
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// Strategy used to turn raw metrics into ranks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RankingMethod {
    /// Equal-frequency bins with a dense-rank fallback.
    #[default]
    Quantile,
    /// Fixed cut points, explicit or equal-width.
    Fixed {
        #[serde(default)]
        intervals: MetricIntervals,
    },
}

/// Built-in and custom rule tables for named segmentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleTableKind {
    /// Eight high/low quadrant rules around the middle rank.
    #[default]
    Classic,
    /// Rank-code thresholds: champions, loyal, at risk, otherwise lost.
    Tiered,
    /// Exact rank-code lookup; unmatched codes become `other`.
    Custom {
        codes: BTreeMap<String, NamedSegment>,
    },
}

/// Which segmentation convention assigns the final label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SegmentationMode {
    /// Equal-width bands over the composite score.
    #[default]
    ScoreBands,
    /// Ordered predicates over the rank triple.
    RuleTable {
        #[serde(default)]
        table: RuleTableKind,
    },
}

/// Parameters for one analysis run. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfmParameters {
    pub columns: ColumnMapping,
    pub weights: Weights,
    /// Number of rank bins (K).
    pub bins: u32,
    /// Number of score bands used by [`SegmentationMode::ScoreBands`].
    pub segments_count: u32,
    /// Recency reference; defaults to the latest transaction in the data.
    pub reference_date: Option<NaiveDateTime>,
    pub recency_unit: RecencyUnit,
    pub ranking: RankingMethod,
    pub segmentation: SegmentationMode,
}

impl Default for RfmParameters {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            weights: Weights::default(),
            bins: DEFAULT_BINS,
            segments_count: DEFAULT_SEGMENTS_COUNT,
            reference_date: None,
            recency_unit: RecencyUnit::default(),
            ranking: RankingMethod::default(),
            segmentation: SegmentationMode::default(),
        }
    }
}

impl RfmParameters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_bins(mut self, bins: u32) -> Self {
        self.bins = bins;
        self
    }

    #[must_use]
    pub fn with_segments_count(mut self, count: u32) -> Self {
        self.segments_count = count;
        self
    }

    #[must_use]
    pub fn with_reference_date(mut self, date: Option<NaiveDateTime>) -> Self {
        self.reference_date = date;
        self
    }

    #[must_use]
    pub fn with_recency_unit(mut self, unit: RecencyUnit) -> Self {
        self.recency_unit = unit;
        self
    }

    #[must_use]
    pub fn with_ranking(mut self, ranking: RankingMethod) -> Self {
        self.ranking = ranking;
        self
    }

    #[must_use]
    pub fn with_segmentation(mut self, segmentation: SegmentationMode) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Structural checks that do not depend on the data.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bins < 2 {
            return Err(ValidationError::BinCount(self.bins));
        }
        if !(MIN_SEGMENTS_COUNT..=MAX_SEGMENTS_COUNT).contains(&self.segments_count) {
            return Err(ValidationError::SegmentCount(self.segments_count));
        }
        self.weights.validate()?;
        if let RankingMethod::Fixed { intervals } = &self.ranking {
            intervals.validate(self.bins)?;
        }
        if let SegmentationMode::RuleTable {
            table: RuleTableKind::Custom { codes },
        } = &self.segmentation
            && codes.keys().any(|code| code.trim().is_empty())
        {
            return Err(ValidationError::EmptyRankCode);
        }
        Ok(())
    }
}
