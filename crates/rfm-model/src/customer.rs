//! Per-customer records produced by the pipeline stages.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::segment::SegmentLabel;

/// The three raw RFM metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Recency,
    Frequency,
    Monetary,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Recency, Metric::Frequency, Metric::Monetary];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Recency => "recency",
            Metric::Frequency => "frequency",
            Metric::Monetary => "monetary",
        }
    }

    /// Which end of the metric's range is the desirable one.
    pub fn direction(self) -> Direction {
        match self {
            Metric::Recency => Direction::LowerIsBetter,
            Metric::Frequency | Metric::Monetary => Direction::HigherIsBetter,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering direction used when converting a metric into a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

impl Direction {
    /// Maps a raw value onto an axis where larger always means better.
    pub fn goodness(self, value: f64) -> f64 {
        match self {
            Direction::LowerIsBetter => -value,
            Direction::HigherIsBetter => value,
        }
    }
}

/// Aggregated purchase behaviour of one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    pub customer_id: String,
    /// Whole days between the last purchase and the reference date.
    pub recency: u32,
    /// Number of purchases.
    pub frequency: u32,
    /// Sum of purchase amounts.
    pub monetary: f64,
    pub last_purchase: NaiveDateTime,
    pub amount_mean: f64,
    pub amount_median: f64,
    /// Sample standard deviation of purchase amounts; 0 for a single purchase.
    pub amount_std: f64,
}

impl CustomerMetrics {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Recency => f64::from(self.recency),
            Metric::Frequency => f64::from(self.frequency),
            Metric::Monetary => self.monetary,
        }
    }
}

/// Metrics plus their ordinal ranks in `1..=bins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMetrics {
    #[serde(flatten)]
    pub metrics: CustomerMetrics,
    pub recency_rank: u32,
    pub frequency_rank: u32,
    pub monetary_rank: u32,
}

impl RankedMetrics {
    pub fn rank(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Recency => self.recency_rank,
            Metric::Frequency => self.frequency_rank,
            Metric::Monetary => self.monetary_rank,
        }
    }

    /// Original `RFM_Score`: plain sum of the three ranks.
    pub fn rank_sum(&self) -> u32 {
        self.recency_rank + self.frequency_rank + self.monetary_rank
    }
}

/// Concatenated rank code (`RFM`), e.g. `443` for K = 4.
///
/// Rendered as literal digits while every rank fits a single digit, otherwise
/// as the base-(K+1) number formed by the ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankCode {
    pub recency: u32,
    pub frequency: u32,
    pub monetary: u32,
    pub bins: u32,
}

impl RankCode {
    pub fn new(recency: u32, frequency: u32, monetary: u32, bins: u32) -> Self {
        Self {
            recency,
            frequency,
            monetary,
            bins,
        }
    }

    /// Code with the same rank in all three positions.
    pub fn uniform(rank: u32, bins: u32) -> Self {
        Self::new(rank, rank, rank, bins)
    }

    fn radix(self) -> u128 {
        if self.bins <= 9 {
            10
        } else {
            u128::from(self.bins) + 1
        }
    }

    /// Numeric value of the code; ordering matches lexicographic R, F, M order.
    ///
    /// Computed in `u128` so `(K + 1)^3` fits for every `u32` bin count.
    pub fn value(self) -> u128 {
        let radix = self.radix();
        u128::from(self.recency) * radix * radix
            + u128::from(self.frequency) * radix
            + u128::from(self.monetary)
    }
}

impl fmt::Display for RankCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bins <= 9 {
            write!(f, "{}{}{}", self.recency, self.frequency, self.monetary)
        } else {
            write!(f, "{}", self.value())
        }
    }
}

/// Final per-customer output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCustomer {
    #[serde(flatten)]
    pub ranked: RankedMetrics,
    /// Weighted composite score in `[0, 1]`.
    pub composite_score: f64,
    pub rank_code: RankCode,
    pub segment: SegmentLabel,
}

impl ScoredCustomer {
    pub fn customer_id(&self) -> &str {
        &self.ranked.metrics.customer_id
    }

    pub fn metrics(&self) -> &CustomerMetrics {
        &self.ranked.metrics
    }
}
