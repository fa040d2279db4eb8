//! Read-only reporting artifacts built from scored customers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::customer::ScoredCustomer;
use crate::segment::SegmentLabel;

/// Location and spread of one metric over a group of customers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; 0 for fewer than two values.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Distribution of the three raw metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDistributions {
    pub recency: DistributionStats,
    pub frequency: DistributionStats,
    pub monetary: DistributionStats,
}

/// Statistics for a single non-empty segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub label: SegmentLabel,
    pub key: String,
    pub name: String,
    pub description: String,
    pub count: usize,
    /// Share of all customers, in percent.
    pub percentage: f64,
    pub mean_composite_score: f64,
    pub min_composite_score: f64,
    pub max_composite_score: f64,
    pub total_monetary: f64,
    pub metrics: MetricDistributions,
}

/// Per-segment overview of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub total_customers: usize,
    /// Non-empty segments in declaration order.
    pub segments: Vec<SegmentStats>,
    pub average_composite_score: f64,
    pub best_segment: SegmentLabel,
    pub worst_segment: SegmentLabel,
    pub metrics: MetricDistributions,
}

impl SegmentSummary {
    pub fn segment(&self, label: &SegmentLabel) -> Option<&SegmentStats> {
        self.segments.iter().find(|stats| &stats.label == label)
    }

    pub fn percentage_total(&self) -> f64 {
        self.segments.iter().map(|stats| stats.percentage).sum()
    }
}

/// Everything one `analyze` call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Reference date actually used for recency.
    pub reference_date: NaiveDateTime,
    pub transaction_count: usize,
    /// Rows with a negative amount (accepted, but flagged).
    pub negative_amount_rows: usize,
    pub customers: Vec<ScoredCustomer>,
    pub summary: SegmentSummary,
}

impl AnalysisResult {
    pub fn customer(&self, customer_id: &str) -> Option<&ScoredCustomer> {
        self.customers
            .iter()
            .find(|customer| customer.customer_id() == customer_id)
    }
}
