//! Closed set of segment labels a customer can be assigned to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Business segments produced by rule-table segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedSegment {
    Champions,
    Loyal,
    PotentialLoyalists,
    NewCustomers,
    AtRisk,
    CantLoseThem,
    BigSpenders,
    Lost,
    Other,
}

impl NamedSegment {
    pub const ALL: [NamedSegment; 9] = [
        NamedSegment::Champions,
        NamedSegment::Loyal,
        NamedSegment::PotentialLoyalists,
        NamedSegment::NewCustomers,
        NamedSegment::AtRisk,
        NamedSegment::CantLoseThem,
        NamedSegment::BigSpenders,
        NamedSegment::Lost,
        NamedSegment::Other,
    ];

    /// Stable machine key, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            NamedSegment::Champions => "champions",
            NamedSegment::Loyal => "loyal",
            NamedSegment::PotentialLoyalists => "potential_loyalists",
            NamedSegment::NewCustomers => "new_customers",
            NamedSegment::AtRisk => "at_risk",
            NamedSegment::CantLoseThem => "cant_lose_them",
            NamedSegment::BigSpenders => "big_spenders",
            NamedSegment::Lost => "lost",
            NamedSegment::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NamedSegment::Champions => "Champions",
            NamedSegment::Loyal => "Loyal Customers",
            NamedSegment::PotentialLoyalists => "Potential Loyalists",
            NamedSegment::NewCustomers => "New Customers",
            NamedSegment::AtRisk => "At Risk",
            NamedSegment::CantLoseThem => "Can't Lose Them",
            NamedSegment::BigSpenders => "Big Spenders",
            NamedSegment::Lost => "Lost",
            NamedSegment::Other => "Other",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            NamedSegment::Champions => "Bought recently, buy often and spend the most",
            NamedSegment::Loyal => "Recent and frequent buyers with moderate spend",
            NamedSegment::PotentialLoyalists => "Recent high spenders who buy infrequently",
            NamedSegment::NewCustomers => "Recent buyers with low frequency and spend",
            NamedSegment::AtRisk => "Frequent high spenders who have not bought recently",
            NamedSegment::CantLoseThem => "Frequent buyers who have not returned for a while",
            NamedSegment::BigSpenders => "Infrequent, lapsed customers with high spend",
            NamedSegment::Lost => "Low recency, frequency and spend",
            NamedSegment::Other => "Customers not covered by any segment rule",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|segment| segment.as_str() == normalized)
    }
}

impl fmt::Display for NamedSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Equal-width band of the composite score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScoreBand {
    /// Zero-based band index; the highest index holds the highest scores.
    pub index: u32,
    /// Total number of bands the score range was split into.
    pub count: u32,
}

impl ScoreBand {
    pub fn new(index: u32, count: u32) -> Self {
        Self { index, count }
    }

    pub fn lower_bound(self) -> f64 {
        f64::from(self.index) / f64::from(self.count)
    }

    pub fn upper_bound(self) -> f64 {
        f64::from(self.index + 1) / f64::from(self.count)
    }

    pub fn name(self) -> String {
        format!("Band {}", self.index + 1)
    }

    pub fn description(self) -> String {
        format!(
            "composite score {:.2}-{:.2}",
            self.lower_bound(),
            self.upper_bound()
        )
    }
}

/// Segment a scored customer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SegmentLabel {
    Named(NamedSegment),
    Band(ScoreBand),
}

impl SegmentLabel {
    /// Machine key used in exports, e.g. `champions` or `band_3`.
    pub fn key(&self) -> String {
        match self {
            SegmentLabel::Named(segment) => segment.as_str().to_string(),
            SegmentLabel::Band(band) => format!("band_{}", band.index + 1),
        }
    }

    pub fn name(&self) -> String {
        match self {
            SegmentLabel::Named(segment) => segment.display_name().to_string(),
            SegmentLabel::Band(band) => band.name(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            SegmentLabel::Named(segment) => segment.description().to_string(),
            SegmentLabel::Band(band) => band.description(),
        }
    }
}

impl From<NamedSegment> for SegmentLabel {
    fn from(segment: NamedSegment) -> Self {
        SegmentLabel::Named(segment)
    }
}

impl From<ScoreBand> for SegmentLabel {
    fn from(band: ScoreBand) -> Self {
        SegmentLabel::Band(band)
    }
}

impl fmt::Display for SegmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
