//! Assignment of scored customers to segments.

use std::collections::BTreeSet;

use rfm_model::{
    NamedSegment, RankCode, RankedMetrics, RfmParameters, RuleTableKind, ScoreBand,
    SegmentLabel, SegmentationMode,
};

use crate::rank::middle_rank;

/// Position of a rank relative to the middle rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// At or above the middle rank.
    High,
    Low,
}

impl Level {
    fn matches(self, rank: u32, middle: u32) -> bool {
        match self {
            Level::High => rank >= middle,
            Level::Low => rank < middle,
        }
    }
}

/// Condition a rule checks against one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Ranks {
        recency: Level,
        frequency: Level,
        monetary: Level,
    },
    /// Numeric rank code at or above the threshold.
    CodeAtLeast(RankCode),
    /// Rendered rank code is one of the listed codes.
    CodeIn(BTreeSet<String>),
}

impl Predicate {
    fn matches(&self, ranked: &RankedMetrics, code: RankCode, middle: u32) -> bool {
        match self {
            Predicate::Ranks {
                recency,
                frequency,
                monetary,
            } => {
                recency.matches(ranked.recency_rank, middle)
                    && frequency.matches(ranked.frequency_rank, middle)
                    && monetary.matches(ranked.monetary_rank, middle)
            }
            Predicate::CodeAtLeast(threshold) => code.value() >= threshold.value(),
            Predicate::CodeIn(codes) => codes.contains(&code.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub predicate: Predicate,
    pub label: NamedSegment,
}

impl Rule {
    fn ranks(recency: Level, frequency: Level, monetary: Level, label: NamedSegment) -> Self {
        Self {
            predicate: Predicate::Ranks {
                recency,
                frequency,
                monetary,
            },
            label,
        }
    }
}

/// Ordered rules closed by a default label; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
    default: NamedSegment,
    middle: u32,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>, default: NamedSegment, bins: u32) -> Self {
        Self {
            rules,
            default,
            middle: middle_rank(bins),
        }
    }

    /// High/low quadrants of the rank triple around the middle rank.
    pub fn classic(bins: u32) -> Self {
        use Level::{High, Low};
        let rules = vec![
            Rule::ranks(High, High, High, NamedSegment::Champions),
            Rule::ranks(High, High, Low, NamedSegment::Loyal),
            Rule::ranks(High, Low, High, NamedSegment::PotentialLoyalists),
            Rule::ranks(High, Low, Low, NamedSegment::NewCustomers),
            Rule::ranks(Low, High, High, NamedSegment::AtRisk),
            Rule::ranks(Low, High, Low, NamedSegment::CantLoseThem),
            Rule::ranks(Low, Low, Low, NamedSegment::Lost),
            Rule::ranks(Low, Low, High, NamedSegment::BigSpenders),
        ];
        Self::new(rules, NamedSegment::Other, bins)
    }

    /// Rank-code thresholds at KKK, (K-1)x3 and (K-2)x3.
    pub fn tiered(bins: u32) -> Self {
        let at_least = |rank: u32, label| Rule {
            predicate: Predicate::CodeAtLeast(RankCode::uniform(rank.max(1), bins)),
            label,
        };
        let rules = vec![
            at_least(bins, NamedSegment::Champions),
            at_least(bins.saturating_sub(1), NamedSegment::Loyal),
            at_least(bins.saturating_sub(2), NamedSegment::AtRisk),
        ];
        Self::new(rules, NamedSegment::Lost, bins)
    }

    /// Exact code lookup; labels are declared in [`NamedSegment::ALL`] order.
    pub fn custom<'a>(
        codes: impl IntoIterator<Item = (&'a String, &'a NamedSegment)>,
        bins: u32,
    ) -> Self {
        let codes: Vec<(String, NamedSegment)> = codes
            .into_iter()
            .map(|(code, label)| (code.trim().to_string(), *label))
            .collect();
        let rules = NamedSegment::ALL
            .into_iter()
            .filter_map(|label| {
                let matching: BTreeSet<String> = codes
                    .iter()
                    .filter(|(_, l)| *l == label)
                    .map(|(code, _)| code.clone())
                    .collect();
                (!matching.is_empty()).then(|| Rule {
                    predicate: Predicate::CodeIn(matching),
                    label,
                })
            })
            .collect();
        Self::new(rules, NamedSegment::Other, bins)
    }

    pub fn from_kind(kind: &RuleTableKind, bins: u32) -> Self {
        match kind {
            RuleTableKind::Classic => Self::classic(bins),
            RuleTableKind::Tiered => Self::tiered(bins),
            RuleTableKind::Custom { codes } => Self::custom(codes, bins),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_label(&self) -> NamedSegment {
        self.default
    }

    pub fn classify(&self, ranked: &RankedMetrics, code: RankCode) -> NamedSegment {
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(ranked, code, self.middle))
            .map_or(self.default, |rule| rule.label)
    }

    /// Every label the table can produce, rules first, default last.
    pub fn labels(&self) -> Vec<NamedSegment> {
        let mut labels: Vec<NamedSegment> = Vec::new();
        for label in self
            .rules
            .iter()
            .map(|rule| rule.label)
            .chain(std::iter::once(self.default))
        {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

/// Segmentation strategy selected by [`SegmentationMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segmenter {
    ScoreBands { count: u32 },
    Rules(RuleTable),
}

impl Segmenter {
    pub fn from_parameters(params: &RfmParameters) -> Self {
        match &params.segmentation {
            SegmentationMode::ScoreBands => Segmenter::ScoreBands {
                count: params.segments_count,
            },
            SegmentationMode::RuleTable { table } => {
                Segmenter::Rules(RuleTable::from_kind(table, params.bins))
            }
        }
    }

    pub fn assign(&self, ranked: &RankedMetrics, score: f64, code: RankCode) -> SegmentLabel {
        match self {
            Segmenter::ScoreBands { count } => SegmentLabel::Band(score_band(score, *count)),
            Segmenter::Rules(table) => SegmentLabel::Named(table.classify(ranked, code)),
        }
    }

    /// All labels in declaration order; the summary lists segments in this order.
    pub fn declared_labels(&self) -> Vec<SegmentLabel> {
        match self {
            Segmenter::ScoreBands { count } => (0..*count)
                .map(|index| SegmentLabel::Band(ScoreBand::new(index, *count)))
                .collect(),
            Segmenter::Rules(table) => table
                .labels()
                .into_iter()
                .map(SegmentLabel::Named)
                .collect(),
        }
    }
}

/// Band index `floor(score * count)`, with a score of exactly 1 in the top band.
pub fn score_band(score: f64, count: u32) -> ScoreBand {
    let count = count.max(1);
    let raw = (score.clamp(0.0, 1.0) * f64::from(count)).floor() as u32;
    ScoreBand::new(raw.min(count - 1), count)
}
