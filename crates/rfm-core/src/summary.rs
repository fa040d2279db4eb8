//! Per-segment statistics over scored customers.

use rfm_model::{
    MetricDistributions, Result, ScoredCustomer, SegmentLabel, SegmentStats, SegmentSummary,
    ValidationError,
};
use tracing::debug;

use crate::stats::{describe, mean};

fn distributions<'a>(
    customers: impl Iterator<Item = &'a ScoredCustomer> + Clone,
) -> MetricDistributions {
    let recency: Vec<f64> = customers
        .clone()
        .map(|c| f64::from(c.metrics().recency))
        .collect();
    let frequency: Vec<f64> = customers
        .clone()
        .map(|c| f64::from(c.metrics().frequency))
        .collect();
    let monetary: Vec<f64> = customers.map(|c| c.metrics().monetary).collect();
    MetricDistributions {
        recency: describe(&recency),
        frequency: describe(&frequency),
        monetary: describe(&monetary),
    }
}

fn segment_stats(label: SegmentLabel, members: &[&ScoredCustomer], total: usize) -> SegmentStats {
    let scores: Vec<f64> = members.iter().map(|c| c.composite_score).collect();
    let score_stats = describe(&scores);
    SegmentStats {
        label,
        key: label.key(),
        name: label.name(),
        description: label.description(),
        count: members.len(),
        percentage: members.len() as f64 / total as f64 * 100.0,
        mean_composite_score: score_stats.mean,
        min_composite_score: score_stats.min,
        max_composite_score: score_stats.max,
        total_monetary: members.iter().map(|c| c.metrics().monetary).sum(),
        metrics: distributions(members.iter().copied()),
    }
}

/// Builds the segment summary.
///
/// Segments are listed in `declared` order. Empty named segments are omitted;
/// score bands are always listed so every band shows up, even with no
/// customers. Labels missing from `declared` are appended in order of first
/// appearance.
pub fn build_summary(
    customers: &[ScoredCustomer],
    declared: &[SegmentLabel],
) -> Result<SegmentSummary> {
    if customers.is_empty() {
        return Err(ValidationError::EmptyInput.into());
    }
    let total = customers.len();

    let mut order: Vec<SegmentLabel> = declared.to_vec();
    for customer in customers {
        if !order.contains(&customer.segment) {
            order.push(customer.segment);
        }
    }

    let segments: Vec<SegmentStats> = order
        .into_iter()
        .filter_map(|label| {
            let members: Vec<&ScoredCustomer> =
                customers.iter().filter(|c| c.segment == label).collect();
            let listed = !members.is_empty() || matches!(label, SegmentLabel::Band(_));
            listed.then(|| segment_stats(label, &members, total))
        })
        .collect();

    // Strict comparisons keep the first declared segment on ties.
    let mut occupied = segments.iter().filter(|stats| stats.count > 0);
    let Some(first) = occupied.next() else {
        return Err(ValidationError::EmptyInput.into());
    };
    let (mut best, mut worst) = (first, first);
    for stats in occupied {
        if stats.mean_composite_score > best.mean_composite_score {
            best = stats;
        }
        if stats.mean_composite_score < worst.mean_composite_score {
            worst = stats;
        }
    }

    let scores: Vec<f64> = customers.iter().map(|c| c.composite_score).collect();
    let summary = SegmentSummary {
        total_customers: total,
        average_composite_score: mean(&scores),
        best_segment: best.label,
        worst_segment: worst.label,
        metrics: distributions(customers.iter()),
        segments,
    };
    debug!(
        customers = total,
        segments = summary.segments.len(),
        best = %summary.best_segment,
        worst = %summary.worst_segment,
        "built segment summary"
    );
    Ok(summary)
}
