//! Composite score and rank code derived from a rank triple.

use rfm_model::{Metric, RankCode, RankedMetrics, Weights};

/// Weighted mean of the normalized ranks, in `[0, 1]`.
///
/// Each rank is mapped to `(rank - 1) / (bins - 1)` before weighting, so a
/// customer ranked K everywhere scores exactly 1.
pub fn composite_score(ranked: &RankedMetrics, weights: &Weights, bins: u32) -> f64 {
    let total = weights.total();
    if total <= 0.0 || bins < 2 {
        return 0.0;
    }
    let span = f64::from(bins - 1);
    let weighted: f64 = Metric::ALL
        .into_iter()
        .map(|metric| {
            let normalized = f64::from(ranked.rank(metric).saturating_sub(1)) / span;
            weights.get(metric) * normalized
        })
        .sum();
    (weighted / total).clamp(0.0, 1.0)
}

pub fn rank_code(ranked: &RankedMetrics, bins: u32) -> RankCode {
    RankCode::new(
        ranked.recency_rank,
        ranked.frequency_rank,
        ranked.monetary_rank,
        bins,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rfm_model::CustomerMetrics;

    fn ranked(r: u32, f: u32, m: u32) -> RankedMetrics {
        let last_purchase = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        RankedMetrics {
            metrics: CustomerMetrics {
                customer_id: "C1".to_string(),
                recency: 0,
                frequency: 1,
                monetary: 1.0,
                last_purchase,
                amount_mean: 1.0,
                amount_median: 1.0,
                amount_std: 0.0,
            },
            recency_rank: r,
            frequency_rank: f,
            monetary_rank: m,
        }
    }

    #[test]
    fn extremes_map_to_unit_interval() {
        let weights = Weights::equal();
        assert_eq!(composite_score(&ranked(4, 4, 4), &weights, 4), 1.0);
        assert_eq!(composite_score(&ranked(1, 1, 1), &weights, 4), 0.0);
    }

    #[test]
    fn weights_shift_the_score() {
        let weights = Weights::new(2.0, 1.0, 1.0);
        // (2 * 1 + 1 * 0 + 1 * 0) / 4
        let score = composite_score(&ranked(4, 1, 1), &weights, 4);
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_metric_is_ignored() {
        let weights = Weights::new(0.0, 1.0, 1.0);
        let score = composite_score(&ranked(1, 4, 4), &weights, 4);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn rank_code_from_triple() {
        assert_eq!(rank_code(&ranked(4, 4, 3), 4).to_string(), "443");
    }
}
