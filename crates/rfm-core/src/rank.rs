//! Conversion of raw metrics into ordinal ranks in `1..=K`.
//!
//! Two paths, chosen up front per metric:
//!
//! - **Quantile**: equal-frequency bins over the raw values in ascending
//!   order, labelled `1..=K` or `K..=1` by direction. Used when the metric has
//!   at least K distinct values.
//! - **Fallback**: dense ranks rescaled onto `1..=K` with halves rounded to
//!   even, or the middle rank when every value is identical.
//!
//! Fixed-interval ranking replaces the quantile path with caller-supplied or
//! equal-width cut points.

use rfm_model::{
    CustomerMetrics, Direction, Metric, RankedMetrics, RankingMethod, Result, RfmParameters,
    ValidationError,
};
use tracing::debug;

use crate::stats::cmp_f64;

/// Middle of `1..=bins`, rounded up.
pub fn middle_rank(bins: u32) -> u32 {
    bins / 2 + 1
}

fn check_bins(bins: u32) -> Result<()> {
    if bins < 2 {
        return Err(ValidationError::BinCount(bins).into());
    }
    Ok(())
}

fn all_identical(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

fn distinct_sorted(values: &[f64]) -> Vec<f64> {
    let mut distinct = values.to_vec();
    distinct.sort_by(|a, b| cmp_f64(*a, *b));
    distinct.dedup_by(|a, b| a == b);
    distinct
}

/// Ranks values with quantile binning, falling back when bins would collapse.
pub fn quantile_ranks(values: &[f64], direction: Direction, bins: u32) -> Result<Vec<u32>> {
    check_bins(bins)?;
    if values.is_empty() {
        return Ok(Vec::new());
    }

    if distinct_sorted(values).len() >= bins as usize {
        return Ok(position_bins(values, direction, bins));
    }

    let goodness: Vec<f64> = values.iter().map(|v| direction.goodness(*v)).collect();
    let distinct = distinct_sorted(&goodness);
    debug!(
        distinct = distinct.len(),
        bins, "too few distinct values for quantile bins, using dense-rank fallback"
    );
    Ok(dense_fallback(&goodness, &distinct, bins))
}

/// Equal-frequency bins over the raw values in ascending order, stable on
/// input order. Lower-is-better metrics take the labels in reverse.
fn position_bins(values: &[f64], direction: Direction, bins: u32) -> Vec<u32> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| cmp_f64(values[*a], values[*b]));

    let k = u64::from(bins);
    let span = (n - 1) as u64;
    let mut ranks = vec![0; n];
    for (position, idx) in order.into_iter().enumerate() {
        let scaled = position as u64 * k;
        let bin = u32::try_from(scaled.div_ceil(span).max(1))
            .unwrap_or(bins)
            .min(bins);
        ranks[idx] = match direction {
            Direction::HigherIsBetter => bin,
            Direction::LowerIsBetter => bins - bin + 1,
        };
    }
    ranks
}

fn dense_fallback(goodness: &[f64], distinct: &[f64], bins: u32) -> Vec<u32> {
    if distinct.len() < 2 {
        return vec![middle_rank(bins); goodness.len()];
    }
    let top = (distinct.len() - 1) as f64;
    let span = f64::from(bins - 1);
    goodness
        .iter()
        .map(|value| {
            let dense = distinct.partition_point(|d| d < value) as f64;
            let rank = (dense / top * span + 1.0).round_ties_even();
            (rank as u32).clamp(1, bins)
        })
        .collect()
}

/// Equal-width cut points between the observed minimum and maximum.
pub fn equal_width_edges(values: &[f64], bins: u32) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let width = (max - min) / f64::from(bins);
    (1..bins).map(|i| min + f64::from(i) * width).collect()
}

/// Ranks raw values against right-inclusive intervals `(a, b]`.
///
/// Without `edges`, equal-width cut points are derived from the data.
pub fn fixed_ranks(
    values: &[f64],
    direction: Direction,
    bins: u32,
    edges: Option<&[f64]>,
) -> Result<Vec<u32>> {
    check_bins(bins)?;
    if values.is_empty() {
        return Ok(Vec::new());
    }
    if all_identical(values) {
        debug!(bins, "metric is constant, assigning middle rank");
        return Ok(vec![middle_rank(bins); values.len()]);
    }

    let derived;
    let edges = match edges {
        Some(edges) => edges,
        None => {
            derived = equal_width_edges(values, bins);
            derived.as_slice()
        }
    };
    if edges.len() != bins as usize - 1 {
        return Err(ValidationError::Parameters(format!(
            "expected {} cut points, got {}",
            bins - 1,
            edges.len()
        ))
        .into());
    }

    Ok(values
        .iter()
        .map(|value| {
            let bin = edges.partition_point(|edge| edge < value) as u32;
            match direction {
                Direction::HigherIsBetter => bin + 1,
                Direction::LowerIsBetter => bins - bin,
            }
        })
        .collect())
}

/// Ranks every metric of every customer according to the parameters.
pub fn rank_customers(
    customers: Vec<CustomerMetrics>,
    params: &RfmParameters,
) -> Result<Vec<RankedMetrics>> {
    check_bins(params.bins)?;

    let mut ranks: [Vec<u32>; 3] = Default::default();
    for (slot, metric) in ranks.iter_mut().zip(Metric::ALL) {
        let values: Vec<f64> = customers.iter().map(|c| c.value(metric)).collect();
        *slot = match &params.ranking {
            RankingMethod::Quantile => quantile_ranks(&values, metric.direction(), params.bins)?,
            RankingMethod::Fixed { intervals } => fixed_ranks(
                &values,
                metric.direction(),
                params.bins,
                intervals.get(metric),
            )?,
        };
    }

    let [recency, frequency, monetary] = ranks;
    Ok(customers
        .into_iter()
        .enumerate()
        .map(|(idx, metrics)| RankedMetrics {
            metrics,
            recency_rank: recency[idx],
            frequency_rank: frequency[idx],
            monetary_rank: monetary[idx],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_bins_best_gets_top_rank() {
        // Recency is cut ascending and relabelled, so the larger best bin
        // holds the two most recent customers.
        let ranks =
            quantile_ranks(&[10.0, 30.0, 60.0, 90.0, 120.0], Direction::LowerIsBetter, 4).unwrap();
        assert_eq!(ranks, vec![4, 4, 3, 2, 1]);

        let ranks =
            quantile_ranks(&[1000.0, 500.0, 300.0, 100.0, 50.0], Direction::HigherIsBetter, 4)
                .unwrap();
        assert_eq!(ranks, vec![4, 3, 2, 1, 1]);
    }

    #[test]
    fn quantile_bins_are_equal_frequency() {
        let values: Vec<f64> = (1..=8).map(f64::from).collect();
        let ranks = quantile_ranks(&values, Direction::HigherIsBetter, 4).unwrap();
        assert_eq!(ranks, vec![1, 1, 2, 2, 3, 3, 4, 4]);
    }

    #[test]
    fn ties_across_a_bin_edge_follow_row_order() {
        let ranks = quantile_ranks(&[1.0, 2.0, 2.0, 3.0], Direction::HigherIsBetter, 3).unwrap();
        assert_eq!(ranks, vec![1, 1, 2, 3]);

        let ranks = quantile_ranks(&[3.0, 2.0, 2.0, 1.0], Direction::HigherIsBetter, 3).unwrap();
        assert_eq!(ranks, vec![3, 1, 2, 1]);
    }

    #[test]
    fn recency_ties_across_a_bin_edge_follow_row_order() {
        let ranks = quantile_ranks(&[1.0, 2.0, 2.0, 3.0], Direction::LowerIsBetter, 3).unwrap();
        assert_eq!(ranks, vec![3, 3, 2, 1]);

        let ranks = quantile_ranks(&[3.0, 2.0, 2.0, 1.0], Direction::LowerIsBetter, 3).unwrap();
        assert_eq!(ranks, vec![1, 3, 2, 3]);
    }

    #[test]
    fn identical_values_get_middle_rank() {
        let ranks = quantile_ranks(&[7.0; 6], Direction::HigherIsBetter, 4).unwrap();
        assert_eq!(ranks, vec![3; 6]);
        let ranks = quantile_ranks(&[7.0; 3], Direction::HigherIsBetter, 5).unwrap();
        assert_eq!(ranks, vec![3; 3]);
    }

    #[test]
    fn skewed_values_use_rescaled_dense_ranks() {
        // Three distinct values, five bins: dense 1, 2, 3 map to 1, 3, 5.
        let ranks =
            quantile_ranks(&[1.0, 1.0, 1.0, 2.0, 50.0], Direction::HigherIsBetter, 5).unwrap();
        assert_eq!(ranks, vec![1, 1, 1, 3, 5]);

        // Two distinct values, four bins: lower is better flips the order.
        let ranks = quantile_ranks(&[0.0, 0.0, 9.0], Direction::LowerIsBetter, 4).unwrap();
        assert_eq!(ranks, vec![4, 4, 1]);
    }

    #[test]
    fn rescaled_halves_round_to_even() {
        // Dense ranks 0, 1, 2 scale to 1, 2.5, 4.
        let ranks = quantile_ranks(&[1.0, 2.0, 3.0], Direction::HigherIsBetter, 4).unwrap();
        assert_eq!(ranks, vec![1, 2, 4]);

        // Same dense ranks over eight bins: 1, 4.5, 8.
        let ranks = quantile_ranks(&[1.0, 2.0, 3.0], Direction::LowerIsBetter, 8).unwrap();
        assert_eq!(ranks, vec![8, 4, 1]);
    }

    #[test]
    fn middle_rank_rounds_up() {
        assert_eq!(middle_rank(2), 2);
        assert_eq!(middle_rank(4), 3);
        assert_eq!(middle_rank(5), 3);
        assert_eq!(middle_rank(u32::MAX), u32::MAX / 2 + 1);
    }

    #[test]
    fn single_value_gets_middle_rank() {
        assert_eq!(
            quantile_ranks(&[12.0], Direction::LowerIsBetter, 4).unwrap(),
            vec![3]
        );
    }

    #[test]
    fn rejects_fewer_than_two_bins() {
        let err = quantile_ranks(&[1.0, 2.0], Direction::HigherIsBetter, 1).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn fixed_ranks_with_explicit_edges() {
        let edges = [30.0, 90.0, 180.0];
        let ranks = fixed_ranks(
            &[10.0, 30.0, 31.0, 200.0],
            Direction::LowerIsBetter,
            4,
            Some(&edges),
        )
        .unwrap();
        assert_eq!(ranks, vec![4, 4, 3, 1]);
    }

    #[test]
    fn fixed_ranks_with_equal_width_edges() {
        // Edges at 25, 50, 75.
        let ranks =
            fixed_ranks(&[0.0, 25.0, 26.0, 100.0], Direction::HigherIsBetter, 4, None).unwrap();
        assert_eq!(ranks, vec![1, 1, 2, 4]);
    }

    #[test]
    fn fixed_ranks_constant_metric() {
        let ranks = fixed_ranks(&[4.0, 4.0], Direction::HigherIsBetter, 4, None).unwrap();
        assert_eq!(ranks, vec![3, 3]);
    }
}
