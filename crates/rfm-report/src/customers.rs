//! Scored customer export.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use rfm_model::ScoredCustomer;

/// Timestamp format used for `last_purchase` in exports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds one row per customer, in analysis order.
pub fn scored_customers_frame(customers: &[ScoredCustomer]) -> Result<DataFrame> {
    let text = |f: fn(&ScoredCustomer) -> String| -> Vec<String> {
        customers.iter().map(f).collect()
    };
    let uint = |f: fn(&ScoredCustomer) -> u32| -> Vec<u32> { customers.iter().map(f).collect() };
    let float = |f: fn(&ScoredCustomer) -> f64| -> Vec<f64> { customers.iter().map(f).collect() };

    let columns: Vec<Column> = vec![
        Series::new("customer_id".into(), text(|c| c.customer_id().to_string())).into_column(),
        Series::new("recency".into(), uint(|c| c.metrics().recency)).into_column(),
        Series::new("frequency".into(), uint(|c| c.metrics().frequency)).into_column(),
        Series::new("monetary".into(), float(|c| c.metrics().monetary)).into_column(),
        Series::new(
            "last_purchase".into(),
            text(|c| c.metrics().last_purchase.format(TIMESTAMP_FORMAT).to_string()),
        )
        .into_column(),
        Series::new("amount_mean".into(), float(|c| c.metrics().amount_mean)).into_column(),
        Series::new("amount_median".into(), float(|c| c.metrics().amount_median)).into_column(),
        Series::new("amount_std".into(), float(|c| c.metrics().amount_std)).into_column(),
        Series::new("recency_rank".into(), uint(|c| c.ranked.recency_rank)).into_column(),
        Series::new("frequency_rank".into(), uint(|c| c.ranked.frequency_rank)).into_column(),
        Series::new("monetary_rank".into(), uint(|c| c.ranked.monetary_rank)).into_column(),
        Series::new("rank_sum".into(), uint(|c| c.ranked.rank_sum())).into_column(),
        Series::new("rank_code".into(), text(|c| c.rank_code.to_string())).into_column(),
        Series::new("composite_score".into(), float(|c| c.composite_score)).into_column(),
        Series::new("segment".into(), text(|c| c.segment.key())).into_column(),
        Series::new("segment_name".into(), text(|c| c.segment.name())).into_column(),
    ];
    DataFrame::new(columns).context("build scored customer frame")
}

/// Writes scored customers as CSV with a header row.
pub fn write_scored_customers_csv(path: &Path, customers: &[ScoredCustomer]) -> Result<()> {
    let mut df = scored_customers_frame(customers)?;
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
