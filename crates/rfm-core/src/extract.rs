//! Aggregation of transaction rows into per-customer metrics.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rfm_model::{CustomerMetrics, RecencyUnit, Result, TransactionRecord, ValidationError};
use tracing::{debug, warn};

use crate::datetime::{business_days, calendar_days};
use crate::stats::{mean, median, sample_std};

/// Output of the metric extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// One entry per customer, in order of first appearance.
    pub customers: Vec<CustomerMetrics>,
    pub reference_date: NaiveDateTime,
    pub transaction_count: usize,
    pub negative_amount_rows: usize,
}

struct Accumulator<'a> {
    customer_id: &'a str,
    last_purchase: NaiveDateTime,
    amounts: Vec<f64>,
}

/// Computes recency, frequency and monetary value for every customer.
///
/// The reference date defaults to the latest timestamp in `records`.
pub fn extract_metrics(
    records: &[TransactionRecord],
    reference_date: Option<NaiveDateTime>,
    unit: RecencyUnit,
) -> Result<Extraction> {
    let Some(latest) = records.iter().map(|record| record.timestamp).max() else {
        return Err(ValidationError::EmptyInput.into());
    };
    let reference_date = reference_date.unwrap_or(latest);

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Accumulator<'_>> = Vec::new();
    let mut negative_amount_rows = 0;

    for (row, record) in records.iter().enumerate() {
        if record.is_negative() {
            negative_amount_rows += 1;
            warn!(
                row = row + 1,
                customer = %record.customer_id,
                amount = record.amount,
                "negative transaction amount"
            );
        }
        let slot = *index.entry(record.customer_id.as_str()).or_insert_with(|| {
            groups.push(Accumulator {
                customer_id: &record.customer_id,
                last_purchase: record.timestamp,
                amounts: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.last_purchase = group.last_purchase.max(record.timestamp);
        group.amounts.push(record.amount);
    }

    let mut clipped = 0usize;
    let customers: Vec<CustomerMetrics> = groups
        .into_iter()
        .map(|group| {
            let days = match unit {
                RecencyUnit::CalendarDays => calendar_days(group.last_purchase, reference_date),
                RecencyUnit::BusinessDays => {
                    if group.last_purchase > reference_date {
                        -1
                    } else {
                        business_days(group.last_purchase.date(), reference_date.date())
                    }
                }
            };
            if days < 0 {
                clipped += 1;
            }
            let recency = u32::try_from(days.max(0)).unwrap_or(u32::MAX);
            let frequency = u32::try_from(group.amounts.len()).unwrap_or(u32::MAX);
            CustomerMetrics {
                customer_id: group.customer_id.to_string(),
                recency,
                frequency,
                monetary: group.amounts.iter().sum(),
                last_purchase: group.last_purchase,
                amount_mean: mean(&group.amounts),
                amount_median: median(&group.amounts),
                amount_std: sample_std(&group.amounts),
            }
        })
        .collect();

    if clipped > 0 {
        warn!(
            customers = clipped,
            reference_date = %reference_date,
            "reference date precedes last purchase; recency clipped to 0"
        );
    }
    debug!(
        customers = customers.len(),
        transactions = records.len(),
        reference_date = %reference_date,
        "extracted customer metrics"
    );

    Ok(Extraction {
        customers,
        reference_date,
        transaction_count: records.len(),
        negative_amount_rows,
    })
}
