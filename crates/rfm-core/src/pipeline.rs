//! End-to-end analysis: extract, rank, score, segment, summarize.

use rfm_model::{AnalysisResult, Result, RfmParameters, ScoredCustomer};
use tracing::{debug, info, info_span};

use crate::extract::extract_metrics;
use crate::rank::rank_customers;
use crate::score::{composite_score, rank_code};
use crate::segment::Segmenter;
use crate::source::TransactionSource;
use crate::summary::build_summary;

/// Runs one RFM analysis over `source`.
///
/// Parameters are validated before any data is read. The call is a pure
/// function of its inputs: the same data and parameters always produce the
/// same result.
pub fn analyze<S>(source: &S, params: &RfmParameters) -> Result<AnalysisResult>
where
    S: TransactionSource + ?Sized,
{
    let span = info_span!("analyze", bins = params.bins);
    let _guard = span.enter();

    params.validate()?;
    let records = source.transactions(&params.columns)?;
    let extraction = extract_metrics(&records, params.reference_date, params.recency_unit)?;
    let ranked = rank_customers(extraction.customers, params)?;
    debug!(customers = ranked.len(), "assigned ranks");

    let segmenter = Segmenter::from_parameters(params);
    let customers: Vec<ScoredCustomer> = ranked
        .into_iter()
        .map(|ranked| {
            let score = composite_score(&ranked, &params.weights, params.bins);
            let code = rank_code(&ranked, params.bins);
            let segment = segmenter.assign(&ranked, score, code);
            ScoredCustomer {
                ranked,
                composite_score: score,
                rank_code: code,
                segment,
            }
        })
        .collect();

    let summary = build_summary(&customers, &segmenter.declared_labels())?;
    info!(
        customers = summary.total_customers,
        transactions = extraction.transaction_count,
        segments = summary.segments.len(),
        "analysis complete"
    );

    Ok(AnalysisResult {
        reference_date: extraction.reference_date,
        transaction_count: extraction.transaction_count,
        negative_amount_rows: extraction.negative_amount_rows,
        customers,
        summary,
    })
}
