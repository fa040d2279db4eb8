//! Segment summary export.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;

use rfm_model::{AnalysisResult, SegmentSummary};

/// JSON document written next to the customer table.
#[derive(Debug, Serialize)]
pub struct SummaryDocument<'a> {
    pub reference_date: NaiveDateTime,
    pub transaction_count: usize,
    pub negative_amount_rows: usize,
    pub summary: &'a SegmentSummary,
}

impl<'a> From<&'a AnalysisResult> for SummaryDocument<'a> {
    fn from(result: &'a AnalysisResult) -> Self {
        Self {
            reference_date: result.reference_date,
            transaction_count: result.transaction_count,
            negative_amount_rows: result.negative_amount_rows,
            summary: &result.summary,
        }
    }
}

/// Pretty-printed summary JSON.
pub fn summary_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(&SummaryDocument::from(result)).context("serialize summary")
}

pub fn write_summary_json(path: &Path, result: &AnalysisResult) -> Result<()> {
    let json = summary_json(result)?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
