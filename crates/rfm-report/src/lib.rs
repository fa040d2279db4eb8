//! Report generation for RFM analyses.
//!
//! - **Customers CSV**: one row per scored customer with metrics, ranks,
//!   composite score and segment.
//! - **Summary JSON**: per-segment statistics plus run metadata.

mod customers;
mod summary;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use rfm_model::AnalysisResult;

pub use customers::{TIMESTAMP_FORMAT, scored_customers_frame, write_scored_customers_csv};
pub use summary::{SummaryDocument, summary_json, write_summary_json};

/// File name of the scored customer table.
pub const CUSTOMERS_FILE: &str = "rfm_customers.csv";
/// File name of the summary document.
pub const SUMMARY_FILE: &str = "rfm_summary.json";

/// Paths written by [`write_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub customers_csv: PathBuf,
    pub summary_json: PathBuf,
}

/// Writes both report files into `output_dir`, creating it if needed.
pub fn write_report(output_dir: &Path, result: &AnalysisResult) -> Result<ReportPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;

    let paths = ReportPaths {
        customers_csv: output_dir.join(CUSTOMERS_FILE),
        summary_json: output_dir.join(SUMMARY_FILE),
    };
    write_scored_customers_csv(&paths.customers_csv, &result.customers)?;
    write_summary_json(&paths.summary_json, result)?;

    info!(
        customers = %paths.customers_csv.display(),
        summary = %paths.summary_json.display(),
        "wrote report"
    );
    Ok(paths)
}
