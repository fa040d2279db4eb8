use std::path::PathBuf;

use rfm_model::{AnalysisResult, RfmParameters};
use rfm_report::ReportPaths;

use crate::cli::OutputFormatArg;

#[derive(Debug)]
pub struct AnalyzeOutcome {
    pub input: PathBuf,
    pub parameters: RfmParameters,
    pub result: AnalysisResult,
    pub report: Option<ReportPaths>,
    pub format: OutputFormatArg,
}
