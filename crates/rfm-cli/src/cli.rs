//! CLI argument definitions for the RFM segmentation tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use chrono::NaiveDateTime;
use rfm_core::datetime::parse_timestamp;
use rfm_model::Weights;

#[derive(Parser)]
#[command(
    name = "rfm",
    version,
    about = "RFM customer segmentation - score and segment customers from transactions",
    long_about = "Score customers by Recency, Frequency and Monetary value.\n\n\
                  Reads a transaction CSV, ranks each metric, combines the ranks into a\n\
                  composite score and assigns every customer to a segment."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a transaction CSV and print the segment summary.
    Analyze(AnalyzeArgs),

    /// List the built-in segment rule tables.
    Segments,
}

#[derive(Parser, Default)]
pub struct AnalyzeArgs {
    /// Transaction CSV with one row per purchase.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// JSON file with analysis parameters; command-line flags override it.
    #[arg(long = "params", value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// Column holding the customer identifier.
    #[arg(long = "customer-column", value_name = "NAME")]
    pub customer_column: Option<String>,

    /// Column holding the purchase timestamp.
    #[arg(long = "timestamp-column", value_name = "NAME")]
    pub timestamp_column: Option<String>,

    /// Column holding the purchase amount.
    #[arg(long = "amount-column", value_name = "NAME")]
    pub amount_column: Option<String>,

    /// Number of rank bins per metric (K).
    #[arg(long = "bins", value_name = "K")]
    pub bins: Option<u32>,

    /// Number of composite score bands.
    #[arg(long = "segments", value_name = "N")]
    pub segments: Option<u32>,

    /// Recency, frequency and monetary weights, e.g. `2,1,1`.
    #[arg(long = "weights", value_name = "R,F,M", value_parser = parse_weights)]
    pub weights: Option<Weights>,

    /// Reference date for recency (default: latest transaction).
    #[arg(long = "reference-date", value_name = "DATE", value_parser = parse_reference_date)]
    pub reference_date: Option<NaiveDateTime>,

    /// Count recency in business days (Monday to Friday).
    #[arg(long = "business-days")]
    pub business_days: bool,

    /// Segmentation mode.
    #[arg(long = "mode", value_enum)]
    pub mode: Option<ModeArg>,

    /// Built-in rule table (implies `--mode rules`).
    #[arg(long = "rules", value_enum)]
    pub rules: Option<RulesArg>,

    /// Ranking method.
    #[arg(long = "ranking", value_enum)]
    pub ranking: Option<RankingArg>,

    /// Write the customer CSV and summary JSON into this directory.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// How to print the summary.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Equal-width composite score bands.
    Bands,
    /// Ordered rule table over the rank triple.
    Rules,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RulesArg {
    Classic,
    Tiered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RankingArg {
    Quantile,
    Fixed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    #[default]
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Parses `R,F,M` weights.
pub fn parse_weights(value: &str) -> Result<Weights, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [recency, frequency, monetary] = parts.as_slice() else {
        return Err(format!("expected three comma-separated weights, got '{value}'"));
    };
    let parse = |part: &str| {
        part.parse::<f64>()
            .map_err(|_| format!("invalid weight '{part}'"))
    };
    let weights = Weights::new(parse(*recency)?, parse(*frequency)?, parse(*monetary)?);
    weights.validate().map_err(|e| e.to_string())?;
    Ok(weights)
}

pub fn parse_reference_date(value: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(value).ok_or_else(|| format!("unrecognized date '{value}'"))
}
