use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{debug, info, info_span};

use rfm_core::{Predicate, Rule, RuleTable, analyze};
use rfm_ingest::read_transactions_csv;
use rfm_model::{
    DEFAULT_BINS, NamedSegment, RankingMethod, RecencyUnit, RfmParameters, RuleTableKind,
    SegmentationMode,
};
use rfm_report::write_report;

use crate::cli::{AnalyzeArgs, ModeArg, RankingArg, RulesArg};
use crate::summary::apply_table_style;
use crate::types::AnalyzeOutcome;

pub fn run_segments() -> Result<()> {
    let tables = [
        ("classic", RuleTable::classic(DEFAULT_BINS)),
        ("tiered", RuleTable::tiered(DEFAULT_BINS)),
    ];
    let mut table = Table::new();
    table.set_header(vec!["Table", "Segment", "Rule (K = 4)", "Description"]);
    apply_table_style(&mut table);
    for (name, rules) in &tables {
        for rule in rules.rules() {
            table.add_row(vec![
                (*name).to_string(),
                rule.label.display_name().to_string(),
                describe_rule(rule),
                rule.label.description().to_string(),
            ]);
        }
        let default = rules.default_label();
        table.add_row(vec![
            (*name).to_string(),
            default.display_name().to_string(),
            "otherwise".to_string(),
            default.description().to_string(),
        ]);
    }
    println!("{table}");
    println!("Custom tables map rank codes to any of:");
    let keys: Vec<&str> = NamedSegment::ALL.into_iter().map(NamedSegment::as_str).collect();
    println!("  {}", keys.join(", "));
    Ok(())
}

fn describe_rule(rule: &Rule) -> String {
    match &rule.predicate {
        Predicate::Ranks {
            recency,
            frequency,
            monetary,
        } => format!(
            "R {}, F {}, M {}",
            level_name(*recency),
            level_name(*frequency),
            level_name(*monetary)
        ),
        Predicate::CodeAtLeast(code) => format!("code >= {code}"),
        Predicate::CodeIn(codes) => {
            let codes: Vec<&str> = codes.iter().map(String::as_str).collect();
            format!("code in {}", codes.join(", "))
        }
    }
}

fn level_name(level: rfm_core::Level) -> &'static str {
    match level {
        rfm_core::Level::High => "high",
        rfm_core::Level::Low => "low",
    }
}

/// Loads the parameter file, if any, and applies command-line overrides.
pub fn build_parameters(args: &AnalyzeArgs) -> Result<RfmParameters> {
    let mut params = match &args.params {
        Some(path) => load_parameters(path)?,
        None => RfmParameters::default(),
    };

    if let Some(name) = &args.customer_column {
        params.columns.customer.clone_from(name);
    }
    if let Some(name) = &args.timestamp_column {
        params.columns.timestamp.clone_from(name);
    }
    if let Some(name) = &args.amount_column {
        params.columns.amount.clone_from(name);
    }
    if let Some(bins) = args.bins {
        params.bins = bins;
    }
    if let Some(segments) = args.segments {
        params.segments_count = segments;
    }
    if let Some(weights) = args.weights {
        params.weights = weights;
    }
    if args.reference_date.is_some() {
        params.reference_date = args.reference_date;
    }
    if args.business_days {
        params.recency_unit = RecencyUnit::BusinessDays;
    }
    match args.ranking {
        Some(RankingArg::Quantile) => params.ranking = RankingMethod::Quantile,
        Some(RankingArg::Fixed) if params.ranking == RankingMethod::Quantile => {
            params.ranking = RankingMethod::Fixed {
                intervals: Default::default(),
            };
        }
        _ => {}
    }
    apply_segmentation(&mut params, args.mode, args.rules)?;

    params.validate().context("invalid analysis parameters")?;
    Ok(params)
}

fn apply_segmentation(
    params: &mut RfmParameters,
    mode: Option<ModeArg>,
    rules: Option<RulesArg>,
) -> Result<()> {
    let table = rules.map(|rules| match rules {
        RulesArg::Classic => RuleTableKind::Classic,
        RulesArg::Tiered => RuleTableKind::Tiered,
    });
    match (mode, table) {
        (Some(ModeArg::Bands), Some(_)) => bail!("--rules cannot be combined with --mode bands"),
        (Some(ModeArg::Bands), None) => params.segmentation = SegmentationMode::ScoreBands,
        (_, Some(table)) => params.segmentation = SegmentationMode::RuleTable { table },
        (Some(ModeArg::Rules), None) => {
            if !matches!(params.segmentation, SegmentationMode::RuleTable { .. }) {
                params.segmentation = SegmentationMode::RuleTable {
                    table: RuleTableKind::default(),
                };
            }
        }
        (None, None) => {}
    }
    Ok(())
}

fn load_parameters(path: &Path) -> Result<RfmParameters> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let params: RfmParameters =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    debug!(path = %path.display(), "loaded analysis parameters");
    Ok(params)
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeOutcome> {
    let span = info_span!("analyze_file", input = %args.input.display());
    let _guard = span.enter();

    let parameters = build_parameters(args)?;
    let (df, headers) = read_transactions_csv(&args.input)
        .with_context(|| format!("load {}", args.input.display()))?;

    let missing = headers.missing(&parameters.columns.required());
    if !missing.is_empty() {
        bail!(
            "{} is missing required column(s): {} (available: {})",
            args.input.display(),
            missing.join(", "),
            headers.columns.join(", ")
        );
    }
    let result = analyze(&df, &parameters)
        .with_context(|| format!("analyze {}", args.input.display()))?;

    let report = match &args.output_dir {
        Some(dir) => Some(write_report(dir, &result)?),
        None => None,
    };
    info!(
        customers = result.summary.total_customers,
        segments = result.summary.segments.len(),
        "analysis finished"
    );

    Ok(AnalyzeOutcome {
        input: args.input.clone(),
        parameters,
        result,
        report,
        format: args.format,
    })
}
