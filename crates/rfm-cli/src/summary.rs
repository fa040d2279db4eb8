use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use rfm_model::{SegmentLabel, SegmentStats, SegmentSummary};

use crate::cli::OutputFormatArg;
use crate::types::AnalyzeOutcome;

pub fn print_summary(outcome: &AnalyzeOutcome) -> anyhow::Result<()> {
    if outcome.format == OutputFormatArg::Json {
        println!("{}", rfm_report::summary_json(&outcome.result)?);
        return Ok(());
    }

    let result = &outcome.result;
    println!("Input: {}", outcome.input.display());
    println!("Reference date: {}", result.reference_date);
    println!(
        "Transactions: {}  Customers: {}  Bins: {}",
        result.transaction_count, result.summary.total_customers, outcome.parameters.bins
    );
    if result.negative_amount_rows > 0 {
        println!("Negative amounts: {} row(s)", result.negative_amount_rows);
    }
    println!("{}", segment_table(&result.summary));
    println!(
        "Best segment: {}  Worst segment: {}  Average score: {:.3}",
        result.summary.best_segment,
        result.summary.worst_segment,
        result.summary.average_composite_score
    );
    if let Some(report) = &outcome.report {
        println!("Customers: {}", report.customers_csv.display());
        println!("Summary: {}", report.summary_json.display());
    }
    Ok(())
}

/// Renders one row per non-empty segment plus a total row.
pub fn segment_table(summary: &SegmentSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Segment"),
        header_cell("Description"),
        header_cell("Customers"),
        header_cell("Share"),
        header_cell("Mean score"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Monetary"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_monetary = 0.0;
    for stats in &summary.segments {
        total_monetary += stats.total_monetary;
        table.add_row(vec![
            segment_cell(stats, summary),
            Cell::new(&stats.description),
            Cell::new(stats.count),
            Cell::new(format!("{:.1}%", stats.percentage)),
            Cell::new(format!("{:.3}", stats.mean_composite_score)),
            Cell::new(format!("{:.3}", stats.min_composite_score)),
            Cell::new(format!("{:.3}", stats.max_composite_score)),
            Cell::new(format!("{:.2}", stats.total_monetary)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All segments")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total_customers).add_attribute(Attribute::Bold),
        Cell::new("100.0%").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.3}", summary.average_composite_score))
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(format!("{total_monetary:.2}")).add_attribute(Attribute::Bold),
    ]);
    table
}

fn segment_cell(stats: &SegmentStats, summary: &SegmentSummary) -> Cell {
    let cell = Cell::new(&stats.name).add_attribute(Attribute::Bold);
    match highlight(&stats.label, summary) {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

fn highlight(label: &SegmentLabel, summary: &SegmentSummary) -> Option<Color> {
    if *label == summary.best_segment {
        Some(Color::Green)
    } else if *label == summary.worst_segment {
        Some(Color::Red)
    } else {
        None
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 8 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(22)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
