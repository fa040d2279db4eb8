//! End-to-end scenarios for `analyze`.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use rfm_core::analyze;
use rfm_model::{
    NamedSegment, RfmError, RfmParameters, RuleTableKind, ScoreBand, SegmentLabel,
    SegmentationMode, TransactionRecord, ValidationError,
};

fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Five customers with recency {10, 30, 60, 90, 120}, frequency {5, 3, 2, 1, 1}
/// and monetary {1000, 500, 300, 100, 50}.
fn five_customers() -> Vec<TransactionRecord> {
    let profiles = [
        ("C1", 10, 5, 1000.0),
        ("C2", 30, 3, 500.0),
        ("C3", 60, 2, 300.0),
        ("C4", 90, 1, 100.0),
        ("C5", 120, 1, 50.0),
    ];
    let mut records = Vec::new();
    for (id, recency, frequency, monetary) in profiles {
        let last = reference() - TimeDelta::days(recency);
        for purchase in 0..frequency {
            let ts = last - TimeDelta::days(7 * purchase);
            records.push(TransactionRecord::new(id, ts, monetary / frequency as f64));
        }
    }
    records
}

fn text_frame(records: &[TransactionRecord]) -> DataFrame {
    let ids: Vec<String> = records.iter().map(|r| r.customer_id.clone()).collect();
    let stamps: Vec<String> = records
        .iter()
        .map(|r| r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();
    let amounts: Vec<String> = records.iter().map(|r| r.amount.to_string()).collect();
    let columns: Vec<Column> = vec![
        Series::new("customer_id".into(), ids).into_column(),
        Series::new("timestamp".into(), stamps).into_column(),
        Series::new("amount".into(), amounts).into_column(),
    ];
    DataFrame::new(columns).unwrap()
}

fn classic() -> SegmentationMode {
    SegmentationMode::RuleTable {
        table: RuleTableKind::Classic,
    }
}

#[test]
fn scenario_ranks_and_scores() {
    let params = RfmParameters::new().with_reference_date(Some(reference()));
    let result = analyze(&text_frame(&five_customers()), &params).unwrap();

    assert_eq!(result.reference_date, reference());
    assert_eq!(result.transaction_count, 12);

    let codes: Vec<String> = result
        .customers
        .iter()
        .map(|c| c.rank_code.to_string())
        .collect();
    assert_eq!(codes, vec!["444", "433", "322", "211", "111"]);

    let c1 = result.customer("C1").unwrap();
    assert_eq!(c1.metrics().recency, 10);
    assert_eq!(c1.metrics().frequency, 5);
    assert!((c1.metrics().monetary - 1000.0).abs() < 1e-9);
    assert_eq!(c1.composite_score, 1.0);
    assert!(
        result
            .customers
            .iter()
            .all(|c| c.composite_score <= c1.composite_score)
    );
}

#[test]
fn scenario_rule_table_puts_top_customer_in_champions() {
    let params = RfmParameters::new()
        .with_reference_date(Some(reference()))
        .with_segmentation(classic());
    let result = analyze(&five_customers(), &params).unwrap();
    let summary = &result.summary;

    let champions = SegmentLabel::Named(NamedSegment::Champions);
    let lost = SegmentLabel::Named(NamedSegment::Lost);
    assert_eq!(result.customer("C1").unwrap().segment, champions);
    assert_eq!(result.customer("C5").unwrap().segment, lost);
    assert_eq!(summary.total_customers, 5);
    assert_eq!(summary.best_segment, champions);
    assert_eq!(summary.worst_segment, lost);
    assert_eq!(summary.segment(&champions).unwrap().count, 2);
    assert_eq!(summary.segment(&lost).unwrap().count, 2);
    assert_eq!(
        result.customer("C3").unwrap().segment,
        SegmentLabel::Named(NamedSegment::NewCustomers)
    );
    assert!((summary.percentage_total() - 100.0).abs() < 1e-6);
}

#[test]
fn scenario_score_bands_put_top_customer_in_best_band() {
    let params = RfmParameters::new().with_reference_date(Some(reference()));
    let result = analyze(&five_customers(), &params).unwrap();
    let summary = &result.summary;

    let top = SegmentLabel::Band(ScoreBand::new(4, 5));
    let bottom = SegmentLabel::Band(ScoreBand::new(0, 5));
    assert_eq!(result.customer("C1").unwrap().segment, top);
    assert_eq!(result.customer("C5").unwrap().segment, bottom);
    assert_eq!(summary.best_segment, top);
    assert_eq!(summary.worst_segment, bottom);

    let keys: Vec<&str> = summary.segments.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["band_1", "band_2", "band_3", "band_4", "band_5"]);
    let counts: Vec<usize> = summary.segments.iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![2, 0, 1, 1, 1]);
    assert!((summary.percentage_total() - 100.0).abs() < 1e-6);
}

#[test]
fn very_large_bin_count_scores_without_overflow() {
    let params = RfmParameters::new()
        .with_reference_date(Some(reference()))
        .with_bins(3_000_000)
        .with_segmentation(SegmentationMode::RuleTable {
            table: RuleTableKind::Tiered,
        });
    let result = analyze(&five_customers(), &params).unwrap();

    let c1 = result.customer("C1").unwrap();
    assert_eq!(c1.ranked.recency_rank, 3_000_000);
    assert_eq!(c1.segment, SegmentLabel::Named(NamedSegment::Champions));
    assert_eq!(
        result.customer("C5").unwrap().segment,
        SegmentLabel::Named(NamedSegment::Lost)
    );
    assert!(!c1.rank_code.to_string().is_empty());
}

#[test]
fn default_reference_date_is_latest_transaction() {
    let result = analyze(&five_customers(), &RfmParameters::new()).unwrap();
    assert_eq!(result.reference_date, reference() - TimeDelta::days(10));
    assert_eq!(result.customer("C1").unwrap().metrics().recency, 0);
    assert_eq!(result.customer("C5").unwrap().metrics().recency, 110);
}

#[test]
fn single_customer_gets_middle_ranks() {
    let records = vec![TransactionRecord::new("solo", reference(), 42.0)];
    let result = analyze(&records, &RfmParameters::new().with_segmentation(classic())).unwrap();

    let solo = &result.customers[0];
    assert_eq!(
        (solo.ranked.recency_rank, solo.ranked.frequency_rank, solo.ranked.monetary_rank),
        (3, 3, 3)
    );
    assert_eq!(result.summary.segments.len(), 1);
    assert_eq!(result.summary.segments[0].percentage, 100.0);
}

#[test]
fn zero_rows_are_rejected() {
    let df = DataFrame::new(vec![
        Series::new("customer_id".into(), Vec::<String>::new()).into_column(),
        Series::new("timestamp".into(), Vec::<String>::new()).into_column(),
        Series::new("amount".into(), Vec::<String>::new()).into_column(),
    ])
    .unwrap();
    let err = analyze(&df, &RfmParameters::new()).unwrap_err();
    assert_eq!(err, RfmError::Validation(ValidationError::EmptyInput));
    assert_eq!(err.to_string(), "cannot analyze zero customers");
}

#[test]
fn missing_amount_column_is_a_schema_error() {
    let df = DataFrame::new(vec![
        Series::new("customer_id".into(), vec!["C1"]).into_column(),
        Series::new("timestamp".into(), vec!["2024-01-01"]).into_column(),
    ])
    .unwrap();
    let err = analyze(&df, &RfmParameters::new()).unwrap_err();
    assert_eq!(err.missing_columns(), Some(&["amount".to_string()][..]));
}

#[test]
fn invalid_parameters_fail_before_reading_data() {
    let df = DataFrame::new(vec![Series::new("x".into(), vec!["1"]).into_column()]).unwrap();
    let err = analyze(&df, &RfmParameters::new().with_bins(1)).unwrap_err();
    assert_eq!(err, RfmError::Validation(ValidationError::BinCount(1)));
}

#[test]
fn more_recent_customer_never_ranks_lower() {
    let records: Vec<TransactionRecord> = (0..6)
        .map(|i| {
            TransactionRecord::new(
                format!("C{i}"),
                reference() - TimeDelta::days(5 * i64::from(i)),
                100.0,
            )
        })
        .collect();
    let params = RfmParameters::new().with_reference_date(Some(reference()));
    let result = analyze(&records, &params).unwrap();

    for pair in result.customers.windows(2) {
        assert!(pair[0].metrics().recency < pair[1].metrics().recency);
        assert!(pair[0].ranked.recency_rank >= pair[1].ranked.recency_rank);
    }
}

#[test]
fn custom_columns_are_honoured() {
    let df = DataFrame::new(vec![
        Series::new("CustomerID".into(), vec!["A", "B"]).into_column(),
        Series::new("InvoiceDate".into(), vec!["01.03.2024", "15.03.2024"]).into_column(),
        Series::new("Total".into(), vec!["12.5", "7"]).into_column(),
    ])
    .unwrap();
    let params = RfmParameters::new().with_columns(rfm_model::ColumnMapping::new(
        "CustomerID",
        "InvoiceDate",
        "Total",
    ));
    let result = analyze(&df, &params).unwrap();
    assert_eq!(result.customer("A").unwrap().metrics().recency, 14);
}
