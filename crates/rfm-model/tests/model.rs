//! Tests for rfm-model types.

use rfm_model::{
    NamedSegment, RankingMethod, RecencyUnit, RfmParameters, RuleTableKind, ScoreBand,
    SegmentLabel, SegmentationMode, ValidationError,
};

#[test]
fn parameters_fill_defaults_from_partial_json() {
    let params: RfmParameters = serde_json::from_str(
        r#"{
            "columns": { "customer": "CustomerID", "amount": "Total" },
            "bins": 5
        }"#,
    )
    .expect("deserialize params");

    assert_eq!(params.columns.customer, "CustomerID");
    assert_eq!(params.columns.timestamp, "timestamp");
    assert_eq!(params.columns.amount, "Total");
    assert_eq!(params.bins, 5);
    assert_eq!(params.segments_count, 5);
    assert_eq!(params.recency_unit, RecencyUnit::CalendarDays);
    assert_eq!(params.ranking, RankingMethod::Quantile);
    assert_eq!(params.segmentation, SegmentationMode::ScoreBands);
    assert!(params.validate().is_ok());
}

#[test]
fn parameters_parse_rule_table_and_fixed_ranking() {
    let params: RfmParameters = serde_json::from_str(
        r#"{
            "recency_unit": "business_days",
            "reference_date": "2025-03-30T00:00:00",
            "ranking": { "method": "fixed", "intervals": { "recency": [30, 90, 180] } },
            "segmentation": {
                "mode": "rule_table",
                "table": { "kind": "custom", "codes": { "444": "champions", "111": "lost" } }
            }
        }"#,
    )
    .expect("deserialize params");

    assert_eq!(params.recency_unit, RecencyUnit::BusinessDays);
    assert!(params.reference_date.is_some());
    let RankingMethod::Fixed { intervals } = &params.ranking else {
        panic!("expected fixed ranking");
    };
    assert_eq!(intervals.recency.as_deref(), Some(&[30.0, 90.0, 180.0][..]));
    assert!(intervals.frequency.is_none());
    let SegmentationMode::RuleTable {
        table: RuleTableKind::Custom { codes },
    } = &params.segmentation
    else {
        panic!("expected custom rule table");
    };
    assert_eq!(codes.get("444"), Some(&NamedSegment::Champions));
    assert!(params.validate().is_ok());
}

#[test]
fn non_integer_bins_are_rejected_by_deserialization() {
    let result: Result<RfmParameters, _> = serde_json::from_str(r#"{ "bins": 4.5 }"#);
    assert!(result.is_err());
}

#[test]
fn custom_table_rejects_blank_codes() {
    let params: RfmParameters = serde_json::from_str(
        r#"{ "segmentation": { "mode": "rule_table", "table": { "kind": "custom", "codes": { " ": "lost" } } } }"#,
    )
    .expect("deserialize params");
    assert_eq!(params.validate(), Err(ValidationError::EmptyRankCode));
}

#[test]
fn segment_label_serializes_with_kind_tag() {
    let named = serde_json::to_value(SegmentLabel::Named(NamedSegment::AtRisk)).unwrap();
    assert_eq!(named, serde_json::json!({ "kind": "named", "value": "at_risk" }));

    let band = serde_json::to_value(SegmentLabel::Band(ScoreBand::new(1, 3))).unwrap();
    assert_eq!(
        band,
        serde_json::json!({ "kind": "band", "value": { "index": 1, "count": 3 } })
    );
}
