//! Integration tests for missing-value resolution and analysis.
//!
//! These tests verify end-to-end behavior on small CSV fixtures.

use lex_eda::analysis::{correlation_matrix, describe, pairplot_sample, value_counts};
use lex_eda::io::{load_csv, write_csv};
use lex_eda::types::ColumnDescription;
use lex_eda::utils::{f64_options, string_options};
use lex_eda::{
    AllMissingStrategy, EdaConfig, EdaError, MissingValuePolicy, MissingValueResolver,
    NumericFill, NumericFillPlan, ReportGenerator, ReportParams,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> DataFrame {
    load_csv(fixtures_path().join(filename), 100).expect("Failed to read CSV fixture")
}

fn floats(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    f64_options(df.column(column).unwrap().as_materialized_series()).unwrap()
}

fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    string_options(df.column(column).unwrap().as_materialized_series()).unwrap()
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lex_eda_it_{}_{}", name, std::process::id()))
}

fn all_policies() -> Vec<MissingValuePolicy> {
    vec![
        MissingValuePolicy::NoOp,
        MissingValuePolicy::DropRows,
        MissingValuePolicy::DropColumns,
        MissingValuePolicy::FillNumeric(NumericFillPlan::new(NumericFill::Mean)),
        MissingValuePolicy::FillCategorical,
        MissingValuePolicy::FillAll(NumericFillPlan::new(NumericFill::Median)),
    ]
}

// ============================================================================
// Missing Counts
// ============================================================================

#[test]
fn test_count_missing_fixture() {
    let df = load_fixture("people.csv");
    let counts = MissingValueResolver::default().count_missing(&df).unwrap();

    let pairs: Vec<(&str, usize)> = counts.iter().collect();
    assert_eq!(
        pairs,
        vec![
            ("id", 0),
            ("age", 2),
            ("income", 1),
            ("city", 2),
            ("member", 1)
        ]
    );
    assert_eq!(counts.total(), 6);
    assert_eq!(counts.columns_with_missing(), vec!["age", "income", "city", "member"]);
}

#[test]
fn test_count_missing_counts_nan() {
    let df = df!["age" => [25.0, f64::NAN, 30.0, f64::NAN, 40.0]].unwrap();
    let counts = MissingValueResolver::default().count_missing(&df).unwrap();
    assert_eq!(counts.get("age"), Some(2));
}

// ============================================================================
// Policies
// ============================================================================

#[test]
fn test_fill_numeric_mean_fixture() {
    let df = load_fixture("people.csv");
    let policy = MissingValuePolicy::FillNumeric(NumericFillPlan::new(NumericFill::Mean));
    let out = MissingValueResolver::default().apply(&df, &policy).unwrap();

    let age = floats(&out, "age");
    let expected = (25.0 + 30.0 + 40.0) / 3.0;
    assert!((age[1].unwrap() - expected).abs() < 1e-9);
    assert!((age[3].unwrap() - expected).abs() < 1e-9);
    assert_eq!(age[0], Some(25.0));
    assert_eq!(floats(&out, "income")[2], Some(60250.0));

    // Non-numeric columns are untouched
    assert_eq!(strings(&out, "city"), strings(&df, "city"));
}

#[test]
fn test_fill_numeric_per_column_override() {
    let df = load_fixture("people.csv");
    let plan = NumericFillPlan::new(NumericFill::Mean).column("income", NumericFill::Median);
    let out = MissingValueResolver::default()
        .apply(&df, &MissingValuePolicy::FillNumeric(plan))
        .unwrap();

    assert_eq!(floats(&out, "income")[2], Some(60000.0));
}

#[test]
fn test_fill_categorical_fixture() {
    let df = load_fixture("people.csv");
    let out = MissingValueResolver::default()
        .apply(&df, &MissingValuePolicy::FillCategorical)
        .unwrap();

    let city: Vec<Option<String>> = ["NY", "LA", "NY", "NY", "NY"]
        .iter()
        .map(|s| Some(s.to_string()))
        .collect();
    assert_eq!(strings(&out, "city"), city);
    // "true" and "false" tie; "true" is seen first
    assert_eq!(strings(&out, "member")[3].as_deref(), Some("true"));
    assert_eq!(floats(&out, "age")[1], None);
}

#[test]
fn test_drop_rows_keeps_order() {
    let df = load_fixture("orders.csv");
    let out = MissingValueResolver::default()
        .apply(&df, &MissingValuePolicy::DropRows)
        .unwrap();

    assert_eq!(out.height(), 4);
    assert_eq!(out.width(), 4);
    assert_eq!(
        floats(&out, "order_id"),
        vec![Some(101.0), Some(102.0), Some(104.0), Some(105.0)]
    );
}

#[test]
fn test_drop_columns_fixture() {
    let df = load_fixture("people.csv");
    let resolver = MissingValueResolver::default();
    let out = resolver
        .apply(&df, &MissingValuePolicy::DropColumns)
        .unwrap();

    let names: Vec<String> = out
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["id"]);
    assert_eq!(out.height(), 5);
    assert!(resolver.count_missing(&out).unwrap().is_clean());
}

#[test]
fn test_no_op_returns_input() {
    let df = load_fixture("people.csv");
    let out = MissingValueResolver::default()
        .apply(&df, &MissingValuePolicy::NoOp)
        .unwrap();
    assert!(out.equals_missing(&df));
}

#[test]
fn test_policies_idempotent_on_fixtures() {
    let resolver = MissingValueResolver::default();
    for fixture in ["people.csv", "orders.csv"] {
        let df = load_fixture(fixture);
        for policy in all_policies() {
            let once = resolver.apply(&df, &policy).unwrap();
            let twice = resolver.apply(&once, &policy).unwrap();
            assert!(
                twice.equals_missing(&once),
                "{} is not idempotent on {}",
                policy.name(),
                fixture
            );
        }
    }
}

#[test]
fn test_fill_all_then_write_and_reload() {
    let df = load_fixture("people.csv");
    let resolver = MissingValueResolver::default();
    let mut out = resolver
        .apply(&df, &MissingValuePolicy::FillAll(NumericFillPlan::default()))
        .unwrap();
    assert!(resolver.count_missing(&out).unwrap().is_clean());

    let path = temp_dir("reload").join("people_cleaned.csv");
    write_csv(&mut out, &path).unwrap();
    let reloaded = load_csv(&path, 100).unwrap();

    assert_eq!(reloaded.shape(), (5, 5));
    assert!(resolver.count_missing(&reloaded).unwrap().is_clean());
}

#[test]
fn test_all_missing_numeric_column() {
    let df = df![
        "empty" => [Option::<f64>::None, None, None],
        "value" => [Some(1.0), None, Some(3.0)],
    ]
    .unwrap();
    let policy = MissingValuePolicy::FillNumeric(NumericFillPlan::default());

    let err = MissingValueResolver::default()
        .apply(&df, &policy)
        .unwrap_err();
    assert!(err.is_computation());
    assert!(err.to_string().contains("empty"));

    let lenient = MissingValueResolver::new(
        EdaConfig::builder()
            .all_missing(AllMissingStrategy::LeaveMissing)
            .build()
            .unwrap(),
    );
    let resolution = lenient.apply_with_steps(&df, &policy).unwrap();
    assert_eq!(resolution.data.column("empty").unwrap().null_count(), 3);
    assert_eq!(floats(&resolution.data, "value")[1], Some(2.0));
    assert!(resolution.steps.iter().any(|s| s.contains("Left 'empty' missing")));
}

#[test]
fn test_nested_column_is_invalid_dataset() {
    let list = Series::new(
        "tags".into(),
        [
            Series::new("".into(), &["a", "b"]),
            Series::new("".into(), &["c"]),
        ],
    );
    let df = DataFrame::new(vec![list.into()]).unwrap();

    for policy in all_policies() {
        let err = MissingValueResolver::default()
            .apply(&df, &policy)
            .unwrap_err();
        assert!(matches!(err, EdaError::InvalidDataset(_)));
    }
}

#[test]
fn test_zero_row_dataset() {
    let df = df![
        "a" => Vec::<f64>::new(),
        "b" => Vec::<String>::new(),
    ]
    .unwrap();
    let resolver = MissingValueResolver::default();

    for policy in all_policies() {
        let out = resolver.apply(&df, &policy).unwrap();
        assert_eq!(out.height(), 0, "{}", policy.name());
    }
}

// ============================================================================
// Analysis and Reporting
// ============================================================================

#[test]
fn test_analysis_on_fixture() {
    let df = load_fixture("orders.csv");

    let descriptions = describe(&df).unwrap();
    assert_eq!(descriptions.len(), 4);
    let ColumnDescription::Numeric(quantity) = &descriptions[1] else {
        panic!("quantity should be numeric");
    };
    assert_eq!(quantity.count, 4);
    assert_eq!(quantity.missing, 1);
    assert_eq!(quantity.mean, Some(2.5));

    let regions = value_counts(&df, "region").unwrap();
    assert_eq!(regions[0].value, "north");
    assert_eq!(regions[1].value, "south");
    assert_eq!(regions[2].value, "east");

    let matrix = correlation_matrix(&df).unwrap().unwrap();
    assert_eq!(matrix.columns, vec!["order_id", "quantity", "price"]);

    let sample = pairplot_sample(&df, &EdaConfig::default()).unwrap().unwrap();
    assert_eq!(sample.shape(), (5, 3));
}

#[test]
fn test_report_end_to_end() {
    let df = load_fixture("people.csv");
    let dir = temp_dir("report");
    let config = EdaConfig::builder().output_dir(&dir).build().unwrap();
    let policy = MissingValuePolicy::FillAll(NumericFillPlan::default());

    let resolution = MissingValueResolver::new(config.clone())
        .apply_with_steps(&df, &policy)
        .unwrap();
    let generator = ReportGenerator::new(config);
    let report = generator
        .build_report(ReportParams {
            input_file: "people.csv",
            output_file: None,
            policy: &policy,
            original_df: &df,
            final_df: &resolution.data,
            processing_steps: &resolution.steps,
        })
        .unwrap();

    assert_eq!(report.missing_before.total(), 6);
    assert_eq!(report.missing_after.total(), 0);
    assert_eq!(report.processing_steps.len(), 4);
    assert_eq!(report.shape_after, (5, 5));

    let path = generator.write_report_to_file(&report, "people").unwrap();
    assert!(path.ends_with("people_report.json"));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["missing_before"]["rows"], 5);
}
