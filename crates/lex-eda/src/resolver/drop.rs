//! Row and column removal policies.

use crate::error::{Result, ResultExt};
use crate::types::MissingCounts;
use crate::utils::missing_mask;
use polars::prelude::*;
use tracing::debug;

/// Keep only rows with no missing cell, preserving row order.
pub(super) fn drop_rows(df: &DataFrame, steps: &mut Vec<String>) -> Result<DataFrame> {
    let before_rows = df.height();
    if df.width() == 0 || before_rows == 0 {
        steps.push("No rows with missing values found".to_string());
        return Ok(df.clone());
    }

    let mut keep = vec![true; before_rows];
    for col in df.get_columns() {
        let mask = missing_mask(col.as_materialized_series())
            .context(format!("Scanning '{}' for missing values", col.name()))?;
        for (keep, missing) in keep.iter_mut().zip(mask) {
            *keep &= !missing;
        }
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let out = df.filter(&mask)?;

    let rows_removed = before_rows - out.height();
    if rows_removed > 0 {
        let pct = (rows_removed as f64 / before_rows as f64) * 100.0;
        steps.push(format!(
            "Removed {} rows with missing values ({:.1}%)",
            rows_removed, pct
        ));
        debug!("Removed {} rows with missing values", rows_removed);
    } else {
        steps.push("No rows with missing values found".to_string());
    }
    Ok(out)
}

/// Remove every column with at least one missing cell.
pub(super) fn drop_columns(
    df: &DataFrame,
    counts: &MissingCounts,
    steps: &mut Vec<String>,
) -> Result<DataFrame> {
    let incomplete = counts.columns_with_missing();
    if incomplete.is_empty() {
        steps.push("No columns with missing values found".to_string());
        return Ok(df.clone());
    }

    let cols_ref: Vec<PlSmallStr> = incomplete.iter().map(|s| (*s).into()).collect();
    let out = df.drop_many(cols_ref);

    steps.push(format!(
        "Removed {} columns with missing values: {:?}",
        incomplete.len(),
        incomplete
    ));
    debug!("Removed {} columns with missing values", incomplete.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_rows_keeps_order() {
        let df = df![
            "id" => [1i64, 2, 3, 4, 5],
            "v" => [Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let out = drop_rows(&df, &mut steps).unwrap();
        let ids: Vec<Option<i64>> = out
            .column("id")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(4), Some(5)]);
        assert!(steps[0].contains("Removed 1 rows"));
    }

    #[test]
    fn test_drop_rows_treats_nan_as_missing() {
        let df = df!["v" => [1.0, f64::NAN, 3.0]].unwrap();
        let mut steps = Vec::new();
        assert_eq!(drop_rows(&df, &mut steps).unwrap().height(), 2);
    }

    #[test]
    fn test_drop_rows_zero_rows() {
        let df = df!["v" => Vec::<f64>::new()].unwrap();
        let mut steps = Vec::new();
        let out = drop_rows(&df, &mut steps).unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(out.width(), 1);
    }

    #[test]
    fn test_drop_columns_noop_when_complete() {
        let df = df!["a" => [1i64, 2]].unwrap();
        let mut counts = MissingCounts {
            rows: 2,
            columns: Vec::new(),
        };
        counts.push("a", 0);
        let mut steps = Vec::new();

        let out = drop_columns(&df, &counts, &mut steps).unwrap();
        assert_eq!(out.width(), 1);
        assert_eq!(steps, vec!["No columns with missing values found".to_string()]);
    }
}
