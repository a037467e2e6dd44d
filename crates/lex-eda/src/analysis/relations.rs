use super::column_of_kind;
use super::numeric::box_summary;
use crate::config::EdaConfig;
use crate::error::Result;
use crate::types::{ColumnKind, GroupSummary, ScatterData, columns_of_kind};
use crate::utils::{f64_options, mean, string_options};
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tracing::debug;

/// Per-category distribution of a numeric column, for box and violin plots.
///
/// Groups appear in order of first occurrence. Rows missing either value are
/// skipped.
pub fn category_vs_numeric(
    df: &DataFrame,
    categorical_column: &str,
    numeric_column: &str,
    iqr_multiplier: f64,
) -> Result<Vec<GroupSummary>> {
    let cat_series = column_of_kind(df, categorical_column, ColumnKind::Categorical)?;
    let num_series = column_of_kind(df, numeric_column, ColumnKind::Numeric)?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    for (cat, num) in string_options(cat_series)?
        .into_iter()
        .zip(f64_options(num_series)?)
    {
        if let (Some(cat), Some(num)) = (cat, num) {
            if !groups.contains_key(&cat) {
                order.push(cat.clone());
            }
            groups.entry(cat).or_default().push(num);
        }
    }

    let mut summaries = Vec::with_capacity(order.len());
    for category in order {
        let values = groups.remove(&category).unwrap_or_default();
        let (Some(group_mean), Some((box_plot, _, _))) =
            (mean(&values), box_summary(&values, iqr_multiplier))
        else {
            continue;
        };
        summaries.push(GroupSummary {
            category,
            count: values.len(),
            mean: group_mean,
            box_plot,
            values,
        });
    }
    Ok(summaries)
}

/// Paired points of two numeric columns, optionally labelled by a categorical column.
///
/// Only rows where both coordinates are present are kept.
pub fn scatter(
    df: &DataFrame,
    x_column: &str,
    y_column: &str,
    color_column: Option<&str>,
) -> Result<ScatterData> {
    let x_values = f64_options(column_of_kind(df, x_column, ColumnKind::Numeric)?)?;
    let y_values = f64_options(column_of_kind(df, y_column, ColumnKind::Numeric)?)?;
    let labels = match color_column {
        Some(name) => Some(string_options(column_of_kind(
            df,
            name,
            ColumnKind::Categorical,
        )?)?),
        None => None,
    };

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut color = labels.as_ref().map(|_| Vec::new());
    for (row, (a, b)) in x_values.into_iter().zip(y_values).enumerate() {
        if let (Some(a), Some(b)) = (a, b) {
            x.push(a);
            y.push(b);
            if let (Some(color), Some(labels)) = (color.as_mut(), labels.as_ref()) {
                color.push(labels[row].clone());
            }
        }
    }

    Ok(ScatterData {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        color_column: color_column.map(str::to_string),
        x,
        y,
        color,
    })
}

/// Seeded row sample of the leading numeric columns, for a pairplot.
///
/// Takes at most `pairplot_sample_rows` rows (in original order) of the first
/// `pairplot_max_columns` numeric columns. Returns `None` with fewer than two
/// numeric columns.
pub fn pairplot_sample(df: &DataFrame, config: &EdaConfig) -> Result<Option<DataFrame>> {
    let columns: Vec<String> = columns_of_kind(df, ColumnKind::Numeric)
        .into_iter()
        .take(config.pairplot_max_columns)
        .collect();
    if columns.len() < 2 {
        debug!("Skipping pairplot: {} numeric columns", columns.len());
        return Ok(None);
    }

    let selected = df.select(columns)?;
    let total_rows = selected.height();
    let sample_size = std::cmp::min(config.pairplot_sample_rows, total_rows);
    if sample_size == total_rows {
        return Ok(Some(selected));
    }

    let mut rng = StdRng::seed_from_u64(config.sample_seed);
    let indices: Vec<usize> = (0..total_rows).collect();
    let mut keep = vec![false; total_rows];
    for idx in indices.choose_multiple(&mut rng, sample_size) {
        keep[*idx] = true;
    }

    let mask = BooleanChunked::from_slice("sample".into(), &keep);
    debug!("Sampled {} of {} rows for pairplot", sample_size, total_rows);
    Ok(Some(selected.filter(&mask)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;

    #[test]
    fn test_category_vs_numeric() {
        let df = df![
            "team" => [Some("b"), Some("a"), Some("b"), None, Some("a")],
            "score" => [Some(1.0), Some(10.0), Some(3.0), Some(7.0), None],
        ]
        .unwrap();

        let groups = category_vs_numeric(&df, "team", "score", 1.5).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "b");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].mean, 2.0);
        assert_eq!(groups[0].box_plot.median, 2.0);
        assert_eq!(groups[1].category, "a");
        assert_eq!(groups[1].values, vec![10.0]);
    }

    #[test]
    fn test_category_vs_numeric_wrong_kinds() {
        let df = df!["team" => ["a"], "score" => [1.0]].unwrap();
        assert!(matches!(
            category_vs_numeric(&df, "score", "team", 1.5),
            Err(EdaError::WrongColumnKind { .. })
        ));
    }

    #[test]
    fn test_scatter_with_color() {
        let df = df![
            "x" => [Some(1.0), None, Some(3.0)],
            "y" => [Some(2.0), Some(4.0), Some(6.0)],
            "group" => [Some("a"), Some("b"), None],
        ]
        .unwrap();

        let data = scatter(&df, "x", "y", Some("group")).unwrap();
        assert_eq!(data.x, vec![1.0, 3.0]);
        assert_eq!(data.y, vec![2.0, 6.0]);
        assert_eq!(data.color, Some(vec![Some("a".to_string()), None]));
        assert_eq!(data.color_column.as_deref(), Some("group"));
    }

    #[test]
    fn test_scatter_without_color() {
        let df = df!["x" => [1.0, 2.0], "y" => [3.0, 4.0]].unwrap();
        let data = scatter(&df, "x", "y", None).unwrap();
        assert!(data.color.is_none());
        assert_eq!(data.x.len(), 2);
    }

    #[test]
    fn test_pairplot_sample_is_seeded() {
        let n = 500;
        let df = df![
            "a" => (0..n).map(|v| v as f64).collect::<Vec<_>>(),
            "b" => (0..n).map(|v| (v * 2) as f64).collect::<Vec<_>>(),
            "c" => (0..n).map(|v| (v % 7) as i64).collect::<Vec<_>>(),
            "d" => (0..n).map(|v| (v % 3) as i64).collect::<Vec<_>>(),
            "e" => (0..n).map(|v| (v % 5) as i64).collect::<Vec<_>>(),
            "label" => (0..n).map(|v| format!("row{}", v)).collect::<Vec<_>>(),
        ]
        .unwrap();
        let config = EdaConfig::default();

        let first = pairplot_sample(&df, &config).unwrap().unwrap();
        let second = pairplot_sample(&df, &config).unwrap().unwrap();

        assert_eq!(first.height(), 200);
        assert_eq!(first.width(), 4);
        assert!(first.equals(&second));
        assert!(first.column("e").is_err());
    }

    #[test]
    fn test_pairplot_sample_small_dataset() {
        let df = df!["a" => [1.0, 2.0], "b" => [3.0, 4.0]].unwrap();
        let sample = pairplot_sample(&df, &EdaConfig::default()).unwrap().unwrap();
        assert_eq!(sample.height(), 2);
    }

    #[test]
    fn test_pairplot_sample_needs_two_numeric_columns() {
        let df = df!["a" => [1.0, 2.0], "label" => ["x", "y"]].unwrap();
        assert!(pairplot_sample(&df, &EdaConfig::default()).unwrap().is_none());
    }
}
