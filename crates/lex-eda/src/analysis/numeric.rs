use super::{column_of_kind, no_values};
use crate::error::Result;
use crate::types::{
    BoxSummary, ColumnKind, CorrelationMatrix, Distribution, HistogramBin, OutlierPoint,
    OutlierSummary, columns_of_kind,
};
use crate::utils::{f64_options, mean, quantile_sorted, sample_std, skewness, sorted_values};
use polars::prelude::*;
use statrs::statistics::Statistics;
use tracing::debug;

/// Pearson correlation between every pair of numeric columns.
///
/// Each pair uses the rows where both values are present. Returns `None`
/// when the dataset has fewer than two numeric columns.
pub fn correlation_matrix(df: &DataFrame) -> Result<Option<CorrelationMatrix>> {
    let numeric_columns = columns_of_kind(df, ColumnKind::Numeric);
    if numeric_columns.len() < 2 {
        debug!("Skipping correlation: {} numeric columns", numeric_columns.len());
        return Ok(None);
    }

    let mut series_values: Vec<Vec<Option<f64>>> = Vec::with_capacity(numeric_columns.len());
    for name in &numeric_columns {
        series_values.push(f64_options(df.column(name)?.as_materialized_series())?);
    }

    let size = numeric_columns.len();
    let mut values = vec![vec![None; size]; size];
    for i in 0..size {
        for j in i..size {
            let mut x = Vec::new();
            let mut y = Vec::new();
            for (a, b) in series_values[i].iter().zip(series_values[j].iter()) {
                if let (Some(a), Some(b)) = (a, b) {
                    x.push(*a);
                    y.push(*b);
                }
            }

            let estimate = pearson(&x, &y);
            values[i][j] = estimate;
            values[j][i] = estimate;
        }
    }

    Ok(Some(CorrelationMatrix {
        columns: numeric_columns,
        values,
    }))
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() < 2 {
        return None;
    }
    let sx = x.iter().std_dev();
    let sy = y.iter().std_dev();
    if sx == 0.0 || sy == 0.0 || !sx.is_finite() || !sy.is_finite() {
        return None;
    }
    let r = x.iter().covariance(y.iter()) / (sx * sy);
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Box-plot summary and IQR outliers of a numeric column.
pub fn outlier_summary(
    df: &DataFrame,
    column: &str,
    iqr_multiplier: f64,
) -> Result<OutlierSummary> {
    let series = column_of_kind(df, column, ColumnKind::Numeric)?;
    let indexed: Vec<(usize, f64)> = f64_options(series)?
        .into_iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|v| (row, v)))
        .collect();
    let values: Vec<f64> = indexed.iter().map(|(_, v)| *v).collect();

    let (box_plot, lower_fence, upper_fence) =
        box_summary(&values, iqr_multiplier).ok_or_else(|| no_values(column, "box plot"))?;

    let outliers: Vec<OutlierPoint> = indexed
        .into_iter()
        .filter(|(_, v)| *v < lower_fence || *v > upper_fence)
        .map(|(row, value)| OutlierPoint { row, value })
        .collect();

    debug!("Column '{}': {} outliers", column, outliers.len());
    Ok(OutlierSummary {
        column: column.to_string(),
        count: values.len(),
        box_plot,
        lower_fence,
        upper_fence,
        outliers,
    })
}

/// Five-number summary plus whiskers, and the `(lower, upper)` IQR fences.
pub(super) fn box_summary(values: &[f64], iqr_multiplier: f64) -> Option<(BoxSummary, f64, f64)> {
    let sorted = sorted_values(values);
    let (min, max) = (*sorted.first()?, *sorted.last()?);

    let q1 = quantile_sorted(&sorted, 0.25);
    let median = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - iqr_multiplier * iqr;
    let upper_fence = q3 + iqr_multiplier * iqr;

    // Whiskers reach the most extreme values inside the fences
    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|v| *v >= lower_fence)
        .unwrap_or(min);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= upper_fence)
        .unwrap_or(max);

    Some((
        BoxSummary {
            min,
            q1,
            median,
            q3,
            max,
            lower_whisker,
            upper_whisker,
        },
        lower_fence,
        upper_fence,
    ))
}

/// Histogram and shape statistics of a numeric column.
pub fn distribution(df: &DataFrame, column: &str, bins: usize) -> Result<Distribution> {
    let series = column_of_kind(df, column, ColumnKind::Numeric)?;
    let sorted = sorted_values(&f64_options(series)?.into_iter().flatten().collect::<Vec<_>>());
    let mean = mean(&sorted).ok_or_else(|| no_values(column, "distribution"))?;

    Ok(Distribution {
        column: column.to_string(),
        count: sorted.len(),
        mean,
        std: sample_std(&sorted),
        skewness: skewness(&sorted),
        histogram: build_histogram(&sorted, bins),
    })
}

/// Equal-width histogram of ascending `values`.
fn build_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.first().copied().unwrap_or(0.0);
    let max = values.last().copied().unwrap_or(min);
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let bin_count = bins.max(1);
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];

    for value in values {
        let index = (((value - min) / width) as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: min + (idx as f64 + 1.0) * width,
            count,
        })
        .collect()
}
