//! Shared utilities for resolution and analysis.
//!
//! A cell is *missing* when it is null, or NaN in a float column. Every
//! helper here applies that rule so counts, fills and statistics agree.

use polars::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds one scalar per cell.
#[inline]
pub fn is_scalar_dtype(dtype: &DataType) -> bool {
    !(dtype.is_nested() || dtype.is_object())
}

// =============================================================================
// Missing Value Utilities
// =============================================================================

/// Per-row missing flags for a Series.
pub fn missing_mask(series: &Series) -> PolarsResult<Vec<bool>> {
    if is_numeric_dtype(series.dtype()) {
        Ok(f64_options(series)?.iter().map(Option::is_none).collect())
    } else {
        Ok(series
            .is_null()
            .into_iter()
            .map(|v| v.unwrap_or(true))
            .collect())
    }
}

/// Per-row presence flags, the inverse of [`missing_mask`].
pub fn present_mask(series: &Series) -> PolarsResult<BooleanChunked> {
    let present: Vec<bool> = missing_mask(series)?.into_iter().map(|m| !m).collect();
    Ok(BooleanChunked::from_slice(series.name().clone(), &present))
}

/// Count missing cells in a Series.
pub fn count_missing_values(series: &Series) -> PolarsResult<usize> {
    Ok(missing_mask(series)?.into_iter().filter(|m| *m).count())
}

/// Numeric values as `f64`, with null and NaN both mapped to `None`.
pub fn f64_options(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Present numeric values in row order.
pub fn present_f64_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(f64_options(series)?.into_iter().flatten().collect())
}

/// Values rendered as strings, `None` where missing.
pub fn string_options(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let mask = missing_mask(series)?;
    let as_str = series.cast(&DataType::String)?;
    Ok(as_str
        .str()?
        .into_iter()
        .zip(mask)
        .map(|(value, missing)| {
            if missing {
                None
            } else {
                value.map(str::to_string)
            }
        })
        .collect())
}

// =============================================================================
// Frequency Utilities
// =============================================================================

/// One distinct value with its count and the row of its first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency {
    pub value: String,
    pub count: usize,
    pub first_index: usize,
}

/// Count distinct present values.
///
/// Sorted by count descending; equal counts keep first-encountered order.
pub fn frequency_table(values: &[Option<String>]) -> Vec<Frequency> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, value) in values.iter().enumerate() {
        if let Some(value) = value {
            counts.entry(value.as_str()).or_insert((0, idx)).0 += 1;
        }
    }

    let mut table: Vec<Frequency> = counts
        .into_iter()
        .map(|(value, (count, first_index))| Frequency {
            value: value.to_string(),
            count,
            first_index,
        })
        .collect();
    table.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.first_index.cmp(&b.first_index))
    });
    table
}

// =============================================================================
// Slice Statistics Utilities
// =============================================================================

/// Sort a slice of finite floats ascending.
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile_sorted(values: &[f64], quantile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return values[lower];
    }
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().mean())
}

/// Sample standard deviation (n - 1), `None` with fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    (values.len() >= 2).then(|| values.iter().std_dev())
}

/// Skewness as the third standardized moment; 0.0 for constant data.
pub fn skewness(values: &[f64]) -> f64 {
    let (Some(mean), Some(std)) = (mean(values), sample_std(values)) else {
        return 0.0;
    };
    if std == 0.0 {
        return 0.0;
    }
    let n = values.len() as f64;
    values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / n
}

// =============================================================================
// Tests
// =============================================================================
