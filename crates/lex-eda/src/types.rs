use crate::error::{EdaError, Result};
use crate::utils::{is_numeric_dtype, is_scalar_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Column classification
// ============================================================================

/// Kind of values a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// Text, categories, booleans, dates and other scalar values
    Categorical,
}

impl ColumnKind {
    /// Classify a dtype, `None` for nested or object dtypes.
    pub fn of(dtype: &DataType) -> Option<Self> {
        if is_numeric_dtype(dtype) {
            Some(ColumnKind::Numeric)
        } else if is_scalar_dtype(dtype) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    /// Classify a column of `df`.
    pub fn of_column(df: &DataFrame, name: &str) -> Result<Self> {
        let column = df
            .column(name)
            .map_err(|_| EdaError::ColumnNotFound(name.to_string()))?;
        Self::of(column.dtype()).ok_or_else(|| {
            EdaError::InvalidDataset(format!(
                "column '{}' has unsupported type {}",
                name,
                column.dtype()
            ))
        })
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Names of the columns of `kind`, in column order.
pub fn columns_of_kind(df: &DataFrame, kind: ColumnKind) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| ColumnKind::of(col.dtype()) == Some(kind))
        .map(|col| col.name().to_string())
        .collect()
}

// ============================================================================
// Missing value counts
// ============================================================================

/// Missing cells in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing_count: usize,
    pub missing_percentage: f64,
}

/// Missing-cell counts per column, in column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MissingCounts {
    pub rows: usize,
    pub columns: Vec<ColumnMissing>,
}

impl MissingCounts {
    pub(crate) fn push(&mut self, column: impl Into<String>, missing_count: usize) {
        let missing_percentage = if self.rows > 0 {
            (missing_count as f64 / self.rows as f64) * 100.0
        } else {
            0.0
        };
        self.columns.push(ColumnMissing {
            column: column.into(),
            missing_count,
            missing_percentage,
        });
    }

    /// Missing count for `column`, `None` if the column is unknown.
    pub fn get(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing_count)
    }

    /// Total missing cells across all columns.
    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.missing_count).sum()
    }

    /// True when no column has a missing value.
    pub fn is_clean(&self) -> bool {
        self.columns.iter().all(|c| c.missing_count == 0)
    }

    /// Names of columns with at least one missing value.
    pub fn columns_with_missing(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.missing_count > 0)
            .map(|c| c.column.as_str())
            .collect()
    }

    /// Iterate `(column, missing_count)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.column.as_str(), c.missing_count))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ============================================================================
// Analysis results
// ============================================================================

/// Shape, column split and preview of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    /// First rows, row-major, `None` where missing.
    pub preview: Vec<Vec<Option<String>>>,
}

/// Summary statistics of one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnDescription {
    Numeric(NumericDescription),
    Categorical(CategoricalDescription),
}

impl ColumnDescription {
    pub fn column(&self) -> &str {
        match self {
            ColumnDescription::Numeric(d) => &d.column,
            ColumnDescription::Categorical(d) => &d.column,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericDescription {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalDescription {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: Option<usize>,
}

/// Pearson correlation between numeric columns.
///
/// `values[i][j]` is `None` when the coefficient is undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between two named columns.
    pub fn get(&self, x: &str, y: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == x)?;
        let j = self.columns.iter().position(|c| c == y)?;
        self.values[i][j]
    }
}

/// Five-number summary with whiskers, as drawn by a box plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
}

/// A value outside the whiskers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierPoint {
    pub row: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub column: String,
    pub count: usize,
    pub box_plot: BoxSummary,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub outliers: Vec<OutlierPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub skewness: f64,
    pub histogram: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

/// Numeric values of one category, for box and violin plots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub category: String,
    pub count: usize,
    pub mean: f64,
    pub box_plot: BoxSummary,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterData {
    pub x_column: String,
    pub y_column: String,
    pub color_column: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Option<Vec<Option<String>>>,
}
