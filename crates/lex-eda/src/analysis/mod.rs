//! Exploratory analysis of a dataset.
//!
//! Every function here reads a `&DataFrame` and returns plain serializable
//! structures that a charting layer can draw directly: summary tables,
//! correlation heatmaps, box plots, histograms, bar charts, scatter plots and
//! a pairplot sample. Nothing is mutated.

mod numeric;
mod relations;
mod summary;

pub use numeric::{correlation_matrix, distribution, outlier_summary};
pub use relations::{category_vs_numeric, pairplot_sample, scatter};
pub use summary::{describe, overview, value_counts};

use crate::error::{EdaError, Result};
use crate::types::ColumnKind;
use polars::prelude::*;

/// Look up `name` and check it holds values of `kind`.
fn column_of_kind<'a>(df: &'a DataFrame, name: &str, kind: ColumnKind) -> Result<&'a Series> {
    let column = df
        .column(name)
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))?;
    if ColumnKind::of(column.dtype()) != Some(kind) {
        return Err(EdaError::WrongColumnKind {
            column: name.to_string(),
            expected: kind.to_string(),
        });
    }
    Ok(column.as_materialized_series())
}

fn no_values(column: &str, statistic: &str) -> EdaError {
    EdaError::Computation {
        column: column.to_string(),
        statistic: statistic.to_string(),
        reason: "column has no non-missing values".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_of_kind() {
        let df = df![
            "age" => [1.0, 2.0],
            "city" => ["NY", "LA"],
        ]
        .unwrap();

        assert!(column_of_kind(&df, "age", ColumnKind::Numeric).is_ok());
        assert!(matches!(
            column_of_kind(&df, "city", ColumnKind::Numeric),
            Err(EdaError::WrongColumnKind { ref expected, .. }) if expected == "numeric"
        ));
        assert!(matches!(
            column_of_kind(&df, "zip", ColumnKind::Categorical),
            Err(EdaError::ColumnNotFound(_))
        ));
    }
}
