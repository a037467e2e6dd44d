use super::column_of_kind;
use crate::error::{EdaError, Result};
use crate::resolver::validate_dataset;
use crate::types::{
    CategoricalDescription, CategoryCount, ColumnDescription, ColumnKind, DatasetOverview,
    NumericDescription, columns_of_kind,
};
use crate::utils::{
    count_missing_values, frequency_table, mean, present_f64_values, quantile_sorted, sample_std,
    sorted_values, string_options,
};
use polars::prelude::*;

/// Shape, numeric/categorical split and the first `preview_rows` rows.
pub fn overview(df: &DataFrame, preview_rows: usize) -> Result<DatasetOverview> {
    validate_dataset(df)?;

    let head = df.head(Some(preview_rows));
    let rendered = head
        .get_columns()
        .iter()
        .map(|col| string_options(col.as_materialized_series()))
        .collect::<PolarsResult<Vec<_>>>()?;
    let preview = (0..head.height())
        .map(|row| rendered.iter().map(|col| col[row].clone()).collect())
        .collect();

    Ok(DatasetOverview {
        rows: df.height(),
        columns: df.width(),
        column_names: df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        numeric_columns: columns_of_kind(df, ColumnKind::Numeric),
        categorical_columns: columns_of_kind(df, ColumnKind::Categorical),
        preview,
    })
}

/// Summary statistics for every column, in column order.
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnDescription>> {
    validate_dataset(df)?;

    let mut descriptions = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let series = col.as_materialized_series();
        let column = col.name().to_string();
        let missing = count_missing_values(series)?;

        let description = match ColumnKind::of(col.dtype()) {
            Some(ColumnKind::Numeric) => {
                let sorted = sorted_values(&present_f64_values(series)?);
                let quantile = |q: f64| (!sorted.is_empty()).then(|| quantile_sorted(&sorted, q));
                ColumnDescription::Numeric(NumericDescription {
                    count: sorted.len(),
                    missing,
                    mean: mean(&sorted),
                    std: sample_std(&sorted),
                    min: sorted.first().copied(),
                    q1: quantile(0.25),
                    median: quantile(0.5),
                    q3: quantile(0.75),
                    max: sorted.last().copied(),
                    column,
                })
            }
            Some(ColumnKind::Categorical) => {
                let table = frequency_table(&string_options(series)?);
                let top = table.first();
                ColumnDescription::Categorical(CategoricalDescription {
                    count: series.len() - missing,
                    missing,
                    unique: table.len(),
                    top: top.map(|f| f.value.clone()),
                    freq: top.map(|f| f.count),
                    column,
                })
            }
            None => {
                return Err(EdaError::InvalidDataset(format!(
                    "column '{}' has unsupported type {}",
                    column,
                    col.dtype()
                )));
            }
        };
        descriptions.push(description);
    }
    Ok(descriptions)
}

/// Value counts of a categorical column, most frequent first.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<CategoryCount>> {
    let series = column_of_kind(df, column, ColumnKind::Categorical)?;
    let table = frequency_table(&string_options(series)?);
    let present: usize = table.iter().map(|f| f.count).sum();

    Ok(table
        .into_iter()
        .map(|f| CategoryCount {
            percentage: (f.count as f64 / present as f64) * 100.0,
            value: f.value,
            count: f.count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df![
            "age" => [Some(25.0), Some(f64::NAN), Some(30.0), None, Some(40.0)],
            "city" => [Some("NY"), Some("LA"), None, Some("NY"), None],
        ]
        .unwrap()
    }

    #[test]
    fn test_overview() {
        let overview = overview(&sample_df(), 2).unwrap();
        assert_eq!(overview.rows, 5);
        assert_eq!(overview.columns, 2);
        assert_eq!(overview.numeric_columns, vec!["age"]);
        assert_eq!(overview.categorical_columns, vec!["city"]);
        assert_eq!(overview.preview.len(), 2);
        assert_eq!(overview.preview[0][1], Some("NY".to_string()));
        assert_eq!(overview.preview[1][0], None);
    }

    #[test]
    fn test_describe_numeric() {
        let descriptions = describe(&sample_df()).unwrap();
        let ColumnDescription::Numeric(age) = &descriptions[0] else {
            panic!("age should be numeric");
        };
        assert_eq!(age.count, 3);
        assert_eq!(age.missing, 2);
        assert_eq!(age.min, Some(25.0));
        assert_eq!(age.median, Some(30.0));
        assert_eq!(age.q1, Some(27.5));
        assert_eq!(age.max, Some(40.0));
    }

    #[test]
    fn test_describe_categorical() {
        let descriptions = describe(&sample_df()).unwrap();
        let ColumnDescription::Categorical(city) = &descriptions[1] else {
            panic!("city should be categorical");
        };
        assert_eq!(city.count, 3);
        assert_eq!(city.missing, 2);
        assert_eq!(city.unique, 2);
        assert_eq!(city.top.as_deref(), Some("NY"));
        assert_eq!(city.freq, Some(2));
    }

    #[test]
    fn test_describe_all_missing_numeric() {
        let df = df!["v" => [Option::<f64>::None, None]].unwrap();
        let descriptions = describe(&df).unwrap();
        let ColumnDescription::Numeric(v) = &descriptions[0] else {
            panic!("v should be numeric");
        };
        assert_eq!(v.count, 0);
        assert_eq!(v.mean, None);
        assert_eq!(v.q3, None);
    }

    #[test]
    fn test_value_counts() {
        let counts = value_counts(&sample_df(), "city").unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].value, "NY");
        assert_eq!(counts[0].count, 2);
        assert!((counts[0].percentage - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_counts_numeric_column() {
        assert!(matches!(
            value_counts(&sample_df(), "age"),
            Err(EdaError::WrongColumnKind { .. })
        ));
    }
}
