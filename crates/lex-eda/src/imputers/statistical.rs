//! Statistical imputation methods.
//!
//! Provides mean, median and mode fills for single columns.

use crate::config::{AllMissingStrategy, NumericFill};
use crate::error::{EdaError, Result};
use crate::utils::{frequency_table, present_mask, string_options};
use polars::prelude::*;
use tracing::{debug, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Mean of the present values, `None` if there are none.
    pub fn numeric_mean(series: &Series) -> PolarsResult<Option<f64>> {
        Ok(Self::present_values(series)?.mean())
    }

    /// Median of the present values, `None` if there are none.
    pub fn numeric_median(series: &Series) -> PolarsResult<Option<f64>> {
        Ok(Self::present_values(series)?.median())
    }

    /// Fill statistic for `strategy`.
    pub fn numeric_statistic(series: &Series, strategy: NumericFill) -> PolarsResult<Option<f64>> {
        match strategy {
            NumericFill::Mean => Self::numeric_mean(series),
            NumericFill::Median => Self::numeric_median(series),
        }
    }

    /// `series` with NaN cells turned into nulls so aggregations skip them.
    fn present_values(series: &Series) -> PolarsResult<Series> {
        let nulls = Series::full_null(series.name().clone(), series.len(), series.dtype());
        series.zip_with(&present_mask(series)?, &nulls)
    }

    /// Row of the first occurrence of the most frequent present value.
    ///
    /// Ties resolve to the value encountered first.
    pub fn mode_index(series: &Series) -> PolarsResult<Option<usize>> {
        let values = string_options(series)?;
        Ok(frequency_table(&values).first().map(|f| f.first_index))
    }

    /// Whether every value of `series` survives a cast to `Float64` unchanged.
    ///
    /// Always true for float columns; integer columns fail once a value is
    /// beyond 2^53 in magnitude and not representable.
    pub fn widens_exactly(series: &Series) -> PolarsResult<bool> {
        if !series.dtype().is_integer() {
            return Ok(true);
        }
        let round_trip = series.cast(&DataType::Float64)?.cast(series.dtype())?;
        Ok(round_trip.equals_missing(series))
    }

    /// Replace missing cells of a numeric Series with `fill_value`.
    ///
    /// The result is `Float64`. Only missing cells are written; present
    /// values are carried over by the cast, so callers check
    /// [`Self::widens_exactly`] first for integer columns.
    pub fn fill_numeric(series: &Series, fill_value: f64) -> PolarsResult<Series> {
        let widened = series.cast(&DataType::Float64)?;
        let fill = Series::new(series.name().clone(), vec![fill_value; series.len()]);
        widened.zip_with(&present_mask(series)?, &fill)
    }

    /// Replace missing cells with the cell at `source_index`, keeping the dtype.
    pub fn fill_from_index(series: &Series, source_index: usize) -> PolarsResult<Series> {
        let fill = series.new_from_index(source_index, series.len());
        series.zip_with(&present_mask(series)?, &fill)
    }

    /// Fill a numeric column with its mean or median.
    ///
    /// A statistic that comes out NaN (present values include both `+inf`
    /// and `-inf`) is handled like an all-missing column. Infinite
    /// statistics are valid fills.
    pub fn apply_numeric_fill(
        df: &mut DataFrame,
        col_name: &str,
        strategy: NumericFill,
        on_all_missing: AllMissingStrategy,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = df
            .column(col_name)
            .map_err(|_| EdaError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        if !Self::widens_exactly(&series)? {
            return Err(EdaError::Computation {
                column: col_name.to_string(),
                statistic: strategy.to_string(),
                reason: format!(
                    "{} values cannot be converted to Float64 without loss",
                    series.dtype()
                ),
            });
        }

        let fill_value = match Self::numeric_statistic(&series, strategy)? {
            Some(value) if value.is_nan() => {
                return Self::handle_unfillable(
                    col_name,
                    &strategy.to_string(),
                    "values include both +inf and -inf",
                    on_all_missing,
                    processing_steps,
                );
            }
            Some(value) => value,
            None => {
                return Self::handle_unfillable(
                    col_name,
                    &strategy.to_string(),
                    "column has no non-missing values",
                    on_all_missing,
                    processing_steps,
                );
            }
        };

        let filled = Self::fill_numeric(&series, fill_value)?;
        df.replace(col_name, filled)?;

        debug!("Filled '{}' with {}: {}", col_name, strategy, fill_value);
        processing_steps.push(format!(
            "Filled '{}' with {}: {:.2}",
            col_name, strategy, fill_value
        ));
        Ok(())
    }

    /// Fill a non-numeric column with its mode.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        on_all_missing: AllMissingStrategy,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = df
            .column(col_name)
            .map_err(|_| EdaError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let mode = frequency_table(&string_options(&series)?).into_iter().next();
        match mode {
            Some(mode) => {
                let (mode_val, idx) = (mode.value, mode.first_index);
                let filled = Self::fill_from_index(&series, idx)?;
                df.replace(col_name, filled)?;

                debug!("Filled '{}' with mode: {}", col_name, mode_val);
                processing_steps.push(format!("Filled '{}' with mode: {}", col_name, mode_val));
                Ok(())
            }
            None => Self::handle_unfillable(
                col_name,
                "mode",
                "column has no non-missing values",
                on_all_missing,
                processing_steps,
            ),
        }
    }

    fn handle_unfillable(
        col_name: &str,
        statistic: &str,
        reason: &str,
        on_all_missing: AllMissingStrategy,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        match on_all_missing {
            AllMissingStrategy::Error => Err(EdaError::Computation {
                column: col_name.to_string(),
                statistic: statistic.to_string(),
                reason: reason.to_string(),
            }),
            AllMissingStrategy::LeaveMissing => {
                warn!(
                    "Cannot compute {} for '{}' ({}); leaving it missing",
                    statistic, col_name, reason
                );
                processing_steps.push(format!(
                    "Left '{}' missing: {}",
                    col_name, reason
                ));
                Ok(())
            }
        }
    }
}
