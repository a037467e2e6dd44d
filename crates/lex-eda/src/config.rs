//! Configuration and policy types.
//!
//! [`MissingValuePolicy`] selects how missing values are remediated;
//! [`EdaConfig`] holds the knobs shared by the resolver and the analysis
//! functions and is built with a validating builder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Statistic used to fill missing values in a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumericFill {
    /// Use the mean of non-missing values
    #[default]
    Mean,
    /// Use the median of non-missing values
    Median,
}

impl fmt::Display for NumericFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericFill::Mean => write!(f, "mean"),
            NumericFill::Median => write!(f, "median"),
        }
    }
}

/// Numeric fill strategy chosen per column.
///
/// Columns without an override use `default`.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::config::{NumericFill, NumericFillPlan};
///
/// let plan = NumericFillPlan::new(NumericFill::Mean)
///     .column("income", NumericFill::Median);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NumericFillPlan {
    /// Strategy for columns without an override.
    pub default: NumericFill,
    /// Per-column overrides, keyed by column name.
    #[serde(default)]
    pub per_column: BTreeMap<String, NumericFill>,
}

impl NumericFillPlan {
    /// Create a plan that applies `default` to every numeric column.
    pub fn new(default: NumericFill) -> Self {
        Self {
            default,
            per_column: BTreeMap::new(),
        }
    }

    /// Override the strategy for one column.
    pub fn column(mut self, name: impl Into<String>, strategy: NumericFill) -> Self {
        self.per_column.insert(name.into(), strategy);
        self
    }

    /// Strategy to use for `column`.
    pub fn strategy_for(&self, column: &str) -> NumericFill {
        self.per_column.get(column).copied().unwrap_or(self.default)
    }
}

/// Remediation policy for missing values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissingValuePolicy {
    /// Leave the dataset untouched
    #[default]
    NoOp,
    /// Remove every row with at least one missing value
    DropRows,
    /// Remove every column with at least one missing value
    DropColumns,
    /// Fill numeric columns with their mean or median
    FillNumeric(NumericFillPlan),
    /// Fill non-numeric columns with their mode
    FillCategorical,
    /// Fill numeric columns per plan and every other column with its mode
    FillAll(NumericFillPlan),
}

impl MissingValuePolicy {
    /// Short machine-friendly name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            MissingValuePolicy::NoOp => "no_op",
            MissingValuePolicy::DropRows => "drop_rows",
            MissingValuePolicy::DropColumns => "drop_columns",
            MissingValuePolicy::FillNumeric(_) => "fill_numeric",
            MissingValuePolicy::FillCategorical => "fill_categorical",
            MissingValuePolicy::FillAll(_) => "fill_all",
        }
    }

    /// The numeric plan carried by the policy, if any.
    pub fn numeric_plan(&self) -> Option<&NumericFillPlan> {
        match self {
            MissingValuePolicy::FillNumeric(plan) | MissingValuePolicy::FillAll(plan) => {
                Some(plan)
            }
            _ => None,
        }
    }
}

/// What to do when a column that needs filling has no usable fill statistic.
///
/// That is a column with no present values, or a numeric column whose mean
/// or median is NaN because it holds both `+inf` and `-inf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AllMissingStrategy {
    /// Fail the call with a computation error
    #[default]
    Error,
    /// Leave the column missing and record a warning
    LeaveMissing,
}

/// Configuration for resolution and analysis.
///
/// Use [`EdaConfig::builder()`] to create a new configuration with a fluent API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaConfig {
    /// Behavior for fill policies on columns with no present values.
    /// Default: Error
    pub all_missing: AllMissingStrategy,

    /// Number of equal-width bins in distribution histograms.
    /// Default: 20
    pub histogram_bins: usize,

    /// Maximum number of rows sampled for the pairplot.
    /// Default: 200
    pub pairplot_sample_rows: usize,

    /// Maximum number of numeric columns in the pairplot.
    /// Default: 4
    pub pairplot_max_columns: usize,

    /// Seed for the pairplot row sample.
    /// Default: 42
    pub sample_seed: u64,

    /// Number of rows shown in the dataset preview.
    /// Default: 5
    pub preview_rows: usize,

    /// Rows used for CSV schema inference.
    /// Default: 100
    pub infer_schema_rows: usize,

    /// Whisker length as a multiple of the interquartile range.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Output directory for reports and cleaned data.
    /// Default: "output"
    pub output_dir: PathBuf,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            all_missing: AllMissingStrategy::default(),
            histogram_bins: 20,
            pairplot_sample_rows: 200,
            pairplot_max_columns: 4,
            sample_seed: 42,
            preview_rows: 5,
            infer_schema_rows: 100,
            iqr_multiplier: 1.5,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl EdaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EdaConfigBuilder {
        EdaConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let counts = [
            ("histogram_bins", self.histogram_bins, 1),
            ("pairplot_sample_rows", self.pairplot_sample_rows, 1),
            ("pairplot_max_columns", self.pairplot_max_columns, 2),
            ("infer_schema_rows", self.infer_schema_rows, 1),
        ];
        for (field, value, min) in counts {
            if value < min {
                return Err(ConfigValidationError::TooSmall {
                    field: field.to_string(),
                    value,
                    min,
                });
            }
        }

        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be at least {min})")]
    TooSmall {
        field: String,
        value: usize,
        min: usize,
    },

    #[error("Invalid IQR multiplier: {0} (must be a positive number)")]
    InvalidIqrMultiplier(f64),
}

impl From<ConfigValidationError> for crate::error::EdaError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::EdaError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`EdaConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EdaConfigBuilder {
    all_missing: Option<AllMissingStrategy>,
    histogram_bins: Option<usize>,
    pairplot_sample_rows: Option<usize>,
    pairplot_max_columns: Option<usize>,
    sample_seed: Option<u64>,
    preview_rows: Option<usize>,
    infer_schema_rows: Option<usize>,
    iqr_multiplier: Option<f64>,
    output_dir: Option<PathBuf>,
}

impl EdaConfigBuilder {
    /// Set the behavior for columns with no values to fill from.
    pub fn all_missing(mut self, strategy: AllMissingStrategy) -> Self {
        self.all_missing = Some(strategy);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the maximum number of rows sampled for the pairplot.
    pub fn pairplot_sample_rows(mut self, rows: usize) -> Self {
        self.pairplot_sample_rows = Some(rows);
        self
    }

    /// Set the maximum number of numeric columns in the pairplot.
    pub fn pairplot_max_columns(mut self, columns: usize) -> Self {
        self.pairplot_max_columns = Some(columns);
        self
    }

    /// Set the seed for the pairplot sample.
    pub fn sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    /// Set the number of preview rows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the number of rows used for CSV schema inference.
    pub fn infer_schema_rows(mut self, rows: usize) -> Self {
        self.infer_schema_rows = Some(rows);
        self
    }

    /// Set the whisker length as a multiple of the IQR.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the output directory for reports and cleaned data.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EdaConfig` or an error if validation fails.
    pub fn build(self) -> Result<EdaConfig, ConfigValidationError> {
        let defaults = EdaConfig::default();
        let config = EdaConfig {
            all_missing: self.all_missing.unwrap_or_default(),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            pairplot_sample_rows: self
                .pairplot_sample_rows
                .unwrap_or(defaults.pairplot_sample_rows),
            pairplot_max_columns: self
                .pairplot_max_columns
                .unwrap_or(defaults.pairplot_max_columns),
            sample_seed: self.sample_seed.unwrap_or(defaults.sample_seed),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            infer_schema_rows: self.infer_schema_rows.unwrap_or(defaults.infer_schema_rows),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EdaConfig::default();
        assert_eq!(config.all_missing, AllMissingStrategy::Error);
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.pairplot_sample_rows, 200);
        assert_eq!(config.pairplot_max_columns, 4);
        assert_eq!(config.sample_seed, 42);
        assert_eq!(config.iqr_multiplier, 1.5);
    }

    #[test]
    fn test_builder_defaults() {
        let config = EdaConfig::builder().build().unwrap();
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = EdaConfig::builder()
            .all_missing(AllMissingStrategy::LeaveMissing)
            .histogram_bins(10)
            .pairplot_sample_rows(50)
            .sample_seed(7)
            .build()
            .unwrap();

        assert_eq!(config.all_missing, AllMissingStrategy::LeaveMissing);
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.pairplot_sample_rows, 50);
        assert_eq!(config.sample_seed, 7);
    }

    #[test]
    fn test_validation_zero_bins() {
        let result = EdaConfig::builder().histogram_bins(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::TooSmall { min: 1, .. }
        ));
    }

    #[test]
    fn test_validation_single_pairplot_column() {
        let result = EdaConfig::builder().pairplot_max_columns(1).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::TooSmall { min: 2, .. }
        ));
    }

    #[test]
    fn test_validation_invalid_iqr_multiplier() {
        assert!(EdaConfig::builder().iqr_multiplier(0.0).build().is_err());
        assert!(EdaConfig::builder().iqr_multiplier(f64::NAN).build().is_err());
    }

    #[test]
    fn test_plan_strategy_for() {
        let plan = NumericFillPlan::new(NumericFill::Mean).column("income", NumericFill::Median);
        assert_eq!(plan.strategy_for("income"), NumericFill::Median);
        assert_eq!(plan.strategy_for("age"), NumericFill::Mean);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(MissingValuePolicy::NoOp.name(), "no_op");
        assert_eq!(MissingValuePolicy::DropRows.name(), "drop_rows");
        assert_eq!(
            MissingValuePolicy::FillAll(NumericFillPlan::default()).name(),
            "fill_all"
        );
        assert!(MissingValuePolicy::FillCategorical.numeric_plan().is_none());
    }

    #[test]
    fn test_policy_from_json() {
        let json = r#"{
            "FillNumeric": {
                "default": "Median",
                "per_column": { "age": "Mean" }
            }
        }"#;

        let policy: MissingValuePolicy =
            serde_json::from_str(json).expect("Should deserialize policy");
        let plan = policy.numeric_plan().unwrap();
        assert_eq!(plan.default, NumericFill::Median);
        assert_eq!(plan.strategy_for("age"), NumericFill::Mean);
    }

    #[test]
    fn test_config_serialization() {
        let config = EdaConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EdaConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.histogram_bins, deserialized.histogram_bins);
        assert_eq!(config.all_missing, deserialized.all_missing);
    }
}
