use crate::analysis::{
    category_vs_numeric, correlation_matrix, describe, distribution, outlier_summary, overview,
    pairplot_sample, value_counts,
};
use crate::config::{EdaConfig, MissingValuePolicy};
use crate::error::Result;
use crate::resolver::MissingValueResolver;
use crate::types::{
    CategoryCount, ColumnDescription, ColumnKind, CorrelationMatrix, DatasetOverview, Distribution,
    GroupSummary, MissingCounts, OutlierSummary, columns_of_kind,
};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

// ============================================================================
// Report Types
// ============================================================================

/// Missing-value and analysis results for one dataset, as a single serializable value.
///
/// Missing counts are taken before and after the policy; every analysis
/// section describes the resolved dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the cleaned output file (if written)
    pub output_file: Option<String>,
    /// The policy that was applied
    pub policy: MissingValuePolicy,
    pub shape_before: (usize, usize),
    pub shape_after: (usize, usize),
    pub missing_before: MissingCounts,
    pub missing_after: MissingCounts,
    /// Steps recorded while applying the policy
    pub processing_steps: Vec<String>,
    pub overview: DatasetOverview,
    pub describe: Vec<ColumnDescription>,
    /// `None` with fewer than two numeric columns
    pub correlation: Option<CorrelationMatrix>,
    pub outliers: Vec<OutlierSummary>,
    pub distributions: Vec<Distribution>,
    pub value_counts: Vec<CategoricalCounts>,
    /// Numeric distribution per category of the first categorical column
    pub category_breakdowns: Vec<CategoryBreakdown>,
    /// Shape of the pairplot sample, `None` when there is no pairplot
    pub pairplot_shape: Option<(usize, usize)>,
    /// Sections that could not be computed
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalCounts {
    pub column: String,
    pub counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub categorical_column: String,
    pub numeric_column: String,
    pub groups: Vec<GroupSummary>,
}

/// Inputs for [`ReportGenerator::build_report`].
pub struct ReportParams<'a> {
    pub input_file: &'a str,
    pub output_file: Option<&'a str>,
    pub policy: &'a MissingValuePolicy,
    pub original_df: &'a DataFrame,
    pub final_df: &'a DataFrame,
    pub processing_steps: &'a [String],
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds [`EdaReport`]s and writes them to the output directory.
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    config: EdaConfig,
}

impl ReportGenerator {
    pub fn new(config: EdaConfig) -> Self {
        Self { config }
    }

    /// Run every analysis over the resolved dataset and assemble the report.
    ///
    /// An analysis that fails with a computation error (e.g. an all-missing
    /// numeric column) becomes a warning instead of failing the report.
    pub fn build_report(&self, params: ReportParams<'_>) -> Result<EdaReport> {
        let ReportParams {
            input_file,
            output_file,
            policy,
            original_df,
            final_df,
            processing_steps,
        } = params;

        let resolver = MissingValueResolver::new(self.config.clone());
        let missing_before = resolver.count_missing(original_df)?;
        let missing_after = resolver.count_missing(final_df)?;

        let mut warnings = Vec::new();
        let numeric_columns = columns_of_kind(final_df, ColumnKind::Numeric);
        let categorical_columns = columns_of_kind(final_df, ColumnKind::Categorical);

        let correlation = correlation_matrix(final_df)?;
        if correlation.is_none() {
            warnings.push("Not enough numeric columns for correlation".to_string());
        }

        let mut outliers = Vec::new();
        let mut distributions = Vec::new();
        for column in &numeric_columns {
            if let Some(summary) = soften(
                outlier_summary(final_df, column, self.config.iqr_multiplier),
                &mut warnings,
            )? {
                outliers.push(summary);
            }
            if let Some(dist) = soften(
                distribution(final_df, column, self.config.histogram_bins),
                &mut warnings,
            )? {
                distributions.push(dist);
            }
        }

        let mut counts = Vec::with_capacity(categorical_columns.len());
        for column in &categorical_columns {
            counts.push(CategoricalCounts {
                column: column.clone(),
                counts: value_counts(final_df, column)?,
            });
        }

        let mut category_breakdowns = Vec::new();
        if let Some(categorical_column) = categorical_columns.first() {
            for numeric_column in &numeric_columns {
                category_breakdowns.push(CategoryBreakdown {
                    categorical_column: categorical_column.clone(),
                    numeric_column: numeric_column.clone(),
                    groups: category_vs_numeric(
                        final_df,
                        categorical_column,
                        numeric_column,
                        self.config.iqr_multiplier,
                    )?,
                });
            }
        }

        let pairplot_shape = pairplot_sample(final_df, &self.config)?.map(|s| s.shape());

        for warning in &warnings {
            warn!("{}", warning);
        }

        Ok(EdaReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            policy: policy.clone(),
            shape_before: original_df.shape(),
            shape_after: final_df.shape(),
            missing_before,
            missing_after,
            processing_steps: processing_steps.to_vec(),
            overview: overview(final_df, self.config.preview_rows)?,
            describe: describe(final_df)?,
            correlation,
            outliers,
            distributions,
            value_counts: counts,
            category_breakdowns,
            pairplot_shape,
            warnings,
        })
    }

    /// Write a report to a JSON file.
    ///
    /// If `report_base_name` is "train", the file will be "train_report.json".
    pub fn write_report_to_file(&self, report: &EdaReport, report_base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.output_dir)?;

        let report_path = self
            .config
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

/// Turn computation errors into warnings; propagate everything else.
fn soften<T>(result: Result<T>, warnings: &mut Vec<String>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_computation() => {
            warnings.push(e.to_string());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
