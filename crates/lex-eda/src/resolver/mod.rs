//! Missing-value resolution.
//!
//! [`MissingValueResolver`] reports per-column missing counts and applies one
//! [`MissingValuePolicy`] to a dataset. It never touches the caller's frame:
//! every policy works on an owned copy and returns it.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_eda::{MissingValueResolver, MissingValuePolicy, NumericFill, NumericFillPlan};
//!
//! let resolver = MissingValueResolver::default();
//! let counts = resolver.count_missing(&df)?;
//! println!("{} missing cells", counts.total());
//!
//! let plan = NumericFillPlan::new(NumericFill::Mean).column("income", NumericFill::Median);
//! let cleaned = resolver.apply(&df, &MissingValuePolicy::FillNumeric(plan))?;
//! ```

mod drop;

use crate::config::{EdaConfig, MissingValuePolicy, NumericFillPlan};
use crate::error::{EdaError, Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::types::{ColumnKind, MissingCounts};
use crate::utils::count_missing_values;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Output of [`MissingValueResolver::apply_with_steps`].
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The transformed dataset.
    pub data: DataFrame,
    /// Human-readable record of what was done.
    pub steps: Vec<String>,
}

/// Applies missing-value remediation policies.
#[derive(Debug, Clone, Default)]
pub struct MissingValueResolver {
    config: EdaConfig,
}

impl MissingValueResolver {
    pub fn new(config: EdaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EdaConfig {
        &self.config
    }

    /// Count missing cells per column.
    pub fn count_missing(&self, df: &DataFrame) -> Result<MissingCounts> {
        validate_dataset(df)?;

        let mut counts = MissingCounts {
            rows: df.height(),
            columns: Vec::with_capacity(df.width()),
        };
        for col in df.get_columns() {
            let missing = count_missing_values(col.as_materialized_series())
                .context(format!("Counting missing values in '{}'", col.name()))?;
            counts.push(col.name().to_string(), missing);
        }
        Ok(counts)
    }

    /// Apply `policy` and return the transformed dataset.
    pub fn apply(&self, df: &DataFrame, policy: &MissingValuePolicy) -> Result<DataFrame> {
        self.apply_with_steps(df, policy).map(|r| r.data)
    }

    /// Apply `policy` and return the transformed dataset with a log of steps.
    pub fn apply_with_steps(
        &self,
        df: &DataFrame,
        policy: &MissingValuePolicy,
    ) -> Result<Resolution> {
        let counts = self.count_missing(df)?;
        if let Some(plan) = policy.numeric_plan() {
            validate_plan(df, plan)?;
        }

        info!(
            "Applying '{}' to {} rows x {} columns ({} missing cells)",
            policy.name(),
            df.height(),
            df.width(),
            counts.total()
        );

        let mut steps = Vec::new();
        let data = match policy {
            MissingValuePolicy::NoOp => {
                steps.push("Left missing values untouched".to_string());
                df.clone()
            }
            MissingValuePolicy::DropRows => drop::drop_rows(df, &mut steps)?,
            MissingValuePolicy::DropColumns => drop::drop_columns(df, &counts, &mut steps)?,
            MissingValuePolicy::FillNumeric(plan) => {
                let mut out = df.clone();
                self.fill_numeric(&mut out, &counts, plan, &mut steps)?;
                out
            }
            MissingValuePolicy::FillCategorical => {
                let mut out = df.clone();
                self.fill_categorical(&mut out, &counts, &mut steps)?;
                out
            }
            MissingValuePolicy::FillAll(plan) => {
                let mut out = df.clone();
                self.fill_numeric(&mut out, &counts, plan, &mut steps)?;
                self.fill_categorical(&mut out, &counts, &mut steps)?;
                out
            }
        };

        debug!(
            "'{}' produced {} rows x {} columns",
            policy.name(),
            data.height(),
            data.width()
        );
        Ok(Resolution { data, steps })
    }

    fn fill_numeric(
        &self,
        df: &mut DataFrame,
        counts: &MissingCounts,
        plan: &NumericFillPlan,
        steps: &mut Vec<String>,
    ) -> Result<()> {
        for name in columns_needing_fill(df, counts, ColumnKind::Numeric) {
            StatisticalImputer::apply_numeric_fill(
                df,
                &name,
                plan.strategy_for(&name),
                self.config.all_missing,
                steps,
            )?;
        }
        Ok(())
    }

    fn fill_categorical(
        &self,
        df: &mut DataFrame,
        counts: &MissingCounts,
        steps: &mut Vec<String>,
    ) -> Result<()> {
        for name in columns_needing_fill(df, counts, ColumnKind::Categorical) {
            StatisticalImputer::apply_mode_imputation(df, &name, self.config.all_missing, steps)?;
        }
        Ok(())
    }
}

/// Columns of `kind` with at least one missing value, in column order.
fn columns_needing_fill(df: &DataFrame, counts: &MissingCounts, kind: ColumnKind) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| ColumnKind::of(col.dtype()) == Some(kind))
        .map(|col| col.name().to_string())
        .filter(|name| counts.get(name).unwrap_or(0) > 0)
        .collect()
}

/// Reject inputs that are not flat tables of scalar columns.
pub fn validate_dataset(df: &DataFrame) -> Result<()> {
    let mut seen = HashSet::with_capacity(df.width());
    for col in df.get_columns() {
        let name = col.name().as_str();
        if name.trim().is_empty() {
            return Err(EdaError::InvalidDataset(
                "column names must not be empty".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(EdaError::InvalidDataset(format!(
                "duplicate column name '{}'",
                name
            )));
        }
        if ColumnKind::of(col.dtype()).is_none() {
            return Err(EdaError::InvalidDataset(format!(
                "column '{}' has unsupported type {}",
                name,
                col.dtype()
            )));
        }
    }
    Ok(())
}

/// Per-column overrides must name existing numeric columns.
fn validate_plan(df: &DataFrame, plan: &NumericFillPlan) -> Result<()> {
    for (name, strategy) in &plan.per_column {
        match ColumnKind::of_column(df, name)? {
            ColumnKind::Numeric => {}
            ColumnKind::Categorical => {
                return Err(EdaError::InvalidPolicy(format!(
                    "cannot fill non-numeric column '{}' with {}",
                    name, strategy
                )));
            }
        }
    }
    Ok(())
}

static_assertions::assert_impl_all!(MissingValueResolver: Send, Sync);
