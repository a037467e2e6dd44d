//! Exploratory Data Analysis Library
//!
//! Missing-value resolution and exploratory analysis for tabular datasets,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! - **Missing Counts**: Per-column counts of null and NaN cells
//! - **Remediation Policies**: Drop incomplete rows or columns, fill numeric
//!   columns with mean or median (chosen per column), fill other columns
//!   with their mode
//! - **Exploratory Analysis**: Summary statistics, correlation, box-plot
//!   outliers, histograms, value counts, grouped distributions, scatter data
//!   and a seeded pairplot sample
//! - **Reporting**: Everything above as one serializable JSON report
//!
//! A cell is *missing* when it is null, or NaN in a numeric column.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_eda::{MissingValuePolicy, MissingValueResolver, NumericFill, NumericFillPlan};
//!
//! let df = lex_eda::io::load_csv("data.csv", 100)?;
//!
//! let resolver = MissingValueResolver::default();
//! for (column, missing) in resolver.count_missing(&df)?.iter() {
//!     println!("{column}: {missing}");
//! }
//!
//! let plan = NumericFillPlan::new(NumericFill::Mean).column("income", NumericFill::Median);
//! let cleaned = resolver.apply(&df, &MissingValuePolicy::FillAll(plan))?;
//! ```
//!
//! # Configuration
//!
//! Use [`EdaConfig`] to customize resolution and analysis:
//!
//! ```rust,ignore
//! use lex_eda::config::*;
//!
//! let config = EdaConfig::builder()
//!     .all_missing(AllMissingStrategy::LeaveMissing) // Don't fail on all-missing columns
//!     .histogram_bins(30)
//!     .pairplot_sample_rows(500)
//!     .build()?;
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod reporting;
pub mod resolver;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    AllMissingStrategy, ConfigValidationError, EdaConfig, EdaConfigBuilder, MissingValuePolicy,
    NumericFill, NumericFillPlan,
};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use reporting::{EdaReport, ReportGenerator, ReportParams};
pub use resolver::{MissingValueResolver, Resolution};
pub use types::{ColumnKind, ColumnMissing, MissingCounts};
pub use utils::{count_missing_values, is_numeric_dtype, missing_mask};

static_assertions::assert_impl_all!(EdaConfig: Send, Sync);
static_assertions::assert_impl_all!(MissingValuePolicy: Send, Sync);
static_assertions::assert_impl_all!(EdaError: Send, Sync);
static_assertions::assert_impl_all!(EdaReport: Send, Sync);
