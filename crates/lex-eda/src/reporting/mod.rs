//! Report generation module.
//!
//! [`EdaReport`] gathers missing counts, processing steps and every analysis
//! section into one value suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_eda::reporting::{ReportGenerator, ReportParams};
//!
//! let generator = ReportGenerator::new(config);
//! let report = generator.build_report(ReportParams {
//!     input_file: "data/train.csv",
//!     output_file: Some("output/train_cleaned.csv"),
//!     policy: &policy,
//!     original_df: &df,
//!     final_df: &resolution.data,
//!     processing_steps: &resolution.steps,
//! })?;
//!
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! generator.write_report_to_file(&report, "train")?;
//! ```

mod generator;

pub use generator::{
    CategoricalCounts, CategoryBreakdown, EdaReport, ReportGenerator, ReportParams,
};
