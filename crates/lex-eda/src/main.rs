//! CLI entry point for missing-value resolution and exploratory analysis.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_eda::io::{load_csv, write_csv};
use lex_eda::{
    AllMissingStrategy, EdaConfig, EdaReport, MissingCounts, MissingValuePolicy,
    MissingValueResolver, NumericFill, NumericFillPlan, ReportGenerator, ReportParams,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// CLI-compatible missing-value policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingPolicy {
    /// Leave missing values untouched
    NoOp,
    /// Drop rows with any missing value
    DropRows,
    /// Drop columns with any missing value
    DropColumns,
    /// Fill numeric columns with mean or median
    FillNumeric,
    /// Fill non-numeric columns with their mode
    FillCategorical,
    /// Fill numeric columns, then non-numeric columns
    FillAll,
}

/// CLI-compatible numeric fill enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliNumericFill {
    /// Use the mean of non-missing values
    Mean,
    /// Use the median of non-missing values
    Median,
}

impl From<CliNumericFill> for NumericFill {
    fn from(cli: CliNumericFill) -> Self {
        match cli {
            CliNumericFill::Mean => NumericFill::Mean,
            CliNumericFill::Median => NumericFill::Median,
        }
    }
}

/// CLI-compatible all-missing column behavior
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliAllMissing {
    /// Fail when a column to fill has no values
    Error,
    /// Leave such columns missing and warn
    LeaveMissing,
}

impl From<CliAllMissing> for AllMissingStrategy {
    fn from(cli: CliAllMissing) -> Self {
        match cli {
            CliAllMissing::Error => AllMissingStrategy::Error,
            CliAllMissing::LeaveMissing => AllMissingStrategy::LeaveMissing,
        }
    }
}

/// Parse a `NAME=mean|median` per-column override.
fn parse_column_fill(s: &str) -> std::result::Result<(String, NumericFill), String> {
    let (name, strategy) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=mean|median, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("missing column name in '{}'", s));
    }
    let strategy = match strategy.to_ascii_lowercase().as_str() {
        "mean" => NumericFill::Mean,
        "median" => NumericFill::Median,
        other => return Err(format!("unknown fill '{}' (expected mean or median)", other)),
    };
    Ok((name.to_string(), strategy))
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Missing-value resolution and exploratory data analysis",
    long_about = "Count and resolve missing values in a CSV dataset, then summarize it.\n\n\
                  EXAMPLES:\n  \
                  # Show missing counts and the policy without changing anything\n  \
                  lex-eda -i data.csv --missing drop-rows --dry-run\n\n  \
                  # Fill numeric columns with the median, one column with the mean\n  \
                  lex-eda -i data.csv --missing fill-numeric --numeric-fill median --column-fill age=mean\n\n  \
                  # Fill everything and print the full report as JSON\n  \
                  lex-eda -i data.csv --missing fill-all --json"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Output directory for results
    #[arg(short, long, default_value = "./output")]
    output: String,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses "<input_name>_cleaned"
    #[arg(long)]
    output_name: Option<String>,

    /// How to handle missing values
    #[arg(long, value_enum, default_value = "no-op")]
    missing: CliMissingPolicy,

    /// Default statistic for numeric fills
    #[arg(long, value_enum, default_value = "mean")]
    numeric_fill: CliNumericFill,

    /// Per-column numeric fill override, e.g. `income=median` (repeatable)
    #[arg(long, value_parser = parse_column_fill)]
    column_fill: Vec<(String, NumericFill)>,

    /// What to do when a column to fill has no values at all
    #[arg(long, value_enum, default_value = "error")]
    all_missing: CliAllMissing,

    /// Show missing counts and the policy without applying it
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = EdaConfig::builder()
        .output_dir(&args.output)
        .all_missing(args.all_missing.into())
        .build()?;
    let policy = build_policy(&args);

    info!("Loading dataset from: {}", args.input);
    let data = load_csv(&args.input, config.infer_schema_rows)?;

    let resolver = MissingValueResolver::new(config.clone());

    if args.dry_run {
        let counts = resolver.count_missing(&data)?;
        run_dry_run(&args, &policy, &counts, data.shape());
        return Ok(());
    }

    let resolution = resolver.apply_with_steps(&data, &policy)?;
    let mut cleaned = resolution.data;

    let input_stem = extract_file_stem(&args.input);
    let output_name = args
        .output_name
        .clone()
        .unwrap_or_else(|| format!("{}_cleaned", input_stem));
    let output_path = PathBuf::from(&args.output).join(format!("{}.csv", output_name));
    write_csv(&mut cleaned, &output_path)?;

    let output_file = output_path.display().to_string();
    let generator = ReportGenerator::new(config);
    let report = generator.build_report(ReportParams {
        input_file: &args.input,
        output_file: Some(&output_file),
        policy: &policy,
        original_df: &data,
        final_df: &cleaned,
        processing_steps: &resolution.steps,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Translate CLI flags into a policy.
fn build_policy(args: &Args) -> MissingValuePolicy {
    let plan = args.column_fill.iter().fold(
        NumericFillPlan::new(args.numeric_fill.into()),
        |plan, (name, strategy)| plan.column(name.clone(), *strategy),
    );

    let policy = match args.missing {
        CliMissingPolicy::NoOp => MissingValuePolicy::NoOp,
        CliMissingPolicy::DropRows => MissingValuePolicy::DropRows,
        CliMissingPolicy::DropColumns => MissingValuePolicy::DropColumns,
        CliMissingPolicy::FillNumeric => MissingValuePolicy::FillNumeric(plan),
        CliMissingPolicy::FillCategorical => MissingValuePolicy::FillCategorical,
        CliMissingPolicy::FillAll => MissingValuePolicy::FillAll(plan),
    };

    if policy.numeric_plan().is_none() && !args.column_fill.is_empty() {
        warn!(
            "--column-fill has no effect with --missing {}",
            policy.name()
        );
    }
    policy
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Run dry-run mode - show what would happen without processing
///
/// Uses `println!` for user-facing output so it shows regardless of log level.
fn run_dry_run(
    args: &Args,
    policy: &MissingValuePolicy,
    counts: &MissingCounts,
    shape: (usize, usize),
) {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of missing-value handling");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", shape.0);
    println!("  Columns: {}", shape.1);
    println!("  Missing cells: {}", counts.total());
    println!();

    print_missing_table(counts);

    println!("POLICY");
    println!("{}", "-".repeat(40));
    println!("  {}", policy.name());
    if let Some(plan) = policy.numeric_plan() {
        println!("  Default numeric fill: {}", plan.default);
        for (column, strategy) in &plan.per_column {
            println!("  {}: {}", column, strategy);
        }
    }
    println!();
    println!("{}", "=".repeat(80));
}

fn print_missing_table(counts: &MissingCounts) {
    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));
    if counts.is_clean() {
        println!("  No missing values");
    } else {
        for col in counts.columns.iter().filter(|c| c.missing_count > 0) {
            println!(
                "  {:<30} {:>8} ({:.1}%)",
                truncate_str(&col.column, 30),
                col.missing_count,
                col.missing_percentage
            );
        }
    }
    println!();
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Print a human-readable summary of the run.
fn print_human_readable_summary(report: &EdaReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, report.shape_before.0, report.shape_before.1
    );
    if let Some(ref output_file) = report.output_file {
        println!(
            "Output: {} ({} rows x {} columns)",
            output_file, report.shape_after.0, report.shape_after.1
        );
    }
    println!("Policy: {}", report.policy.name());
    println!();

    println!(
        "Missing cells: {} -> {}",
        report.missing_before.total(),
        report.missing_after.total()
    );
    println!();

    if !report.processing_steps.is_empty() {
        println!("Actions Taken:");
        for step in report.processing_steps.iter().take(10) {
            println!("  - {}", step);
        }
        if report.processing_steps.len() > 10 {
            println!(
                "  ... and {} more actions",
                report.processing_steps.len() - 10
            );
        }
        println!();
    }

    println!(
        "Columns: {} numeric, {} categorical",
        report.overview.numeric_columns.len(),
        report.overview.categorical_columns.len()
    );
    let outlier_columns: Vec<String> = report
        .outliers
        .iter()
        .filter(|o| !o.outliers.is_empty())
        .map(|o| format!("{} ({})", o.column, o.outliers.len()))
        .collect();
    if !outlier_columns.is_empty() {
        println!("Outliers: {}", outlier_columns.join(", "));
    }
    println!();

    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}
