//! CSV loading and writing.

use crate::error::{EdaError, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Load a CSV file with a header row.
///
/// Tries standard quote handling first, then no quote handling, then a
/// pre-cleaned copy of the content. A file that cannot be read is an IO
/// error; content no strategy can parse is an invalid dataset.
pub fn load_csv(path: impl AsRef<Path>, infer_schema_rows: usize) -> Result<DataFrame> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    // Strategy 1: standard loading with quote handling
    match read_csv(&content, infer_schema_rows, Some(b'"')) {
        Ok(df) => return loaded(path, df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: without quote handling
    match read_csv(&content, infer_schema_rows, None) {
        Ok(df) => return loaded(path, df),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    // Strategy 3: pre-clean content
    let cleaned = clean_csv_content(&content);
    match read_csv(&cleaned, infer_schema_rows, Some(b'"')) {
        Ok(df) => loaded(path, df),
        Err(e) => Err(EdaError::InvalidDataset(format!(
            "could not parse '{}': {}",
            path.display(),
            e
        ))),
    }
}

fn read_csv(content: &str, infer_schema_rows: usize, quote_char: Option<u8>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(infer_schema_rows))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(quote_char))
        .into_reader_with_file_handle(Cursor::new(content.to_owned()))
        .finish()
}

fn loaded(path: &Path, df: DataFrame) -> Result<DataFrame> {
    info!(
        "Loaded {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `df` as comma-separated CSV with a header, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}
