//! Data Loading and Management
//!
//! Handles the input text corpus, entity lists, and the persisted
//! sentence-match table using Polars. All argument problems (wrong
//! extension, missing column, empty entity set) are typed and surface before
//! any processing starts.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Input validation failures reported before the pipeline runs.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("expected a .csv file, got: {0}")]
    BadExtension(PathBuf),
    #[error("column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
    #[error("no entities given: supply --entities or --entity-filename")]
    NoEntities,
}

/// Both the input and output tables use the tabular-text convention.
pub fn validate_csv_extension(path: &Path) -> Result<(), InputError> {
    if path.extension().and_then(|e| e.to_str()) == Some("csv") {
        Ok(())
    } else {
        Err(InputError::BadExtension(path.to_path_buf()))
    }
}

/// Load the input corpus and verify the caller-named columns exist.
///
/// Rows whose text cell is null are dropped here; blank-after-trim rows are
/// skipped later during extraction.
pub fn load_corpus(path: &Path, text_column: &str, id_column: Option<&str>) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to load input CSV: {}", path.display()))?;

    require_column(&df, text_column, path)?;
    if let Some(id_column) = id_column {
        require_column(&df, id_column, path)?;
    }

    let df = df
        .lazy()
        .filter(col(text_column).is_not_null())
        .collect()
        .with_context(|| "Failed to drop rows with missing text")?;

    Ok(df)
}

fn require_column(df: &DataFrame, column: &str, path: &Path) -> Result<(), InputError> {
    if df.get_column_names().iter().any(|c| c.as_str() == column) {
        Ok(())
    } else {
        Err(InputError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// Resolve the entity list from explicit strings or a newline-delimited file
/// (mutually exclusive; the CLI enforces that only one is set).
pub fn load_entities(entities: &[String], entity_file: Option<&Path>) -> Result<Vec<String>> {
    let resolved = match entity_file {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read entity file: {}", path.display()))?;
            contents
                .lines()
                .map(|line| line.trim_end_matches('\r'))
                .filter(|line| {
                    if line.is_empty() {
                        log::debug!("Skipping blank line in entity file");
                        false
                    } else {
                        true
                    }
                })
                .map(str::to_string)
                .collect()
        }
        None => entities.to_vec(),
    };

    if resolved.is_empty() {
        return Err(InputError::NoEntities.into());
    }
    Ok(resolved)
}

/// Write a table as headed CSV, replacing any existing file.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
    Ok(())
}

/// Read the persisted sentence-match table back for scoring.
pub fn read_sentence_table(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to load sentence table: {}", path.display()))?;

    require_column(&df, "masked_sentence", path)?;
    Ok(df)
}

/// String view of a column, casting non-string identifiers (numeric ids are
/// common in corpus exports).
pub fn column_as_string(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let series = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .as_materialized_series()
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' is not castable to string", name))?;
    Ok(series.str()?.clone())
}
