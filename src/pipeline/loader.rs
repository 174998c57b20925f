//! Dataset loader for CSV and Parquet files
//!
//! Turns a polars `DataFrame` into the `FeatureTable` and target vector the
//! filters work on. Ingestion is deliberately strict: nulls are rejected since
//! the filters do not impute.

use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;

use super::table::FeatureTable;

/// Numeric features and target extracted from a dataset.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub table: FeatureTable,
    pub target: Option<Vec<f64>>,
    /// Non-numeric columns left out of the analysis (kept in the output file).
    pub skipped: Vec<String>,
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// `infer_schema_length` applies to CSV only; 0 scans the whole file.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = file_extension(path);

    let lf = match extension.as_str() {
        "csv" => {
            let schema_rows = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_rows)
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Estimated in-memory size of a DataFrame in megabytes.
pub fn estimated_memory_mb(df: &DataFrame) -> f64 {
    df.estimated_size() as f64 / (1024.0 * 1024.0)
}

/// Split a DataFrame into a numeric feature table and an optional target.
///
/// Columns in `drop_columns` and the target are excluded from the features.
/// Non-numeric columns are reported in `skipped`.
pub fn prepare_features(
    df: &DataFrame,
    target: Option<&str>,
    drop_columns: &[String],
) -> Result<PreparedData> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for name in drop_columns {
        if !column_names.contains(name) {
            bail!(
                "Column '{}' listed in --drop-columns not found in dataset",
                name
            );
        }
    }

    let target_values = match target {
        Some(name) => {
            if drop_columns.iter().any(|d| d == name) {
                bail!("Target column '{}' cannot also be dropped", name);
            }
            let column = df.column(name).with_context(|| {
                format!(
                    "Target column '{}' not found in dataset. Available columns: {:?}",
                    name, column_names
                )
            })?;
            if !column.dtype().is_primitive_numeric() {
                bail!(
                    "Target column '{}' must be numeric, found {}",
                    name,
                    column.dtype()
                );
            }
            Some(column_to_f64(column, name)?)
        }
        None => None,
    };

    let mut features = Vec::new();
    let mut skipped = Vec::new();

    for column in df.get_columns() {
        let name = column.name().as_str();
        if Some(name) == target || drop_columns.iter().any(|d| d == name) {
            continue;
        }
        if !column.dtype().is_primitive_numeric() {
            skipped.push(name.to_string());
            continue;
        }
        features.push((name.to_string(), column_to_f64(column, name)?));
    }

    let table = FeatureTable::new(features).context("Invalid feature table")?;

    Ok(PreparedData {
        table,
        target: target_values,
        skipped,
    })
}

fn column_to_f64(column: &Column, name: &str) -> Result<Vec<f64>> {
    let nulls = column.null_count();
    if nulls > 0 {
        bail!(
            "Column '{}' contains {} missing value(s). Impute or drop it before correlation analysis",
            name,
            nulls
        );
    }

    let cast = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' cannot be cast to Float64", name))?;
    let values = cast
        .f64()
        .with_context(|| format!("Failed to access column '{}' as Float64", name))?
        .into_iter()
        .flatten()
        .collect();

    Ok(values)
}

/// Save dataset to file (CSV or Parquet based on extension)
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = file_extension(path);

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
