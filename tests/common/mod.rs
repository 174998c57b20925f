//! Shared test utilities and fixture generators

#![allow(dead_code)]

use decorr::pipeline::FeatureTable;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Owned names from string literals
pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Ten rows with known correlation patterns:
/// - `a`: 1..=10
/// - `b`: 2 * a (perfect positive with a)
/// - `c`: 10..=1 (perfect negative with a)
/// - `d`: shuffled values, r(a, d) ≈ -0.13
pub fn create_linear_table() -> FeatureTable {
    FeatureTable::new(vec![
        ("a", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]),
        ("b", vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0]),
        ("c", vec![10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]),
        ("d", vec![5.0, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0]),
    ])
    .unwrap()
}

/// Target aligned with `create_linear_table`: r(a, t) ≈ 0.95, r(d, t) ≈ -0.19
pub fn create_linear_target() -> Vec<f64> {
    vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 8.0, 7.0, 10.0, 9.0]
}

/// Uniform noise column from a seeded generator
pub fn noise(rng: &mut StdRng, rows: usize) -> Vec<f64> {
    (0..rows).map(|_| rng.gen::<f64>()).collect()
}

/// `pairs` independent bases, each followed by a noisy copy of itself.
///
/// Copies get increasing noise, so pair correlations spread out between
/// roughly 0.5 and 1 while correlations across pairs stay near zero. Columns
/// are named `base_i` and `copy_i`.
pub fn create_paired_table(pairs: usize, rows: usize, seed: u64) -> FeatureTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut columns = Vec::with_capacity(pairs * 2);

    for i in 0..pairs {
        let base = noise(&mut rng, rows);
        let scale = 0.05 + 0.15 * i as f64;
        let copy: Vec<f64> = base
            .iter()
            .map(|v| v + scale * (rng.gen::<f64>() - 0.5))
            .collect();
        columns.push((format!("base_{}", i), base));
        columns.push((format!("copy_{}", i), copy));
    }

    FeatureTable::new(columns).unwrap()
}

/// Random table whose columns are mixtures of a few latent factors,
/// producing a spread of moderate and strong correlations.
pub fn create_mixed_table(features: usize, rows: usize, seed: u64) -> FeatureTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let latent: Vec<Vec<f64>> = (0..3).map(|_| noise(&mut rng, rows)).collect();

    let columns = (0..features)
        .map(|f| {
            let weights: Vec<f64> = (0..3).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let jitter = rng.gen_range(0.01..0.5);
            let values = (0..rows)
                .map(|r| {
                    let signal: f64 = weights.iter().zip(&latent).map(|(w, l)| w * l[r]).sum();
                    signal + jitter * (rng.gen::<f64>() - 0.5)
                })
                .collect();
            (format!("f{}", f), values)
        })
        .collect();

    FeatureTable::new(columns).unwrap()
}

/// Small dataset mixing numeric, string and constant columns
pub fn create_test_dataframe() -> DataFrame {
    df! {
        "target" => [0i32, 1, 0, 1, 1, 1, 0, 1, 1, 1],
        "feature_good" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "feature_corr" => [1.1f64, 2.1, 3.1, 4.1, 5.1, 6.1, 7.1, 8.1, 9.1, 10.1], // Duplicate of feature_good
        "feature_noise" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0],
        "feature_constant" => [5.0f64; 10], // Zero variance
        "feature_count" => [3i64, 1, 4, 1, 5, 9, 2, 6, 5, 3],
        "label" => ["x", "y", "x", "y", "x", "y", "x", "y", "x", "y"], // Non-numeric
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
