//! Tests for dataset loading and feature extraction

use decorr::pipeline::{load_dataset, prepare_features, save_dataset};
use polars::prelude::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv() {
    let mut df = common::create_test_dataframe();
    let (_dir, path) = common::create_temp_csv(&mut df);

    let loaded = load_dataset(&path, 10000).unwrap();
    assert_eq!(loaded.shape(), (10, 7));
    common::assert_has_columns(&loaded, &["target", "feature_good", "label"]);
}

#[test]
fn test_load_csv_full_schema_scan() {
    let mut df = common::create_test_dataframe();
    let (_dir, path) = common::create_temp_csv(&mut df);

    let loaded = load_dataset(&path, 0).unwrap();
    assert_eq!(loaded.height(), 10);
}

#[test]
fn test_load_parquet() {
    let mut df = common::create_test_dataframe();
    let (_dir, path) = common::create_temp_parquet(&mut df);

    let loaded = load_dataset(&path, 10000).unwrap();
    assert_eq!(loaded.shape(), (10, 7));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.xlsx");
    std::fs::write(&path, "irrelevant").unwrap();

    let err = load_dataset(&path, 100).unwrap_err();
    assert!(err.to_string().contains("Unsupported file format"));
}

#[test]
fn test_prepare_with_target() {
    let df = common::create_test_dataframe();
    let prepared = prepare_features(&df, Some("target"), &[]).unwrap();

    assert_eq!(
        prepared.table.names(),
        &common::names(&[
            "feature_good",
            "feature_corr",
            "feature_noise",
            "feature_constant",
            "feature_count"
        ])[..]
    );
    assert_eq!(prepared.skipped, vec!["label".to_string()]);

    let target = prepared.target.unwrap();
    assert_eq!(target.len(), 10);
    assert_eq!(target[1], 1.0);
}

#[test]
fn test_integer_columns_are_cast() {
    let df = common::create_test_dataframe();
    let prepared = prepare_features(&df, None, &[]).unwrap();

    assert_eq!(
        prepared.table.column_by_name("feature_count").unwrap()[..3],
        [3.0, 1.0, 4.0]
    );
    // Without a target, the target column is just another feature
    assert!(prepared.table.index_of("target").is_some());
    assert!(prepared.target.is_none());
}

#[test]
fn test_drop_columns_are_excluded() {
    let df = common::create_test_dataframe();
    let drop = common::names(&["feature_noise", "label"]);
    let prepared = prepare_features(&df, Some("target"), &drop).unwrap();

    assert!(prepared.table.index_of("feature_noise").is_none());
    assert!(prepared.skipped.is_empty());
}

#[test]
fn test_unknown_drop_column() {
    let df = common::create_test_dataframe();
    let err = prepare_features(&df, None, &common::names(&["nope"])).unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn test_target_cannot_be_dropped() {
    let df = common::create_test_dataframe();
    let err = prepare_features(&df, Some("target"), &common::names(&["target"])).unwrap_err();
    assert!(err.to_string().contains("cannot also be dropped"));
}

#[test]
fn test_missing_target_column() {
    let df = common::create_test_dataframe();
    let err = prepare_features(&df, Some("outcome"), &[]).unwrap_err();
    assert!(err.to_string().contains("outcome"));
}

#[test]
fn test_non_numeric_target() {
    let df = common::create_test_dataframe();
    let err = prepare_features(&df, Some("label"), &[]).unwrap_err();
    assert!(err.to_string().contains("must be numeric"));
}

#[test]
fn test_nulls_are_rejected() {
    let df = df! {
        "a" => [Some(1.0f64), None, Some(3.0)],
        "b" => [1.0f64, 2.0, 3.0],
    }
    .unwrap();

    let err = prepare_features(&df, None, &[]).unwrap_err();
    assert!(err.to_string().contains("missing value"));
}

#[test]
fn test_save_round_trips_through_csv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");
    let mut df = common::create_test_dataframe().drop_many(["label", "feature_noise"]);

    save_dataset(&mut df, &path).unwrap();
    let loaded = load_dataset(&path, 10000).unwrap();

    common::assert_has_columns(&loaded, &["target", "feature_good"]);
    common::assert_missing_columns(&loaded, &["label", "feature_noise"]);
}

#[test]
fn test_save_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let mut df = common::create_test_dataframe();
    let err = save_dataset(&mut df, &dir.path().join("out.json")).unwrap_err();
    assert!(err.to_string().contains("Unsupported output format"));
}
