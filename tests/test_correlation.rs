//! Unit tests for correlation matrix computation

use decorr::pipeline::{
    pairwise_matrix, CorrelationMatrix, CorrelationMethod, CorrelationOptions, FeatureTable,
    Pearson, ReductionError, Spearman, TARGET_COLUMN,
};

#[path = "common/mod.rs"]
mod common;

const EPS: f64 = 1e-10;

#[test]
fn test_perfect_positive_and_negative_correlation() {
    let table = common::create_linear_table();
    let matrix = CorrelationMatrix::compute(&table, &CorrelationOptions::default()).unwrap();

    let ab = matrix.get_by_name("a", "b").unwrap();
    let ac = matrix.get_by_name("a", "c").unwrap();
    assert!((ab - 1.0).abs() < EPS, "r(a, b) should be 1, got {}", ab);
    assert!((ac + 1.0).abs() < EPS, "r(a, c) should be -1, got {}", ac);
}

#[test]
fn test_known_coefficient() {
    let table = common::create_linear_table();
    let matrix = CorrelationMatrix::compute(&table, &CorrelationOptions::default()).unwrap();

    // Hand-computed: sum of co-deviations -10.5 over 82.5
    let ad = matrix.get_by_name("a", "d").unwrap();
    assert!((ad - (-10.5 / 82.5)).abs() < EPS, "got {}", ad);
}

#[test]
fn test_matrix_is_symmetric_with_unit_diagonal() {
    let table = common::create_mixed_table(8, 50, 7);
    let matrix = CorrelationMatrix::compute(&table, &CorrelationOptions::default()).unwrap();

    assert_eq!(matrix.len(), 8);
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), 1.0);
        for j in 0..matrix.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
            assert!((-1.0..=1.0).contains(&matrix.get(i, j)));
        }
    }
}

#[test]
fn test_gram_path_matches_pairwise_path() {
    // 20 columns is above the cutoff where the Gram product takes over
    let table = common::create_mixed_table(20, 120, 42);
    let matrix = CorrelationMatrix::compute(&table, &CorrelationOptions::default()).unwrap();

    let columns = table.columns();
    let pairwise = pairwise_matrix(&columns, false, |x, y| Pearson.coefficient(x, y));

    for i in 0..matrix.len() {
        for j in 0..matrix.len() {
            let diff = (matrix.get(i, j) - pairwise[(i, j)]).abs();
            assert!(
                diff < 1e-9,
                "entry ({}, {}) differs by {}: {} vs {}",
                i,
                j,
                diff,
                matrix.get(i, j),
                pairwise[(i, j)]
            );
        }
    }
}

fn orthogonal_extreme_table() -> FeatureTable {
    FeatureTable::new(vec![
        ("a", vec![1e160, -1e160, 1e160, -1e160]),
        ("b", vec![1e160, 1e160, -1e160, -1e160]),
    ])
    .unwrap()
}

#[test]
fn test_extreme_magnitudes_on_pairwise_path() {
    let table = orthogonal_extreme_table();

    for options in [
        CorrelationOptions::default(),
        CorrelationOptions::new().parallel(true),
    ] {
        let matrix = CorrelationMatrix::compute(&table, &options).unwrap();
        assert_eq!(matrix.get_by_name("a", "b"), Some(0.0));
    }
}

#[test]
fn test_extreme_magnitudes_on_gram_path() {
    let table = common::create_mixed_table(20, 120, 7);
    let scaled = FeatureTable::new(
        table
            .names()
            .iter()
            .zip(table.columns())
            .map(|(name, column)| (name.clone(), column.iter().map(|v| v * 1e160).collect()))
            .collect(),
    )
    .unwrap();

    let options = CorrelationOptions::default();
    let expected = CorrelationMatrix::compute(&table, &options).unwrap();
    let matrix = CorrelationMatrix::compute(&scaled, &options).unwrap();
    let columns = scaled.columns();
    let pairwise = pairwise_matrix(&columns, false, |x, y| Pearson.coefficient(x, y));

    for i in 0..matrix.len() {
        for j in 0..matrix.len() {
            let r = matrix.get(i, j);
            assert!(r.is_finite(), "entry ({}, {}) is {}", i, j, r);
            assert!((r - expected.get(i, j)).abs() < 1e-9);
            assert!((r - pairwise[(i, j)]).abs() < 1e-9);
        }
    }
}

#[derive(Debug)]
struct Undefined;

impl CorrelationMethod for Undefined {
    fn name(&self) -> &'static str {
        "undefined"
    }

    fn coefficient(&self, _x: &[f64], _y: &[f64]) -> f64 {
        f64::NAN
    }
}

#[test]
fn test_non_finite_coefficient_is_rejected() {
    let table = common::create_linear_table();
    let options = CorrelationOptions::new().method(Undefined);

    let err = CorrelationMatrix::compute(&table, &options).unwrap_err();
    assert_eq!(
        err,
        ReductionError::NonFiniteCorrelation {
            first: "a".to_string(),
            second: "b".to_string()
        }
    );
}

#[test]
fn test_parallel_matches_serial() {
    for features in [6, 18] {
        let table = common::create_mixed_table(features, 80, 3);
        let serial = CorrelationMatrix::compute(&table, &CorrelationOptions::new()).unwrap();
        let parallel =
            CorrelationMatrix::compute(&table, &CorrelationOptions::new().parallel(true)).unwrap();

        for i in 0..serial.len() {
            for j in 0..serial.len() {
                assert!((serial.get(i, j) - parallel.get(i, j)).abs() < 1e-12);
            }
        }
    }
}

#[test]
fn test_spearman_sees_monotonic_relationship() {
    let x: Vec<f64> = (1..=12).map(|v| v as f64).collect();
    let cubed: Vec<f64> = x.iter().map(|v| v * v * v).collect();
    let table = FeatureTable::new(vec![("x", x), ("cubed", cubed)]).unwrap();

    let pearson = CorrelationMatrix::compute(&table, &CorrelationOptions::new()).unwrap();
    let spearman =
        CorrelationMatrix::compute(&table, &CorrelationOptions::new().method(Spearman)).unwrap();

    assert!(pearson.get(0, 1) < 0.99, "cubic curve is not linear");
    assert!((spearman.get(0, 1) - 1.0).abs() < EPS);
}

#[test]
fn test_spearman_averages_tied_ranks() {
    // Ranks of x: 1, 2.5, 2.5, 4; y is strictly increasing
    let r = Spearman.coefficient(&[1.0, 2.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]);
    let expected = 4.5 / (4.5f64 * 5.0).sqrt();
    assert!((r - expected).abs() < EPS, "got {}, expected {}", r, expected);
}

#[test]
fn test_method_names() {
    assert_eq!(CorrelationOptions::default().method_name(), "pearson");
    assert_eq!(
        CorrelationOptions::new().method(Spearman).method_name(),
        "spearman"
    );
    assert!(!CorrelationOptions::default().is_parallel());
}

#[test]
fn test_constant_column_is_degenerate() {
    let table = FeatureTable::new(vec![
        ("varying", vec![1.0, 2.0, 3.0]),
        ("flat", vec![5.0, 5.0, 5.0]),
    ])
    .unwrap();

    let err = CorrelationMatrix::compute(&table, &CorrelationOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ReductionError::DegenerateInput {
            feature: "flat".to_string()
        }
    );
}

#[test]
fn test_single_row_is_degenerate() {
    let table = FeatureTable::new(vec![("a", vec![1.0]), ("b", vec![2.0])]).unwrap();
    let err = CorrelationMatrix::compute(&table, &CorrelationOptions::default()).unwrap_err();
    assert!(matches!(err, ReductionError::DegenerateInput { .. }));
}

#[test]
fn test_target_is_appended_last() {
    let table = common::create_linear_table();
    let target = common::create_linear_target();
    let matrix =
        CorrelationMatrix::compute_with_target(&table, &target, &CorrelationOptions::default())
            .unwrap();

    assert_eq!(matrix.len(), 5);
    assert_eq!(matrix.names()[4], TARGET_COLUMN);
    let at = matrix.get_by_name("a", TARGET_COLUMN).unwrap();
    assert!((at - 78.5 / 82.5).abs() < EPS, "got {}", at);
}

#[test]
fn test_target_name_collision_is_avoided() {
    let table = FeatureTable::new(vec![
        ("target", vec![1.0, 2.0, 4.0]),
        ("_target", vec![3.0, 1.0, 2.0]),
    ])
    .unwrap();
    let matrix = CorrelationMatrix::compute_with_target(
        &table,
        &[1.0, 0.0, 1.0],
        &CorrelationOptions::default(),
    )
    .unwrap();

    assert_eq!(matrix.names(), &common::names(&["target", "_target", "__target"])[..]);
}

#[test]
fn test_target_shape_mismatch() {
    let table = common::create_linear_table();
    let err = CorrelationMatrix::compute_with_target(
        &table,
        &[1.0, 2.0, 3.0],
        &CorrelationOptions::default(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        ReductionError::ShapeMismatch {
            table_rows: 10,
            target_rows: 3
        }
    );
}

#[test]
fn test_non_finite_target_rejected() {
    let table = FeatureTable::new(vec![("a", vec![1.0, 2.0, 3.0])]).unwrap();
    let err = CorrelationMatrix::compute_with_target(
        &table,
        &[1.0, f64::NAN, 3.0],
        &CorrelationOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ReductionError::NonFiniteValue { row: 1, .. }));
}

#[test]
fn test_split_last_separates_target() {
    let table = common::create_linear_table();
    let target = common::create_linear_target();
    let extended =
        CorrelationMatrix::compute_with_target(&table, &target, &CorrelationOptions::default())
            .unwrap();
    let plain = CorrelationMatrix::compute(&table, &CorrelationOptions::default()).unwrap();

    let (features, with_target) = extended.split_last().unwrap();
    assert_eq!(features.names(), plain.names());
    assert_eq!(with_target.len(), 4);
    for i in 0..plain.len() {
        assert!((with_target[i] - extended.get(i, 4)).abs() < EPS);
        for j in 0..plain.len() {
            assert!((features.get(i, j) - plain.get(i, j)).abs() < EPS);
        }
    }
}

#[test]
fn test_from_rows_validation() {
    let names = common::names(&["a", "b"]);

    let ok = CorrelationMatrix::from_rows(names.clone(), vec![vec![1.0, 0.5], vec![0.5, 1.0]]);
    assert!(ok.is_ok());

    let cases = vec![
        vec![vec![1.0, 0.5]],                   // not square
        vec![vec![1.0, 0.5], vec![0.4, 1.0]],   // asymmetric
        vec![vec![1.0, 1.5], vec![1.5, 1.0]],   // out of range
        vec![vec![0.9, 0.5], vec![0.5, 1.0]],   // bad diagonal
    ];
    for rows in cases {
        let err = CorrelationMatrix::from_rows(names.clone(), rows.clone()).unwrap_err();
        assert!(
            matches!(err, ReductionError::InvalidMatrix(_)),
            "rows {:?} should be rejected, got {:?}",
            rows,
            err
        );
    }
}

#[test]
fn test_empty_table_gives_empty_matrix() {
    let matrix =
        CorrelationMatrix::compute(&FeatureTable::empty(), &CorrelationOptions::default()).unwrap();
    assert!(matrix.is_empty());
    assert!(matrix.split_last().is_none());
}
