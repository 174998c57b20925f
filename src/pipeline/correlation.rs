//! Correlation matrix computation
//!
//! The matrix is the one shared primitive behind both filters. It is built
//! once per operation, is symmetric with a unit diagonal, and never holds NaN:
//! constant columns are rejected with `ReductionError::DegenerateInput` before
//! any coefficient is computed, and a coefficient that still comes out
//! non-finite fails with `ReductionError::NonFiniteCorrelation`.

use std::fmt;
use std::sync::Arc;

use faer::Mat;
use rayon::prelude::*;
use serde::Serialize;

use super::error::ReductionError;
use super::table::{is_constant, unique_name, FeatureTable};

/// Name given to the target column when it is appended to a matrix.
/// Prefixed with underscores if a feature already uses it.
pub const TARGET_COLUMN: &str = "target";

/// Threshold for auto-selecting matrix vs pairwise correlation computation.
/// The Gram-matrix product wins once there are many columns.
const MATRIX_METHOD_COLUMN_THRESHOLD: usize = 15;

/// Tolerance used when validating externally supplied matrices.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A pairwise correlation coefficient.
///
/// Implementations receive equal-length, non-constant columns. `matrix` may be
/// overridden when a whole-matrix formulation is cheaper than evaluating the
/// upper triangle pair by pair.
pub trait CorrelationMethod: Send + Sync + fmt::Debug {
    /// Short lowercase identifier used in reports.
    fn name(&self) -> &'static str;

    /// Coefficient in [-1, 1] for two columns.
    fn coefficient(&self, x: &[f64], y: &[f64]) -> f64;

    /// Full symmetric matrix with a unit diagonal.
    fn matrix(&self, columns: &[&[f64]], parallel: bool) -> Mat<f64> {
        pairwise_matrix(columns, parallel, |x, y| self.coefficient(x, y))
    }
}

/// Pearson product-moment correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pearson;

impl CorrelationMethod for Pearson {
    fn name(&self) -> &'static str {
        "pearson"
    }

    fn coefficient(&self, x: &[f64], y: &[f64]) -> f64 {
        pearson(x, y)
    }

    fn matrix(&self, columns: &[&[f64]], parallel: bool) -> Mat<f64> {
        if columns.len() >= MATRIX_METHOD_COLUMN_THRESHOLD {
            gram_matrix(columns, parallel)
        } else {
            pairwise_matrix(columns, parallel, pearson)
        }
    }
}

/// Spearman rank correlation: Pearson over average ranks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spearman;

impl CorrelationMethod for Spearman {
    fn name(&self) -> &'static str {
        "spearman"
    }

    fn coefficient(&self, x: &[f64], y: &[f64]) -> f64 {
        pearson(&average_ranks(x), &average_ranks(y))
    }

    fn matrix(&self, columns: &[&[f64]], parallel: bool) -> Mat<f64> {
        let ranked: Vec<Vec<f64>> = if parallel {
            columns.par_iter().map(|c| average_ranks(c)).collect()
        } else {
            columns.iter().map(|c| average_ranks(c)).collect()
        };
        let refs: Vec<&[f64]> = ranked.iter().map(Vec::as_slice).collect();
        Pearson.matrix(&refs, parallel)
    }
}

/// Options shared by every correlation-based operation.
#[derive(Debug, Clone)]
pub struct CorrelationOptions {
    method: Arc<dyn CorrelationMethod>,
    parallel: bool,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            method: Arc::new(Pearson),
            parallel: false,
        }
    }
}

impl CorrelationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method<M: CorrelationMethod + 'static>(mut self, method: M) -> Self {
        self.method = Arc::new(method);
        self
    }

    /// Evaluate column pairs on the rayon thread pool.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn method_name(&self) -> &'static str {
        self.method.name()
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

/// A feature's score as used by a filter (target correlation or mean correlation).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureScore {
    pub feature: String,
    pub score: f64,
}

/// Square, symmetric correlation matrix indexed by column name.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    values: Mat<f64>,
}

impl CorrelationMatrix {
    /// Feature×feature matrix for every column of `table`.
    pub fn compute(
        table: &FeatureTable,
        options: &CorrelationOptions,
    ) -> Result<Self, ReductionError> {
        Self::from_columns(table.names().to_vec(), table.columns(), options)
    }

    /// Matrix over the features plus `target`, appended as the last row/column
    /// under the name [`TARGET_COLUMN`].
    pub fn compute_with_target(
        table: &FeatureTable,
        target: &[f64],
        options: &CorrelationOptions,
    ) -> Result<Self, ReductionError> {
        if target.len() != table.n_rows() {
            return Err(ReductionError::ShapeMismatch {
                table_rows: table.n_rows(),
                target_rows: target.len(),
            });
        }

        let target_name = unique_name(TARGET_COLUMN, table.names());
        if let Some(row) = target.iter().position(|v| !v.is_finite()) {
            return Err(ReductionError::NonFiniteValue {
                feature: target_name,
                row,
            });
        }

        let mut names = table.names().to_vec();
        names.push(target_name);
        let mut columns = table.columns();
        columns.push(target);

        Self::from_columns(names, columns, options)
    }

    fn from_columns(
        names: Vec<String>,
        columns: Vec<&[f64]>,
        options: &CorrelationOptions,
    ) -> Result<Self, ReductionError> {
        if let Some(i) = columns.iter().position(|c| is_constant(c)) {
            return Err(ReductionError::DegenerateInput {
                feature: names[i].clone(),
            });
        }

        let raw = options.method.matrix(&columns, options.parallel);
        let k = columns.len();

        // Enforce exact symmetry and the unit diagonal regardless of how the
        // method arrived at its numbers.
        let mut values = Mat::<f64>::zeros(k, k);
        for i in 0..k {
            values[(i, i)] = 1.0;
            for j in (i + 1)..k {
                if !raw[(i, j)].is_finite() {
                    return Err(ReductionError::NonFiniteCorrelation {
                        first: names[i].clone(),
                        second: names[j].clone(),
                    });
                }
                let r = raw[(i, j)].clamp(-1.0, 1.0);
                values[(i, j)] = r;
                values[(j, i)] = r;
            }
        }

        Ok(Self { names, values })
    }

    /// Build a matrix from explicit rows, e.g. one computed elsewhere.
    ///
    /// Rows must be square, symmetric, within [-1, 1] and have a unit diagonal.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, ReductionError> {
        let k = names.len();
        if rows.len() != k || rows.iter().any(|row| row.len() != k) {
            return Err(ReductionError::InvalidMatrix(format!(
                "expected {k}x{k} values for {k} names"
            )));
        }

        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                if !(-1.0..=1.0).contains(&v) {
                    return Err(ReductionError::InvalidMatrix(format!(
                        "entry ({i}, {j}) = {v} is outside [-1, 1]"
                    )));
                }
                if (v - rows[j][i]).abs() > SYMMETRY_TOLERANCE {
                    return Err(ReductionError::InvalidMatrix(format!(
                        "entry ({i}, {j}) differs from ({j}, {i})"
                    )));
                }
            }
            if (row[i] - 1.0).abs() > SYMMETRY_TOLERANCE {
                return Err(ReductionError::InvalidMatrix(format!(
                    "diagonal entry {i} is {}, expected 1",
                    row[i]
                )));
            }
        }

        let values = Mat::from_fn(k, k, |i, j| rows[i][j]);
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.get(self.index_of(a)?, self.index_of(b)?))
    }

    /// Dense row-major copy of the coefficients.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.len())
            .map(|i| (0..self.len()).map(|j| self.get(i, j)).collect())
            .collect()
    }

    /// Split off the last row/column (the appended target): returns the
    /// remaining matrix and each remaining column's coefficient with it.
    pub fn split_last(&self) -> Option<(CorrelationMatrix, Vec<f64>)> {
        let k = self.len().checked_sub(1)?;
        let values = Mat::from_fn(k, k, |i, j| self.values[(i, j)]);
        let last = (0..k).map(|i| self.values[(i, k)]).collect();
        Some((
            CorrelationMatrix {
                names: self.names[..k].to_vec(),
                values,
            },
            last,
        ))
    }
}

/// Evaluate the upper triangle pair by pair and mirror it.
pub fn pairwise_matrix<F>(columns: &[&[f64]], parallel: bool, coefficient: F) -> Mat<f64>
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    let k = columns.len();

    // Generate all pairs (indices for upper triangle)
    let pairs: Vec<(usize, usize)> = (0..k)
        .flat_map(|i| ((i + 1)..k).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<f64> = if parallel {
        pairs
            .par_iter()
            .map(|&(i, j)| coefficient(columns[i], columns[j]))
            .collect()
    } else {
        pairs
            .iter()
            .map(|&(i, j)| coefficient(columns[i], columns[j]))
            .collect()
    };

    let mut matrix = Mat::<f64>::zeros(k, k);
    for i in 0..k {
        matrix[(i, i)] = 1.0;
    }
    for (&(i, j), r) in pairs.iter().zip(coefficients) {
        matrix[(i, j)] = r;
        matrix[(j, i)] = r;
    }
    matrix
}

/// Compute the Pearson matrix with a single matrix product.
///
/// Algorithm:
/// 1. Center each column and scale it to unit norm: z = (x - mean) / ||x - mean||,
///    working on x / max|x| so the norm stays finite
/// 2. Stack the columns into Z (n_rows x n_cols)
/// 3. R = Z^T * Z
fn gram_matrix(columns: &[&[f64]], parallel: bool) -> Mat<f64> {
    let k = columns.len();
    let n = columns.first().map_or(0, |c| c.len());

    let standardize = |column: &&[f64]| -> Vec<f64> {
        let (scale, mean) = unit_scale(column);
        let centered: Vec<f64> = column.iter().map(|v| v / scale - mean).collect();
        let norm = centered.iter().map(|d| d * d).sum::<f64>().sqrt();
        centered.into_iter().map(|d| d / norm).collect()
    };

    let standardized: Vec<Vec<f64>> = if parallel {
        columns.par_iter().map(standardize).collect()
    } else {
        columns.iter().map(standardize).collect()
    };

    let z = Mat::<f64>::from_fn(n, k, |row, col| standardized[col][row]);
    z.transpose() * &z
}

/// Largest magnitude in a column, and the column mean after dividing by it.
///
/// Dividing by the magnitude first keeps every deviation within [-2, 2], so
/// sums of squares stay finite for values near `f64::MAX` and do not vanish
/// for tiny ones. An all-zero column gets a scale of 1.
fn unit_scale(column: &[f64]) -> (f64, f64) {
    let scale = column.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 {
        return (1.0, 0.0);
    }
    let mean = column.iter().map(|v| v / scale).sum::<f64>() / column.len() as f64;
    (scale, mean)
}

/// Two-pass Pearson correlation. Returns NaN when either column is constant.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (scale_x, mean_x) = unit_scale(x);
    let (scale_y, mean_y) = unit_scale(y);

    let (cov, var_x, var_y) =
        x.iter()
            .zip(y.iter())
            .fold((0.0, 0.0, 0.0), |(cov, vx, vy), (&xi, &yi)| {
                let dx = xi / scale_x - mean_x;
                let dy = yi / scale_y - mean_y;
                (cov + dx * dy, vx + dx * dx, vy + dy * dy)
            });

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// 1-based ranks; tied values share the mean of their positions.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + end - 1) as f64 / 2.0 + 1.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}
