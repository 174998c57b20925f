//! Pairwise redundancy filter
//!
//! Scans the strict upper triangle of the feature×feature matrix in row-major
//! order. For every pair at or above the threshold whose members are both still
//! in play, the member with the lower tie-break score is marked for removal.
//! A marked feature never takes part in another comparison.
//!
//! On an exact score tie the earlier column (lower index) is dropped. Both
//! tie-break variants follow this rule.

use serde::Serialize;

use super::correlation::{CorrelationMatrix, CorrelationOptions, FeatureScore};
use super::error::{check_threshold, ReductionError};
use super::table::FeatureTable;

/// Source of the per-feature score that decides which member of a pair goes.
#[derive(Debug, Clone, Copy)]
pub enum TieBreak<'a> {
    /// `|r(feature, target)|`; requires a row-aligned target.
    TargetCorrelation(&'a [f64]),
    /// Mean `|r(feature, other)|` over all other features.
    MeanCorrelation,
}

impl TieBreak<'_> {
    pub fn kind(&self) -> TieBreakKind {
        match self {
            TieBreak::TargetCorrelation(_) => TieBreakKind::Target,
            TieBreak::MeanCorrelation => TieBreakKind::Mean,
        }
    }
}

/// Data-free label of a [`TieBreak`], for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreakKind {
    Target,
    Mean,
}

impl std::fmt::Display for TieBreakKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreakKind::Target => write!(f, "target correlation"),
            TieBreakKind::Mean => write!(f, "mean correlation"),
        }
    }
}

/// One resolved over-threshold pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedundantPair {
    pub kept: String,
    pub dropped: String,
    pub correlation: f64,
    pub kept_score: f64,
    pub dropped_score: f64,
}

/// Result of a redundancy analysis.
#[derive(Debug, Clone)]
pub struct RedundancyAnalysis {
    /// Feature×feature matrix.
    pub matrix: CorrelationMatrix,
    /// Tie-break score per feature, in table order.
    pub scores: Vec<FeatureScore>,
    /// Decisions in scan order.
    pub pairs: Vec<RedundantPair>,
    /// Dropped features in the order they were marked.
    pub dropped: Vec<String>,
    pub threshold: f64,
    pub tie_break: TieBreakKind,
}

/// Redundancy filter using each feature's absolute Pearson correlation with
/// `target` as the tie-break.
pub fn select_redundant_by_target(
    table: &FeatureTable,
    target: &[f64],
    threshold: f64,
) -> Result<Vec<String>, ReductionError> {
    analyze_redundancy(
        table,
        TieBreak::TargetCorrelation(target),
        threshold,
        &CorrelationOptions::default(),
    )
    .map(|analysis| analysis.dropped)
}

/// Redundancy filter using each feature's mean absolute Pearson correlation
/// with the other features as the tie-break.
pub fn select_redundant_by_mean_correlation(
    table: &FeatureTable,
    threshold: f64,
) -> Result<Vec<String>, ReductionError> {
    analyze_redundancy(
        table,
        TieBreak::MeanCorrelation,
        threshold,
        &CorrelationOptions::default(),
    )
    .map(|analysis| analysis.dropped)
}

/// Redundancy filter keeping the matrix, scores and pair decisions.
pub fn analyze_redundancy(
    table: &FeatureTable,
    tie_break: TieBreak<'_>,
    threshold: f64,
    options: &CorrelationOptions,
) -> Result<RedundancyAnalysis, ReductionError> {
    let required = match tie_break {
        TieBreak::TargetCorrelation(_) => 1,
        TieBreak::MeanCorrelation => 2,
    };
    if table.n_features() < required {
        return Err(ReductionError::EmptyInput {
            required,
            found: table.n_features(),
        });
    }
    check_threshold(threshold)?;

    let (matrix, scores) = match tie_break {
        TieBreak::TargetCorrelation(target) => {
            // One matrix build serves both the pair scan and the scores
            let extended = CorrelationMatrix::compute_with_target(table, target, options)?;
            let (matrix, with_target) = extended.split_last().ok_or_else(|| {
                ReductionError::InvalidMatrix("target column missing".to_string())
            })?;
            let scores: Vec<f64> = with_target.into_iter().map(f64::abs).collect();
            (matrix, scores)
        }
        TieBreak::MeanCorrelation => {
            let matrix = CorrelationMatrix::compute(table, options)?;
            let scores = mean_abs_correlation(&matrix);
            (matrix, scores)
        }
    };

    let pairs = scan_redundant_pairs(&matrix, &scores, threshold)?;
    let dropped = pairs.iter().map(|p| p.dropped.clone()).collect();
    let scores = matrix
        .names()
        .iter()
        .zip(scores)
        .map(|(name, score)| FeatureScore {
            feature: name.clone(),
            score,
        })
        .collect();

    Ok(RedundancyAnalysis {
        matrix,
        scores,
        pairs,
        dropped,
        threshold,
        tie_break: tie_break.kind(),
    })
}

/// Mean absolute correlation of each feature with every other feature.
/// A single feature scores 0.
pub fn mean_abs_correlation(matrix: &CorrelationMatrix) -> Vec<f64> {
    let k = matrix.len();
    if k < 2 {
        return vec![0.0; k];
    }

    (0..k)
        .map(|i| {
            let total: f64 = (0..k)
                .filter(|&j| j != i)
                .map(|j| matrix.get(i, j).abs())
                .sum();
            total / (k - 1) as f64
        })
        .collect()
}

/// Triangular scan with exclusion.
///
/// `scores` is indexed like the matrix. Returns one entry per marked feature,
/// in marking order.
pub fn scan_redundant_pairs(
    matrix: &CorrelationMatrix,
    scores: &[f64],
    threshold: f64,
) -> Result<Vec<RedundantPair>, ReductionError> {
    if scores.len() != matrix.len() {
        return Err(ReductionError::ScoreLengthMismatch {
            expected: matrix.len(),
            found: scores.len(),
        });
    }

    let k = matrix.len();
    let names = matrix.names();
    let mut marked = vec![false; k];
    let mut pairs = Vec::new();

    for i in 0..k {
        for j in (i + 1)..k {
            if marked[i] {
                break;
            }
            if marked[j] {
                continue;
            }

            let correlation = matrix.get(i, j);
            if correlation.abs() < threshold {
                continue;
            }

            let (drop, keep) = if scores[i] <= scores[j] {
                (i, j)
            } else {
                (j, i)
            };
            marked[drop] = true;
            pairs.push(RedundantPair {
                kept: names[keep].clone(),
                dropped: names[drop].clone(),
                correlation,
                kept_score: scores[keep],
                dropped_score: scores[drop],
            });
        }
    }

    Ok(pairs)
}
