//! Target relevance filter
//!
//! Drops features whose absolute correlation with the target falls below a
//! threshold. This only sees linear (or, with Spearman, monotonic) association:
//! a feature with a parabolic relationship to the target scores near zero and
//! is still dropped, so callers should inspect the candidates before applying
//! the list.

use super::correlation::{CorrelationMatrix, CorrelationOptions, FeatureScore};
use super::error::{check_threshold, ReductionError};
use super::table::FeatureTable;

/// Default threshold for every filter. For relevance filtering a much lower
/// value (0.01 to 0.02) is usually what you want.
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// Result of a relevance analysis.
#[derive(Debug, Clone)]
pub struct RelevanceAnalysis {
    /// Features plus the target appended as the last row/column.
    pub matrix: CorrelationMatrix,
    /// `|r(feature, target)|` in table order.
    pub scores: Vec<FeatureScore>,
    /// Features with `|r| < threshold`, in table order.
    pub dropped: Vec<String>,
    pub threshold: f64,
}

/// Names of the features whose absolute Pearson correlation with `target` is
/// strictly below `threshold`, in table order.
pub fn select_low_relevance(
    table: &FeatureTable,
    target: &[f64],
    threshold: f64,
) -> Result<Vec<String>, ReductionError> {
    analyze_relevance(table, target, threshold, &CorrelationOptions::default())
        .map(|analysis| analysis.dropped)
}

/// Relevance filter keeping the matrix and scores for reporting.
pub fn analyze_relevance(
    table: &FeatureTable,
    target: &[f64],
    threshold: f64,
    options: &CorrelationOptions,
) -> Result<RelevanceAnalysis, ReductionError> {
    if table.is_empty() {
        return Err(ReductionError::EmptyInput {
            required: 1,
            found: 0,
        });
    }
    check_threshold(threshold)?;

    let matrix = CorrelationMatrix::compute_with_target(table, target, options)?;
    let target_index = matrix.len() - 1;

    let scores: Vec<FeatureScore> = table
        .names()
        .iter()
        .enumerate()
        .map(|(i, name)| FeatureScore {
            feature: name.clone(),
            score: matrix.get(i, target_index).abs(),
        })
        .collect();

    let dropped = scores
        .iter()
        .filter(|s| s.score < threshold)
        .map(|s| s.feature.clone())
        .collect();

    Ok(RelevanceAnalysis {
        matrix,
        scores,
        dropped,
        threshold,
    })
}
