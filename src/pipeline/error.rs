//! Error types for correlation analysis.
//!
//! Every core operation returns `ReductionError`. The application layers
//! (loader, report, CLI) wrap these in `anyhow` with additional context.

use thiserror::Error;

/// Errors raised by the correlation filters and their inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReductionError {
    /// Target vector and feature table disagree on the number of rows.
    #[error("target has {target_rows} row(s) but the feature table has {table_rows}")]
    ShapeMismatch {
        table_rows: usize,
        target_rows: usize,
    },

    /// Not enough features to run the operation.
    #[error("at least {required} feature(s) required, found {found}")]
    EmptyInput { required: usize, found: usize },

    /// A column has zero variance, so its correlation is undefined.
    #[error("column '{feature}' has zero variance; correlation is undefined")]
    DegenerateInput { feature: String },

    /// Threshold outside [0, 1] or NaN.
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("column '{feature}' has no values")]
    EmptyColumn { feature: String },

    #[error("column '{feature}' has {found} row(s), expected {expected}")]
    RaggedColumn {
        feature: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate feature name '{feature}'")]
    DuplicateFeature { feature: String },

    #[error("column '{feature}' has a non-finite value at row {row}")]
    NonFiniteValue { feature: String, row: usize },

    #[error("invalid correlation matrix: {0}")]
    InvalidMatrix(String),

    /// A coefficient came out NaN or infinite.
    #[error("correlation between '{first}' and '{second}' is not finite")]
    NonFiniteCorrelation { first: String, second: String },

    /// Tie-break scores not indexed like the matrix.
    #[error("{found} score(s) supplied for a matrix of {expected} feature(s)")]
    ScoreLengthMismatch { expected: usize, found: usize },
}

/// Reject thresholds outside `[0, 1]`.
pub(crate) fn check_threshold(threshold: f64) -> Result<(), ReductionError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ReductionError::InvalidThreshold(threshold))
    }
}
