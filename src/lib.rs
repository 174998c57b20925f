//! Decorr: Correlation-based Feature Pre-filtering Library
//!
//! Drops target-irrelevant and redundant numeric features using pairwise
//! correlation, ahead of heavier reduction techniques such as PCA.
//!
//! ```no_run
//! use decorr::pipeline::{select_low_relevance, select_redundant_by_target, FeatureTable};
//!
//! let table = FeatureTable::new(vec![
//!     ("a", vec![1.0, 2.0, 3.0, 4.0]),
//!     ("b", vec![2.0, 4.1, 5.9, 8.0]),
//!     ("c", vec![4.0, 1.0, 3.0, 2.0]),
//! ])?;
//! let target = [0.0, 1.0, 1.0, 2.0];
//!
//! let weak = select_low_relevance(&table, &target, 0.02)?;
//! let redundant = select_redundant_by_target(&table, &target, 0.95)?;
//! # Ok::<(), decorr::pipeline::ReductionError>(())
//! ```

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
