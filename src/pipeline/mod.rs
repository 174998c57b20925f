//! Pipeline module - correlation analysis and the filters built on it

pub mod correlation;
pub mod error;
pub mod loader;
pub mod redundancy;
pub mod relevance;
pub mod table;

pub use correlation::*;
pub use error::ReductionError;
pub use loader::*;
pub use redundancy::*;
pub use relevance::*;
pub use table::FeatureTable;
