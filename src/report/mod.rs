//! Report module - summarizing, exporting and visualizing reduction results

pub mod export;
pub mod heatmap;
pub mod reduction_report;
pub mod summary;

pub use export::*;
pub use heatmap::*;
pub use reduction_report::*;
pub use summary::*;
