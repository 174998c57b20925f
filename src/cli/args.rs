//! Command-line argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::pipeline::{CorrelationOptions, Pearson, Spearman, DEFAULT_THRESHOLD};

/// Decorr - Drop redundant and target-irrelevant features using pairwise correlation
#[derive(Parser, Debug)]
#[command(name = "decorr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target column name (preserved during reduction).
    /// Required for the relevance step and the target tie-break.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Output file path (CSV or Parquet, determined by extension).
    /// Defaults to input directory with '_reduced' suffix (e.g., data.csv -> data_reduced.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Relevance threshold - drop features whose |correlation| with the target is below this value.
    /// The step is skipped unless a value is given. Typical values are 0.01 to 0.02.
    #[arg(long, value_parser = validate_threshold)]
    pub relevance_threshold: Option<f64>,

    /// Correlation threshold - drop one feature from pairs with |correlation| at or above this value
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = validate_threshold)]
    pub correlation_threshold: f64,

    /// Which member of a correlated pair survives.
    /// Defaults to "target" when a target is given, otherwise "mean".
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreakArg>,

    /// Correlation coefficient
    #[arg(long, value_enum, default_value_t = MethodArg::Pearson)]
    pub method: MethodArg,

    /// Evaluate column pairs in parallel
    #[arg(long, default_value = "false")]
    pub parallel: bool,

    /// Columns to drop before processing (comma-separated).
    /// These columns will be removed from the dataset before any analysis.
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Export matrices, scores, drop-lists and a JSON report
    #[arg(long, default_value = "false")]
    pub report: bool,

    /// Directory for exported files.
    /// Defaults to a timestamped directory next to the input file.
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Render a heatmap of the redundancy matrix (terminal; also SVG with --report)
    #[arg(long, default_value = "false")]
    pub plot: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreakArg {
    /// Keep the feature more correlated with the target
    Target,
    /// Keep the feature with the higher mean correlation to all other features
    Mean,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    Pearson,
    Spearman,
}

impl MethodArg {
    /// Library options for this coefficient.
    pub fn options(self, parallel: bool) -> CorrelationOptions {
        let options = CorrelationOptions::new().parallel(parallel);
        match self {
            MethodArg::Pearson => options.method(Pearson),
            MethodArg::Spearman => options.method(Spearman),
        }
    }
}

impl Cli {
    /// Get the output path, deriving from input if not explicitly provided.
    /// The derived path will be in the same directory as the input with a '_reduced' suffix.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            let extension = self
                .input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("parquet");
            self.input_dir()
                .join(format!("{}_reduced.{}", stem, extension))
        })
    }

    /// Directory containing the input file.
    pub fn input_dir(&self) -> &Path {
        self.input.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Effective tie-break: explicit choice, else target when available.
    pub fn tie_break(&self) -> TieBreakArg {
        self.tie_break.unwrap_or(if self.target.is_some() {
            TieBreakArg::Target
        } else {
            TieBreakArg::Mean
        })
    }

    /// Check flag combinations that clap cannot express on its own.
    pub fn validate(&self) -> Result<(), String> {
        if self.target.is_none() {
            if self.relevance_threshold.is_some() {
                return Err("--relevance-threshold requires a target column (-t/--target)".into());
            }
            if self.tie_break == Some(TieBreakArg::Target) {
                return Err("--tie-break target requires a target column (-t/--target)".into());
            }
        }
        if self.report_dir.is_some() && !self.report {
            return Err("--report-dir has no effect without --report".into());
        }
        Ok(())
    }
}

/// Validator for correlation thresholds
fn validate_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "threshold must be between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
