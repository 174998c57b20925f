//! Persisting analysis results
//!
//! A `ReportSink` is the capability the caller hands to the export step. The
//! filters never write anything themselves; the CLI decides whether to build a
//! sink and treats export failures as warnings.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use polars::prelude::*;

use crate::pipeline::table::unique_name;
use crate::pipeline::{CorrelationMatrix, FeatureScore, RedundancyAnalysis, RelevanceAnalysis};
use crate::report::ReductionReport;

/// Destination for exported matrices, score vectors, drop-lists and reports.
pub trait ReportSink {
    /// Matrix as a 2-D table: one label column, then one column per feature.
    fn write_matrix(&mut self, stem: &str, matrix: &CorrelationMatrix) -> Result<()>;

    fn write_scores(&mut self, stem: &str, scores: &[FeatureScore]) -> Result<()>;

    /// Drop-list as a 1-D table.
    fn write_drop_list(&mut self, stem: &str, dropped: &[String]) -> Result<()>;

    fn write_report(&mut self, report: &ReductionReport) -> Result<()>;
}

/// Write matrix, scores and drop-list of a relevance analysis under `relevance_*`.
pub fn export_relevance(sink: &mut dyn ReportSink, analysis: &RelevanceAnalysis) -> Result<()> {
    sink.write_matrix("relevance", &analysis.matrix)?;
    sink.write_scores("relevance", &analysis.scores)?;
    sink.write_drop_list("relevance", &analysis.dropped)
}

/// Write matrix, scores and drop-list of a redundancy analysis under `redundancy_*`.
pub fn export_redundancy(sink: &mut dyn ReportSink, analysis: &RedundancyAnalysis) -> Result<()> {
    sink.write_matrix("redundancy", &analysis.matrix)?;
    sink.write_scores("redundancy", &analysis.scores)?;
    sink.write_drop_list("redundancy", &analysis.dropped)
}

/// Directory name for a run started at `at`, e.g. `decorr_20240102_030405`.
pub fn timestamped_dir_name(at: NaiveDateTime) -> String {
    format!("decorr_{}", at.format("%Y%m%d_%H%M%S"))
}

/// Writes CSV tables and a JSON report into one directory.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Create a fresh timestamp-named directory under `parent`.
    pub fn timestamped(parent: &Path) -> Result<Self> {
        Self::new(parent.join(timestamped_dir_name(Local::now().naive_local())))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Path for a file inside the sink directory, for collaborators such as
    /// the SVG heatmap that write their own files.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    fn write_csv(&mut self, file_name: &str, df: &mut DataFrame) -> Result<()> {
        let path = self.dir.join(file_name);
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        CsvWriter::new(&mut file)
            .finish(df)
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        self.written.push(path);
        Ok(())
    }
}

impl ReportSink for DirectorySink {
    fn write_matrix(&mut self, stem: &str, matrix: &CorrelationMatrix) -> Result<()> {
        let names = matrix.names();
        let label = unique_name("feature", names);

        let mut columns: Vec<Column> = Vec::with_capacity(names.len() + 1);
        columns.push(Column::new(label.into(), names.to_vec()));
        for (j, name) in names.iter().enumerate() {
            let values: Vec<f64> = (0..matrix.len()).map(|i| matrix.get(i, j)).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }

        let mut df = DataFrame::new(columns).context("Failed to build matrix table")?;
        self.write_csv(&format!("{}_matrix.csv", stem), &mut df)
    }

    fn write_scores(&mut self, stem: &str, scores: &[FeatureScore]) -> Result<()> {
        let features: Vec<String> = scores.iter().map(|s| s.feature.clone()).collect();
        let values: Vec<f64> = scores.iter().map(|s| s.score).collect();

        let mut df = DataFrame::new(vec![
            Column::new("feature".into(), features),
            Column::new("score".into(), values),
        ])
        .context("Failed to build score table")?;
        self.write_csv(&format!("{}_scores.csv", stem), &mut df)
    }

    fn write_drop_list(&mut self, stem: &str, dropped: &[String]) -> Result<()> {
        let mut df = DataFrame::new(vec![Column::new(
            "dropped_feature".into(),
            dropped.to_vec(),
        )])
        .context("Failed to build drop-list table")?;
        self.write_csv(&format!("{}_dropped.csv", stem), &mut df)
    }

    fn write_report(&mut self, report: &ReductionReport) -> Result<()> {
        let path = self.dir.join("reduction_report.json");
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), report)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        self.written.push(path);
        Ok(())
    }
}
