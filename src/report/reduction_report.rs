//! Comprehensive feature reduction report generation
//!
//! Generates a detailed JSON report documenting all features, their analysis results,
//! and the reasons for dropping or keeping each feature.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{RedundancyAnalysis, RedundantPair, RelevanceAnalysis, TieBreakKind};
use crate::report::ReductionSummary;

/// Drop stage enum for tracking where feature was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DropStage {
    Constant,
    Relevance,
    Redundancy,
}

impl DropStage {
    fn order(self) -> u8 {
        match self {
            DropStage::Constant => 0,
            DropStage::Relevance => 1,
            DropStage::Redundancy => 2,
        }
    }
}

/// Target relevance result for a feature
#[derive(Debug, Clone, Serialize)]
pub struct RelevanceEntry {
    pub target_correlation: f64,
    pub threshold: f64,
    pub passed: bool,
}

/// Redundancy result for a feature
#[derive(Debug, Clone, Serialize)]
pub struct RedundancyEntry {
    pub tie_break_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_correlation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlated_with: Option<String>,
    pub threshold: f64,
    pub passed: bool,
}

/// Complete analysis for a feature
#[derive(Debug, Clone, Serialize)]
pub struct FeatureAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<RelevanceEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redundancy: Option<RedundancyEntry>,
}

/// Single feature entry in the report
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReportEntry {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped_at_stage: Option<DropStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub analysis: FeatureAnalysis,
}

/// Thresholds used in the analysis
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    pub redundancy: f64,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub decorr_version: String,
    pub input_file: String,
    pub output_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,
    pub method: String,
    pub tie_break: TieBreakKind,
    pub thresholds: ThresholdsConfig,
}

/// Stage-level summary
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub dropped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_used: Option<f64>,
}

/// By-stage breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ByStage {
    pub constant: StageSummary,
    pub relevance: StageSummary,
    pub redundancy: StageSummary,
}

/// Timing information in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimingInfo {
    pub load_ms: u64,
    pub relevance_ms: u64,
    pub redundancy_ms: u64,
    pub save_ms: u64,
    pub total_ms: u64,
}

/// Report summary
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub initial_features: usize,
    pub final_features: usize,
    pub dropped_count: usize,
    pub by_stage: ByStage,
    pub timing: TimingInfo,
}

/// Complete reduction report
#[derive(Debug, Clone, Serialize)]
pub struct ReductionReport {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    pub redundant_pairs: Vec<RedundantPair>,
    pub features: Vec<FeatureReportEntry>,
}

/// Parameters for creating a ReductionReportBuilder
pub struct ReportBuilderParams {
    pub input_file: String,
    pub output_file: String,
    pub target_column: Option<String>,
    pub method: String,
    pub tie_break: TieBreakKind,
    pub relevance_threshold: Option<f64>,
    pub redundancy_threshold: f64,
}

/// Builder for constructing the reduction report during pipeline execution
pub struct ReductionReportBuilder {
    params: ReportBuilderParams,

    // Feature list as seen before the first stage
    all_features: Vec<String>,

    dropped_constant: HashSet<String>,

    relevance_scores: HashMap<String, f64>,
    dropped_relevance: HashSet<String>,

    redundancy_scores: HashMap<String, f64>,
    // feature -> (strongest partner, coefficient)
    strongest_partner: HashMap<String, (String, f64)>,
    redundant_pairs: Vec<RedundantPair>,

    timing: TimingInfo,
}

impl ReductionReportBuilder {
    pub fn new(params: ReportBuilderParams) -> Self {
        Self {
            params,
            all_features: Vec::new(),
            dropped_constant: HashSet::new(),
            relevance_scores: HashMap::new(),
            dropped_relevance: HashSet::new(),
            redundancy_scores: HashMap::new(),
            strongest_partner: HashMap::new(),
            redundant_pairs: Vec::new(),
            timing: TimingInfo::default(),
        }
    }

    /// Record the features entering the pipeline
    pub fn set_features(&mut self, features: &[String]) {
        self.all_features = features.to_vec();
    }

    pub fn set_constant_drops(&mut self, dropped: &[String]) {
        self.dropped_constant = dropped.iter().cloned().collect();
    }

    pub fn set_relevance_results(&mut self, analysis: &RelevanceAnalysis, applied: bool) {
        self.relevance_scores = analysis
            .scores
            .iter()
            .map(|s| (s.feature.clone(), s.score))
            .collect();
        if applied {
            self.dropped_relevance = analysis.dropped.iter().cloned().collect();
        }
    }

    pub fn set_redundancy_results(&mut self, analysis: &RedundancyAnalysis, applied: bool) {
        self.redundancy_scores = analysis
            .scores
            .iter()
            .map(|s| (s.feature.clone(), s.score))
            .collect();

        // Strongest partner per feature, for the report's context columns
        let matrix = &analysis.matrix;
        for (i, name) in matrix.names().iter().enumerate() {
            let strongest = (0..matrix.len())
                .filter(|&j| j != i)
                .map(|j| (j, matrix.get(i, j)))
                .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()));
            if let Some((j, r)) = strongest {
                self.strongest_partner
                    .insert(name.clone(), (matrix.names()[j].clone(), r));
            }
        }

        if applied {
            self.redundant_pairs = analysis.pairs.clone();
        }
    }

    /// Set timing information from the ReductionSummary
    pub fn set_timing(&mut self, summary: &ReductionSummary) {
        self.timing = TimingInfo {
            load_ms: summary.load_time.as_millis() as u64,
            relevance_ms: summary.relevance_time.as_millis() as u64,
            redundancy_ms: summary.redundancy_time.as_millis() as u64,
            save_ms: summary.save_time.as_millis() as u64,
            total_ms: summary.total_time().as_millis() as u64,
        };
    }

    /// Build the final report
    pub fn build(self) -> ReductionReport {
        let mut features: Vec<FeatureReportEntry> = self
            .all_features
            .iter()
            .map(|name| self.build_feature_entry(name))
            .collect();

        // Kept first, then by drop stage, then alphabetically
        features.sort_by(|a, b| match (a.dropped_at_stage, b.dropped_at_stage) {
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(stage_a), Some(stage_b)) => stage_a
                .order()
                .cmp(&stage_b.order())
                .then(a.name.cmp(&b.name)),
            (None, None) => a.name.cmp(&b.name),
        });

        let dropped_count = self.dropped_constant.len()
            + self.dropped_relevance.len()
            + self.redundant_pairs.len();

        ReductionReport {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                decorr_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: self.params.input_file.clone(),
                output_file: self.params.output_file.clone(),
                target_column: self.params.target_column.clone(),
                method: self.params.method.clone(),
                tie_break: self.params.tie_break,
                thresholds: ThresholdsConfig {
                    relevance: self.params.relevance_threshold,
                    redundancy: self.params.redundancy_threshold,
                },
            },
            summary: ReportSummary {
                initial_features: self.all_features.len(),
                final_features: self.all_features.len().saturating_sub(dropped_count),
                dropped_count,
                by_stage: ByStage {
                    constant: StageSummary {
                        dropped: self.dropped_constant.len(),
                        threshold_used: None,
                    },
                    relevance: StageSummary {
                        dropped: self.dropped_relevance.len(),
                        threshold_used: self.params.relevance_threshold,
                    },
                    redundancy: StageSummary {
                        dropped: self.redundant_pairs.len(),
                        threshold_used: Some(self.params.redundancy_threshold),
                    },
                },
                timing: self.timing,
            },
            redundant_pairs: self.redundant_pairs,
            features,
        }
    }

    fn build_feature_entry(&self, name: &str) -> FeatureReportEntry {
        let redundancy_drop = self.redundant_pairs.iter().find(|p| p.dropped == name);

        let (dropped_at_stage, reason) = if self.dropped_constant.contains(name) {
            (
                Some(DropStage::Constant),
                Some("Zero variance; correlation is undefined".to_string()),
            )
        } else if self.dropped_relevance.contains(name) {
            let score = self.relevance_scores.get(name).copied().unwrap_or(0.0);
            (
                Some(DropStage::Relevance),
                Some(format!(
                    "|r| with target {:.4} below threshold {:.4}",
                    score,
                    self.params.relevance_threshold.unwrap_or_default()
                )),
            )
        } else if let Some(pair) = redundancy_drop {
            (
                Some(DropStage::Redundancy),
                Some(format!(
                    "Correlated with '{}' (r = {:.4}); {} {:.4} <= {:.4}",
                    pair.kept,
                    pair.correlation,
                    self.params.tie_break,
                    pair.dropped_score,
                    pair.kept_score
                )),
            )
        } else {
            (None, None)
        };

        let relevance = self
            .relevance_scores
            .get(name)
            .map(|&score| RelevanceEntry {
                target_correlation: score,
                threshold: self.params.relevance_threshold.unwrap_or_default(),
                passed: !self.dropped_relevance.contains(name),
            });

        let redundancy = self.redundancy_scores.get(name).map(|&score| {
            let partner = self.strongest_partner.get(name);
            RedundancyEntry {
                tie_break_score: score,
                max_correlation: partner.map(|(_, r)| *r),
                correlated_with: partner.map(|(other, _)| other.clone()),
                threshold: self.params.redundancy_threshold,
                passed: redundancy_drop.is_none(),
            }
        });

        FeatureReportEntry {
            name: name.to_string(),
            status: if dropped_at_stage.is_some() {
                "dropped".to_string()
            } else {
                "kept".to_string()
            },
            dropped_at_stage,
            reason,
            analysis: FeatureAnalysis {
                relevance,
                redundancy,
            },
        }
    }
}
