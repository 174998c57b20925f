//! Reduction summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of the feature reduction process
#[derive(Debug, Default)]
pub struct ReductionSummary {
    pub initial_features: usize,
    pub final_features: usize,
    pub dropped_constant: Vec<String>,
    pub dropped_relevance: Vec<String>,
    pub dropped_redundancy: Vec<String>,
    pub load_time: Duration,
    pub relevance_time: Duration,
    pub redundancy_time: Duration,
    pub save_time: Duration,
}

impl ReductionSummary {
    pub fn new(initial_features: usize) -> Self {
        Self {
            initial_features,
            final_features: initial_features,
            ..Default::default()
        }
    }

    pub fn add_constant_drops(&mut self, features: Vec<String>) {
        self.final_features -= features.len();
        self.dropped_constant = features;
    }

    pub fn add_relevance_drops(&mut self, features: Vec<String>) {
        self.final_features -= features.len();
        self.dropped_relevance = features;
    }

    pub fn add_redundancy_drops(&mut self, features: Vec<String>) {
        self.final_features -= features.len();
        self.dropped_redundancy = features;
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_relevance_time(&mut self, elapsed: Duration) {
        self.relevance_time = elapsed;
    }

    pub fn set_redundancy_time(&mut self, elapsed: Duration) {
        self.redundancy_time = elapsed;
    }

    pub fn set_save_time(&mut self, elapsed: Duration) {
        self.save_time = elapsed;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.relevance_time + self.redundancy_time + self.save_time
    }

    /// All dropped features, in stage order.
    pub fn all_dropped(&self) -> Vec<String> {
        self.dropped_constant
            .iter()
            .chain(&self.dropped_relevance)
            .chain(&self.dropped_redundancy)
            .cloned()
            .collect()
    }

    pub fn reduction_pct(&self) -> f64 {
        if self.initial_features > 0 {
            ((self.initial_features - self.final_features) as f64 / self.initial_features as f64)
                * 100.0
        } else {
            0.0
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("REDUCTION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Initial Features"),
            Cell::new(self.initial_features),
        ]);

        for (label, dropped) in [
            ("⏸️  Dropped (Constant)", &self.dropped_constant),
            ("🎯 Dropped (Low Relevance)", &self.dropped_relevance),
            ("🔗 Dropped (Redundant)", &self.dropped_redundancy),
        ] {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(dropped.len()).fg(if dropped.is_empty() {
                    Color::White
                } else {
                    Color::Red
                }),
            ]);
        }

        table.add_row(vec![
            Cell::new("✅ Final Features"),
            Cell::new(self.final_features)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        let reduction_pct = self.reduction_pct();
        let color = if reduction_pct > 30.0 {
            Color::Green
        } else if reduction_pct > 10.0 {
            Color::Yellow
        } else {
            Color::Cyan
        };

        table.add_row(vec![
            Cell::new("📉 Reduction"),
            Cell::new(format!("{:.1}%", reduction_pct))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        let groups = [
            ("Zero Variance", &self.dropped_constant),
            ("Low Target Relevance", &self.dropped_relevance),
            ("Redundant", &self.dropped_redundancy),
        ];

        if groups.iter().any(|(_, features)| !features.is_empty()) {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("DROPPED FEATURES").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());

            for (title, features) in groups {
                if features.is_empty() {
                    continue;
                }
                println!();
                println!(
                    "      {} {}:",
                    style(title).yellow(),
                    style(format!("({})", features.len())).dim()
                );
                for feature in features {
                    println!("        {} {}", style("•").dim(), feature);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_accounting() {
        let mut summary = ReductionSummary::new(10);
        summary.add_constant_drops(vec!["c".to_string()]);
        summary.add_relevance_drops(vec!["r1".to_string(), "r2".to_string()]);
        summary.add_redundancy_drops(vec!["d".to_string()]);

        assert_eq!(summary.final_features, 6);
        assert_eq!(summary.all_dropped(), vec!["c", "r1", "r2", "d"]);
        assert!((summary.reduction_pct() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_time() {
        let mut summary = ReductionSummary::new(1);
        summary.set_load_time(Duration::from_millis(100));
        summary.set_redundancy_time(Duration::from_millis(50));
        assert_eq!(summary.total_time(), Duration::from_millis(150));
    }

    #[test]
    fn test_empty_summary_has_zero_reduction() {
        assert_eq!(ReductionSummary::new(0).reduction_pct(), 0.0);
    }
}
