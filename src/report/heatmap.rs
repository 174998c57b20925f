//! Correlation heatmap rendering
//!
//! Renderers are injected by the caller; nothing in the pipeline depends on them.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use crate::pipeline::CorrelationMatrix;

/// Renders a correlation matrix as a rectangular heatmap.
pub trait HeatmapRenderer {
    /// `highlight` lists features to mark (typically the drop-list).
    fn render(&self, title: &str, matrix: &CorrelationMatrix, highlight: &[String])
        -> Result<()>;
}

/// RGB color for a coefficient: white at 0, red towards +1, blue towards -1.
pub fn heat_color(r: f64) -> (u8, u8, u8) {
    let intensity = r.abs().clamp(0.0, 1.0);
    let fade = (255.0 * (1.0 - intensity)).round() as u8;
    if r >= 0.0 {
        (255, fade, fade)
    } else {
        (fade, fade, 255)
    }
}

/// 256-color palette index for the terminal renderer.
fn heat_color256(r: f64) -> u8 {
    const POSITIVE: [u8; 5] = [231, 224, 217, 210, 196];
    const NEGATIVE: [u8; 5] = [231, 153, 111, 75, 21];
    let bucket = ((r.abs() * 5.0).floor() as usize).min(4);
    if r >= 0.0 {
        POSITIVE[bucket]
    } else {
        NEGATIVE[bucket]
    }
}

fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Prints a colored grid to stdout. Suited to a few dozen features at most.
#[derive(Debug, Clone)]
pub struct TerminalHeatmap {
    label_width: usize,
}

impl Default for TerminalHeatmap {
    fn default() -> Self {
        Self { label_width: 14 }
    }
}

impl TerminalHeatmap {
    pub fn new(label_width: usize) -> Self {
        Self {
            label_width: label_width.max(4),
        }
    }
}

impl HeatmapRenderer for TerminalHeatmap {
    fn render(
        &self,
        title: &str,
        matrix: &CorrelationMatrix,
        highlight: &[String],
    ) -> Result<()> {
        println!();
        println!("    {}", style(title).white().bold());

        // Column header uses the index so cells stay narrow
        let mut header = format!("    {:width$} ", "", width = self.label_width);
        for j in 0..matrix.len() {
            let _ = write!(header, "{:>5} ", j);
        }
        println!("{}", style(header).dim());

        for (i, name) in matrix.names().iter().enumerate() {
            let label = format!(
                "{:<width$}",
                truncate_label(&format!("{} {}", i, name), self.label_width),
                width = self.label_width
            );
            let label = if highlight.contains(name) {
                style(label).red().bold().to_string()
            } else {
                style(label).to_string()
            };

            let mut line = format!("    {} ", label);
            for j in 0..matrix.len() {
                let r = matrix.get(i, j);
                let cell = style(format!("{:>5.2}", r))
                    .black()
                    .on_color256(heat_color256(r));
                let _ = write!(line, "{} ", cell);
            }
            println!("{}", line);
        }

        println!(
            "    {} {}  {} {}",
            style("  ").on_color256(21),
            style("-1").dim(),
            style("  ").on_color256(196),
            style("+1").dim()
        );
        Ok(())
    }
}

/// Writes the heatmap as an SVG file.
#[derive(Debug, Clone)]
pub struct SvgHeatmap {
    path: PathBuf,
    cell_size: u32,
}

impl SvgHeatmap {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell_size: 24,
        }
    }

    pub fn cell_size(mut self, size: u32) -> Self {
        self.cell_size = size.max(4);
        self
    }

    /// SVG document for `matrix`.
    pub fn to_svg(&self, title: &str, matrix: &CorrelationMatrix, highlight: &[String]) -> String {
        let cell = self.cell_size as usize;
        let label_width = matrix
            .names()
            .iter()
            .map(|n| n.chars().count())
            .max()
            .unwrap_or(0)
            * 7
            + 10;
        let top = 30 + label_width;
        let k = matrix.len();
        let width = label_width + k * cell + 10;
        let height = top + k * cell + 10;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" font-family="monospace" font-size="11">"#
        );
        let _ = writeln!(
            svg,
            r#"<text x="5" y="18" font-size="14">{}</text>"#,
            escape_xml(title)
        );

        for (i, name) in matrix.names().iter().enumerate() {
            let fill = if highlight.contains(name) {
                "#c0392b"
            } else {
                "#222222"
            };
            let y = top + i * cell + cell / 2 + 4;
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{y}" text-anchor="end" fill="{fill}">{}</text>"#,
                label_width - 5,
                escape_xml(name)
            );
            let x = label_width + i * cell + cell / 2 + 4;
            let _ = writeln!(
                svg,
                r#"<text x="{x}" y="{}" transform="rotate(-90 {x} {})" fill="{fill}">{}</text>"#,
                top - 5,
                top - 5,
                escape_xml(name)
            );
        }

        for i in 0..k {
            for j in 0..k {
                let r = matrix.get(i, j);
                let (red, green, blue) = heat_color(r);
                let _ = writeln!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{cell}" height="{cell}" fill="rgb({red},{green},{blue})"><title>{} / {}: {:.3}</title></rect>"#,
                    label_width + j * cell,
                    top + i * cell,
                    escape_xml(&matrix.names()[i]),
                    escape_xml(&matrix.names()[j]),
                    r
                );
            }
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl HeatmapRenderer for SvgHeatmap {
    fn render(
        &self,
        title: &str,
        matrix: &CorrelationMatrix,
        highlight: &[String],
    ) -> Result<()> {
        std::fs::write(&self.path, self.to_svg(title, matrix, highlight))
            .with_context(|| format!("Failed to write heatmap: {}", self.path.display()))
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
