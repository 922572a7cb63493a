// Colored terminal output for comparison results and extracted text.

use colored::{Color, Colorize};

use crate::compare::Comparison;
use crate::diff::{DiffLine, DiffReport};
use crate::extract::DocumentFormat;

use super::SimilarityBand;

/// Display the similarity score and, unless `show_diff` is false, the diff.
pub fn display_comparison(result: &Comparison, show_diff: bool) {
    println!("\n{}", "=== Document Comparison ===".bold());
    println!(
        "  Semantic similarity: {}  ({})",
        colorize_score(result.similarity),
        SimilarityBand::from_score(result.similarity).label()
    );
    println!(
        "  Extracted text: {} chars (File 1), {} chars (File 2)",
        result.text1_chars, result.text2_chars
    );

    if result.diff.is_empty() {
        println!("\n  {}", "No line differences.".green());
        return;
    }

    println!(
        "  Line changes: {} removed, {} added in {} hunk(s)",
        result.diff.removed().to_string().red(),
        result.diff.added().to_string().green(),
        result.diff.hunks()
    );

    if show_diff {
        println!();
        display_diff(&result.diff);
    }
}

/// Print a unified diff with per-line coloring.
pub fn display_diff(diff: &DiffReport) {
    for line in &diff.lines {
        let rendered = line.to_string();
        let colored = match line {
            DiffLine::FromFile(_) | DiffLine::ToFile(_) => rendered.bold(),
            DiffLine::Hunk { .. } => rendered.cyan(),
            DiffLine::Removed(_) => rendered.red(),
            DiffLine::Added(_) => rendered.green(),
            DiffLine::Context(_) => rendered.normal(),
        };
        println!("{colored}");
    }
}

/// Print the dispatch table.
pub fn display_formats() {
    println!("\n{}", "=== Supported Formats ===".bold());
    for format in DocumentFormat::ALL {
        let exts: Vec<String> = format
            .extensions()
            .iter()
            .map(|e| format!(".{e}"))
            .collect();
        println!("  {:<14} {}", format.label(), exts.join(", ").dimmed());
    }
}

/// Color for each band, strongest match first.
fn band_color(band: SimilarityBand) -> Color {
    match band {
        SimilarityBand::NearIdentical | SimilarityBand::Similar => Color::Green,
        SimilarityBand::Related => Color::Yellow,
        SimilarityBand::Different => Color::Red,
    }
}

/// Colorize a similarity score by the band it falls in.
fn colorize_score(score: f64) -> colored::ColoredString {
    let band = SimilarityBand::from_score(score);
    let text = format!("{score:.4}").color(band_color(band));
    if band == SimilarityBand::NearIdentical {
        text.bold()
    } else {
        text
    }
}
