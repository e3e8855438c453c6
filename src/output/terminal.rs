// Colored terminal output for run summaries and the taxonomy.
//
// This module handles all terminal-specific formatting. main.rs prints
// through these functions after a pipeline returns.

use colored::Colorize;

use crate::output::truncate_chars;
use crate::pipeline::{ClassifyReport, DiscoveryReport};
use crate::taxonomy::Taxonomy;

/// Display the outcome of a classification run.
pub fn display_classification_report(report: &ClassifyReport, model_id: &str) {
    let annotations = &report.annotations;
    let failed = annotations.failure_count();

    println!(
        "\n{}",
        format!(
            "=== Classification ({} comments, {}) ===",
            annotations.len(),
            model_id
        )
        .bold()
    );
    println!();

    let counts = annotations.topic_counts();
    if counts.is_empty() {
        println!("  No topics assigned.");
    } else {
        let max = counts.first().map(|(_, n)| *n).unwrap_or(1).max(1);
        let bar_width: usize = 20;

        for (topic, n) in &counts {
            let filled = (n * bar_width).div_ceil(max);
            let bar = format!(
                "[{}{}]",
                "=".repeat(filled),
                " ".repeat(bar_width.saturating_sub(filled))
            );
            println!(
                "  {:<36} {} {:>4}",
                truncate_chars(topic, 33),
                bar.cyan(),
                n
            );
        }
    }

    println!();
    if failed > 0 {
        println!(
            "  {} {} comment(s) could not be classified",
            "!".yellow().bold(),
            failed
        );
    }
    if report.duplicates_skipped > 0 {
        println!(
            "  {} {} repeated comment(s) skipped",
            "~".dimmed(),
            report.duplicates_skipped
        );
    }
    println!("  JSON:        {}", report.json_path.display());
    println!("  Spreadsheet: {}", report.xlsx_path.display());
}

/// Display the outcome of a discovery sweep.
pub fn display_discovery_report(report: &DiscoveryReport) {
    println!(
        "\n{}",
        format!(
            "=== Topic discovery ({} comments, ~{} tokens) ===",
            report.comment_count, report.token_estimate
        )
        .bold()
    );
    println!("  Prompt: {}", report.prompt_path.display());
    for (model_id, path) in &report.outputs {
        println!("  {:<40} {}", model_id.green(), path.display());
    }
}

/// Display the taxonomy, numbered.
pub fn display_taxonomy(taxonomy: &Taxonomy) {
    println!(
        "\n{}",
        format!("=== Taxonomy ({} topics) ===", taxonomy.len()).bold()
    );
    for (i, label) in taxonomy.labels().iter().enumerate() {
        println!("  {:>3}. {}", i + 1, label);
    }
}
