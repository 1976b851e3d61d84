//! The `examlens compare` command.

use std::path::PathBuf;

use anyhow::Result;

use examlens_core::config::load_config;
use examlens_core::report::AttemptReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: Option<f64>,
    fail_on_decline: bool,
    format: String,
) -> Result<()> {
    let threshold = match threshold {
        Some(t) => t,
        None => load_config()?.compare.threshold,
    };
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = AttemptReport::load_json(&baseline_path)?;
    let current = AttemptReport::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Overall: {:.1}% -> {:.1}% ({:+.1}%), {:?}",
                report.baseline_score, report.current_score, report.overall_delta, report.trend
            );

            if !report.categories.is_empty() {
                println!("\nCategories:");
                for c in &report.categories {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1}%) {:?}",
                        c.category, c.baseline_score, c.current_score, c.delta, c.trend
                    );
                }
            }

            if report.new_categories > 0 {
                println!("\n{} new category(ies)", report.new_categories);
            }
            if report.removed_categories > 0 {
                println!("{} removed category(ies)", report.removed_categories);
            }
        }
    }

    if fail_on_decline && report.has_declines() {
        std::process::exit(1);
    }

    Ok(())
}
