//! The `examlens grade` command.

use std::path::PathBuf;

use anyhow::Result;

use examlens_core::config::{load_config_from, OutputFormat};
use examlens_core::import::slugify;
use examlens_core::parser;
use examlens_core::report::AttemptReport;
use examlens_report::html::write_html_report;

pub fn execute(
    exam_path: PathBuf,
    attempt_path: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let format = match format {
        Some(f) => f.parse::<OutputFormat>()?,
        None => config.default_format,
    };
    let output = output.unwrap_or(config.output_dir);

    let exam = parser::parse_exam(&exam_path)?;
    let attempt = parser::parse_attempt(&attempt_path)?;

    for issue in parser::check_attempt(&exam, &attempt) {
        tracing::warn!(exam = %exam.id, "{issue}");
    }

    let report = AttemptReport::build(&exam, &attempt);
    tracing::info!(
        exam = %exam.id,
        score = report.result.score,
        "graded attempt"
    );

    print_summary(&report);

    std::fs::create_dir_all(&output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    let stem = report_stem(&exam.id, report.student_id.as_deref(), &timestamp.to_string());

    if format.includes(OutputFormat::Json) {
        let path = output.join(format!("{stem}.json"));
        report.save_json(&path)?;
        eprintln!("Results saved to: {}", path.display());
    }
    if format.includes(OutputFormat::Html) {
        let path = output.join(format!("{stem}.html"));
        write_html_report(&report, &path)?;
        eprintln!("HTML report: {}", path.display());
    }

    Ok(())
}

/// File name stem for a report. Ids come from user files, so only slug
/// characters reach the path.
fn report_stem(exam_id: &str, student_id: Option<&str>, timestamp: &str) -> String {
    match student_id {
        Some(student) => format!("{}-{}-{timestamp}", slugify(exam_id), slugify(student)),
        None => format!("{}-{timestamp}", slugify(exam_id)),
    }
}

fn print_summary(report: &AttemptReport) {
    use comfy_table::{Cell, Table};

    let result = &report.result;
    let insights = &report.insights;

    println!(
        "{} ({}): {:.1}% grade {}",
        report.exam.title,
        report.exam.key,
        result.score,
        result.grade()
    );

    let mut table = Table::new();
    table.set_header(vec!["Category", "Correct", "Total", "Score"]);
    for (category, tally) in &result.category_scores {
        let score = tally
            .percentage()
            .map(|p| format!("{p:.1}%"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(category),
            Cell::new(tally.correct),
            Cell::new(tally.total),
            Cell::new(score),
        ]);
    }
    println!("\n{table}");

    println!(
        "\nCorrect {}, wrong {}, unanswered {}. Marks {:.2} / {} (penalty {:.2})",
        result.correct,
        result.wrong,
        result.unanswered,
        result.total_marks,
        result.max_marks,
        result.penalty
    );
    println!("Predicted next score: {:.1}%", insights.predicted_score);
    println!("\n{}", insights.recommendation);

    if !insights.study_plan.is_empty() {
        println!("\nStudy plan:");
        for line in &insights.study_plan {
            println!("  {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_stem_stays_inside_output_dir() {
        let stem = report_stem("aptitude-101", Some("../../etc/passwd"), "2026-01-01T000000");
        assert_eq!(stem, "aptitude-101-etc-passwd-2026-01-01T000000");
        assert!(!stem.contains('/'));

        assert_eq!(
            report_stem("aptitude-101", None, "2026-01-01T000000"),
            "aptitude-101-2026-01-01T000000"
        );
    }
}
