//! The `examlens import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examlens_core::config::load_config_from;
use examlens_core::import::exam_from_text;
use examlens_core::parser::write_exam;

pub fn execute(
    input: PathBuf,
    output: PathBuf,
    title: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read question bank: {}", input.display()))?;

    let title = title.unwrap_or_else(|| {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
            .unwrap_or_else(|| "Imported Exam".to_string())
    });

    let exam = exam_from_text(&text, &title, &config.import)?;
    write_exam(&exam, &output)?;

    println!(
        "Imported {} questions into {} (key {})",
        exam.questions.len(),
        output.display(),
        exam.key
    );
    for question in &exam.questions {
        println!(
            "  {:>3}. [{}] {} ({})",
            question.id, question.category, question.text, question.answer_type
        );
    }

    Ok(())
}
