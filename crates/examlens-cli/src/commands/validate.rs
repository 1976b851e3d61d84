//! The `examlens validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examlens_core::error::ExamError;
use examlens_core::parser;

pub fn execute(exam_path: PathBuf) -> Result<()> {
    let files = if exam_path.is_dir() {
        parser::exam_files(&exam_path)?
    } else {
        anyhow::ensure!(
            exam_path.exists(),
            "exam file not found: {}",
            exam_path.display()
        );
        vec![exam_path]
    };

    let mut total_warnings = 0;
    let mut invalid = 0;

    for path in &files {
        match parser::parse_exam(path) {
            Ok(exam) => {
                println!(
                    "Exam: {} [{}] ({} questions)",
                    exam.title,
                    exam.key,
                    exam.questions.len()
                );
                let warnings = parser::validate_exam(&exam);
                for w in &warnings {
                    println!("  WARNING: {w}");
                }
                total_warnings += warnings.len();
            }
            Err(e) => {
                invalid += 1;
                println!("{}: INVALID", path.display());
                match e.downcast_ref::<ExamError>() {
                    Some(err) if !err.issues().is_empty() => {
                        for issue in err.issues() {
                            println!("  ERROR: {issue}");
                        }
                    }
                    _ => println!("  ERROR: {e:#}"),
                }
            }
        }
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} of {} exam file(s) invalid", files.len());
    }

    if total_warnings == 0 {
        println!("All exams valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
