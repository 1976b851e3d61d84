//! Exam and attempt loaders.
//!
//! Exams are TOML files with an `[exam]` header and `[[questions]]` entries.
//! Attempts are JSON snapshots of answers and timings. Exams are validated on
//! load; grading itself never re-checks them.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExamError;
use crate::model::{
    default_duration, default_positive_marks, generate_exam_key, Answer, AnswerType, Attempt,
    CorrectAnswer, Exam, Question,
};

/// Intermediate TOML structure for exam files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlExamFile {
    exam: TomlExamHeader,
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlExamHeader {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(default = "default_duration")]
    duration_secs: u64,
    #[serde(default)]
    negative_marking: f64,
    #[serde(default = "default_positive_marks")]
    positive_marks: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

/// Parse a single TOML exam file.
pub fn parse_exam(path: &Path) -> Result<Exam> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam file: {}", path.display()))?;

    parse_exam_str(&content, path)
}

/// Parse a TOML string into a validated `Exam`.
///
/// A missing join key is generated. Validation errors reject the exam;
/// warnings are logged.
pub fn parse_exam_str(content: &str, source_path: &Path) -> Result<Exam> {
    let parsed: TomlExamFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let key = match parsed.exam.key {
        Some(key) if !key.trim().is_empty() => key,
        _ => {
            let key = generate_exam_key();
            tracing::debug!(exam = %parsed.exam.id, %key, "assigned join key");
            key
        }
    };

    let exam = Exam {
        id: parsed.exam.id,
        title: parsed.exam.title,
        key,
        questions: parsed.questions,
        duration_secs: parsed.exam.duration_secs,
        negative_marking: parsed.exam.negative_marking,
        positive_marks: parsed.exam.positive_marks,
        created_at: parsed.exam.created_at,
    };

    ensure_valid(&exam)?;
    Ok(exam)
}

/// Render an exam in the TOML layout `parse_exam_str` reads.
pub fn exam_to_toml(exam: &Exam) -> Result<String> {
    let file = TomlExamFile {
        exam: TomlExamHeader {
            id: exam.id.clone(),
            title: exam.title.clone(),
            key: Some(exam.key.clone()),
            duration_secs: exam.duration_secs,
            negative_marking: exam.negative_marking,
            positive_marks: exam.positive_marks,
            created_at: exam.created_at,
        },
        questions: exam.questions.clone(),
    };
    toml::to_string_pretty(&file)
        .with_context(|| format!("failed to serialize exam '{}' to TOML", exam.id))
}

/// Write an exam to a TOML file, creating parent directories.
pub fn write_exam(exam: &Exam, path: &Path) -> Result<()> {
    let content = exam_to_toml(exam)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write exam to {}", path.display()))?;
    Ok(())
}

/// Reject an exam that has validation errors; log its warnings.
pub fn ensure_valid(exam: &Exam) -> Result<(), ExamError> {
    let issues = validate_exam(exam);
    let mut errors = Vec::new();
    for issue in issues {
        match issue.severity {
            Severity::Error => errors.push(issue.to_string()),
            Severity::Warning => tracing::warn!(exam = %exam.id, "{issue}"),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ExamError::InvalidExam {
            exam_id: exam.id.clone(),
            issues: errors,
        })
    }
}

/// Recursively load all `.toml` exam files from a directory.
///
/// Files that fail to parse or validate are skipped with a warning.
pub fn load_exam_directory(dir: &Path) -> Result<Vec<Exam>> {
    let mut exams = Vec::new();

    for path in exam_files(dir)? {
        match parse_exam(&path) {
            Ok(exam) => exams.push(exam),
            Err(e) => {
                tracing::warn!("skipping {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(exams)
}

/// Collect `.toml` files under `dir`, recursively, in path order.
pub fn exam_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            files.extend(exam_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }

    Ok(files)
}

/// Parse an attempt snapshot from a JSON file.
pub fn parse_attempt(path: &Path) -> Result<Attempt> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read attempt file: {}", path.display()))?;
    let attempt: Attempt = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse attempt JSON: {}", path.display()))?;
    Ok(attempt)
}

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The exam cannot be graded reliably.
    Error,
    Warning,
}

/// A finding from exam or attempt validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// The question concerned, if any.
    pub question_id: Option<u32>,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn error(question_id: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            question_id,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(question_id: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            question_id,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.question_id {
            Some(id) => write!(f, "question {id}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Validate an exam's structure.
pub fn validate_exam(exam: &Exam) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if exam.questions.is_empty() {
        issues.push(ValidationIssue::warning(None, "exam has no questions"));
    }
    if exam.duration_secs == 0 {
        issues.push(ValidationIssue::warning(None, "duration is zero"));
    }
    if exam.positive_marks <= 0.0 {
        issues.push(ValidationIssue::error(
            None,
            format!("positive_marks must be positive, got {}", exam.positive_marks),
        ));
    }
    if exam.negative_marking < 0.0 {
        issues.push(ValidationIssue::error(
            None,
            format!(
                "negative_marking must not be negative, got {}",
                exam.negative_marking
            ),
        ));
    }

    let mut seen_ids = HashSet::new();
    for q in &exam.questions {
        let id = Some(q.id);
        if !seen_ids.insert(q.id) {
            issues.push(ValidationIssue::error(id, "duplicate question id"));
        }
        if q.text.trim().is_empty() {
            issues.push(ValidationIssue::warning(id, "question text is empty"));
        }
        if q.category.trim().is_empty() {
            issues.push(ValidationIssue::warning(id, "category is empty"));
        }
        if let Some(marks) = q.marks {
            if marks <= 0.0 {
                issues.push(ValidationIssue::error(
                    id,
                    format!("marks must be positive, got {marks}"),
                ));
            }
        }
        if let Some(penalty) = q.negative_marks {
            if penalty < 0.0 {
                issues.push(ValidationIssue::error(
                    id,
                    format!("negative_marks must not be negative, got {penalty}"),
                ));
            }
        }

        match (q.answer_type, &q.correct) {
            (AnswerType::Multiple, CorrectAnswer::Single(_)) => {
                issues.push(ValidationIssue::error(
                    id,
                    "multiple-answer question needs a list of correct options",
                ));
            }
            (AnswerType::Single | AnswerType::Boolean, CorrectAnswer::Multiple(_)) => {
                issues.push(ValidationIssue::error(
                    id,
                    format!("{} question needs exactly one correct option", q.answer_type),
                ));
            }
            (_, CorrectAnswer::Multiple(set)) if set.is_empty() => {
                issues.push(ValidationIssue::error(id, "correct option set is empty"));
            }
            _ => {}
        }

        if q.answer_type == AnswerType::Boolean && !q.options.is_empty() && q.options.len() != 2 {
            issues.push(ValidationIssue::error(
                id,
                format!("boolean question has {} options, expected 2", q.options.len()),
            ));
        }

        if q.options.is_empty() {
            issues.push(ValidationIssue::warning(
                id,
                "question has no options; its key cannot be checked",
            ));
            continue;
        }
        if q.options.len() < 2 {
            issues.push(ValidationIssue::warning(id, "fewer than two options"));
        }
        for index in q.correct.indices() {
            if index >= q.options.len() {
                issues.push(ValidationIssue::error(
                    id,
                    format!(
                        "correct option {index} is out of range ({} options)",
                        q.options.len()
                    ),
                ));
            }
        }
    }

    issues
}

/// Check an attempt against its exam.
///
/// Findings are warnings only: grading ignores answers for unknown questions
/// and treats mismatched answers as wrong.
pub fn check_attempt(exam: &Exam, attempt: &Attempt) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if attempt.exam_id != exam.id {
        issues.push(ValidationIssue::warning(
            None,
            format!(
                "attempt is for exam '{}' but was graded against '{}'",
                attempt.exam_id, exam.id
            ),
        ));
    }

    for (&id, answer) in &attempt.answers {
        let Some(question) = exam.question(id) else {
            issues.push(ValidationIssue::warning(Some(id), "answer for unknown question"));
            continue;
        };
        let indices: Vec<usize> = match answer {
            Answer::Single(i) => vec![*i],
            Answer::Multiple(set) => set.iter().copied().collect(),
        };
        if !question.options.is_empty() {
            if let Some(bad) = indices.iter().find(|&&i| i >= question.options.len()) {
                issues.push(ValidationIssue::warning(
                    Some(id),
                    format!("selected option {bad} is out of range"),
                ));
            }
        }
        if question.answer_type != AnswerType::Multiple && matches!(answer, Answer::Multiple(_)) {
            issues.push(ValidationIssue::warning(
                Some(id),
                "several options selected for a single-answer question",
            ));
        }
    }

    for (&id, &secs) in &attempt.question_times {
        if exam.question(id).is_none() {
            issues.push(ValidationIssue::warning(Some(id), "timing for unknown question"));
        }
        if secs < 0.0 {
            issues.push(ValidationIssue::warning(Some(id), "negative time recorded"));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_TOML: &str = r#"
[exam]
id = "physics-101"
title = "Physics Basics"
key = "PHY101"
duration_secs = 900
negative_marking = 0.25
positive_marks = 1.0

[[questions]]
id = 1
text = "What is the SI unit of force?"
options = ["Joule", "Newton", "Watt", "Pascal"]
type = "single"
correct = 1
category = "Physics"

[[questions]]
id = 2
text = "Select all vector quantities"
options = ["Velocity", "Mass", "Force", "Time"]
type = "multiple"
correct = [0, 2]
category = "Physics"
marks = 2.0

[[questions]]
id = 3
text = "Light travels faster than sound."
options = ["True", "False"]
type = "boolean"
correct = 0
category = "General Science"
"#;

    #[test]
    fn parse_valid_toml() {
        let exam = parse_exam_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(exam.id, "physics-101");
        assert_eq!(exam.key, "PHY101");
        assert_eq!(exam.questions.len(), 3);
        assert_eq!(exam.questions[1].answer_type, AnswerType::Multiple);
        assert_eq!(exam.questions[1].correct, CorrectAnswer::Multiple([0, 2].into()));
        assert_eq!(exam.questions[1].marks, Some(2.0));
        assert_eq!(exam.negative_marking, 0.25);
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[exam]
id = "minimal"
title = "Minimal"

[[questions]]
id = 1
text = "Pick one"
options = ["a", "b"]
correct = 0
"#;
        let exam = parse_exam_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(exam.duration_secs, 1800);
        assert_eq!(exam.positive_marks, 1.0);
        assert_eq!(exam.negative_marking, 0.0);
        assert_eq!(exam.key.len(), 6);
        assert_eq!(exam.questions[0].answer_type, AnswerType::Single);
        assert_eq!(exam.questions[0].category, "General");
    }

    #[test]
    fn out_of_range_key_is_rejected() {
        let toml = r#"
[exam]
id = "bad"
title = "Bad"

[[questions]]
id = 1
text = "Pick one"
options = ["a", "b"]
correct = 5
"#;
        let err = parse_exam_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        let exam_err = err.downcast_ref::<ExamError>().unwrap();
        assert!(exam_err.issues()[0].contains("out of range"));
    }

    #[test]
    fn validate_catches_structural_errors() {
        let toml = r#"
[exam]
id = "broken"
title = "Broken"
negative_marking = -1.0

[[questions]]
id = 1
text = "Pick"
options = ["a", "b", "c"]
type = "multiple"
correct = 1

[[questions]]
id = 1
text = "Pick again"
options = ["a", "b", "c"]
type = "multiple"
correct = []

[[questions]]
id = 2
text = ""
options = ["yes", "no", "maybe"]
type = "boolean"
correct = 0
"#;
        let parsed: TomlExamFile = toml::from_str(toml).unwrap();
        let exam = Exam {
            id: parsed.exam.id,
            title: parsed.exam.title,
            key: String::new(),
            questions: parsed.questions,
            duration_secs: parsed.exam.duration_secs,
            negative_marking: parsed.exam.negative_marking,
            positive_marks: parsed.exam.positive_marks,
            created_at: None,
        };
        let issues = validate_exam(&exam);
        let has = |needle: &str| issues.iter().any(|i| i.message.contains(needle));
        assert!(has("negative_marking must not be negative"));
        assert!(has("needs a list of correct options"));
        assert!(has("duplicate question id"));
        assert!(has("correct option set is empty"));
        assert!(has("boolean question has 3 options"));
        assert!(issues
            .iter()
            .any(|i| !i.is_error() && i.message.contains("text is empty")));
        assert!(ensure_valid(&exam).is_err());
    }

    #[test]
    fn exam_toml_round_trip() {
        let exam = parse_exam_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/exam.toml");

        write_exam(&exam, &path).unwrap();
        let reloaded = parse_exam(&path).unwrap();

        assert_eq!(reloaded.id, "physics-101");
        assert_eq!(reloaded.key, "PHY101");
        assert_eq!(reloaded.questions.len(), 3);
        assert_eq!(reloaded.questions[1].correct, CorrectAnswer::Multiple([0, 2].into()));
        assert_eq!(reloaded.questions[1].marks, Some(2.0));
        assert_eq!(reloaded.questions[0].marks, None);
        assert_eq!(reloaded.questions[2].answer_type, AnswerType::Boolean);
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_exam_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_directory_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "not toml {").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let exams = load_exam_directory(dir.path()).unwrap();
        assert_eq!(exams.len(), 1);
        assert_eq!(exams[0].id, "physics-101");
    }

    #[test]
    fn attempt_round_trip_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempt.json");
        std::fs::write(
            &path,
            r#"{
                "exam_id": "physics-101",
                "student_id": "s-42",
                "answers": {"1": 1, "2": [0, 2]},
                "question_times": {"1": 12.5, "2": 40}
            }"#,
        )
        .unwrap();

        let attempt = parse_attempt(&path).unwrap();
        assert_eq!(attempt.student_id.as_deref(), Some("s-42"));
        assert_eq!(attempt.answers[&2], Answer::multiple([0, 2]));
        assert_eq!(attempt.question_times[&2], 40.0);
    }

    #[test]
    fn check_attempt_flags_unknown_ids() {
        let exam = parse_exam_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let attempt = Attempt {
            exam_id: "other".into(),
            student_id: None,
            answers: [(1, Answer::multiple([0, 1])), (9, Answer::Single(0))].into(),
            question_times: [(3, 10.0), (8, -1.0)].into(),
            submitted_at: None,
        };
        let issues = check_attempt(&exam, &attempt);
        assert!(issues.iter().all(|i| !i.is_error()));
        let messages: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
        assert!(messages.iter().any(|m| m.contains("graded against 'physics-101'")));
        assert!(messages.contains(&"question 9: answer for unknown question".to_string()));
        assert!(messages.contains(&"question 8: timing for unknown question".to_string()));
        assert!(messages.contains(&"question 8: negative time recorded".to_string()));
        assert!(messages
            .iter()
            .any(|m| m.starts_with("question 1: several options")));
    }
}
