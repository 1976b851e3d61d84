//! Library error types.
//!
//! Grading and insight synthesis never fail; these errors cover loading,
//! validating, and importing exams.

use thiserror::Error;

/// Errors raised while loading or building exams.
#[derive(Debug, Error)]
pub enum ExamError {
    /// The exam failed structural validation.
    #[error("exam '{exam_id}' is invalid ({} error(s)): {}", .issues.len(), .issues.join("; "))]
    InvalidExam { exam_id: String, issues: Vec<String> },

    /// An output format name was not recognised.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// A question bank produced no usable questions.
    #[error("no questions could be parsed from {0}")]
    NoQuestions(String),
}

impl ExamError {
    /// Returns the validation messages carried by this error, if any.
    pub fn issues(&self) -> &[String] {
        match self {
            ExamError::InvalidExam { issues, .. } => issues,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_exam_message_lists_issues() {
        let err = ExamError::InvalidExam {
            exam_id: "midterm".into(),
            issues: vec!["q1: bad key".into(), "q2: no options".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("midterm"));
        assert!(msg.contains("2 error(s)"));
        assert!(msg.contains("q1: bad key; q2: no options"));
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn other_variants_have_no_issues() {
        assert!(ExamError::UnsupportedFormat("pdf".into()).issues().is_empty());
    }
}
