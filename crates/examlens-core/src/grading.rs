//! The grading engine.
//!
//! Walks an exam's questions in order, compares each against the submitted
//! answer set, and produces counts, marks after negative marking, and a
//! per-category breakdown.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{AnswerSet, Exam};

/// Correct/total tally for one category or skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: u32,
    pub total: u32,
}

impl Tally {
    /// Percentage correct, or `None` when nothing was counted.
    pub fn percentage(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f64 * 100.0 / self.total as f64)
        }
    }
}

/// Category label to tally, in first-seen order across the exam.
pub type CategoryScores = IndexMap<String, Tally>;

/// What happened to a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Correct,
    Wrong,
    Unanswered,
}

/// Per-question grading detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: u32,
    pub category: String,
    pub status: OutcomeStatus,
    /// Marks gained (positive) or lost (negative) on this question.
    pub marks: f64,
}

/// The scored result of one attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedResult {
    pub correct: u32,
    pub wrong: u32,
    pub unanswered: u32,
    pub total_questions: u32,
    /// Percentage of questions answered correctly.
    pub score: f64,
    /// Marks after negative marking. May be negative.
    pub total_marks: f64,
    /// Question count times the exam's default positive marks.
    pub max_marks: f64,
    /// Sum of each question's own marks.
    pub weighted_max_marks: f64,
    /// Total marks deducted for wrong answers.
    pub penalty: f64,
    pub category_scores: CategoryScores,
    pub outcomes: Vec<QuestionOutcome>,
}

impl GradedResult {
    pub fn grade(&self) -> LetterGrade {
        LetterGrade::from_score(self.score)
    }
}

/// Grade an attempt.
///
/// Pure and deterministic. Answers keyed by ids that are not in the exam are
/// ignored. An empty exam yields a zeroed result.
pub fn grade(exam: &Exam, answers: &AnswerSet) -> GradedResult {
    let mut category_scores = CategoryScores::new();
    let mut outcomes = Vec::with_capacity(exam.questions.len());
    let mut correct = 0u32;
    let mut wrong = 0u32;
    let mut unanswered = 0u32;
    let mut total_marks = 0.0f64;
    let mut penalty = 0.0f64;
    let mut weighted_max_marks = 0.0f64;

    for question in &exam.questions {
        let tally = category_scores.entry(question.category.clone()).or_default();
        tally.total += 1;
        weighted_max_marks += exam.marks_for(question);

        let (status, marks) = match answers.get(&question.id) {
            None => {
                unanswered += 1;
                (OutcomeStatus::Unanswered, 0.0)
            }
            Some(answer) if question.is_correct(answer) => {
                correct += 1;
                tally.correct += 1;
                let marks = exam.marks_for(question);
                total_marks += marks;
                (OutcomeStatus::Correct, marks)
            }
            Some(_) => {
                wrong += 1;
                let deduction = exam.penalty_for(question);
                total_marks -= deduction;
                penalty += deduction;
                (OutcomeStatus::Wrong, -deduction)
            }
        };

        outcomes.push(QuestionOutcome {
            question_id: question.id,
            category: question.category.clone(),
            status,
            marks,
        });
    }

    let total_questions = exam.questions.len() as u32;
    let score = if total_questions == 0 {
        0.0
    } else {
        correct as f64 * 100.0 / total_questions as f64
    };

    tracing::debug!(
        exam = %exam.id,
        correct,
        wrong,
        unanswered,
        score,
        total_marks,
        "graded attempt"
    );

    GradedResult {
        correct,
        wrong,
        unanswered,
        total_questions,
        score,
        total_marks,
        max_marks: total_questions as f64 * exam.positive_marks,
        weighted_max_marks,
        penalty,
        category_scores,
        outcomes,
    }
}

/// Letter grade bands for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => LetterGrade::APlus,
            s if s >= 80.0 => LetterGrade::A,
            s if s >= 70.0 => LetterGrade::BPlus,
            s if s >= 60.0 => LetterGrade::B,
            s if s >= 50.0 => LetterGrade::C,
            s if s >= 40.0 => LetterGrade::D,
            _ => LetterGrade::F,
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        };
        f.write_str(s)
    }
}
