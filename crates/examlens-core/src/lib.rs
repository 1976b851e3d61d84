//! examlens-core: grading engine, exam model, and performance insights.
//!
//! This crate defines the exam data model, the pure grading and insight
//! functions, and the loaders that read exams and attempts from disk.

pub mod config;
pub mod error;
pub mod grading;
pub mod import;
pub mod insights;
pub mod model;
pub mod parser;
pub mod report;
pub mod resources;
pub mod skills;

use crate::grading::GradedResult;
use crate::insights::Insights;
use crate::model::{AnswerSet, Exam, QuestionTimes};

/// Grade an attempt and synthesize insights from the result in one call.
pub fn analyze(
    exam: &Exam,
    answers: &AnswerSet,
    question_times: &QuestionTimes,
) -> (GradedResult, Insights) {
    let result = grading::grade(exam, answers);
    let insights = insights::synthesize(
        &result.category_scores,
        result.score,
        question_times,
        &exam.questions,
        answers,
    );
    (result, insights)
}
