//! Attempt reports with JSON persistence and progress comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grading::GradedResult;
use crate::insights::Insights;
use crate::model::{AnswerSet, Attempt, Exam, QuestionTimes};

/// A graded attempt with its insights and the raw inputs kept for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub exam: ExamSummary,
    #[serde(default)]
    pub student_id: Option<String>,
    pub answers: AnswerSet,
    pub question_times: QuestionTimes,
    pub result: GradedResult,
    pub insights: Insights,
}

/// Summary of an exam (without the question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSummary {
    pub id: String,
    pub title: String,
    pub key: String,
    pub question_count: usize,
    pub duration_secs: u64,
    pub negative_marking: f64,
    pub positive_marks: f64,
}

impl From<&Exam> for ExamSummary {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id.clone(),
            title: exam.title.clone(),
            key: exam.key.clone(),
            question_count: exam.questions.len(),
            duration_secs: exam.duration_secs,
            negative_marking: exam.negative_marking,
            positive_marks: exam.positive_marks,
        }
    }
}

impl AttemptReport {
    /// Grade an attempt against its exam and bundle everything into a report.
    pub fn build(exam: &Exam, attempt: &Attempt) -> Self {
        let (result, insights) = crate::analyze(exam, &attempt.answers, &attempt.question_times);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            exam: ExamSummary::from(exam),
            student_id: attempt.student_id.clone(),
            answers: attempt.answers.clone(),
            question_times: attempt.question_times.clone(),
            result,
            insights,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttemptReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this attempt against an earlier one.
    ///
    /// `threshold` is in percentage points; smaller changes count as stable.
    pub fn compare(&self, baseline: &AttemptReport, threshold: f64) -> ProgressReport {
        if self.exam.id != baseline.exam.id {
            tracing::warn!(
                "comparing attempts of different exams: {} vs {}",
                baseline.exam.id,
                self.exam.id
            );
        }

        let overall_delta = self.result.score - baseline.result.score;

        let mut categories = Vec::new();
        let mut new_categories = 0usize;
        for (category, tally) in &self.result.category_scores {
            let Some(current) = tally.percentage() else {
                continue;
            };
            match baseline
                .result
                .category_scores
                .get(category)
                .and_then(|t| t.percentage())
            {
                Some(previous) => {
                    let delta = current - previous;
                    categories.push(CategoryChange {
                        category: category.clone(),
                        baseline_score: previous,
                        current_score: current,
                        delta,
                        trend: Trend::from_delta(delta, threshold),
                    });
                }
                None => new_categories += 1,
            }
        }

        let removed_categories = baseline
            .result
            .category_scores
            .keys()
            .filter(|k| !self.result.category_scores.contains_key(*k))
            .count();

        ProgressReport {
            baseline_score: baseline.result.score,
            current_score: self.result.score,
            overall_delta,
            trend: Trend::from_delta(overall_delta, threshold),
            categories,
            new_categories,
            removed_categories,
        }
    }
}

/// Direction of change between two attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn from_delta(delta: f64, threshold: f64) -> Self {
        if delta > threshold {
            Trend::Improving
        } else if delta < -threshold {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

/// Result of comparing two attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub baseline_score: f64,
    pub current_score: f64,
    pub overall_delta: f64,
    pub trend: Trend,
    /// Categories present in both attempts, in the current attempt's order.
    pub categories: Vec<CategoryChange>,
    /// Categories only in the current attempt.
    pub new_categories: usize,
    /// Categories only in the baseline.
    pub removed_categories: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryChange {
    pub category: String,
    pub baseline_score: f64,
    pub current_score: f64,
    pub delta: f64,
    pub trend: Trend,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Overall:** {:.1}% -> {:.1}% ({:+.1}%), {:?}\n\n",
            self.baseline_score, self.current_score, self.overall_delta, self.trend
        ));

        if !self.categories.is_empty() {
            md.push_str("### Categories\n\n");
            md.push_str("| Category | Baseline | Current | Delta | Trend |\n");
            md.push_str("|----------|----------|---------|-------|-------|\n");
            for c in &self.categories {
                md.push_str(&format!(
                    "| {} | {:.1}% | {:.1}% | {:+.1}% | {:?} |\n",
                    c.category, c.baseline_score, c.current_score, c.delta, c.trend
                ));
            }
            md.push('\n');
        }

        if self.new_categories > 0 || self.removed_categories > 0 {
            md.push_str(&format!(
                "{} new, {} removed categories\n",
                self.new_categories, self.removed_categories
            ));
        }

        md
    }

    /// Categories whose score dropped by more than the threshold.
    pub fn declines(&self) -> impl Iterator<Item = &CategoryChange> {
        self.categories
            .iter()
            .filter(|c| c.trend == Trend::Declining)
    }

    pub fn has_declines(&self) -> bool {
        self.trend == Trend::Declining || self.declines().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, AnswerType, CorrectAnswer, Question};

    fn exam() -> Exam {
        let q = |id, category: &str| Question {
            id,
            text: format!("Define term {id}"),
            options: vec!["a".into(), "b".into()],
            answer_type: AnswerType::Single,
            correct: CorrectAnswer::Single(0),
            category: category.into(),
            marks: None,
            negative_marks: None,
        };
        Exam {
            id: "quiz".into(),
            title: "Quiz".into(),
            key: "QUIZ01".into(),
            questions: vec![q(1, "Physics"), q(2, "Physics"), q(3, "Chemistry"), q(4, "Chemistry")],
            duration_secs: 600,
            negative_marking: 0.25,
            positive_marks: 1.0,
            created_at: None,
        }
    }

    fn attempt(correct_ids: &[u32]) -> Attempt {
        let answers = (1..=4)
            .map(|id| {
                let choice = if correct_ids.contains(&id) { 0 } else { 1 };
                (id, Answer::Single(choice))
            })
            .collect();
        Attempt {
            exam_id: "quiz".into(),
            student_id: Some("s-1".into()),
            answers,
            question_times: (1..=4).map(|id| (id, 30.0)).collect(),
            submitted_at: None,
        }
    }

    #[test]
    fn build_grades_and_summarizes() {
        let report = AttemptReport::build(&exam(), &attempt(&[1, 2, 3]));
        assert_eq!(report.exam.question_count, 4);
        assert_eq!(report.result.correct, 3);
        assert_eq!(report.result.score, 75.0);
        assert_eq!(report.insights.strengths, vec!["Physics"]);
        assert_eq!(report.student_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn json_roundtrip() {
        let report = AttemptReport::build(&exam(), &attempt(&[1]));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");

        report.save_json(&path).unwrap();
        let loaded = AttemptReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.result.correct, 1);
        assert_eq!(loaded.answers, report.answers);
        assert_eq!(
            loaded.result.category_scores.keys().collect::<Vec<_>>(),
            vec!["Physics", "Chemistry"]
        );
    }

    #[test]
    fn compare_detects_improvement_and_decline() {
        let baseline = AttemptReport::build(&exam(), &attempt(&[3, 4]));
        let current = AttemptReport::build(&exam(), &attempt(&[1, 2, 3]));

        let progress = current.compare(&baseline, 5.0);
        assert_eq!(progress.overall_delta, 25.0);
        assert_eq!(progress.trend, Trend::Improving);
        assert_eq!(progress.categories[0].category, "Physics");
        assert_eq!(progress.categories[0].trend, Trend::Improving);
        assert_eq!(progress.categories[1].trend, Trend::Declining);
        assert!(progress.has_declines());

        let md = progress.to_markdown();
        assert!(md.contains("Categories"));
        assert!(md.contains("| Chemistry | 100.0% | 50.0% | -50.0% | Declining |"));
    }

    #[test]
    fn identical_attempts_are_stable() {
        let a = AttemptReport::build(&exam(), &attempt(&[1, 3]));
        let b = AttemptReport::build(&exam(), &attempt(&[1, 3]));
        let progress = b.compare(&a, 5.0);
        assert_eq!(progress.trend, Trend::Stable);
        assert!(!progress.has_declines());
        assert_eq!(progress.new_categories, 0);
        assert_eq!(progress.removed_categories, 0);
    }
}
