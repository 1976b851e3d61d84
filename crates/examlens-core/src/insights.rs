//! Heuristic performance insights and study plan synthesis.
//!
//! Everything here is a fixed heuristic over the graded result: category
//! thresholds, keyword skill classification, average pace, and an optimistic
//! next-score estimate. None of it is a calibrated model. Sparse input
//! degrades to empty lists and neutral text; nothing in this module fails.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grading::CategoryScores;
use crate::model::{AnswerSet, Question, QuestionTimes};
use crate::resources::study_materials;
use crate::skills::{tally_skills, SkillType};

/// Percentage at or above which a category is a strength.
pub const STRENGTH_THRESHOLD: f64 = 70.0;
/// Percentage below which a category is a weakness.
pub const WEAKNESS_THRESHOLD: f64 = 50.0;
/// Average seconds per question below which the pace is too fast.
pub const FAST_PACE_SECS: f64 = 20.0;
/// Average seconds per question above which the pace is too slow.
pub const SLOW_PACE_SECS: f64 = 60.0;
/// Resources taken from each weak category's list.
const MATERIALS_PER_WEAKNESS: usize = 2;

/// Where a category falls relative to the strength/weakness thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStanding {
    Strength,
    Neutral,
    Weakness,
}

impl CategoryStanding {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= STRENGTH_THRESHOLD {
            CategoryStanding::Strength
        } else if percentage < WEAKNESS_THRESHOLD {
            CategoryStanding::Weakness
        } else {
            CategoryStanding::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStatus {
    Excellent,
    Good,
    NeedsImprovement,
}

impl SkillStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            SkillStatus::Excellent
        } else if score >= 50.0 {
            SkillStatus::Good
        } else {
            SkillStatus::NeedsImprovement
        }
    }
}

impl fmt::Display for SkillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillStatus::Excellent => write!(f, "excellent"),
            SkillStatus::Good => write!(f, "good"),
            SkillStatus::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

/// Score for one skill type. `score` is `None` when no question of that
/// skill was answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill: SkillType,
    pub correct: u32,
    pub answered: u32,
    pub score: Option<f64>,
    pub status: Option<SkillStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPace {
    TooFast,
    Balanced,
    TooSlow,
    InsufficientData,
}

impl SpeedPace {
    pub fn from_average(average_secs: Option<f64>) -> Self {
        match average_secs {
            None => SpeedPace::InsufficientData,
            Some(avg) if avg < FAST_PACE_SECS => SpeedPace::TooFast,
            Some(avg) if avg > SLOW_PACE_SECS => SpeedPace::TooSlow,
            Some(_) => SpeedPace::Balanced,
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            SpeedPace::TooFast => {
                "You answered very quickly. Consider spending more time analyzing each question to improve accuracy."
            }
            SpeedPace::TooSlow => {
                "You took considerable time per question. Work on improving speed through timed practice sessions."
            }
            SpeedPace::Balanced => {
                "Good balance between speed and accuracy! Maintain this pace while practicing."
            }
            SpeedPace::InsufficientData => {
                "Not enough timing data was recorded to analyze your pace."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedAnalysis {
    pub pace: SpeedPace,
    /// Mean seconds over questions that have a timing entry.
    pub average_secs: Option<f64>,
    pub advice: String,
}

/// Time totals for the attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSummary {
    pub total_secs: f64,
    /// Total time divided by the number of questions in the exam.
    pub average_per_question: Option<f64>,
}

/// Synthesized insights for one attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub skills: Vec<SkillScore>,
    pub speed: SpeedAnalysis,
    pub timing: TimingSummary,
    pub predicted_score: f64,
    pub recommendation: String,
    pub study_materials: Vec<String>,
    pub study_plan: Vec<String>,
}

/// Optimistic next-attempt estimate, capped at 100.
pub fn predict_next_score(score: f64) -> f64 {
    let bump = if score >= 60.0 { 5.0 } else { 10.0 };
    (score + bump).min(100.0)
}

/// Classify an attempt's pace from its per-question timings.
pub fn analyze_speed(question_times: &QuestionTimes) -> SpeedAnalysis {
    let average_secs = if question_times.is_empty() {
        None
    } else {
        Some(question_times.values().sum::<f64>() / question_times.len() as f64)
    };
    let pace = SpeedPace::from_average(average_secs);
    SpeedAnalysis {
        pace,
        average_secs,
        advice: pace.advice().to_string(),
    }
}

/// Synthesize insights from a graded attempt.
pub fn synthesize(
    category_scores: &CategoryScores,
    overall_score: f64,
    question_times: &QuestionTimes,
    questions: &[Question],
    answers: &AnswerSet,
) -> Insights {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut materials = Vec::new();
    let mut seen = HashSet::new();

    for (category, tally) in category_scores {
        let Some(pct) = tally.percentage() else {
            continue;
        };
        match CategoryStanding::from_percentage(pct) {
            CategoryStanding::Strength => strengths.push(category.clone()),
            CategoryStanding::Weakness => {
                weaknesses.push(category.clone());
                for m in study_materials(category)
                    .into_iter()
                    .take(MATERIALS_PER_WEAKNESS)
                {
                    if seen.insert(m.clone()) {
                        materials.push(m);
                    }
                }
            }
            CategoryStanding::Neutral => {}
        }
    }

    let skills = tally_skills(questions, answers)
        .into_iter()
        .map(|(skill, tally)| {
            let score = tally.percentage();
            SkillScore {
                skill,
                correct: tally.correct,
                answered: tally.total,
                score,
                status: score.map(SkillStatus::from_score),
            }
        })
        .collect();

    let speed = analyze_speed(question_times);
    let total_secs: f64 = question_times.values().sum();
    let timing = TimingSummary {
        total_secs,
        average_per_question: if questions.is_empty() {
            None
        } else {
            Some(total_secs / questions.len() as f64)
        },
    };

    let predicted_score = predict_next_score(overall_score);
    let recommendation = recommend(
        overall_score,
        &strengths,
        &weaknesses,
        &speed,
        !materials.is_empty(),
    );

    let mut insights = Insights {
        strengths,
        weaknesses,
        skills,
        speed,
        timing,
        predicted_score,
        recommendation,
        study_materials: materials,
        study_plan: Vec::new(),
    };
    insights.study_plan = generate_study_plan(&insights);

    tracing::debug!(
        strengths = insights.strengths.len(),
        weaknesses = insights.weaknesses.len(),
        pace = ?insights.speed.pace,
        "synthesized insights"
    );

    insights
}

fn recommend(
    score: f64,
    strengths: &[String],
    weaknesses: &[String],
    speed: &SpeedAnalysis,
    has_materials: bool,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if score >= 80.0 {
        parts.push("Excellent performance!".into());
        if !strengths.is_empty() {
            parts.push(format!("You're excelling in {}.", strengths.join(", ")));
        }
        parts.push(
            "Focus on maintaining consistency and attempting advanced-level questions.".into(),
        );
    } else if score >= 60.0 {
        parts.push("Good job!".into());
        if !strengths.is_empty() {
            parts.push(format!("Your strengths are in {}.", strengths.join(", ")));
        }
        if !weaknesses.is_empty() {
            parts.push(format!(
                "To improve further, focus on: {}.",
                weaknesses.join(", ")
            ));
        }
        parts.push(speed.advice.clone());
    } else {
        parts.push("Keep practicing!".into());
        if !weaknesses.is_empty() {
            parts.push(format!(
                "Priority areas for improvement: {}.",
                weaknesses.join(", ")
            ));
            parts.push("Dedicate 60% of study time to these topics.".into());
        }
        parts.push(speed.advice.clone());
        if has_materials {
            parts.push("Recommended study materials are listed below.".into());
        }
    }

    parts.join(" ")
}

/// Render a percentage without a trailing `.0` for whole numbers.
fn format_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// Build the ordered study plan for a set of insights.
pub fn generate_study_plan(insights: &Insights) -> Vec<String> {
    let mut plan = Vec::new();

    if !insights.weaknesses.is_empty() {
        plan.push(format!(
            "Priority Focus (60% time): {}",
            insights.weaknesses.join(", ")
        ));
    }

    for skill in &insights.skills {
        if let (Some(score), Some(SkillStatus::NeedsImprovement)) = (skill.score, skill.status) {
            plan.push(format!(
                "{}: Currently at {}%. Practice daily to reach 70%+",
                skill.skill.label(),
                score.round()
            ));
        }
    }

    if !insights.study_materials.is_empty() {
        plan.push("Recommended Resources:".to_string());
        for material in &insights.study_materials {
            plan.push(format!("  - {material}"));
        }
    }

    if !insights.strengths.is_empty() {
        plan.push(format!(
            "Maintain Excellence (20% time): {}",
            insights.strengths.join(", ")
        ));
    }

    plan.push(format!("Pace: {}", insights.speed.advice));
    plan.push(format!(
        "Target Score: {}% (achievable in next attempt)",
        format_percent(insights.predicted_score)
    ));
    plan.push(
        "Study Schedule: 2 hours daily - 1.2 hrs weak areas, 30 mins practice, 30 mins revision"
            .to_string(),
    );

    plan
}
