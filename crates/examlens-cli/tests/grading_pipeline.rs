//! End-to-end grading tests over the bundled exam and attempt files.
//!
//! These exercise load -> validate -> grade -> synthesize -> persist without
//! going through the binary.

use std::path::Path;

use examlens_core::insights::SpeedPace;
use examlens_core::parser::{check_attempt, parse_attempt, parse_exam};
use examlens_core::report::{AttemptReport, Trend};
use examlens_report::html::generate_html;

fn load(attempt: &str) -> AttemptReport {
    let exam = parse_exam(Path::new("../../exams/aptitude.toml")).unwrap();
    let attempt = parse_attempt(Path::new(attempt)).unwrap();
    assert!(check_attempt(&exam, &attempt).is_empty());
    AttemptReport::build(&exam, &attempt)
}

#[test]
fn first_attempt_scores_and_insights() {
    let report = load("../../attempts/aptitude-first.json");
    let result = &report.result;

    assert_eq!(result.correct, 3);
    assert_eq!(result.wrong, 4);
    assert_eq!(result.unanswered, 1);
    assert_eq!(result.score, 37.5);
    assert!((result.total_marks - 2.0).abs() < 1e-9);
    assert_eq!(result.max_marks, 8.0);
    assert_eq!(result.weighted_max_marks, 9.0);

    let categories: Vec<_> = result.category_scores.keys().map(String::as_str).collect();
    assert_eq!(
        categories,
        ["Physics", "Mathematics", "Logical Reasoning", "Data Interpretation"]
    );

    let insights = &report.insights;
    assert_eq!(insights.weaknesses, ["Physics", "Logical Reasoning"]);
    assert_eq!(insights.strengths, ["Data Interpretation"]);
    assert_eq!(insights.predicted_score, 47.5);
    assert_eq!(insights.speed.pace, SpeedPace::Balanced);
    assert_eq!(
        insights.study_materials,
        [
            "NCERT Physics Textbooks (Class 11-12)",
            "HC Verma - Concepts of Physics",
            "RS Aggarwal - Logical Reasoning",
            "Arun Sharma - Logical Reasoning",
        ]
    );
    assert!(insights.recommendation.starts_with("Keep practicing!"));
}

#[test]
fn first_attempt_study_plan_order() {
    let report = load("../../attempts/aptitude-first.json");
    let plan = &report.insights.study_plan;

    assert_eq!(plan[0], "Priority Focus (60% time): Physics, Logical Reasoning");
    let resources = plan.iter().position(|l| l == "Recommended Resources:").unwrap();
    let maintain = plan
        .iter()
        .position(|l| l == "Maintain Excellence (20% time): Data Interpretation")
        .unwrap();
    assert!(resources < maintain);
    assert!(plan.contains(&"Target Score: 47.5% (achievable in next attempt)".to_string()));
    assert!(plan[plan.len() - 1].starts_with("Study Schedule:"));
}

#[test]
fn second_attempt_is_perfect_and_improves() {
    let baseline = load("../../attempts/aptitude-first.json");
    let current = load("../../attempts/aptitude-second.json");

    assert_eq!(current.result.score, 100.0);
    assert!(current.insights.weaknesses.is_empty());
    assert_eq!(current.insights.predicted_score, 100.0);
    assert_eq!(current.result.grade().to_string(), "A+");

    let progress = current.compare(&baseline, 5.0);
    assert_eq!(progress.overall_delta, 62.5);
    assert_eq!(progress.trend, Trend::Improving);
    assert!(!progress.has_declines());
    let math = progress
        .categories
        .iter()
        .find(|c| c.category == "Mathematics")
        .unwrap();
    assert_eq!(math.delta, 50.0);
}

#[test]
fn report_survives_json_and_renders_html() {
    let report = load("../../attempts/aptitude-first.json");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    report.save_json(&path).unwrap();
    let loaded = AttemptReport::load_json(&path).unwrap();
    assert_eq!(loaded.insights.study_plan, report.insights.study_plan);

    let html = generate_html(&loaded);
    assert!(html.contains("General Aptitude"));
    assert!(html.contains("Priority Focus (60% time)"));
}
