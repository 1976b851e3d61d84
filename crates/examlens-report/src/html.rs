//! HTML report generator.
//!
//! Produces a self-contained results page with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use examlens_core::grading::{CategoryScores, OutcomeStatus};
use examlens_core::insights::SkillStatus;
use examlens_core::report::AttemptReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page from an attempt report.
pub fn generate_html(report: &AttemptReport) -> String {
    let result = &report.result;
    let insights = &report.insights;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>examlens results: {}</title>\n",
        html_escape(&report.exam.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.exam.title)));
    let student = report
        .student_id
        .as_deref()
        .map(html_escape)
        .unwrap_or_else(|| "anonymous".to_string());
    html.push_str(&format!(
        "<p class=\"meta\">Key <strong>{}</strong> | {} questions | student {} | {}</p>\n",
        html_escape(&report.exam.key),
        report.exam.question_count,
        student,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<div class=\"grade\">{}</div>\n",
        html_escape(&result.grade().to_string())
    ));
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Marks</th><th>Correct</th><th>Wrong</th><th>Unanswered</th><th>Predicted</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{:.1}%</td><td>{:.2} / {}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td></tr></tbody>\n",
        result.score,
        result.total_marks,
        result.max_marks,
        result.correct,
        result.wrong,
        result.unanswered,
        insights.predicted_score,
    ));
    html.push_str("</table>\n");
    if result.penalty > 0.0 {
        html.push_str(&format!(
            "<p class=\"penalty\">Penalty: -{:.2} marks for {} wrong answer(s)</p>\n",
            result.penalty, result.wrong
        ));
    }
    html.push_str(&format!(
        "<p class=\"recommendation\">{}</p>\n",
        html_escape(&insights.recommendation)
    ));
    html.push_str("</section>\n");

    // Categories
    html.push_str("<section class=\"categories\">\n");
    html.push_str("<h2>Categories</h2>\n");
    if result.category_scores.is_empty() {
        html.push_str("<p>No categories.</p>\n");
    } else {
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>Category</th><th>Correct</th><th>Total</th><th>Score</th></tr></thead>\n<tbody>\n");
        for (category, tally) in &result.category_scores {
            let pct = tally.percentage().unwrap_or(0.0);
            let class = if insights.strengths.contains(category) {
                "pass"
            } else if insights.weaknesses.contains(category) {
                "fail"
            } else {
                ""
            };
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td></tr>\n",
                class,
                html_escape(category),
                tally.correct,
                tally.total,
                pct
            ));
        }
        html.push_str("</tbody></table>\n");
        html.push_str(&generate_bar_chart(&result.category_scores));
    }
    html.push_str("</section>\n");

    // Skills
    html.push_str("<section class=\"skills\">\n");
    html.push_str("<h2>Skills</h2>\n");
    html.push_str("<table>\n<thead><tr><th>Skill</th><th>Answered</th><th>Score</th><th>Status</th></tr></thead>\n<tbody>\n");
    for skill in &insights.skills {
        let (score, status, class) = match (skill.score, skill.status) {
            (Some(score), Some(status)) => {
                let class = match status {
                    SkillStatus::Excellent => "pass",
                    SkillStatus::Good => "",
                    SkillStatus::NeedsImprovement => "fail",
                };
                (format!("{score:.0}%"), status.to_string(), class)
            }
            _ => ("-".to_string(), "no data".to_string(), ""),
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            skill.skill.label(),
            skill.answered,
            score,
            status
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Questions
    html.push_str("<section class=\"questions\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table>\n<thead><tr><th>#</th><th>Category</th><th>Result</th><th>Marks</th><th>Time</th></tr></thead>\n<tbody>\n");
    for outcome in &result.outcomes {
        let (class, label) = match outcome.status {
            OutcomeStatus::Correct => ("pass", "Correct"),
            OutcomeStatus::Wrong => ("fail", "Wrong"),
            OutcomeStatus::Unanswered => ("", "Unanswered"),
        };
        let time = report
            .question_times
            .get(&outcome.question_id)
            .map(|secs| format_duration(*secs))
            .unwrap_or_else(|| "-".to_string());
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{:+.2}</td><td>{}</td></tr>\n",
            class,
            outcome.question_id,
            html_escape(&outcome.category),
            label,
            outcome.marks,
            time
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Total time {}. {}</p>\n",
        format_duration(insights.timing.total_secs),
        html_escape(&insights.speed.advice)
    ));
    html.push_str("</section>\n");

    // Study plan
    html.push_str("<section class=\"plan\">\n");
    html.push_str("<h2>Study plan</h2>\n<ol>\n");
    for line in &insights.study_plan {
        html.push_str(&format!("<li>{}</li>\n", html_escape(line.trim())));
    }
    html.push_str("</ol>\n</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AttemptReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn format_duration(secs: f64) -> String {
    let whole = secs.max(0.0).round() as u64;
    format!("{}m {}s", whole / 60, whole % 60)
}

fn generate_bar_chart(categories: &CategoryScores) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let rows: Vec<(&String, f64)> = categories
        .iter()
        .map(|(c, t)| (c, t.percentage().unwrap_or(0.0)))
        .collect();

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (category, pct)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (*pct / 100.0 * max_width as f64) as usize;

        let color = if *pct >= 70.0 {
            "#22c55e"
        } else if *pct >= 50.0 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(category)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            pct
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.grade { font-size: 3rem; font-weight: bold; }
.penalty { color: #b91c1c; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
