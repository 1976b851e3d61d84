//! Plain-text question bank import.
//!
//! Accepts loosely formatted question lists such as:
//!
//! ```text
//! Q1. Question text?
//! a) Option 1
//! b) Option 2
//! Answer: b
//! Category: Logical Reasoning
//! ```
//!
//! Headers may also be `1.`, options `(a)` or `A.`, and answers `Correct: 2`
//! (1-based) or `Ans: c`. Lines without a recognised prefix after the prompt
//! are taken as options, up to four.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ImportDefaults;
use crate::error::ExamError;
use crate::model::{generate_exam_key, AnswerType, CorrectAnswer, Exam, Question};
use crate::parser::ensure_valid;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(q\d+\.|\d+\.)\s*").expect("valid regex"));
static QUESTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^question:?\s*").expect("valid regex"));
static OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-d]\)|\([a-d]\)|[a-d]\.)\s*").expect("valid regex")
});
static ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(correct\s+answer|answer|correct|ans)\b\s*:?\s*(.*)$").expect("valid regex")
});
static ANSWER_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\(?([a-d]|\d+)\b").expect("valid regex"));
static CATEGORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^category\s*:?\s*(.*)$").expect("valid regex"));

const MAX_LOOSE_OPTIONS: usize = 4;

/// A question as read from text, before enhancement.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuestion {
    pub text: String,
    pub options: Vec<String>,
    /// Zero-based correct option, if an answer line was present.
    pub correct: Option<usize>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Suggestions derived from a parsed question's wording.
#[derive(Debug, Clone, PartialEq)]
pub struct Enhancement {
    pub answer_type: AnswerType,
    pub suggested_category: String,
    pub difficulty: Difficulty,
}

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Logical Reasoning",
        &["logic", "sequence", "pattern", "series", "analogy"],
    ),
    (
        "Numerical Ability",
        &["number", "calculate", "percentage", "ratio", "profit"],
    ),
    (
        "Verbal Reasoning",
        &["synonym", "antonym", "word", "sentence", "grammar"],
    ),
    (
        "Data Interpretation",
        &["data", "graph", "table", "chart", "statistics"],
    ),
    (
        "General Knowledge",
        &["capital", "country", "who", "when", "where", "history"],
    ),
    (
        "Technical",
        &["code", "algorithm", "program", "computer", "function"],
    ),
];

/// Split text into question blocks and parse each one.
///
/// Blocks that lack a prompt or two options are dropped.
pub fn parse_questions_from_text(text: &str) -> Vec<ParsedQuestion> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut blocks: Vec<Vec<&str>> = Vec::new();
    for line in normalized.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if HEADER.is_match(line) || blocks.is_empty() {
            blocks.push(Vec::new());
        }
        if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    blocks
        .iter()
        .filter_map(|block| {
            let parsed = parse_block(block);
            if parsed.is_none() {
                tracing::warn!(
                    "skipping unparseable block: {}",
                    block.first().copied().unwrap_or_default()
                );
            }
            parsed
        })
        .collect()
}

fn parse_block(lines: &[&str]) -> Option<ParsedQuestion> {
    // A prompt and at least two options.
    if lines.len() < 3 {
        return None;
    }

    let mut text = String::new();
    let mut options = Vec::new();
    let mut correct = None;
    let mut category = None;

    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            let stripped = HEADER.replace(line, "");
            text = QUESTION_LABEL.replace(&stripped, "").trim().to_string();
            continue;
        }

        if let Some(m) = OPTION.find(line) {
            let option = line[m.end()..].trim();
            if !option.is_empty() {
                options.push(option.to_string());
            }
            continue;
        }

        if let Some(caps) = ANSWER.captures(line) {
            match caps.get(2).and_then(|v| parse_answer_value(v.as_str())) {
                Some(index) => correct = Some(index),
                None => tracing::warn!("ignoring unreadable answer line: {line}"),
            }
            continue;
        }

        if let Some(caps) = CATEGORY.captures(line) {
            let value = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            if !value.is_empty() {
                category = Some(value.to_string());
            }
            continue;
        }

        if options.len() < MAX_LOOSE_OPTIONS {
            options.push(line.to_string());
        }
    }

    if text.is_empty() || options.len() < 2 {
        return None;
    }

    Some(ParsedQuestion {
        text,
        options,
        correct,
        category,
    })
}

/// Turn `b`, `(C)` or a 1-based number into a zero-based index.
fn parse_answer_value(value: &str) -> Option<usize> {
    let token = ANSWER_VALUE.captures(value.trim())?.get(1)?.as_str();
    match token.to_ascii_lowercase().as_bytes() {
        [c @ b'a'..=b'd'] => Some((c - b'a') as usize),
        _ => token.parse::<usize>().ok()?.checked_sub(1),
    }
}

/// Suggest an answer type, category, and difficulty from wording.
pub fn enhance_question(parsed: &ParsedQuestion) -> Enhancement {
    let lower = parsed.text.to_lowercase();

    let answer_type = if parsed.options.len() == 2
        && (lower.contains("true") || lower.contains("false"))
    {
        AnswerType::Boolean
    } else if lower.contains("all of")
        || lower.contains("select all")
        || lower.contains("which of the following")
    {
        AnswerType::Multiple
    } else {
        AnswerType::Single
    };

    let mut suggested_category = "General".to_string();
    let mut best = 0;
    for (category, keywords) in CATEGORY_KEYWORDS {
        let matches = keywords.iter().filter(|kw| lower.contains(*kw)).count();
        if matches > best {
            best = matches;
            suggested_category = category.to_string();
        }
    }

    let text_len = parsed.text.chars().count();
    let avg_option_len = parsed
        .options
        .iter()
        .map(|o| o.chars().count())
        .sum::<usize>() as f64
        / parsed.options.len().max(1) as f64;

    let difficulty = if text_len < 50 && avg_option_len < 20.0 {
        Difficulty::Easy
    } else if text_len > 150 || avg_option_len > 50.0 {
        Difficulty::Hard
    } else {
        Difficulty::Medium
    };

    Enhancement {
        answer_type,
        suggested_category,
        difficulty,
    }
}

/// Convert parsed questions into exam questions with sequential ids.
///
/// An explicit `Category:` line wins over the keyword suggestion. A missing
/// answer line defaults the key to the first option.
pub fn convert_to_questions(parsed: &[ParsedQuestion], start_id: u32) -> Vec<Question> {
    parsed
        .iter()
        .zip(start_id..)
        .map(|(p, id)| {
            let enhanced = enhance_question(p);
            let index = p.correct.unwrap_or_else(|| {
                tracing::warn!(question = id, "no answer line, defaulting to first option");
                0
            });
            let correct = match enhanced.answer_type {
                AnswerType::Multiple => CorrectAnswer::Multiple([index].into()),
                AnswerType::Single | AnswerType::Boolean => CorrectAnswer::Single(index),
            };
            Question {
                id,
                text: p.text.clone(),
                options: p.options.clone(),
                answer_type: enhanced.answer_type,
                correct,
                category: p
                    .category
                    .clone()
                    .unwrap_or(enhanced.suggested_category),
                marks: None,
                negative_marks: None,
            }
        })
        .collect()
}

/// Lowercase ASCII words joined by `-`, safe for ids and file names.
pub fn slugify(title: &str) -> String {
    let slug: Vec<String> = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_lowercase())
        .collect();
    if slug.is_empty() {
        "imported-exam".to_string()
    } else {
        slug.join("-")
    }
}

/// Build a validated exam from a plain-text question bank.
pub fn exam_from_text(
    text: &str,
    title: &str,
    defaults: &ImportDefaults,
) -> Result<Exam, ExamError> {
    let parsed = parse_questions_from_text(text);
    if parsed.is_empty() {
        return Err(ExamError::NoQuestions(title.to_string()));
    }

    let exam = Exam {
        id: slugify(title),
        title: title.to_string(),
        key: generate_exam_key(),
        questions: convert_to_questions(&parsed, 1),
        duration_secs: defaults.duration_secs,
        negative_marking: defaults.negative_marking,
        positive_marks: defaults.positive_marks,
        created_at: Some(chrono::Utc::now()),
    };

    ensure_valid(&exam)?;
    tracing::info!(exam = %exam.id, questions = exam.questions.len(), "imported exam");
    Ok(exam)
}
