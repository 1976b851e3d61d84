//! Core data model types for examlens.
//!
//! Exams are authored once and read-only afterwards. Answers and timings are
//! snapshots handed over at submission time and keyed by question id.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerType {
    /// Exactly one option is selected.
    #[default]
    Single,
    /// Any non-empty set of options is selected.
    Multiple,
    /// A two-option true/false item.
    Boolean,
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerType::Single => write!(f, "single"),
            AnswerType::Multiple => write!(f, "multiple"),
            AnswerType::Boolean => write!(f, "boolean"),
        }
    }
}

impl FromStr for AnswerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "mcq" => Ok(AnswerType::Single),
            "multiple" | "multi" => Ok(AnswerType::Multiple),
            "boolean" | "bool" | "true-false" => Ok(AnswerType::Boolean),
            other => Err(format!("unknown answer type: {other}")),
        }
    }
}

/// The answer key of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Single(usize),
    Multiple(BTreeSet<usize>),
}

impl CorrectAnswer {
    /// All option indices referenced by this key.
    pub fn indices(&self) -> Vec<usize> {
        match self {
            CorrectAnswer::Single(i) => vec![*i],
            CorrectAnswer::Multiple(set) => set.iter().copied().collect(),
        }
    }
}

/// A student's response to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(usize),
    Multiple(BTreeSet<usize>),
}

impl Answer {
    /// Build a multiple-selection answer from any list of indices.
    pub fn multiple(indices: impl IntoIterator<Item = usize>) -> Self {
        Answer::Multiple(indices.into_iter().collect())
    }
}

/// Submitted answers keyed by question id. A missing key means unanswered.
pub type AnswerSet = BTreeMap<u32, Answer>;

/// Cumulative seconds spent per question id, summed across revisits.
pub type QuestionTimes = BTreeMap<u32, f64>;

/// One assessable item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique within its exam; joins answers and timings.
    pub id: u32,
    /// The prompt shown to the student.
    #[serde(alias = "question")]
    pub text: String,
    /// Ordered options. Empty for free-text items.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, alias = "type")]
    pub answer_type: AnswerType,
    pub correct: CorrectAnswer,
    /// Teacher-assigned topic label.
    #[serde(default = "default_category")]
    pub category: String,
    /// Marks for a fully-correct response; the exam default applies if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<f64>,
    /// Per-question penalty for a wrong response, overriding the exam's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_marks: Option<f64>,
}

fn default_category() -> String {
    "General".to_string()
}

impl Question {
    /// Whether `answer` matches this question's key exactly.
    ///
    /// Multiple-choice keys are compared as sets with no partial credit. A
    /// single index submitted against a multiple key counts as a one-element
    /// set.
    pub fn is_correct(&self, answer: &Answer) -> bool {
        match (&self.correct, answer) {
            (CorrectAnswer::Single(key), Answer::Single(given)) => key == given,
            (CorrectAnswer::Single(_), Answer::Multiple(_)) => false,
            (CorrectAnswer::Multiple(key), Answer::Multiple(given)) => key == given,
            (CorrectAnswer::Multiple(key), Answer::Single(given)) => {
                key.len() == 1 && key.contains(given)
            }
        }
    }
}

/// An ordered set of questions plus scoring and timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    /// Join code handed to students.
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Time limit for an attempt, in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: u64,
    /// Marks subtracted per wrong answer, unless a question overrides it.
    #[serde(default)]
    pub negative_marking: f64,
    /// Marks per correct answer for questions without their own value.
    #[serde(default = "default_positive_marks")]
    pub positive_marks: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

pub(crate) fn default_duration() -> u64 {
    1800
}

pub(crate) fn default_positive_marks() -> f64 {
    1.0
}

impl Exam {
    /// Look up a question by id.
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Marks awarded when `question` is answered correctly.
    pub fn marks_for(&self, question: &Question) -> f64 {
        question.marks.unwrap_or(self.positive_marks)
    }

    /// Marks deducted when `question` is answered wrongly.
    pub fn penalty_for(&self, question: &Question) -> f64 {
        question.negative_marks.unwrap_or(self.negative_marking)
    }
}

/// A finalized submission: the answer and timing snapshots of one attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// Exam this attempt belongs to.
    pub exam_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub answers: AnswerSet,
    #[serde(default)]
    pub question_times: QuestionTimes,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

const KEY_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const KEY_LEN: usize = 6;

/// Generate a random six-character join key such as `K3ZQ7A`.
pub fn generate_exam_key() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut key = String::with_capacity(KEY_LEN);
    for _ in 0..KEY_LEN {
        key.push(KEY_ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    key
}
