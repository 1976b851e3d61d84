//! Keyword-based skill classification of question text.
//!
//! Rules are evaluated in table order and the first match wins. Keyword sets
//! overlap ("if" vs a digit), so the order is part of the behaviour.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grading::Tally;
use crate::model::{AnswerSet, Question};

/// The kind of thinking a question appears to test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Theoretical,
    Mathematical,
    Logical,
    ProblemSolving,
    /// Matched no rule; excluded from skill scoring.
    General,
}

impl SkillType {
    /// Skills that receive a score, in reporting order.
    pub const SCORED: [SkillType; 4] = [
        SkillType::Theoretical,
        SkillType::Mathematical,
        SkillType::Logical,
        SkillType::ProblemSolving,
    ];

    /// Human-readable label used in reports and study plans.
    pub fn label(&self) -> &'static str {
        match self {
            SkillType::Theoretical => "Theoretical Knowledge",
            SkillType::Mathematical => "Mathematical Ability",
            SkillType::Logical => "Logical Reasoning",
            SkillType::ProblemSolving => "Problem Solving",
            SkillType::General => "General",
        }
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classification rule: a predicate over lowercased text and its skill.
pub struct SkillRule {
    pub skill: SkillType,
    pub matches: fn(&str) -> bool,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

fn is_theoretical(text: &str) -> bool {
    contains_any(text, &["define", "what is", "explain", "theory", "concept"])
}

fn is_mathematical(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        || contains_any(
            text,
            &["calculate", "find the value", "solve", "equation", "formula"],
        )
}

fn is_logical(text: &str) -> bool {
    contains_any(
        text,
        &["if", "then", "pattern", "sequence", "reasoning", "conclude"],
    )
}

fn is_problem_solving(text: &str) -> bool {
    contains_any(text, &["apply", "use", "scenario", "situation", "problem"])
}

/// Ordered classification table.
pub static SKILL_RULES: [SkillRule; 4] = [
    SkillRule {
        skill: SkillType::Theoretical,
        matches: is_theoretical,
    },
    SkillRule {
        skill: SkillType::Mathematical,
        matches: is_mathematical,
    },
    SkillRule {
        skill: SkillType::Logical,
        matches: is_logical,
    },
    SkillRule {
        skill: SkillType::ProblemSolving,
        matches: is_problem_solving,
    },
];

/// Classify question text into a skill type.
pub fn classify(text: &str) -> SkillType {
    let lower = text.to_lowercase();
    SKILL_RULES
        .iter()
        .find(|rule| (rule.matches)(&lower))
        .map(|rule| rule.skill)
        .unwrap_or(SkillType::General)
}

/// Correct/total per scored skill over answered questions.
///
/// Unanswered and general questions do not count.
pub fn tally_skills(questions: &[Question], answers: &AnswerSet) -> Vec<(SkillType, Tally)> {
    let mut tallies: Vec<(SkillType, Tally)> = SkillType::SCORED
        .iter()
        .map(|&skill| (skill, Tally::default()))
        .collect();

    for question in questions {
        let skill = classify(&question.text);
        let Some(answer) = answers.get(&question.id) else {
            continue;
        };
        let Some((_, tally)) = tallies.iter_mut().find(|(s, _)| *s == skill) else {
            continue;
        };
        tally.total += 1;
        if question.is_correct(answer) {
            tally.correct += 1;
        }
    }

    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, AnswerType, CorrectAnswer};

    #[test]
    fn theoretical_checked_first() {
        assert_eq!(classify("Define inertia"), SkillType::Theoretical);
        // "what is" wins even with a digit present
        assert_eq!(classify("What is 2 + 2?"), SkillType::Theoretical);
    }

    #[test]
    fn digits_beat_logical_keywords() {
        assert_eq!(classify("If x = 3, then y is?"), SkillType::Mathematical);
        assert_eq!(classify("Solve for x"), SkillType::Mathematical);
    }

    #[test]
    fn logical_and_problem_solving() {
        assert_eq!(classify("Continue the PATTERN: A, C, E"), SkillType::Logical);
        assert_eq!(
            classify("Which tool would you apply here?"),
            SkillType::ProblemSolving
        );
        assert_eq!(classify("Name the capital of France"), SkillType::General);
    }

    #[test]
    fn substring_matching_is_literal() {
        // "different" contains "if"
        assert_eq!(classify("Which word is different"), SkillType::Logical);
    }

    #[test]
    fn tallies_skip_unanswered_and_general() {
        let make = |id, text: &str| Question {
            id,
            text: text.into(),
            options: vec!["a".into(), "b".into()],
            answer_type: AnswerType::Single,
            correct: CorrectAnswer::Single(0),
            category: "General".into(),
            marks: None,
            negative_marks: None,
        };
        let questions = vec![
            make(1, "Define force"),
            make(2, "Explain entropy"),
            make(3, "Calculate 3 * 4"),
            make(4, "Name a colour"),
        ];
        let answers = AnswerSet::from([
            (1, Answer::Single(0)),
            (2, Answer::Single(1)),
            (4, Answer::Single(0)),
        ]);
        let tallies = tally_skills(&questions, &answers);
        let get = |skill| tallies.iter().find(|(s, _)| *s == skill).unwrap().1;
        assert_eq!(get(SkillType::Theoretical), Tally { correct: 1, total: 2 });
        assert_eq!(get(SkillType::Mathematical), Tally::default());
        assert_eq!(tallies.len(), 4);
    }
}
