//! Question model and answer grading

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_TOPIC;

/// Question types as named by the authoring document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultiSelect,
    FillBlank,
    OpenAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultiSelect => "multi_select",
            Self::FillBlank => "fill_blank",
            Self::OpenAnswer => "open_answer",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific question content, including the answer key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice {
        options: Vec<String>,
        correct: String,
    },
    MultiSelect {
        options: Vec<String>,
        correct: BTreeSet<String>,
    },
    FillBlank {
        accepted: Vec<String>,
    },
    OpenAnswer {
        accepted: Vec<String>,
    },
}

impl QuestionKind {
    /// Build the typed content from the authoring wire format.
    ///
    /// `correct_answer` is a single option, a comma-joined set for multi-select,
    /// or pipe-separated accepted values for free text.
    pub fn parse(
        question_type: QuestionType,
        options: Vec<String>,
        correct_answer: &str,
    ) -> Result<Self, String> {
        match question_type {
            QuestionType::SingleChoice => {
                if correct_answer.is_empty() {
                    return Err("single-choice question needs a correct answer".to_string());
                }
                if !options.is_empty() && !options.iter().any(|o| o == correct_answer) {
                    return Err(format!(
                        "correct answer '{correct_answer}' is not one of the options"
                    ));
                }
                Ok(Self::SingleChoice {
                    options,
                    correct: correct_answer.to_string(),
                })
            }
            QuestionType::MultiSelect => {
                let correct = parse_selection(correct_answer);
                if correct.is_empty() {
                    return Err("multi-select question needs at least one correct option".to_string());
                }
                if !options.is_empty() {
                    if let Some(missing) = correct.iter().find(|c| !options.iter().any(|o| o.trim() == c.as_str())) {
                        return Err(format!("correct answer '{missing}' is not one of the options"));
                    }
                }
                Ok(Self::MultiSelect { options, correct })
            }
            QuestionType::FillBlank | QuestionType::OpenAnswer => {
                let accepted: Vec<String> = correct_answer
                    .split('|')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                if accepted.is_empty() {
                    return Err("free-text question needs at least one accepted answer".to_string());
                }
                if question_type == QuestionType::FillBlank {
                    Ok(Self::FillBlank { accepted })
                } else {
                    Ok(Self::OpenAnswer { accepted })
                }
            }
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::SingleChoice { .. } => QuestionType::SingleChoice,
            Self::MultiSelect { .. } => QuestionType::MultiSelect,
            Self::FillBlank { .. } => QuestionType::FillBlank,
            Self::OpenAnswer { .. } => QuestionType::OpenAnswer,
        }
    }

    /// Options shown to participants (empty for free-text questions)
    pub fn options(&self) -> &[String] {
        match self {
            Self::SingleChoice { options, .. } | Self::MultiSelect { options, .. } => options,
            Self::FillBlank { .. } | Self::OpenAnswer { .. } => &[],
        }
    }

    /// The answer key rendered back into the authoring wire format
    pub fn correct_answer(&self) -> String {
        match self {
            Self::SingleChoice { correct, .. } => correct.clone(),
            Self::MultiSelect { correct, .. } => {
                correct.iter().cloned().collect::<Vec<_>>().join(",")
            }
            Self::FillBlank { accepted } | Self::OpenAnswer { accepted } => accepted.join("|"),
        }
    }

    /// Whether `value` is a correct answer. Empty values are never correct.
    pub fn grade(&self, value: &str) -> bool {
        if !is_attempted(value) {
            return false;
        }

        match self {
            Self::SingleChoice { correct, .. } => value == correct,
            Self::MultiSelect { correct, .. } => parse_selection(value) == *correct,
            Self::FillBlank { accepted } | Self::OpenAnswer { accepted } => {
                let submitted = value.trim().to_lowercase();
                accepted.iter().any(|a| a.trim().to_lowercase() == submitted)
            }
        }
    }
}

/// One question of a quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub position: u32,
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub points: i32,
    pub difficulty: Option<String>,
    pub topic: Option<String>,
    /// Overrides the quiz-wide per-question limit when set
    pub time_limit_seconds: Option<u32>,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn topic(&self) -> &str {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TOPIC)
    }

    /// Per-question limit in seconds, if any applies
    pub fn effective_time_limit(&self, quiz_default_seconds: u32) -> Option<u32> {
        match self.time_limit_seconds {
            Some(limit) if limit > 0 => Some(limit),
            _ if quiz_default_seconds > 0 => Some(quiz_default_seconds),
            _ => None,
        }
    }
}

/// Whether a submitted value counts as an attempt
pub fn is_attempted(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Split a comma-joined selection into a normalized set
pub fn parse_selection(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
