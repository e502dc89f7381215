//! Response and answer models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{question::is_attempted, QuestionType};
use crate::utils::stats::round1;

/// State of a participant's attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    InProgress,
    Completed,
    /// Force-completed by the anti-cheating monitor
    Disqualified,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Disqualified => "disqualified",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "disqualified" => Some(Self::Disqualified),
            _ => None,
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participant's answer to one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: Uuid,
    pub question_type: QuestionType,
    /// Raw submitted value; comma-joined for multi-select, empty when unattempted
    pub value: String,
    pub is_correct: bool,
    pub points_earned: i32,
    /// Milliseconds, never negative
    pub time_taken: i64,
    pub answered_at: DateTime<Utc>,
}

impl Answer {
    pub fn is_attempted(&self) -> bool {
        is_attempted(&self.value)
    }
}

/// A participant's durable attempt record for one quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    pub answers: Vec<Answer>,
    pub total_score: i64,
    pub max_possible_score: i64,
    pub percentage: f64,
    /// Milliseconds
    pub total_time_taken: i64,
    pub status: ResponseStatus,
    /// Written only when the leaderboard is finalized
    pub rank: Option<i32>,
    pub tab_switch_count: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Per-quiz completion order, the last ranking tie-break
    pub completion_seq: Option<i64>,
}

impl Response {
    pub fn new(quiz_id: Uuid, user_id: Uuid, max_possible_score: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            quiz_id,
            user_id,
            answers: Vec::new(),
            total_score: 0,
            max_possible_score,
            percentage: 0.0,
            total_time_taken: 0,
            status: ResponseStatus::InProgress,
            rank: None,
            tab_switch_count: 0,
            started_at: now,
            completed_at: None,
            completion_seq: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ResponseStatus::InProgress
    }

    pub fn answer_for(&self, question_id: &Uuid) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == *question_id)
    }

    /// Append an answer and recompute the running totals
    pub fn record(&mut self, answer: Answer) -> &Answer {
        self.answers.push(answer);
        self.recompute_totals();
        &self.answers[self.answers.len() - 1]
    }

    /// Derive score, time and percentage from the recorded answers
    pub fn recompute_totals(&mut self) {
        self.total_score = self.answers.iter().map(|a| i64::from(a.points_earned)).sum();
        self.total_time_taken = self.answers.iter().map(|a| a.time_taken).sum();
        self.percentage = percentage(self.total_score, self.max_possible_score);
    }

    /// Close the attempt
    pub fn finalize(&mut self, status: ResponseStatus, now: DateTime<Utc>, seq: i64) {
        self.status = status;
        self.completed_at = Some(now);
        self.completion_seq = Some(seq);
    }

    pub fn attempted_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_attempted()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }
}

/// Score as a percentage rounded to one decimal place
pub fn percentage(score: i64, max: i64) -> f64 {
    if max <= 0 {
        return 0.0;
    }
    round1(score as f64 / max as f64 * 100.0)
}
