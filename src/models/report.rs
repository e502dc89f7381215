//! Post-session analytics models

use serde::Serialize;
use uuid::Uuid;

use super::ResponseStatus;

/// Correct/wrong/total counts for one topic
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopicStats {
    pub topic: String,
    pub correct: usize,
    pub wrong: usize,
    pub total: usize,
}

/// A question the participant spent unusually long on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSpike {
    pub question_id: Uuid,
    pub time_taken: i64,
    pub average_time: f64,
}

/// Analytics for one participant
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParticipantReport {
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    pub status: Option<ResponseStatus>,
    pub total_questions: usize,
    pub attempted: usize,
    pub correct: usize,
    pub wrong: usize,
    pub unattempted: usize,
    /// Correct over attempted, as a percentage
    pub accuracy: f64,
    pub total_score: i64,
    pub max_possible_score: i64,
    pub percentage: f64,
    pub passed: bool,
    pub rank: Option<i32>,
    pub percentile: f64,
    pub total_time_taken: i64,
    pub topics: Vec<TopicStats>,
    pub time_spikes: Vec<TimeSpike>,
}

/// Count of participants whose total time falls in a bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    /// Exclusive upper bound in milliseconds, `None` for the open-ended bucket
    pub upper_ms: Option<i64>,
    pub count: usize,
}

/// Per-question aggregate over all responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStats {
    pub question_id: Uuid,
    pub position: u32,
    pub attempts: usize,
    pub correct: usize,
    pub correct_rate: f64,
    pub average_time: f64,
}

/// Analytics for a whole quiz
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuizSummary {
    pub quiz_id: Uuid,
    pub participants: usize,
    pub completed: usize,
    pub disqualified: usize,
    pub average_score: f64,
    pub highest_score: i64,
    pub lowest_score: i64,
    pub average_percentage: f64,
    pub pass_rate: f64,
    pub median_time: i64,
    pub time_distribution: Vec<TimeBucket>,
    pub questions: Vec<QuestionStats>,
}
