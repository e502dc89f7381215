//! Leaderboard view models

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::ResponseStatus;

/// One ranked row derived from a completed response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: i32,
    pub user_id: Uuid,
    pub total_score: i64,
    pub total_time_taken: i64,
    pub status: ResponseStatus,
    pub percentage: f64,
    pub percentile: f64,
    pub completed_at: Option<DateTime<Utc>>,
}
