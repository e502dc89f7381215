//! Real-time session events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::EVENT_CHANNEL_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    QuizScheduled,
    QuizStarted,
    QuizEnded,
    ParticipantJoined,
    AnswerAccepted,
    ResponseCompleted,
    ParticipantDisqualified,
    LeaderboardUpdated,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuizScheduled => "quiz_scheduled",
            Self::QuizStarted => "quiz_started",
            Self::QuizEnded => "quiz_ended",
            Self::ParticipantJoined => "participant_joined",
            Self::AnswerAccepted => "answer_accepted",
            Self::ResponseCompleted => "response_completed",
            Self::ParticipantDisqualified => "participant_disqualified",
            Self::LeaderboardUpdated => "leaderboard_updated",
        }
    }
}

/// Event handed to the real-time transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub quiz_id: Uuid,
    pub payload: serde_json::Value,
    pub emitted_at: DateTime<Utc>,
}

impl SessionEvent {
    pub fn new(event_type: EventType, quiz_id: Uuid, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            quiz_id,
            payload,
            emitted_at: Utc::now(),
        }
    }

    /// Pub/sub channel carrying events of this quiz
    pub fn channel(&self) -> String {
        format!("{}:{}", EVENT_CHANNEL_PREFIX, self.quiz_id)
    }
}
