//! Participant session model

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Response;

/// Ephemeral per-participant state while a quiz is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSession {
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
    /// Order in which this participant is presented the questions
    pub question_order: Vec<Uuid>,
    /// Index into `question_order` of the question being answered
    pub current_index: usize,
    /// When the current question was presented
    pub question_started_at: DateTime<Utc>,
    pub tab_switch_count: u32,
}

impl ParticipantSession {
    pub fn new(user_id: Uuid, question_order: Vec<Uuid>, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            joined_at: now,
            question_order,
            current_index: 0,
            question_started_at: now,
            tab_switch_count: 0,
        }
    }

    pub fn current_question(&self) -> Option<Uuid> {
        self.question_order.get(self.current_index).copied()
    }

    /// Milliseconds since the current question was presented
    pub fn question_elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.question_started_at).num_milliseconds().max(0)
    }

    /// Move the cursor to the first question `response` has not answered yet.
    ///
    /// The presentation clock restarts only when the cursor actually moves.
    pub fn sync_cursor(&mut self, response: Option<&Response>, now: DateTime<Utc>) {
        let next = self
            .question_order
            .iter()
            .position(|id| response.is_none_or(|r| r.answer_for(id).is_none()))
            .unwrap_or(self.question_order.len());

        if next != self.current_index {
            self.current_index = next;
            self.question_started_at = now;
        }
    }
}
