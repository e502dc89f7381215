//! Per-quiz runtime state
//!
//! A [`QuizRuntime`] is everything the engine knows about one live quiz: the
//! quiz itself, every response and the participant sessions. It always sits
//! behind its quiz's mutex, so the methods here are plain synchronous code.
//! Changes are recorded as dirty marks and queued events which the engine
//! flushes to the store and the publisher before releasing the lock.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::{
    config::EngineConfig,
    models::{EventType, ParticipantSession, Quiz, QuizStatus, Response, SessionEvent},
};

/// Shared engine pieces handed to in-lock operations
pub struct EngineContext<'a> {
    pub codes: &'a JoinCodeIndex,
    pub config: &'a EngineConfig,
}

/// Mutable state of one quiz
#[derive(Debug)]
pub struct QuizRuntime {
    pub quiz: Quiz,
    /// Keyed by user
    pub responses: HashMap<Uuid, Response>,
    /// Keyed by user; present while the participant's attempt is open
    pub participants: HashMap<Uuid, ParticipantSession>,
    completion_seq: i64,
    outbox: Vec<SessionEvent>,
    quiz_dirty: bool,
    dirty_responses: HashSet<Uuid>,
}

impl QuizRuntime {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            responses: HashMap::new(),
            participants: HashMap::new(),
            completion_seq: 0,
            outbox: Vec::new(),
            quiz_dirty: false,
            dirty_responses: HashSet::new(),
        }
    }

    /// Rebuild a runtime from persisted state.
    ///
    /// In-progress responses of an active quiz get a fresh participant session
    /// positioned at their first unanswered question.
    pub fn restore(quiz: Quiz, responses: Vec<Response>, now: DateTime<Utc>) -> Self {
        let mut runtime = Self::new(quiz);
        runtime.completion_seq = responses
            .iter()
            .filter_map(|r| r.completion_seq)
            .max()
            .unwrap_or(0);

        for response in responses {
            if runtime.quiz.status == QuizStatus::Active && response.is_open() {
                let mut session = ParticipantSession::new(
                    response.user_id,
                    presentation_order(&runtime.quiz),
                    response.started_at,
                );
                session.tab_switch_count = response.tab_switch_count;
                session.sync_cursor(Some(&response), now);
                runtime.participants.insert(response.user_id, session);
            }
            runtime.responses.insert(response.user_id, response);
        }

        runtime
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz.id
    }

    /// Joined participants and participants with a response
    pub fn has_joined(&self, user_id: &Uuid) -> bool {
        self.participants.contains_key(user_id) || self.responses.contains_key(user_id)
    }

    /// Users whose attempt is still open, sessions and open responses alike
    pub fn open_participants(&self) -> Vec<Uuid> {
        let mut users: Vec<Uuid> = self.participants.keys().copied().collect();
        users.extend(
            self.responses
                .values()
                .filter(|r| r.is_open() && !self.participants.contains_key(&r.user_id))
                .map(|r| r.user_id),
        );
        users
    }

    /// Clones of every finished response
    pub fn completed_responses(&self) -> Vec<Response> {
        self.responses
            .values()
            .filter(|r| r.status.is_final())
            .cloned()
            .collect()
    }

    pub fn next_completion_seq(&mut self) -> i64 {
        self.completion_seq += 1;
        self.completion_seq
    }

    /// Queue an event for publishing after the current operation
    pub fn emit(&mut self, event_type: EventType, payload: serde_json::Value) {
        self.outbox
            .push(SessionEvent::new(event_type, self.quiz.id, payload));
    }

    pub fn take_outbox(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Mark the quiz document for write-through
    pub fn touch_quiz(&mut self, now: DateTime<Utc>) {
        self.quiz.updated_at = now;
        self.quiz_dirty = true;
    }

    /// Mark a response for write-through
    pub fn touch_response(&mut self, user_id: Uuid) {
        self.dirty_responses.insert(user_id);
    }

    pub fn quiz_dirty(&self) -> bool {
        self.quiz_dirty
    }

    pub fn clear_quiz_dirty(&mut self) {
        self.quiz_dirty = false;
    }

    pub fn dirty_response_ids(&self) -> Vec<Uuid> {
        self.dirty_responses.iter().copied().collect()
    }

    pub fn clear_response_dirty(&mut self, user_id: &Uuid) {
        self.dirty_responses.remove(user_id);
    }

    pub fn is_dirty(&self) -> bool {
        self.quiz_dirty || !self.dirty_responses.is_empty()
    }
}

/// Order in which a participant is shown the questions
pub fn presentation_order(quiz: &Quiz) -> Vec<Uuid> {
    let mut order: Vec<Uuid> = quiz.questions.iter().map(|q| q.id).collect();
    if quiz.settings.shuffle_questions {
        order.shuffle(&mut rand::rng());
    }
    order
}

/// Join codes currently held by scheduled or active quizzes.
///
/// Guarded by a short-lived std lock that is never held across an `.await`.
/// Callers may hold a quiz lock while touching the index, never the reverse.
#[derive(Debug, Default)]
pub struct JoinCodeIndex {
    codes: RwLock<HashMap<String, Uuid>>,
}

impl JoinCodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `code` for `quiz_id`. Returns false when another quiz holds it.
    pub fn claim(&self, code: &str, quiz_id: Uuid) -> bool {
        let mut codes = self.codes.write().unwrap_or_else(|e| e.into_inner());
        match codes.get(code) {
            Some(owner) if *owner != quiz_id => false,
            _ => {
                codes.insert(code.to_string(), quiz_id);
                true
            }
        }
    }

    /// Free `code` if `quiz_id` holds it
    pub fn release(&self, code: &str, quiz_id: Uuid) {
        let mut codes = self.codes.write().unwrap_or_else(|e| e.into_inner());
        if codes.get(code) == Some(&quiz_id) {
            codes.remove(code);
        }
    }

    pub fn lookup(&self, code: &str) -> Option<Uuid> {
        self.codes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(code)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.codes.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
