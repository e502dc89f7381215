//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use livequiz::{
    config::EngineConfig,
    constants::roles,
    db::MemoryStore,
    models::{
        AccessControl, EventType, Question, QuestionKind, QuestionType, Quiz, QuizSettings,
        SessionEvent, User,
    },
    services::{BroadcastPublisher, SessionEngine},
};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Engine wired to an in-memory store and an in-process event channel
pub struct Harness {
    pub engine: Arc<SessionEngine>,
    pub store: Arc<MemoryStore>,
    pub events: BroadcastPublisher,
}

pub fn harness() -> Harness {
    harness_with(EngineConfig::default())
}

pub fn harness_with(config: EngineConfig) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let events = BroadcastPublisher::new();
    let engine = Arc::new(SessionEngine::new(
        store.clone(),
        Arc::new(events.clone()),
        config,
    ));
    Harness {
        engine,
        store,
        events,
    }
}

pub fn faculty() -> User {
    User::new(Uuid::new_v4(), roles::FACULTY, Some("CSE"), None)
}

pub fn student(branch: &str, section: &str) -> User {
    User::new(Uuid::new_v4(), roles::STUDENT, Some(branch), Some(section))
}

/// Single-choice question over A-D whose correct option is "A"
pub fn single_choice(points: i32) -> Question {
    Question {
        id: Uuid::new_v4(),
        position: 1,
        text: "Pick the first letter".to_string(),
        kind: QuestionKind::parse(
            QuestionType::SingleChoice,
            ["A", "B", "C", "D"].iter().map(|o| o.to_string()).collect(),
            "A",
        )
        .unwrap(),
        points,
        difficulty: None,
        topic: None,
        time_limit_seconds: None,
    }
}

pub fn quiz(owner: &User, questions: usize, settings: QuizSettings, access: AccessControl) -> Quiz {
    let questions = (0..questions)
        .map(|i| Question {
            position: i as u32 + 1,
            ..single_choice(10)
        })
        .collect();
    Quiz::draft(
        "Weekly check".to_string(),
        owner.id,
        None,
        questions,
        settings,
        access,
    )
}

pub fn public_access() -> AccessControl {
    AccessControl {
        is_public: true,
        ..Default::default()
    }
}

/// Everything published so far
pub fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn count(events: &[SessionEvent], event_type: EventType) -> usize {
    events.iter().filter(|e| e.event_type == event_type).count()
}
