//! Session persistence
//!
//! The engine writes through a [`SessionStore`] after every locked operation.
//! [`PgStore`] backs production, [`MemoryStore`] backs tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{QuizRepository, ResponseRepository},
    error::AppResult,
    models::{Quiz, QuizStatus, Response},
};

/// Durable storage for quizzes and responses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save_quiz(&self, quiz: &Quiz) -> AppResult<()>;

    async fn load_quiz(&self, id: &Uuid) -> AppResult<Option<Quiz>>;

    /// Quizzes that are not completed yet, for restore at startup
    async fn load_open_quizzes(&self) -> AppResult<Vec<Quiz>>;

    /// Upsert keyed by (quiz, user)
    async fn save_response(&self, response: &Response) -> AppResult<()>;

    async fn load_responses(&self, quiz_id: &Uuid) -> AppResult<Vec<Response>>;
}

/// PostgreSQL store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn save_quiz(&self, quiz: &Quiz) -> AppResult<()> {
        QuizRepository::upsert(&self.pool, quiz).await
    }

    async fn load_quiz(&self, id: &Uuid) -> AppResult<Option<Quiz>> {
        QuizRepository::find_by_id(&self.pool, id).await
    }

    async fn load_open_quizzes(&self) -> AppResult<Vec<Quiz>> {
        QuizRepository::list_open(&self.pool).await
    }

    async fn save_response(&self, response: &Response) -> AppResult<()> {
        ResponseRepository::upsert(&self.pool, response).await
    }

    async fn load_responses(&self, quiz_id: &Uuid) -> AppResult<Vec<Response>> {
        ResponseRepository::list_by_quiz(&self.pool, quiz_id).await
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    quizzes: RwLock<HashMap<Uuid, Quiz>>,
    responses: RwLock<HashMap<(Uuid, Uuid), Response>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save_quiz(&self, quiz: &Quiz) -> AppResult<()> {
        self.quizzes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(quiz.id, quiz.clone());
        Ok(())
    }

    async fn load_quiz(&self, id: &Uuid) -> AppResult<Option<Quiz>> {
        Ok(self
            .quizzes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned())
    }

    async fn load_open_quizzes(&self) -> AppResult<Vec<Quiz>> {
        Ok(self
            .quizzes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|q| q.status != QuizStatus::Completed)
            .cloned()
            .collect())
    }

    async fn save_response(&self, response: &Response) -> AppResult<()> {
        self.responses
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((response.quiz_id, response.user_id), response.clone());
        Ok(())
    }

    async fn load_responses(&self, quiz_id: &Uuid) -> AppResult<Vec<Response>> {
        Ok(self
            .responses
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|r| r.quiz_id == *quiz_id)
            .cloned()
            .collect())
    }
}
