//! Quiz repository

use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{AccessControl, Question, Quiz, QuizSettings, QuizStatus},
};

/// Row shape of the `quizzes` table
#[derive(Debug, FromRow)]
struct QuizRow {
    id: Uuid,
    title: String,
    owner_id: Uuid,
    code: Option<String>,
    questions: Json<Vec<Question>>,
    settings: Json<QuizSettings>,
    access_control: Json<AccessControl>,
    status: String,
    scheduled_at: Option<DateTime<Utc>>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QuizRow> for Quiz {
    type Error = AppError;

    fn try_from(row: QuizRow) -> Result<Self, Self::Error> {
        let status = QuizStatus::from_str(&row.status)
            .ok_or_else(|| AppError::Database(format!("unknown quiz status '{}'", row.status)))?;

        Ok(Quiz {
            id: row.id,
            title: row.title,
            owner_id: row.owner_id,
            code: row.code,
            questions: row.questions.0,
            settings: row.settings.0,
            access_control: row.access_control.0,
            status,
            scheduled_at: row.scheduled_at,
            started_at: row.started_at,
            ended_at: row.ended_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for quiz database operations
pub struct QuizRepository;

impl QuizRepository {
    /// Insert or replace a quiz document
    pub async fn upsert(pool: &PgPool, quiz: &Quiz) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO quizzes (
                id, title, owner_id, code, questions, settings, access_control,
                status, scheduled_at, started_at, ended_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                code = EXCLUDED.code,
                questions = EXCLUDED.questions,
                settings = EXCLUDED.settings,
                access_control = EXCLUDED.access_control,
                status = EXCLUDED.status,
                scheduled_at = EXCLUDED.scheduled_at,
                started_at = EXCLUDED.started_at,
                ended_at = EXCLUDED.ended_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(quiz.id)
        .bind(&quiz.title)
        .bind(quiz.owner_id)
        .bind(quiz.code.as_deref())
        .bind(Json(&quiz.questions))
        .bind(Json(&quiz.settings))
        .bind(Json(&quiz.access_control))
        .bind(quiz.status.as_str())
        .bind(quiz.scheduled_at)
        .bind(quiz.started_at)
        .bind(quiz.ended_at)
        .bind(quiz.created_at)
        .bind(quiz.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Find quiz by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Quiz>> {
        let row = sqlx::query_as::<_, QuizRow>(r#"SELECT * FROM quizzes WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.map(Quiz::try_from).transpose()
    }

    /// All quizzes that have not completed yet
    pub async fn list_open(pool: &PgPool) -> AppResult<Vec<Quiz>> {
        let rows = sqlx::query_as::<_, QuizRow>(
            r#"SELECT * FROM quizzes WHERE status <> 'completed' ORDER BY created_at"#,
        )
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(Quiz::try_from).collect()
    }
}
