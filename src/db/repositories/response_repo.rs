//! Response repository

use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Answer, Response, ResponseStatus},
};

/// Row shape of the `responses` table
#[derive(Debug, FromRow)]
struct ResponseRow {
    id: Uuid,
    quiz_id: Uuid,
    user_id: Uuid,
    answers: Json<Vec<Answer>>,
    total_score: i64,
    max_possible_score: i64,
    percentage: f64,
    total_time_taken: i64,
    status: String,
    rank: Option<i32>,
    tab_switch_count: i32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    completion_seq: Option<i64>,
}

impl TryFrom<ResponseRow> for Response {
    type Error = AppError;

    fn try_from(row: ResponseRow) -> Result<Self, Self::Error> {
        let status = ResponseStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Database(format!("unknown response status '{}'", row.status))
        })?;

        Ok(Response {
            id: row.id,
            quiz_id: row.quiz_id,
            user_id: row.user_id,
            answers: row.answers.0,
            total_score: row.total_score,
            max_possible_score: row.max_possible_score,
            percentage: row.percentage,
            total_time_taken: row.total_time_taken,
            status,
            rank: row.rank,
            tab_switch_count: u32::try_from(row.tab_switch_count).unwrap_or_default(),
            started_at: row.started_at,
            completed_at: row.completed_at,
            completion_seq: row.completion_seq,
        })
    }
}

/// Repository for response database operations
pub struct ResponseRepository;

impl ResponseRepository {
    /// Insert or replace the response of a (quiz, user) pair
    pub async fn upsert(pool: &PgPool, response: &Response) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO responses (
                id, quiz_id, user_id, answers, total_score, max_possible_score,
                percentage, total_time_taken, status, rank, tab_switch_count,
                started_at, completed_at, completion_seq
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (quiz_id, user_id) DO UPDATE SET
                answers = EXCLUDED.answers,
                total_score = EXCLUDED.total_score,
                max_possible_score = EXCLUDED.max_possible_score,
                percentage = EXCLUDED.percentage,
                total_time_taken = EXCLUDED.total_time_taken,
                status = EXCLUDED.status,
                rank = EXCLUDED.rank,
                tab_switch_count = EXCLUDED.tab_switch_count,
                completed_at = EXCLUDED.completed_at,
                completion_seq = EXCLUDED.completion_seq
            "#,
        )
        .bind(response.id)
        .bind(response.quiz_id)
        .bind(response.user_id)
        .bind(Json(&response.answers))
        .bind(response.total_score)
        .bind(response.max_possible_score)
        .bind(response.percentage)
        .bind(response.total_time_taken)
        .bind(response.status.as_str())
        .bind(response.rank)
        .bind(i32::try_from(response.tab_switch_count).unwrap_or(i32::MAX))
        .bind(response.started_at)
        .bind(response.completed_at)
        .bind(response.completion_seq)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// All responses of a quiz
    pub async fn list_by_quiz(pool: &PgPool, quiz_id: &Uuid) -> AppResult<Vec<Response>> {
        let rows = sqlx::query_as::<_, ResponseRow>(
            r#"SELECT * FROM responses WHERE quiz_id = $1 ORDER BY started_at"#,
        )
        .bind(quiz_id)
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(Response::try_from).collect()
    }
}
