//! Quiz request DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    constants::{
        MAX_ANSWER_LENGTH, MAX_QUESTIONS_PER_QUIZ, MAX_QUESTION_TEXT_LENGTH, MAX_QUIZ_TITLE_LENGTH,
        MAX_TIME_TAKEN_MS,
    },
    error::{AppError, AppResult},
    models::{
        AccessControl, Question, QuestionKind, QuestionType, Quiz, QuizContent, QuizSettings,
    },
    utils::{normalize_join_code, sanitize_string, validate_join_code},
};

/// Quiz authoring document, used for both import and content replacement
#[derive(Debug, Deserialize, Validate)]
pub struct QuizDocument {
    #[validate(length(min = 1, max = MAX_QUIZ_TITLE_LENGTH))]
    pub title: String,

    /// Requested join code; one is generated when absent
    #[validate(custom(function = "join_code"))]
    pub code: Option<String>,

    #[validate(length(max = MAX_QUESTIONS_PER_QUIZ), nested)]
    #[serde(default)]
    pub questions: Vec<QuestionInput>,

    #[validate(custom(function = "passing_score"))]
    #[serde(default)]
    pub settings: QuizSettings,

    #[serde(default)]
    pub access_control: AccessControl,
}

/// One question of an authoring document
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct QuestionInput {
    /// Kept when re-submitting an existing question
    pub id: Option<Uuid>,

    pub position: Option<u32>,

    #[validate(length(min = 1, max = MAX_QUESTION_TEXT_LENGTH))]
    pub text: String,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    #[serde(default)]
    pub options: Vec<String>,

    /// Single option, comma-joined options, or pipe-separated accepted values
    pub correct_answer: String,

    #[validate(range(min = 0))]
    #[serde(default = "default_points")]
    pub points: i32,

    pub difficulty: Option<String>,
    pub topic: Option<String>,
    pub time_limit_seconds: Option<u32>,
}

fn default_points() -> i32 {
    1
}

fn join_code(code: &str) -> Result<(), ValidationError> {
    validate_join_code(code).map_err(|msg| {
        let mut err = ValidationError::new("join_code");
        err.message = Some(msg.into());
        err
    })
}

fn passing_score(settings: &QuizSettings) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&settings.passing_score) {
        Ok(())
    } else {
        Err(ValidationError::new("passing_score_out_of_range"))
    }
}

impl QuizDocument {
    /// Turn the document into quiz content: questions ordered by position
    /// (document order breaks ties) and renumbered from 1.
    pub fn into_content(self) -> AppResult<QuizContent> {
        let mut questions: Vec<(u32, usize, QuestionInput)> = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(idx, q)| (q.position.unwrap_or(idx as u32 + 1), idx, q))
            .collect();
        questions.sort_by_key(|(position, idx, _)| (*position, *idx));

        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(idx, (_, _, input))| {
                let position = idx as u32 + 1;
                let kind = QuestionKind::parse(
                    input.question_type,
                    input.options,
                    input.correct_answer.trim(),
                )
                .map_err(|e| AppError::Validation(format!("question {position}: {e}")))?;

                Ok(Question {
                    id: input.id.unwrap_or_else(Uuid::new_v4),
                    position,
                    text: sanitize_string(&input.text),
                    kind,
                    points: input.points,
                    difficulty: input.difficulty,
                    topic: input.topic,
                    time_limit_seconds: input.time_limit_seconds,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        if let Some(id) = Quiz::duplicate_question_id(&questions) {
            return Err(AppError::Validation(format!("duplicate question id {id}")));
        }

        Ok(QuizContent {
            title: sanitize_string(&self.title),
            code: self.code.as_deref().map(normalize_join_code),
            questions,
            settings: self.settings,
            access_control: self.access_control,
        })
    }
}

/// Schedule quiz request
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub scheduled_at: DateTime<Utc>,
}

/// Submit answer request
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    pub question_id: Uuid,

    /// Empty means skipped
    #[validate(length(max = MAX_ANSWER_LENGTH))]
    #[serde(default)]
    pub value: String,

    /// Client-measured time spent on the question
    #[validate(range(min = 0, max = MAX_TIME_TAKEN_MS))]
    #[serde(default)]
    pub time_taken_ms: i64,
}
