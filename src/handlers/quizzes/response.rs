//! Quiz response DTOs

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{
        AccessControl, Answer, LeaderboardEntry, Question, QuestionType, Quiz, QuizSettings,
        QuizStatus, Response, ResponseStatus,
    },
    services::{SubmitOutcome, SubmitStatus, TransitionOutcome},
};

/// Question as shown to a caller
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub position: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub points: i32,
    pub difficulty: Option<String>,
    pub topic: String,
    pub time_limit_seconds: Option<u32>,
    /// Only present for the owner and admins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl QuestionView {
    fn new(question: &Question, settings: &QuizSettings, with_key: bool) -> Self {
        let mut options = question.kind.options().to_vec();
        if settings.shuffle_options && !with_key {
            options.shuffle(&mut rand::rng());
        }

        Self {
            id: question.id,
            position: question.position,
            text: question.text.clone(),
            question_type: question.question_type(),
            options,
            points: question.points,
            difficulty: question.difficulty.clone(),
            topic: question.topic().to_string(),
            time_limit_seconds: question.effective_time_limit(settings.question_timer),
            correct_answer: with_key.then(|| question.kind.correct_answer()),
        }
    }
}

/// Quiz response
#[derive(Debug, Serialize)]
pub struct QuizView {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    pub code: Option<String>,
    pub status: QuizStatus,
    pub settings: QuizSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_control: Option<AccessControl>,
    pub question_count: usize,
    pub max_possible_score: i64,
    pub questions: Vec<QuestionView>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizView {
    /// Managers see everything. Participants see questions only once the
    /// quiz is running, and never the answer keys.
    pub fn new(quiz: &Quiz, is_manager: bool) -> Self {
        let questions_visible =
            is_manager || matches!(quiz.status, QuizStatus::Active | QuizStatus::Completed);
        let questions = if questions_visible {
            quiz.questions
                .iter()
                .map(|q| QuestionView::new(q, &quiz.settings, is_manager))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            id: quiz.id,
            title: quiz.title.clone(),
            owner_id: quiz.owner_id,
            code: quiz.code.clone(),
            status: quiz.status,
            settings: quiz.settings.clone(),
            access_control: is_manager.then(|| quiz.access_control.clone()),
            question_count: quiz.questions.len(),
            max_possible_score: quiz.max_possible_score(),
            questions,
            scheduled_at: quiz.scheduled_at,
            started_at: quiz.started_at,
            ended_at: quiz.ended_at,
            deadline: quiz.deadline(),
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

/// Lifecycle call response
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub outcome: TransitionOutcome,
    pub quiz: QuizView,
}

/// Leaderboard response
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub quiz_id: Uuid,
    pub status: QuizStatus,
    pub entries: Vec<LeaderboardEntry>,
}

/// Stored answer, with grading hidden while feedback is off
#[derive(Debug, Serialize)]
pub struct AnswerView {
    pub question_id: Uuid,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<i32>,
    pub time_taken: i64,
    pub answered_at: DateTime<Utc>,
}

impl AnswerView {
    fn new(answer: &Answer, hide_grading: bool) -> Self {
        Self {
            question_id: answer.question_id,
            value: answer.value.clone(),
            is_correct: (!hide_grading).then_some(answer.is_correct),
            points_earned: (!hide_grading).then_some(answer.points_earned),
            time_taken: answer.time_taken,
            answered_at: answer.answered_at,
        }
    }
}

/// Submit answer response
#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub status: SubmitStatus,
    pub answer: AnswerView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i64>,
    pub total_time_taken: i64,
    pub answered: usize,
    pub total_questions: usize,
    pub response_status: ResponseStatus,
}

impl SubmitAnswerResponse {
    pub fn new(outcome: SubmitOutcome, hide_grading: bool) -> Self {
        Self {
            status: outcome.status,
            answer: AnswerView::new(&outcome.answer, hide_grading),
            total_score: (!hide_grading).then_some(outcome.total_score),
            total_time_taken: outcome.total_time_taken,
            answered: outcome.answered,
            total_questions: outcome.total_questions,
            response_status: outcome.response_status,
        }
    }
}

/// A participant's response
#[derive(Debug, Serialize)]
pub struct ResponseView {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    pub status: ResponseStatus,
    pub answers: Vec<AnswerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i64>,
    pub max_possible_score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    pub total_time_taken: i64,
    pub rank: Option<i32>,
    pub tab_switch_count: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ResponseView {
    pub fn new(response: &Response, hide_grading: bool) -> Self {
        Self {
            id: response.id,
            quiz_id: response.quiz_id,
            user_id: response.user_id,
            status: response.status,
            answers: response
                .answers
                .iter()
                .map(|a| AnswerView::new(a, hide_grading))
                .collect(),
            total_score: (!hide_grading).then_some(response.total_score),
            max_possible_score: response.max_possible_score,
            percentage: (!hide_grading).then_some(response.percentage),
            total_time_taken: response.total_time_taken,
            rank: response.rank,
            tab_switch_count: response.tab_switch_count,
            started_at: response.started_at,
            completed_at: response.completed_at,
        }
    }
}

/// Whether grading must be withheld from `viewer_is_manager` for this quiz
pub fn hides_grading(quiz: &Quiz, viewer_is_manager: bool) -> bool {
    !viewer_is_manager && !quiz.settings.show_feedback && quiz.status != QuizStatus::Completed
}
