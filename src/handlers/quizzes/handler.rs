//! Quiz handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{AccessDecision, ParticipantReport, Quiz, QuizSummary, User},
    services::{FocusLossOutcome, TransitionResult},
    state::AppState,
};

use super::{
    request::{QuizDocument, ScheduleRequest, SubmitAnswerRequest},
    response::{
        hides_grading, LeaderboardResponse, QuizView, ResponseView, SubmitAnswerResponse,
        TransitionResponse,
    },
};

fn is_manager(quiz: &Quiz, user: &User) -> bool {
    quiz.is_owned_by(&user.id) || user.is_admin()
}

fn transition_response(result: TransitionResult) -> Json<TransitionResponse> {
    Json(TransitionResponse {
        outcome: result.outcome,
        quiz: QuizView::new(&result.quiz, true),
    })
}

/// Import an authoring document as a draft quiz
pub async fn import_quiz(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<QuizDocument>,
) -> AppResult<(StatusCode, Json<QuizView>)> {
    payload.validate()?;

    // Only faculty and admins author quizzes
    if !auth_user.can_author() {
        return Err(AppError::Forbidden(
            "Only faculty can import quizzes".to_string(),
        ));
    }

    let content = payload.into_content()?;
    let quiz = Quiz::draft(
        content.title,
        auth_user.id,
        content.code,
        content.questions,
        content.settings,
        content.access_control,
    );
    let quiz = state.engine().register_quiz(quiz).await?;

    Ok((StatusCode::CREATED, Json(QuizView::new(&quiz, true))))
}

/// Get a quiz
pub async fn get_quiz(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuizView>> {
    let quiz = state.engine().get_quiz(&id).await?;
    Ok(Json(QuizView::new(&quiz, is_manager(&quiz, &auth_user))))
}

/// Replace the content of a draft or scheduled quiz
pub async fn update_quiz(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuizDocument>,
) -> AppResult<Json<QuizView>> {
    payload.validate()?;

    let content = payload.into_content()?;
    let quiz = state.engine().update_quiz(&id, &auth_user, content).await?;

    Ok(Json(QuizView::new(&quiz, true)))
}

/// Schedule a draft quiz
pub async fn schedule_quiz(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let result = state
        .engine()
        .schedule(&id, &auth_user, payload.scheduled_at)
        .await?;
    Ok(transition_response(result))
}

/// Start a quiz now
pub async fn start_quiz(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TransitionResponse>> {
    let result = state.engine().start(&id, &auth_user).await?;
    Ok(transition_response(result))
}

/// End an active quiz
pub async fn end_quiz(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TransitionResponse>> {
    let result = state.engine().end(&id, &auth_user).await?;
    Ok(transition_response(result))
}

/// Whether the caller could join right now
pub async fn check_access(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccessDecision>> {
    let decision = state.engine().can_join(&id, &auth_user).await?;
    Ok(Json(decision))
}

/// Get the leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LeaderboardResponse>> {
    let entries = state.engine().get_leaderboard_for(&id, &auth_user).await?;
    let quiz = state.engine().get_quiz(&id).await?;

    Ok(Json(LeaderboardResponse {
        quiz_id: id,
        status: quiz.status,
        entries,
    }))
}

/// Quiz-wide analytics
pub async fn get_summary(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuizSummary>> {
    let summary = state.engine().quiz_summary(&id, &auth_user).await?;
    Ok(Json(summary))
}

/// A participant's response
pub async fn get_response(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ResponseView>> {
    let response = state.engine().get_response(&id, &user_id, &auth_user).await?;
    let quiz = state.engine().get_quiz(&id).await?;
    let hide = hides_grading(&quiz, is_manager(&quiz, &auth_user));

    Ok(Json(ResponseView::new(&response, hide)))
}

/// A participant's analytics report
pub async fn get_report(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ParticipantReport>> {
    let report = state
        .engine()
        .participant_report(&id, &user_id, &auth_user)
        .await?;

    let quiz = state.engine().get_quiz(&id).await?;
    if hides_grading(&quiz, is_manager(&quiz, &auth_user)) {
        return Err(AppError::Forbidden(
            "Report is available once the quiz completes".to_string(),
        ));
    }

    Ok(Json(report))
}

/// Submit an answer
pub async fn submit_answer(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> AppResult<Json<SubmitAnswerResponse>> {
    payload.validate()?;

    let outcome = state
        .engine()
        .submit_answer(
            &id,
            auth_user.id,
            payload.question_id,
            &payload.value,
            payload.time_taken_ms,
        )
        .await?;

    let quiz = state.engine().get_quiz(&id).await?;
    let hide = hides_grading(&quiz, false);

    Ok(Json(SubmitAnswerResponse::new(outcome, hide)))
}

/// Report that the participant's window lost focus
pub async fn report_focus_loss(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FocusLossOutcome>> {
    let outcome = state.engine().report_focus_loss(&id, auth_user.id).await?;
    Ok(Json(outcome))
}
