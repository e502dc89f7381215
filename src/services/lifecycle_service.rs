//! Quiz lifecycle transitions
//!
//! `draft -> scheduled -> active -> completed`. All functions run under the
//! quiz lock, so the status check and the side effects of a transition are
//! one atomic step: of two racing calls, the second observes the new state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    constants::JOIN_CODE_MAX_ATTEMPTS,
    error::{AppError, AppResult},
    models::{EventType, QuizContent, QuizStatus, ResponseStatus},
    services::{
        answer_service::AnswerService,
        leaderboard_service::LeaderboardService,
        runtime::{presentation_order, EngineContext, QuizRuntime},
    },
    utils::generate_join_code,
};

/// Result of a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOutcome {
    Transitioned,
    /// The quiz was already in the requested state
    Unchanged,
}

/// Why a quiz ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Manual,
    TimerExpired,
    AllParticipantsCompleted,
}

pub struct LifecycleService;

impl LifecycleService {
    /// `draft -> scheduled`
    pub fn schedule(
        rt: &mut QuizRuntime,
        ctx: &EngineContext<'_>,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<TransitionOutcome> {
        match rt.quiz.status {
            QuizStatus::Scheduled => return Ok(TransitionOutcome::Unchanged),
            QuizStatus::Active | QuizStatus::Completed => {
                return Err(AppError::InvalidTransition(format!(
                    "cannot schedule a {} quiz",
                    rt.quiz.status
                )));
            }
            QuizStatus::Draft => {}
        }

        if at <= now {
            return Err(AppError::Validation(
                "scheduled_at must be in the future".to_string(),
            ));
        }

        let code = Self::reserve_code(rt, ctx, now)?;
        rt.quiz.status = QuizStatus::Scheduled;
        rt.quiz.scheduled_at = Some(at);
        rt.touch_quiz(now);
        rt.emit(
            EventType::QuizScheduled,
            json!({ "code": code, "scheduled_at": at }),
        );

        info!(quiz_id = %rt.quiz_id(), scheduled_at = %at, "Quiz scheduled");
        Ok(TransitionOutcome::Transitioned)
    }

    /// `draft|scheduled -> active`
    pub fn start(
        rt: &mut QuizRuntime,
        ctx: &EngineContext<'_>,
        now: DateTime<Utc>,
    ) -> AppResult<TransitionOutcome> {
        match rt.quiz.status {
            QuizStatus::Active => return Ok(TransitionOutcome::Unchanged),
            QuizStatus::Completed => {
                return Err(AppError::InvalidTransition(
                    "cannot start a completed quiz".to_string(),
                ));
            }
            QuizStatus::Draft | QuizStatus::Scheduled => {}
        }

        if rt.quiz.questions.is_empty() {
            return Err(AppError::InvalidTransition(
                "cannot start a quiz without questions".to_string(),
            ));
        }

        let code = Self::reserve_code(rt, ctx, now)?;
        rt.quiz.status = QuizStatus::Active;
        rt.quiz.started_at = Some(now);
        rt.touch_quiz(now);

        // Participants waiting in the lobby start with everyone else
        for session in rt.participants.values_mut() {
            session.question_order = presentation_order(&rt.quiz);
            session.current_index = 0;
            session.question_started_at = now;
        }

        rt.emit(
            EventType::QuizStarted,
            json!({
                "code": code,
                "started_at": now,
                "deadline": rt.quiz.deadline(),
                "participants": rt.participants.len(),
            }),
        );

        info!(quiz_id = %rt.quiz_id(), code = %code, "Quiz started");
        Ok(TransitionOutcome::Transitioned)
    }

    /// `active -> completed`.
    ///
    /// Force-completes every open attempt, frees the join code and freezes
    /// the final ranks into the responses.
    pub fn end(
        rt: &mut QuizRuntime,
        ctx: &EngineContext<'_>,
        reason: EndReason,
        now: DateTime<Utc>,
    ) -> AppResult<TransitionOutcome> {
        match rt.quiz.status {
            QuizStatus::Completed => return Ok(TransitionOutcome::Unchanged),
            QuizStatus::Draft | QuizStatus::Scheduled => {
                return Err(AppError::InvalidTransition(format!(
                    "cannot end a {} quiz",
                    rt.quiz.status
                )));
            }
            QuizStatus::Active => {}
        }

        let mut forced = 0;
        for user_id in rt.open_participants() {
            if AnswerService::force_complete(rt, user_id, ResponseStatus::Completed, now) {
                forced += 1;
            }
        }

        rt.quiz.status = QuizStatus::Completed;
        rt.quiz.ended_at = Some(now);
        rt.touch_quiz(now);
        rt.participants.clear();
        if let Some(code) = rt.quiz.code.as_deref() {
            ctx.codes.release(code, rt.quiz.id);
        }

        let responses = rt.completed_responses();
        let board = LeaderboardService::rank(&responses, ctx.config.tie_policy);
        for entry in &board {
            if let Some(response) = rt.responses.get_mut(&entry.user_id) {
                response.rank = Some(entry.rank);
            }
            rt.touch_response(entry.user_id);
        }

        rt.emit(
            EventType::QuizEnded,
            json!({ "reason": reason, "ended_at": now, "participants": board.len() }),
        );
        rt.emit(
            EventType::LeaderboardUpdated,
            json!({ "final": true, "entries": board }),
        );

        info!(
            quiz_id = %rt.quiz_id(),
            reason = ?reason,
            participants = board.len(),
            forced,
            "Quiz ended"
        );
        Ok(TransitionOutcome::Transitioned)
    }

    /// Replace the authored content of a draft or scheduled quiz
    pub fn update_content(
        rt: &mut QuizRuntime,
        ctx: &EngineContext<'_>,
        content: QuizContent,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if !rt.quiz.status.is_editable() {
            return Err(AppError::InvalidTransition(format!(
                "cannot edit a {} quiz",
                rt.quiz.status
            )));
        }

        let code_changed = content.code.is_some() && content.code != rt.quiz.code;
        let previous_code = rt.quiz.code.clone();
        let mut content = content;
        if content.code.is_none() {
            content.code = previous_code.clone();
        }
        rt.quiz.replace_content(content);
        rt.touch_quiz(now);

        if code_changed && rt.quiz.status == QuizStatus::Scheduled {
            if let Some(old) = previous_code.as_deref() {
                ctx.codes.release(old, rt.quiz.id);
            }
            Self::reserve_code(rt, ctx, now)?;
        }

        info!(quiz_id = %rt.quiz_id(), questions = rt.quiz.questions.len(), "Quiz content updated");
        Ok(())
    }

    /// End the quiz if its quiz-wide timer has run out. Returns true if it ended.
    pub fn expire_if_due(rt: &mut QuizRuntime, ctx: &EngineContext<'_>, now: DateTime<Utc>) -> bool {
        if !rt.quiz.timer_expired(now) {
            return false;
        }
        matches!(
            Self::end(rt, ctx, EndReason::TimerExpired, now),
            Ok(TransitionOutcome::Transitioned)
        )
    }

    /// Periodic housekeeping for one quiz
    pub fn tick(rt: &mut QuizRuntime, ctx: &EngineContext<'_>, now: DateTime<Utc>) {
        if rt.quiz.auto_start_due(now) {
            if let Err(e) = Self::start(rt, ctx, now) {
                warn!(quiz_id = %rt.quiz_id(), error = %e, "Auto-start failed");
            }
        }

        if Self::expire_if_due(rt, ctx, now) {
            return;
        }

        if rt.quiz.status == QuizStatus::Active {
            AnswerService::expire_questions(rt, ctx, now);
        }
    }

    /// Hold a join code for this quiz, replacing the current one if another
    /// open quiz already uses it
    fn reserve_code(
        rt: &mut QuizRuntime,
        ctx: &EngineContext<'_>,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let quiz_id = rt.quiz.id;

        if let Some(code) = rt.quiz.code.as_deref() {
            if ctx.codes.claim(code, quiz_id) {
                return Ok(code.to_string());
            }
            warn!(quiz_id = %quiz_id, code = %code, "Join code already in use, generating a new one");
        }

        for _ in 0..JOIN_CODE_MAX_ATTEMPTS {
            let code = generate_join_code(ctx.config.join_code_length);
            if ctx.codes.claim(&code, quiz_id) {
                rt.quiz.code = Some(code.clone());
                rt.touch_quiz(now);
                return Ok(code);
            }
        }

        Err(AppError::Conflict(
            "Could not allocate a free join code".to_string(),
        ))
    }
}
