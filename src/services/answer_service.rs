//! Answer ingestion and scoring

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        AccessDenial, Answer, EventType, QuizStatus, Response, ResponseStatus,
    },
    services::{
        leaderboard_service::LeaderboardService,
        lifecycle_service::{EndReason, LifecycleService},
        runtime::{EngineContext, QuizRuntime},
    },
    utils::{clamp_time_taken, seconds_to_ms, time::format_milliseconds},
};

/// Whether a submission was recorded or replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmitStatus {
    #[serde(rename = "ACCEPTED")]
    Accepted,
    /// The question was already answered; the stored answer is returned as is
    #[serde(rename = "DUPLICATE_ANSWER")]
    Duplicate,
}

/// What the caller learns about a submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub status: SubmitStatus,
    pub answer: Answer,
    pub total_score: i64,
    pub total_time_taken: i64,
    pub answered: usize,
    pub total_questions: usize,
    pub response_status: ResponseStatus,
}

impl SubmitOutcome {
    fn new(status: SubmitStatus, answer: Answer, response: &Response, total_questions: usize) -> Self {
        Self {
            status,
            answer,
            total_score: response.total_score,
            total_time_taken: response.total_time_taken,
            answered: response.answers.len(),
            total_questions,
            response_status: response.status,
        }
    }
}

pub struct AnswerService;

impl AnswerService {
    /// Record one answer. First write wins: a replay for an answered question
    /// returns the stored answer untouched.
    pub fn submit(
        rt: &mut QuizRuntime,
        ctx: &EngineContext<'_>,
        user_id: Uuid,
        question_id: Uuid,
        value: &str,
        time_taken_ms: i64,
        now: DateTime<Utc>,
    ) -> AppResult<SubmitOutcome> {
        if LifecycleService::expire_if_due(rt, ctx, now) || rt.quiz.status != QuizStatus::Active {
            return Err(AppError::SessionClosed);
        }

        let question = rt
            .quiz
            .question(&question_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

        if !rt.has_joined(&user_id) {
            return Err(AppError::AccessDenied(AccessDenial::NotJoined));
        }

        Self::expire_for(rt, ctx, user_id, now);

        let total_questions = rt.quiz.questions.len();
        if let Some(response) = rt.responses.get(&user_id) {
            if let Some(existing) = response.answer_for(&question_id) {
                debug!(
                    quiz_id = %rt.quiz.id,
                    user_id = %user_id,
                    question_id = %question_id,
                    "Duplicate answer ignored"
                );
                return Ok(SubmitOutcome::new(
                    SubmitStatus::Duplicate,
                    existing.clone(),
                    response,
                    total_questions,
                ));
            }
            if !response.is_open() {
                return Err(AppError::SessionClosed);
            }
        }

        // Timed questions are answered in presentation order only
        if question
            .effective_time_limit(rt.quiz.settings.question_timer)
            .is_some()
        {
            let current = rt
                .participants
                .get(&user_id)
                .and_then(|s| s.current_question());
            if current != Some(question_id) {
                return Err(AppError::Conflict(
                    "Question is not the one currently presented".to_string(),
                ));
            }
        }

        let is_correct = question.kind.grade(value);
        let answer = Answer {
            question_id,
            question_type: question.question_type(),
            value: value.to_string(),
            is_correct,
            points_earned: if is_correct { question.points } else { 0 },
            time_taken: clamp_time_taken(time_taken_ms),
            answered_at: now,
        };

        let quiz_id = rt.quiz.id;
        let max_score = rt.quiz.max_possible_score();
        let session = rt.participants.get(&user_id);
        let started_at = session.map(|s| s.joined_at).unwrap_or(now);
        let tab_switches = session.map(|s| s.tab_switch_count);

        let response = rt
            .responses
            .entry(user_id)
            .or_insert_with(|| Response::new(quiz_id, user_id, max_score, started_at));
        response.record(answer.clone());
        if let Some(count) = tab_switches {
            response.tab_switch_count = count;
        }
        debug_assert_eq!(
            response.total_score,
            response.answers.iter().map(|a| i64::from(a.points_earned)).sum::<i64>()
        );
        let total_score = response.total_score;
        let answered = response.answers.len();

        if let Some(session) = rt.participants.get_mut(&user_id) {
            session.sync_cursor(rt.responses.get(&user_id), now);
        }
        rt.touch_response(user_id);
        rt.emit(
            EventType::AnswerAccepted,
            json!({
                "user_id": user_id,
                "question_id": question_id,
                "total_score": total_score,
                "answered": answered,
            }),
        );

        debug!(
            quiz_id = %quiz_id,
            user_id = %user_id,
            question_id = %question_id,
            is_correct,
            "Answer accepted"
        );

        Self::complete_if_finished(rt, ctx, user_id, now);

        let response = rt
            .responses
            .get(&user_id)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("response vanished after answer")))?;
        Ok(SubmitOutcome::new(
            SubmitStatus::Accepted,
            answer,
            response,
            total_questions,
        ))
    }

    /// Close a participant's attempt, filling every unanswered question with
    /// an empty zero-point answer.
    ///
    /// Runs at most once per response: returns false if the response was
    /// already closed.
    pub fn force_complete(
        rt: &mut QuizRuntime,
        user_id: Uuid,
        status: ResponseStatus,
        now: DateTime<Utc>,
    ) -> bool {
        if rt.responses.get(&user_id).is_some_and(|r| !r.is_open()) {
            return false;
        }

        let seq = rt.next_completion_seq();
        let session = rt.participants.remove(&user_id);
        let quiz_id = rt.quiz.id;
        let max_score = rt.quiz.max_possible_score();
        let started_at = session.as_ref().map(|s| s.joined_at).unwrap_or(now);

        let response = rt
            .responses
            .entry(user_id)
            .or_insert_with(|| Response::new(quiz_id, user_id, max_score, started_at));

        for question in &rt.quiz.questions {
            if response.answer_for(&question.id).is_none() {
                response.answers.push(Answer {
                    question_id: question.id,
                    question_type: question.question_type(),
                    value: String::new(),
                    is_correct: false,
                    points_earned: 0,
                    time_taken: 0,
                    answered_at: now,
                });
            }
        }
        response.recompute_totals();
        if let Some(session) = &session {
            response.tab_switch_count = response.tab_switch_count.max(session.tab_switch_count);
        }
        response.finalize(status, now, seq);

        let payload = json!({
            "user_id": user_id,
            "status": status,
            "total_score": response.total_score,
            "total_time_taken": response.total_time_taken,
            "forced": true,
        });
        let total_time = response.total_time_taken;

        rt.touch_response(user_id);
        let event_type = match status {
            ResponseStatus::Disqualified => EventType::ParticipantDisqualified,
            _ => EventType::ResponseCompleted,
        };
        rt.emit(event_type, payload);

        info!(
            quiz_id = %quiz_id,
            user_id = %user_id,
            status = %status,
            total_time = %format_milliseconds(total_time),
            "Response force-completed"
        );
        true
    }

    /// Complete the response normally once every question has an answer
    pub fn complete_if_finished(
        rt: &mut QuizRuntime,
        ctx: &EngineContext<'_>,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> bool {
        let total_questions = rt.quiz.questions.len();
        let finished = rt
            .responses
            .get(&user_id)
            .is_some_and(|r| r.is_open() && r.answers.len() >= total_questions);
        if !finished {
            return false;
        }

        let seq = rt.next_completion_seq();
        rt.participants.remove(&user_id);
        let Some(response) = rt.responses.get_mut(&user_id) else {
            return false;
        };
        response.finalize(ResponseStatus::Completed, now, seq);
        let payload = json!({
            "user_id": user_id,
            "status": ResponseStatus::Completed,
            "total_score": response.total_score,
            "total_time_taken": response.total_time_taken,
            "forced": false,
        });

        rt.touch_response(user_id);
        rt.emit(EventType::ResponseCompleted, payload);
        info!(quiz_id = %rt.quiz.id, user_id = %user_id, "Response completed");

        Self::after_completion(rt, ctx, now);
        true
    }

    /// Refresh the live leaderboard and end the quiz once every expected
    /// participant has finished
    pub fn after_completion(rt: &mut QuizRuntime, ctx: &EngineContext<'_>, now: DateTime<Utc>) {
        if rt.quiz.status != QuizStatus::Active {
            return;
        }

        let all_done = rt
            .quiz
            .access_control
            .expected_participants()
            .is_some_and(|expected| {
                expected.iter().all(|user| {
                    rt.responses
                        .get(user)
                        .is_some_and(|r| r.status.is_final())
                })
            });

        if all_done {
            // Ending publishes the final leaderboard itself
            if let Err(e) = LifecycleService::end(rt, ctx, EndReason::AllParticipantsCompleted, now) {
                warn!(quiz_id = %rt.quiz.id, error = %e, "Auto-end after last completion failed");
            }
            return;
        }

        let board = LeaderboardService::rank(&rt.completed_responses(), ctx.config.tie_policy);
        rt.emit(
            EventType::LeaderboardUpdated,
            json!({ "final": false, "entries": board }),
        );
    }

    /// Expire overdue per-question deadlines for every open participant
    pub fn expire_questions(rt: &mut QuizRuntime, ctx: &EngineContext<'_>, now: DateTime<Utc>) {
        let users: Vec<Uuid> = rt.participants.keys().copied().collect();
        for user_id in users {
            if rt.quiz.status != QuizStatus::Active {
                break;
            }
            Self::expire_for(rt, ctx, user_id, now);
        }
    }

    /// Record timed-out questions of one participant as empty answers and
    /// advance their cursor. Returns true if this completed the response.
    pub fn expire_for(
        rt: &mut QuizRuntime,
        ctx: &EngineContext<'_>,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> bool {
        let quiz_id = rt.quiz.id;
        let max_score = rt.quiz.max_possible_score();
        let mut expired_any = false;

        loop {
            let Some(session) = rt.participants.get(&user_id) else {
                break;
            };
            let Some(question_id) = session.current_question() else {
                break;
            };
            let Some(question) = rt.quiz.question(&question_id) else {
                break;
            };
            let Some(limit) = question.effective_time_limit(rt.quiz.settings.question_timer) else {
                break;
            };

            let limit_ms = seconds_to_ms(limit);
            if session.question_elapsed_ms(now) < limit_ms {
                break;
            }

            let expired_at = session.question_started_at + Duration::milliseconds(limit_ms);
            let joined_at = session.joined_at;
            let answer = Answer {
                question_id,
                question_type: question.question_type(),
                value: String::new(),
                is_correct: false,
                points_earned: 0,
                time_taken: limit_ms,
                answered_at: expired_at,
            };

            let response = rt
                .responses
                .entry(user_id)
                .or_insert_with(|| Response::new(quiz_id, user_id, max_score, joined_at));
            if !response.is_open() {
                break;
            }
            if response.answer_for(&question_id).is_none() {
                response.record(answer);
            }

            if let Some(session) = rt.participants.get_mut(&user_id) {
                session.sync_cursor(rt.responses.get(&user_id), expired_at);
            }
            rt.touch_response(user_id);
            expired_any = true;

            debug!(
                quiz_id = %quiz_id,
                user_id = %user_id,
                question_id = %question_id,
                "Question timed out"
            );
        }

        expired_any && Self::complete_if_finished(rt, ctx, user_id, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::EngineConfig,
        models::{
            AccessControl, ParticipantSession, Question, QuestionKind, QuestionType, Quiz,
            QuizSettings,
        },
        services::runtime::JoinCodeIndex,
    };

    fn question(position: u32, correct: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            position,
            text: format!("Question {position}"),
            kind: QuestionKind::parse(
                QuestionType::SingleChoice,
                vec!["A".to_string(), "B".to_string()],
                correct,
            )
            .unwrap(),
            points: 10,
            difficulty: None,
            topic: None,
            time_limit_seconds: None,
        }
    }

    fn active_runtime(settings: QuizSettings) -> (QuizRuntime, Uuid) {
        let mut quiz = Quiz::draft(
            "Scoring".to_string(),
            Uuid::new_v4(),
            None,
            vec![question(1, "A"), question(2, "A"), question(3, "B")],
            settings,
            AccessControl::default(),
        );
        let now = Utc::now();
        quiz.status = QuizStatus::Active;
        quiz.started_at = Some(now);

        let user = Uuid::new_v4();
        let order = quiz.questions.iter().map(|q| q.id).collect();
        let mut rt = QuizRuntime::new(quiz);
        rt.participants
            .insert(user, ParticipantSession::new(user, order, now));
        (rt, user)
    }

    #[test]
    fn test_scoring_scenario_with_forced_completion() {
        let codes = JoinCodeIndex::new();
        let config = EngineConfig::default();
        let ctx = EngineContext { codes: &codes, config: &config };
        let (mut rt, user) = active_runtime(QuizSettings::default());
        let ids: Vec<Uuid> = rt.quiz.questions.iter().map(|q| q.id).collect();
        let now = Utc::now();

        AnswerService::submit(&mut rt, &ctx, user, ids[0], "A", 5000, now).unwrap();
        AnswerService::submit(&mut rt, &ctx, user, ids[1], "B", 3000, now).unwrap();
        LifecycleService::end(&mut rt, &ctx, EndReason::Manual, now).unwrap();

        let response = &rt.responses[&user];
        assert_eq!(response.total_score, 10);
        assert_eq!(response.total_time_taken, 8000);
        assert_eq!(response.percentage, 33.3);
        assert_eq!(response.answers.len(), 3);
        assert_eq!(response.answers.len() - response.attempted_count(), 1);
        assert_eq!(response.rank, Some(1));
    }

    #[test]
    fn test_replay_returns_first_answer() {
        let codes = JoinCodeIndex::new();
        let config = EngineConfig::default();
        let ctx = EngineContext { codes: &codes, config: &config };
        let (mut rt, user) = active_runtime(QuizSettings::default());
        let q1 = rt.quiz.questions[0].id;
        let now = Utc::now();

        let first = AnswerService::submit(&mut rt, &ctx, user, q1, "A", 1000, now).unwrap();
        let snapshot = rt.responses[&user].clone();
        let replay = AnswerService::submit(&mut rt, &ctx, user, q1, "B", 9000, now).unwrap();

        assert_eq!(first.status, SubmitStatus::Accepted);
        assert_eq!(replay.status, SubmitStatus::Duplicate);
        assert_eq!(replay.answer, first.answer);
        assert_eq!(rt.responses[&user], snapshot);
    }

    #[test]
    fn test_force_complete_runs_once() {
        let (mut rt, user) = active_runtime(QuizSettings::default());
        let now = Utc::now();

        assert!(AnswerService::force_complete(&mut rt, user, ResponseStatus::Disqualified, now));
        let snapshot = rt.responses[&user].clone();
        assert!(!AnswerService::force_complete(&mut rt, user, ResponseStatus::Completed, now));

        assert_eq!(rt.responses[&user], snapshot);
        assert_eq!(snapshot.status, ResponseStatus::Disqualified);
        assert!(snapshot.answers.iter().all(|a| a.points_earned == 0));
    }

    #[test]
    fn test_question_timeout_records_limit_and_advances() {
        let codes = JoinCodeIndex::new();
        let config = EngineConfig::default();
        let ctx = EngineContext { codes: &codes, config: &config };
        let (mut rt, user) = active_runtime(QuizSettings {
            question_timer: 30,
            ..Default::default()
        });
        let ids: Vec<Uuid> = rt.quiz.questions.iter().map(|q| q.id).collect();
        let start = rt.participants[&user].question_started_at;

        // 65 s covers two full 30 s windows
        AnswerService::expire_questions(&mut rt, &ctx, start + Duration::seconds(65));

        let response = &rt.responses[&user];
        assert_eq!(response.answers.len(), 2);
        assert!(response.answers.iter().all(|a| a.time_taken == 30_000 && !a.is_attempted()));
        assert_eq!(rt.participants[&user].current_question(), Some(ids[2]));
        assert_eq!(
            rt.participants[&user].question_started_at,
            start + Duration::seconds(60)
        );
    }

    #[test]
    fn test_timed_questions_follow_presentation_order() {
        let codes = JoinCodeIndex::new();
        let config = EngineConfig::default();
        let ctx = EngineContext { codes: &codes, config: &config };
        let (mut rt, user) = active_runtime(QuizSettings {
            question_timer: 30,
            ..Default::default()
        });
        let ids: Vec<Uuid> = rt.quiz.questions.iter().map(|q| q.id).collect();
        let now = rt.participants[&user].question_started_at;

        let early = AnswerService::submit(&mut rt, &ctx, user, ids[2], "B", 1000, now);
        assert!(matches!(early, Err(AppError::Conflict(_))));
        assert!(rt.responses.get(&user).is_none());

        let first = AnswerService::submit(&mut rt, &ctx, user, ids[0], "A", 1000, now).unwrap();
        assert_eq!(first.status, SubmitStatus::Accepted);
        assert_eq!(rt.participants[&user].current_question(), Some(ids[1]));

        let next = AnswerService::submit(&mut rt, &ctx, user, ids[1], "A", 1000, now).unwrap();
        assert_eq!(next.status, SubmitStatus::Accepted);

        // Replays of answered questions still take the duplicate path
        let replay = AnswerService::submit(&mut rt, &ctx, user, ids[0], "B", 1000, now).unwrap();
        assert_eq!(replay.status, SubmitStatus::Duplicate);
    }

    #[test]
    fn test_untimed_questions_accept_any_order() {
        let codes = JoinCodeIndex::new();
        let config = EngineConfig::default();
        let ctx = EngineContext { codes: &codes, config: &config };
        let (mut rt, user) = active_runtime(QuizSettings::default());
        let last = rt.quiz.questions[2].id;

        let outcome = AnswerService::submit(&mut rt, &ctx, user, last, "B", 1000, Utc::now()).unwrap();
        assert_eq!(outcome.status, SubmitStatus::Accepted);
        assert!(outcome.answer.is_correct);
    }

    #[test]
    fn test_unknown_question_and_unjoined_user() {
        let codes = JoinCodeIndex::new();
        let config = EngineConfig::default();
        let ctx = EngineContext { codes: &codes, config: &config };
        let (mut rt, user) = active_runtime(QuizSettings::default());
        let q1 = rt.quiz.questions[0].id;
        let now = Utc::now();

        let err = AnswerService::submit(&mut rt, &ctx, user, Uuid::new_v4(), "A", 0, now);
        assert!(matches!(err, Err(AppError::NotFound(_))));

        let err = AnswerService::submit(&mut rt, &ctx, Uuid::new_v4(), q1, "A", 0, now);
        assert!(matches!(
            err,
            Err(AppError::AccessDenied(AccessDenial::NotJoined))
        ));
    }

    #[test]
    fn test_negative_time_is_clamped() {
        let codes = JoinCodeIndex::new();
        let config = EngineConfig::default();
        let ctx = EngineContext { codes: &codes, config: &config };
        let (mut rt, user) = active_runtime(QuizSettings::default());
        let q1 = rt.quiz.questions[0].id;

        let outcome = AnswerService::submit(&mut rt, &ctx, user, q1, "A", -400, Utc::now()).unwrap();
        assert_eq!(outcome.answer.time_taken, 0);
    }
}
