//! Live quiz session engine
//!
//! [`SessionEngine`] is the single entry point for everything that touches a
//! live quiz. Each quiz is serialized behind its own mutex; the registry maps
//! quiz ids to those mutexes and loads quizzes from the store on demand.
//!
//! Every mutating call follows the same shape: take the quiz lock (bounded by
//! the configured timeout), run a synchronous service function against the
//! [`QuizRuntime`], then write dirty state through to the store and publish
//! queued events before the lock is released.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    config::EngineConfig,
    db::SessionStore,
    error::{AppError, AppResult},
    models::{
        AccessDecision, AccessDenial, EventType, LeaderboardEntry, ParticipantReport,
        ParticipantSession, Quiz, QuizContent, QuizStatus, QuizSummary, Response, User,
    },
    services::{
        access_service::AccessResolver,
        answer_service::{AnswerService, SubmitOutcome},
        event_service::EventPublisher,
        leaderboard_service::LeaderboardService,
        lifecycle_service::{EndReason, LifecycleService, TransitionOutcome},
        monitor_service::{FocusLossOutcome, MonitorService},
        report_service::ReportService,
        runtime::{presentation_order, EngineContext, JoinCodeIndex, QuizRuntime},
    },
    utils::normalize_join_code,
};

type SharedRuntime = Arc<Mutex<QuizRuntime>>;

/// Result of a successful join
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinOutcome {
    pub allowed: bool,
    pub quiz_id: Uuid,
    pub status: QuizStatus,
    /// The caller had already joined
    pub rejoined: bool,
    /// The caller's attempt is already closed
    pub completed: bool,
    pub deadline: Option<DateTime<Utc>>,
}

/// Result of a lifecycle call together with the quiz as it now stands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionResult {
    pub outcome: TransitionOutcome,
    pub quiz: Quiz,
}

pub struct SessionEngine {
    runtimes: RwLock<HashMap<Uuid, SharedRuntime>>,
    codes: JoinCodeIndex,
    store: Arc<dyn SessionStore>,
    publisher: Arc<dyn EventPublisher>,
    config: EngineConfig,
}

impl SessionEngine {
    pub fn new(
        store: Arc<dyn SessionStore>,
        publisher: Arc<dyn EventPublisher>,
        config: EngineConfig,
    ) -> Self {
        Self {
            runtimes: RwLock::new(HashMap::new()),
            codes: JoinCodeIndex::new(),
            store,
            publisher,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Authoring and lifecycle
    // ---------------------------------------------------------------------

    /// Register an imported draft quiz
    pub async fn register_quiz(&self, quiz: Quiz) -> AppResult<Quiz> {
        if quiz.status != QuizStatus::Draft {
            return Err(AppError::Validation(
                "Only draft quizzes can be imported".to_string(),
            ));
        }
        if let Some(id) = Quiz::duplicate_question_id(&quiz.questions) {
            return Err(AppError::Validation(format!("duplicate question id {id}")));
        }

        self.store.save_quiz(&quiz).await?;
        self.runtimes
            .write()
            .await
            .insert(quiz.id, Arc::new(Mutex::new(QuizRuntime::new(quiz.clone()))));

        info!(quiz_id = %quiz.id, owner_id = %quiz.owner_id, "Quiz imported");
        Ok(quiz)
    }

    pub async fn get_quiz(&self, quiz_id: &Uuid) -> AppResult<Quiz> {
        let runtime = self.runtime(quiz_id).await?;
        let guard = self.lock(&runtime).await?;
        Ok(guard.quiz.clone())
    }

    /// Replace the content of a draft or scheduled quiz
    pub async fn update_quiz(
        &self,
        quiz_id: &Uuid,
        requester: &User,
        content: QuizContent,
    ) -> AppResult<Quiz> {
        let now = Utc::now();
        self.with_runtime(quiz_id, |rt, ctx| {
            Self::ensure_manager(&rt.quiz, requester)?;
            LifecycleService::update_content(rt, ctx, content, now)?;
            Ok(rt.quiz.clone())
        })
        .await
    }

    pub async fn schedule(
        &self,
        quiz_id: &Uuid,
        requester: &User,
        at: DateTime<Utc>,
    ) -> AppResult<TransitionResult> {
        let now = Utc::now();
        self.with_runtime(quiz_id, |rt, ctx| {
            Self::ensure_manager(&rt.quiz, requester)?;
            let outcome = LifecycleService::schedule(rt, ctx, at, now)?;
            Ok(TransitionResult {
                outcome,
                quiz: rt.quiz.clone(),
            })
        })
        .await
    }

    pub async fn start(&self, quiz_id: &Uuid, requester: &User) -> AppResult<TransitionResult> {
        let now = Utc::now();
        self.with_runtime(quiz_id, |rt, ctx| {
            Self::ensure_manager(&rt.quiz, requester)?;
            let outcome = LifecycleService::start(rt, ctx, now)?;
            Ok(TransitionResult {
                outcome,
                quiz: rt.quiz.clone(),
            })
        })
        .await
    }

    pub async fn end(&self, quiz_id: &Uuid, requester: &User) -> AppResult<TransitionResult> {
        let now = Utc::now();
        self.with_runtime(quiz_id, |rt, ctx| {
            Self::ensure_manager(&rt.quiz, requester)?;
            let outcome = LifecycleService::end(rt, ctx, EndReason::Manual, now)?;
            Ok(TransitionResult {
                outcome,
                quiz: rt.quiz.clone(),
            })
        })
        .await
    }

    // ---------------------------------------------------------------------
    // Participation
    // ---------------------------------------------------------------------

    /// Dry-run of the join rules for `user`
    pub async fn can_join(&self, quiz_id: &Uuid, user: &User) -> AppResult<AccessDecision> {
        let quiz = self.get_quiz(quiz_id).await?;
        Ok(AccessResolver::can_join(
            &quiz,
            user,
            Utc::now(),
            self.config.join_grace_seconds,
        ))
    }

    /// Enter a quiz by its join code
    pub async fn join(&self, code: &str, user: &User) -> AppResult<JoinOutcome> {
        let code = normalize_join_code(code);
        let quiz_id = self
            .codes
            .lookup(&code)
            .ok_or_else(|| AppError::NotFound("No open quiz with that join code".to_string()))?;

        let now = Utc::now();
        let grace = self.config.join_grace_seconds;
        self.with_runtime(&quiz_id, |rt, ctx| {
            LifecycleService::expire_if_due(rt, ctx, now);

            let decision = AccessResolver::can_join(&rt.quiz, user, now, grace);
            if let Some(reason) = decision.reason {
                debug!(quiz_id = %quiz_id, user_id = %user.id, rule = reason.code(), "Join denied");
                return Err(match reason {
                    AccessDenial::NotJoinable => {
                        AppError::NotJoinable(format!("quiz is {}", rt.quiz.status))
                    }
                    rule => AppError::AccessDenied(rule),
                });
            }

            let mut outcome = JoinOutcome {
                allowed: true,
                quiz_id,
                status: rt.quiz.status,
                rejoined: false,
                completed: false,
                deadline: rt.quiz.deadline(),
            };

            if let Some(response) = rt.responses.get(&user.id) {
                if !response.is_open() {
                    outcome.rejoined = true;
                    outcome.completed = true;
                    return Ok(outcome);
                }
            }

            if rt.participants.contains_key(&user.id) {
                outcome.rejoined = true;
                return Ok(outcome);
            }

            // Lobby sessions get their question order when the quiz starts
            let order = if rt.quiz.status == QuizStatus::Active {
                presentation_order(&rt.quiz)
            } else {
                Vec::new()
            };
            let mut session = ParticipantSession::new(user.id, order, now);
            if let Some(response) = rt.responses.get(&user.id) {
                outcome.rejoined = true;
                session.tab_switch_count = response.tab_switch_count;
                session.sync_cursor(Some(response), now);
            }
            rt.participants.insert(user.id, session);
            rt.emit(
                EventType::ParticipantJoined,
                serde_json::json!({ "user_id": user.id, "participants": rt.participants.len() }),
            );

            info!(quiz_id = %quiz_id, user_id = %user.id, "Participant joined");
            Ok(outcome)
        })
        .await
    }

    pub async fn submit_answer(
        &self,
        quiz_id: &Uuid,
        user_id: Uuid,
        question_id: Uuid,
        value: &str,
        time_taken_ms: i64,
    ) -> AppResult<SubmitOutcome> {
        let now = Utc::now();
        self.with_runtime(quiz_id, |rt, ctx| {
            AnswerService::submit(rt, ctx, user_id, question_id, value, time_taken_ms, now)
        })
        .await
    }

    pub async fn report_focus_loss(
        &self,
        quiz_id: &Uuid,
        user_id: Uuid,
    ) -> AppResult<FocusLossOutcome> {
        let now = Utc::now();
        self.with_runtime(quiz_id, |rt, ctx| {
            MonitorService::report_focus_loss(rt, ctx, user_id, now)
        })
        .await
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Current ranking of finished responses
    pub async fn get_leaderboard(&self, quiz_id: &Uuid) -> AppResult<Vec<LeaderboardEntry>> {
        let (_, responses) = self.snapshot(quiz_id).await?;
        Ok(LeaderboardService::rank(&responses, self.config.tie_policy))
    }

    /// Leaderboard as visible to `viewer`
    pub async fn get_leaderboard_for(
        &self,
        quiz_id: &Uuid,
        viewer: &User,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let (quiz, responses) = self.snapshot(quiz_id).await?;
        let is_manager = Self::ensure_manager(&quiz, viewer).is_ok();
        if !quiz.settings.show_leaderboard && quiz.status != QuizStatus::Completed && !is_manager {
            return Err(AppError::Forbidden(
                "Leaderboard is hidden until the quiz completes".to_string(),
            ));
        }
        Ok(LeaderboardService::rank(&responses, self.config.tie_policy))
    }

    pub async fn get_response(
        &self,
        quiz_id: &Uuid,
        user_id: &Uuid,
        viewer: &User,
    ) -> AppResult<Response> {
        let runtime = self.runtime(quiz_id).await?;
        let guard = self.lock(&runtime).await?;
        Self::ensure_can_view(&guard.quiz, user_id, viewer)?;
        guard
            .responses
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Response not found".to_string()))
    }

    pub async fn participant_report(
        &self,
        quiz_id: &Uuid,
        user_id: &Uuid,
        viewer: &User,
    ) -> AppResult<ParticipantReport> {
        let (quiz, responses) = self.snapshot(quiz_id).await?;
        Self::ensure_can_view(&quiz, user_id, viewer)?;

        let board = LeaderboardService::rank(&responses, self.config.tie_policy);
        let response = responses.iter().find(|r| r.user_id == *user_id);
        Ok(ReportService::participant_report(
            &quiz, *user_id, response, &board,
        ))
    }

    pub async fn quiz_summary(&self, quiz_id: &Uuid, viewer: &User) -> AppResult<QuizSummary> {
        let (quiz, responses) = self.snapshot(quiz_id).await?;
        Self::ensure_manager(&quiz, viewer)?;
        Ok(ReportService::quiz_summary(&quiz, &responses))
    }

    // ---------------------------------------------------------------------
    // Time and recovery
    // ---------------------------------------------------------------------

    /// Drive time-based behaviour: auto-start, quiz timers, per-question
    /// deadlines and retry of failed writes.
    ///
    /// Quizzes whose lock is busy are skipped until the next tick. Completed
    /// quizzes with nothing left to persist are dropped from memory and
    /// reloaded from the store on the next access.
    pub async fn tick(&self, now: DateTime<Utc>) {
        let runtimes: Vec<(Uuid, SharedRuntime)> = self
            .runtimes
            .read()
            .await
            .iter()
            .map(|(id, rt)| (*id, rt.clone()))
            .collect();

        let mut idle = Vec::new();
        for (quiz_id, runtime) in runtimes {
            let Ok(mut guard) = self.lock(&runtime).await else {
                continue;
            };

            let ctx = self.context();
            LifecycleService::tick(&mut guard, &ctx, now);
            self.flush(&mut guard).await;

            if guard.quiz.status == QuizStatus::Completed && !guard.is_dirty() {
                idle.push(quiz_id);
            }
        }

        if !idle.is_empty() {
            let mut runtimes = self.runtimes.write().await;
            for quiz_id in &idle {
                runtimes.remove(quiz_id);
            }
            debug!(evicted = idle.len(), "Evicted completed quizzes");
        }
    }

    /// Reload every non-completed quiz from the store
    pub async fn restore(&self) -> AppResult<usize> {
        let quizzes = self.store.load_open_quizzes().await?;
        let loaded = try_join_all(quizzes.into_iter().map(|quiz| async move {
            let responses = self.store.load_responses(&quiz.id).await?;
            Ok::<_, AppError>((quiz, responses))
        }))
        .await?;

        let now = Utc::now();
        let mut restored = 0;
        for (quiz, responses) in loaded {
            let quiz_id = quiz.id;
            let runtime = QuizRuntime::restore(quiz, responses, now);
            self.claim_code(&runtime);

            self.runtimes
                .write()
                .await
                .insert(quiz_id, Arc::new(Mutex::new(runtime)));
            restored += 1;
        }

        info!(restored, codes = self.codes.len(), "Restored open quizzes");
        Ok(restored)
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn context(&self) -> EngineContext<'_> {
        EngineContext {
            codes: &self.codes,
            config: &self.config,
        }
    }

    /// Run `op` under the quiz lock, then persist and publish its effects
    async fn with_runtime<T, F>(&self, quiz_id: &Uuid, op: F) -> AppResult<T>
    where
        F: FnOnce(&mut QuizRuntime, &EngineContext<'_>) -> AppResult<T> + Send,
        T: Send,
    {
        let runtime = self.runtime(quiz_id).await?;
        let mut guard = self.lock(&runtime).await?;

        let result = {
            let ctx = self.context();
            op(&mut *guard, &ctx)
        };

        self.flush(&mut guard).await;
        result
    }

    /// Registry lookup, loading the quiz from the store on a miss
    async fn runtime(&self, quiz_id: &Uuid) -> AppResult<SharedRuntime> {
        if let Some(runtime) = self.runtimes.read().await.get(quiz_id) {
            return Ok(runtime.clone());
        }

        let quiz = self
            .store
            .load_quiz(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;
        let responses = self.store.load_responses(quiz_id).await?;
        let runtime = QuizRuntime::restore(quiz, responses, Utc::now());
        self.claim_code(&runtime);

        let mut runtimes = self.runtimes.write().await;
        Ok(runtimes
            .entry(*quiz_id)
            .or_insert_with(|| Arc::new(Mutex::new(runtime)))
            .clone())
    }

    async fn lock<'a>(&self, runtime: &'a Mutex<QuizRuntime>) -> AppResult<MutexGuard<'a, QuizRuntime>> {
        tokio::time::timeout(self.config.lock_timeout, runtime.lock())
            .await
            .map_err(|_| {
                warn!(timeout_ms = self.config.lock_timeout.as_millis() as u64, "Quiz lock wait timed out");
                AppError::Busy
            })
    }

    /// Write dirty state through and publish queued events.
    ///
    /// Failed writes stay dirty and are retried on the next flush.
    async fn flush(&self, rt: &mut QuizRuntime) {
        let quiz_id = rt.quiz_id();

        if rt.quiz_dirty() {
            match self.store.save_quiz(&rt.quiz).await {
                Ok(()) => rt.clear_quiz_dirty(),
                Err(e) => error!(quiz_id = %quiz_id, error = %e, "Failed to persist quiz"),
            }
        }

        for user_id in rt.dirty_response_ids() {
            let Some(response) = rt.responses.get(&user_id) else {
                rt.clear_response_dirty(&user_id);
                continue;
            };
            match self.store.save_response(response).await {
                Ok(()) => rt.clear_response_dirty(&user_id),
                Err(e) => error!(
                    quiz_id = %quiz_id,
                    user_id = %user_id,
                    error = %e,
                    "Failed to persist response"
                ),
            }
        }

        for event in rt.take_outbox() {
            if let Err(e) = self.publisher.publish(&event).await {
                warn!(
                    quiz_id = %quiz_id,
                    event = event.event_type.as_str(),
                    error = %e,
                    "Failed to publish session event"
                );
            }
        }
    }

    /// Re-reserve the join code of a scheduled or active quiz
    fn claim_code(&self, runtime: &QuizRuntime) {
        let quiz = &runtime.quiz;
        if !matches!(quiz.status, QuizStatus::Scheduled | QuizStatus::Active) {
            return;
        }
        if let Some(code) = quiz.code.as_deref() {
            if !self.codes.claim(code, quiz.id) {
                warn!(quiz_id = %quiz.id, code = %code, "Join code held by another quiz");
            }
        }
    }

    /// Lock, clone the quiz and its responses, release
    async fn snapshot(&self, quiz_id: &Uuid) -> AppResult<(Quiz, Vec<Response>)> {
        let runtime = self.runtime(quiz_id).await?;
        let guard = self.lock(&runtime).await?;
        Ok((
            guard.quiz.clone(),
            guard.responses.values().cloned().collect(),
        ))
    }

    fn ensure_manager(quiz: &Quiz, user: &User) -> AppResult<()> {
        if quiz.is_owned_by(&user.id) || user.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the quiz owner or an admin can do this".to_string(),
            ))
        }
    }

    fn ensure_can_view(quiz: &Quiz, user_id: &Uuid, viewer: &User) -> AppResult<()> {
        if viewer.id == *user_id {
            return Ok(());
        }
        Self::ensure_manager(quiz, viewer)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::{
        constants::roles,
        db::{MemoryStore, MockSessionStore},
        models::{AccessControl, Question, QuestionKind, QuestionType, QuizSettings, ResponseStatus},
        services::{
            answer_service::SubmitStatus,
            event_service::{BroadcastPublisher, MockEventPublisher},
        },
    };

    fn question(text: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            position: 1,
            text: text.to_string(),
            kind: QuestionKind::parse(
                QuestionType::SingleChoice,
                vec!["3".to_string(), "4".to_string()],
                "4",
            )
            .unwrap(),
            points: 5,
            difficulty: None,
            topic: None,
            time_limit_seconds: None,
        }
    }

    fn public_quiz(owner_id: Uuid, questions: usize) -> Quiz {
        Quiz::draft(
            "Arithmetic".to_string(),
            owner_id,
            None,
            (0..questions).map(|i| question(&format!("Q{i}"))).collect(),
            QuizSettings::default(),
            AccessControl {
                is_public: true,
                ..Default::default()
            },
        )
    }

    fn users() -> (User, User) {
        (
            User::new(Uuid::new_v4(), roles::FACULTY, None, None),
            User::new(Uuid::new_v4(), roles::STUDENT, Some("CSE"), Some("A")),
        )
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_fail_submission() {
        let mut publisher = MockEventPublisher::new();
        publisher
            .expect_publish()
            .returning(|_| Err(AppError::Redis("connection refused".to_string())));

        let engine = SessionEngine::new(
            Arc::new(MemoryStore::new()),
            Arc::new(publisher),
            EngineConfig::default(),
        );
        let (owner, student) = users();
        let quiz = engine.register_quiz(public_quiz(owner.id, 1)).await.unwrap();
        let started = engine.start(&quiz.id, &owner).await.unwrap();
        let code = started.quiz.code.unwrap();

        engine.join(&code, &student).await.unwrap();
        let outcome = engine
            .submit_answer(&quiz.id, student.id, quiz.questions[0].id, "4", 1200)
            .await
            .unwrap();

        assert_eq!(outcome.status, SubmitStatus::Accepted);
        assert_eq!(outcome.total_score, 5);
        assert_eq!(outcome.response_status, ResponseStatus::Completed);
    }

    #[tokio::test]
    async fn test_failed_response_write_is_retried_on_tick() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let mut store = MockSessionStore::new();
        store.expect_save_quiz().returning(|_| Ok(()));
        store.expect_save_response().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::Database("connection reset".to_string()))
            } else {
                Ok(())
            }
        });

        let engine = SessionEngine::new(
            Arc::new(store),
            Arc::new(BroadcastPublisher::new()),
            EngineConfig::default(),
        );
        let (owner, student) = users();
        let quiz = engine.register_quiz(public_quiz(owner.id, 2)).await.unwrap();
        let code = engine.start(&quiz.id, &owner).await.unwrap().quiz.code.unwrap();
        engine.join(&code, &student).await.unwrap();

        // The write fails but the answer is accepted and kept in memory
        let outcome = engine
            .submit_answer(&quiz.id, student.id, quiz.questions[0].id, "4", 900)
            .await
            .unwrap();
        assert_eq!(outcome.status, SubmitStatus::Accepted);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);

        engine.tick(Utc::now()).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        // Clean now, nothing left to write
        engine.tick(Utc::now()).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        let response = engine.get_response(&quiz.id, &student.id, &student).await.unwrap();
        assert_eq!(response.total_score, 5);
    }

    #[tokio::test]
    async fn test_lock_wait_is_bounded() {
        let config = EngineConfig {
            lock_timeout: Duration::from_millis(20),
            ..Default::default()
        };
        let engine = SessionEngine::new(
            Arc::new(MemoryStore::new()),
            Arc::new(BroadcastPublisher::new()),
            config,
        );
        let (owner, student) = users();
        let quiz = engine.register_quiz(public_quiz(owner.id, 1)).await.unwrap();
        engine.start(&quiz.id, &owner).await.unwrap();

        let runtime = engine.runtime(&quiz.id).await.unwrap();
        let _held = runtime.lock().await;

        let err = engine
            .submit_answer(&quiz.id, student.id, quiz.questions[0].id, "4", 100)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Busy));
    }

    #[tokio::test]
    async fn test_unknown_quiz_is_not_found() {
        let mut store = MockSessionStore::new();
        store.expect_load_quiz().returning(|_| Ok(None));

        let engine = SessionEngine::new(
            Arc::new(store),
            Arc::new(BroadcastPublisher::new()),
            EngineConfig::default(),
        );

        let err = engine.get_quiz(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_only_managers_drive_lifecycle() {
        let engine = SessionEngine::new(
            Arc::new(MemoryStore::new()),
            Arc::new(BroadcastPublisher::new()),
            EngineConfig::default(),
        );
        let (owner, student) = users();
        let quiz = engine.register_quiz(public_quiz(owner.id, 1)).await.unwrap();

        let err = engine.start(&quiz.id, &student).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let admin = User::new(Uuid::new_v4(), roles::ADMIN, None, None);
        let result = engine.start(&quiz.id, &admin).await.unwrap();
        assert_eq!(result.outcome, TransitionOutcome::Transitioned);
    }

    #[tokio::test]
    async fn test_import_rejects_shared_question_ids() {
        let engine = SessionEngine::new(
            Arc::new(MemoryStore::new()),
            Arc::new(BroadcastPublisher::new()),
            EngineConfig::default(),
        );
        let (owner, _) = users();
        let mut quiz = public_quiz(owner.id, 2);
        quiz.questions[1].id = quiz.questions[0].id;
        let quiz_id = quiz.id;

        let err = engine.register_quiz(quiz).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(matches!(
            engine.get_quiz(&quiz_id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
