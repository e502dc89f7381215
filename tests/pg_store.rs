//! PostgreSQL store round-trip
//!
//! Needs Docker: `cargo test -- --ignored`

mod common;

use chrono::Utc;
use livequiz::{
    db::{self, PgStore, SessionStore},
    models::{Answer, QuestionType, QuizSettings, QuizStatus, Response, ResponseStatus},
};
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

use common::*;

async fn start_postgres() -> (ContainerAsync<Postgres>, PgPool) {
    let container = Postgres::default()
        .with_user("livequiz")
        .with_password("livequiz_test")
        .with_db_name("livequiz_test")
        .with_tag("16-alpine")
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://livequiz:livequiz_test@{host}:{port}/livequiz_test");

    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database");
    db::run_migrations(&pool).await.expect("Failed to run migrations");

    (container, pool)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_quiz_and_responses_round_trip() {
    let (_container, pool) = start_postgres().await;
    let store = PgStore::new(pool);

    let owner = faculty();
    let alice = student("CSE", "A");
    let mut quiz = quiz(&owner, 2, QuizSettings::default(), public_access());
    quiz.code = Some("PGTEST".to_string());
    store.save_quiz(&quiz).await.unwrap();

    let loaded = store.load_quiz(&quiz.id).await.unwrap().unwrap();
    assert_eq!(loaded.questions, quiz.questions);
    assert_eq!(loaded.settings, quiz.settings);
    assert_eq!(loaded.status, QuizStatus::Draft);

    quiz.status = QuizStatus::Active;
    quiz.started_at = Some(Utc::now());
    store.save_quiz(&quiz).await.unwrap();
    assert_eq!(store.load_open_quizzes().await.unwrap().len(), 1);

    let mut response = Response::new(quiz.id, alice.id, quiz.max_possible_score(), Utc::now());
    response.record(Answer {
        question_id: quiz.questions[0].id,
        question_type: QuestionType::SingleChoice,
        value: "A".to_string(),
        is_correct: true,
        points_earned: 10,
        time_taken: 2500,
        answered_at: Utc::now(),
    });
    store.save_response(&response).await.unwrap();

    // Upsert on (quiz, user) replaces the row
    response.finalize(ResponseStatus::Completed, Utc::now(), 1);
    response.rank = Some(1);
    store.save_response(&response).await.unwrap();

    let responses = store.load_responses(&quiz.id).await.unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].status, ResponseStatus::Completed);
    assert_eq!(responses[0].total_score, 10);
    assert_eq!(responses[0].answers, response.answers);
    assert_eq!(responses[0].rank, Some(1));
    assert_eq!(responses[0].completion_seq, Some(1));

    quiz.status = QuizStatus::Completed;
    store.save_quiz(&quiz).await.unwrap();
    assert!(store.load_open_quizzes().await.unwrap().is_empty());
}
