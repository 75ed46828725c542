// tests/postgres_tests.rs
//
// Needs a running Postgres: DATABASE_URL=postgres://... cargo test -- --ignored

use quiz_backend::{
    db::{PgQuizStore, QuizStore},
    models::attempt::AnswerInput,
};
use sqlx::postgres::PgPoolOptions;

async fn connect_store() -> PgQuizStore {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    let store = PgQuizStore::new(pool);
    store
        .run_migrations()
        .await
        .expect("Failed to migrate database");
    store
}

/// Inserts one question with a correct and an incorrect option.
/// Returns (question_id, correct_option_id, wrong_option_id).
async fn seed_question(store: &PgQuizStore) -> (i64, i64, i64) {
    let text = format!("Question {}", uuid::Uuid::new_v4());
    let question_id: i64 =
        sqlx::query_scalar("INSERT INTO questions (question_text) VALUES ($1) RETURNING id")
            .bind(text)
            .fetch_one(store.pool())
            .await
            .unwrap();

    let mut option_ids = Vec::new();
    for (option_text, is_correct) in [("right", true), ("wrong", false)] {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO options (question_id, option_text, is_correct) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(question_id)
        .bind(option_text)
        .bind(is_correct)
        .fetch_one(store.pool())
        .await
        .unwrap();
        option_ids.push(id);
    }

    (question_id, option_ids[0], option_ids[1])
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn pg_concurrent_claims_credit_exactly_one_attempt() {
    let store = connect_store().await;
    let (question_id, correct, _) = seed_question(&store).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let answers = [AnswerInput { question_id, option_id: correct }];
            store
                .submit_attempt(&format!("racer_{}", i), &answers)
                .await
                .unwrap()
        }));
    }

    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap().score;
    }
    assert_eq!(total, 1);

    let winners: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM question_winners WHERE question_id = $1")
            .bind(question_id)
            .fetch_one(store.pool())
            .await
            .unwrap();
    assert_eq!(winners, 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn pg_wrong_answer_and_lookup() {
    let store = connect_store().await;
    let (question_id, _, wrong) = seed_question(&store).await;

    let result = store
        .submit_attempt("pg_user", &[AnswerInput { question_id, option_id: wrong }])
        .await
        .unwrap();
    assert_eq!(result.score, 0);

    let attempt = store.find_attempt(result.attempt_id).await.unwrap().unwrap();
    assert_eq!(attempt.user_name, "pg_user");
    assert_eq!(attempt.score, 0);

    let time = store.server_time().await.unwrap();
    assert!((chrono::Utc::now() - time).num_seconds().abs() < 300);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn pg_opposite_order_submissions_do_not_deadlock() {
    let store = connect_store().await;

    for _ in 0..20 {
        let (q1, c1, _) = seed_question(&store).await;
        let (q2, c2, _) = seed_question(&store).await;

        let forward = [
            AnswerInput { question_id: q1, option_id: c1 },
            AnswerInput { question_id: q2, option_id: c2 },
        ];
        let backward = [forward[1].clone(), forward[0].clone()];

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.submit_attempt("forward", &forward).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.submit_attempt("backward", &backward).await })
        };

        let a = a.await.unwrap().expect("forward submission failed");
        let b = b.await.unwrap().expect("backward submission failed");

        let mut scores = [a.score, b.score];
        scores.sort_unstable();
        assert_eq!(scores, [0, 2]);
    }
}
