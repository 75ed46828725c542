// src/db/mod.rs

//! Storage for questions, attempts and winner claims.
//!
//! Handlers only see [`QuizStore`]. Postgres is the production backend; SQLite
//! serves embedded deployments and the integration tests. Both run the same
//! generic [`SqlxQuizStore`] (sqlx binds `$N` placeholders on either).

pub mod backend;
pub mod postgres;
pub mod sqlite;

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::MigrateError;

use crate::{
    config::Config,
    models::{
        attempt::{AnswerInput, AttemptScore, QuizAttempt},
        question::PublicQuestion,
    },
};

pub use backend::{QuizDatabase, SqlxQuizStore};
pub use postgres::PgQuizStore;
pub use sqlite::SqliteQuizStore;

/// Async interface over the quiz database.
#[async_trait]
pub trait QuizStore: Debug + Send + Sync {
    /// Apply the embedded schema migrations. Idempotent.
    async fn run_migrations(&self) -> Result<(), MigrateError>;

    /// Current time according to the database server.
    async fn server_time(&self) -> Result<DateTime<Utc>, sqlx::Error>;

    /// All questions ordered by id, each with its options (never their correctness).
    async fn list_questions(&self) -> Result<Vec<PublicQuestion>, sqlx::Error>;

    /// Records an attempt and scores it in a single transaction.
    ///
    /// An answer earns a point only if its option is correct for the stated
    /// question and this attempt is the first ever to claim that question.
    async fn submit_attempt(
        &self,
        user_name: &str,
        answers: &[AnswerInput],
    ) -> Result<AttemptScore, sqlx::Error>;

    async fn find_attempt(&self, id: i64) -> Result<Option<QuizAttempt>, sqlx::Error>;

    /// Close the underlying pool. Safe to call more than once.
    async fn close(&self);
}

pub fn is_sqlite_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite:")
}

async fn connect_once(config: &Config) -> Result<Arc<dyn QuizStore>, sqlx::Error> {
    if is_sqlite_url(&config.database_url) {
        let store = SqliteQuizStore::connect(config).await?;
        Ok(Arc::new(store))
    } else {
        let store = PgQuizStore::connect(config).await?;
        Ok(Arc::new(store))
    }
}

/// Opens the store named by `DATABASE_URL`, retrying while the database comes up.
pub async fn connect(config: &Config) -> Result<Arc<dyn QuizStore>, sqlx::Error> {
    let mut retry_count = 0;
    loop {
        match connect_once(config).await {
            Ok(store) => return Ok(store),
            Err(e) => {
                retry_count += 1;
                if retry_count > config.db_connect_retries {
                    return Err(e);
                }
                tracing::warn!(
                    "Database not ready, retrying in {}s... (Attempt {}): {}",
                    config.db_retry_delay.as_secs(),
                    retry_count,
                    e
                );
                tokio::time::sleep(config.db_retry_delay).await;
            }
        }
    }
}
