// src/db/sqlite.rs

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    Sqlite,
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use super::{QuizStore, SqlxQuizStore};
use crate::{
    config::Config,
    models::{
        attempt::{AnswerInput, AttemptScore, QuizAttempt},
        question::PublicQuestion,
    },
};

pub type SqliteQuizStore = SqlxQuizStore<Sqlite>;

impl SqlxQuizStore<Sqlite> {
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        // Concurrent submissions queue on the write lock for up to busy_timeout.
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        // An in-memory database lives and dies with its single connection.
        let max_connections = if is_memory_url(&config.database_url) {
            1
        } else {
            config.db_max_connections
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    /// Fresh private in-memory database, schema not yet applied.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Ok(Self::new(pool))
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[async_trait]
impl QuizStore for SqlxQuizStore<Sqlite> {
    async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations/sqlite").run(self.pool()).await
    }

    async fn server_time(&self) -> Result<DateTime<Utc>, sqlx::Error> {
        self.fetch_server_time().await
    }

    async fn list_questions(&self) -> Result<Vec<PublicQuestion>, sqlx::Error> {
        self.fetch_questions().await
    }

    async fn submit_attempt(
        &self,
        user_name: &str,
        answers: &[AnswerInput],
    ) -> Result<AttemptScore, sqlx::Error> {
        self.record_attempt(user_name, answers).await
    }

    async fn find_attempt(&self, id: i64) -> Result<Option<QuizAttempt>, sqlx::Error> {
        self.fetch_attempt(id).await
    }

    async fn close(&self) {
        self.close_pool().await;
    }
}
