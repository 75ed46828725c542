// src/db/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, migrate::MigrateError, postgres::PgPoolOptions};

use super::{QuizStore, SqlxQuizStore};
use crate::{
    config::Config,
    models::{
        attempt::{AnswerInput, AttemptScore, QuizAttempt},
        question::PublicQuestion,
    },
};

pub type PgQuizStore = SqlxQuizStore<Postgres>;

impl SqlxQuizStore<Postgres> {
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl QuizStore for SqlxQuizStore<Postgres> {
    async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations/postgres").run(self.pool()).await
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
