// src/db/backend.rs

//! Quiz queries written once over any sqlx database.
//!
//! [`SqlxQuizStore`] holds the pool and all SQL. The per-backend modules only
//! supply connection setup, migrations and the [`QuizDatabase`] clock query.

use std::{
    collections::BTreeSet,
    fmt::{self, Debug, Formatter},
};

use chrono::{DateTime, Utc};
use sqlx::{
    ColumnIndex, Database, Decode, Encode, Executor, FromRow, IntoArguments, Pool, Postgres,
    Sqlite, Type, query_as, query_scalar,
};

use crate::models::{
    attempt::{AnswerInput, AttemptScore, QuizAttempt},
    question::{PublicQuestion, QuestionOptionRow, group_question_rows},
};

const LIST_QUESTIONS_SQL: &str = r#"
    SELECT
        q.id AS question_id,
        q.question_text,
        o.id AS option_id,
        o.option_text
    FROM questions q
    LEFT JOIN options o ON o.question_id = q.id
    ORDER BY q.id, o.id
"#;

const INSERT_ATTEMPT_SQL: &str = "INSERT INTO quiz_attempts (user_name) VALUES ($1) RETURNING id";

const OPTION_IS_CORRECT_SQL: &str =
    "SELECT is_correct FROM options WHERE id = $1 AND question_id = $2";

/// First writer wins; a second claim for the same question returns no row.
const CLAIM_WINNER_SQL: &str = r#"
    INSERT INTO question_winners (question_id, attempt_id)
    VALUES ($1, $2)
    ON CONFLICT DO NOTHING
    RETURNING question_id
"#;

const UPDATE_SCORE_SQL: &str = "UPDATE quiz_attempts SET score = $1 WHERE id = $2";

const FIND_ATTEMPT_SQL: &str = "SELECT id, user_name, score FROM quiz_attempts WHERE id = $1";

/// Backend-specific SQL that cannot be shared.
pub trait QuizDatabase: Database {
    /// Single-value query returning the server's current timestamp.
    const NOW_SQL: &'static str;
}

impl QuizDatabase for Postgres {
    const NOW_SQL: &'static str = "SELECT NOW()";
}

impl QuizDatabase for Sqlite {
    const NOW_SQL: &'static str = "SELECT CURRENT_TIMESTAMP";
}

pub struct SqlxQuizStore<DB: QuizDatabase> {
    pool: Pool<DB>,
}

impl<DB: QuizDatabase> Debug for SqlxQuizStore<DB> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlxQuizStore")
            .field("pool", &self.pool)
            .finish()
    }
}

impl<DB: QuizDatabase> Clone for SqlxQuizStore<DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

impl<DB: QuizDatabase> SqlxQuizStore<DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }

    pub async fn close_pool(&self) {
        self.pool.close().await;
    }
}

impl<DB> SqlxQuizStore<DB>
where
    DB: QuizDatabase,
    QuestionOptionRow: for<'r> FromRow<'r, DB::Row>,
    QuizAttempt: for<'r> FromRow<'r, DB::Row>,
    for<'q> &'q str: Encode<'q, DB> + Type<DB>,
    for<'q> i64: Encode<'q, DB> + Type<DB>,
    for<'r> i64: Decode<'r, DB>,
    for<'r> bool: Decode<'r, DB> + Type<DB>,
    for<'r> DateTime<Utc>: Decode<'r, DB> + Type<DB>,
    for<'q> <DB as Database>::Arguments<'q>: IntoArguments<'q, DB> + Send,
    for<'c> &'c Pool<DB>: Executor<'c, Database = DB>,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    usize: ColumnIndex<DB::Row>,
{
    pub async fn fetch_server_time(&self) -> Result<DateTime<Utc>, sqlx::Error> {
        query_scalar::<DB, DateTime<Utc>>(DB::NOW_SQL)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn fetch_questions(&self) -> Result<Vec<PublicQuestion>, sqlx::Error> {
        let rows = query_as::<DB, QuestionOptionRow>(LIST_QUESTIONS_SQL)
            .fetch_all(&self.pool)
            .await?;

        Ok(group_question_rows(rows))
    }

    /// Inserts the attempt, claims winners and stores the score in one transaction.
    ///
    /// Correctness is checked in submitted order, but claims are made in
    /// ascending question id. Two transactions therefore never wait on each
    /// other's winner keys in opposite order.
    #[tracing::instrument(
        name = "record_attempt",
        skip(self, answers),
        fields(answer_count = answers.len())
    )]
    pub async fn record_attempt(
        &self,
        user_name: &str,
        answers: &[AnswerInput],
    ) -> Result<AttemptScore, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let attempt_id: i64 = query_scalar::<DB, i64>(INSERT_ATTEMPT_SQL)
            .bind(user_name)
            .fetch_one(&mut *tx)
            .await?;

        let mut correct_questions = BTreeSet::new();
        for answer in answers {
            let is_correct: Option<bool> = query_scalar::<DB, bool>(OPTION_IS_CORRECT_SQL)
                .bind(answer.option_id)
                .bind(answer.question_id)
                .fetch_optional(&mut *tx)
                .await?;

            if is_correct == Some(true) {
                correct_questions.insert(answer.question_id);
            }
        }

        let mut score: i64 = 0;
        for question_id in correct_questions {
            let claimed: Option<i64> = query_scalar::<DB, i64>(CLAIM_WINNER_SQL)
                .bind(question_id)
                .bind(attempt_id)
                .fetch_optional(&mut *tx)
                .await?;

            if claimed.is_some() {
                score += 1;
                tracing::debug!(attempt_id, question_id, "question won");
            } else {
                tracing::debug!(attempt_id, question_id, "question already claimed");
            }
        }

        sqlx::query::<DB>(UPDATE_SCORE_SQL)
            .bind(score)
            .bind(attempt_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(AttemptScore { attempt_id, score })
    }

    pub async fn fetch_attempt(&self, id: i64) -> Result<Option<QuizAttempt>, sqlx::Error> {
        query_as::<DB, QuizAttempt>(FIND_ATTEMPT_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}
