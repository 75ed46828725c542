// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    db::QuizStore,
    error::AppError,
    models::{
        attempt::{QuizAttempt, SubmitQuizRequest, SubmitQuizResponse},
        health::ErrorResponse,
        question::PublicQuestion,
    },
};

/// Lists every question with its options.
///
/// Correctness flags never leave the database layer.
#[utoipa::path(
    get,
    path = "/questions",
    tag = "Quiz",
    responses(
        (status = 200, description = "All questions", body = [PublicQuestion]),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_questions(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let questions = store.list_questions().await?;

    Ok(Json(questions))
}

/// Submits a user's answers and scores them.
///
/// * Validates the payload before touching the database.
/// * A point is awarded only to the first attempt that answers a question correctly.
/// * The attempt, its winner claims and its score are written in one transaction.
#[utoipa::path(
    post,
    path = "/submit",
    tag = "Quiz",
    request_body = SubmitQuizRequest,
    responses(
        (status = 200, description = "Attempt scored", body = SubmitQuizResponse),
        (status = 400, description = "Malformed or invalid submission", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn submit_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    payload: Result<Json<SubmitQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = store.submit_attempt(&req.user_name, &req.answers).await?;

    tracing::info!(
        attempt_id = result.attempt_id,
        score = result.score,
        "Quiz submitted"
    );

    Ok(Json(SubmitQuizResponse {
        message: "Quiz submitted".to_string(),
        score: result.score,
        attempt_id: result.attempt_id,
    }))
}

/// Retrieves a recorded attempt by ID.
#[utoipa::path(
    get,
    path = "/result/{id}",
    tag = "Quiz",
    params(("id" = i64, Path, description = "Attempt id returned by /submit")),
    responses(
        (status = 200, description = "Stored attempt", body = QuizAttempt),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "No such attempt", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn get_result(
    State(store): State<Arc<dyn QuizStore>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;

    let attempt = store
        .find_attempt(id)
        .await?
        .ok_or(AppError::NotFound("Result not found".to_string()))?;

    Ok(Json(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteQuizStore;
    use axum::http::StatusCode;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn test_database_failure_logged_once() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let store = SqliteQuizStore::in_memory().await.unwrap();
        store.close().await;
        let store: Arc<dyn QuizStore> = Arc::new(store);

        let response = list_questions(State(store)).await.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let output = logs.contents();
        assert_eq!(output.lines().filter(|line| line.contains("ERROR")).count(), 1);
    }
}
