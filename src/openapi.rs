// src/openapi.rs

use axum::Json;
use utoipa::OpenApi;

use crate::{
    handlers::{health, quiz},
    models::{
        attempt::{AnswerInput, QuizAttempt, SubmitQuizRequest, SubmitQuizResponse},
        health::{ErrorResponse, HealthResponse},
        question::{PublicOption, PublicQuestion},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        quiz::list_questions,
        quiz::submit_quiz,
        quiz::get_result
    ),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        PublicQuestion,
        PublicOption,
        SubmitQuizRequest,
        AnswerInput,
        SubmitQuizResponse,
        QuizAttempt
    )),
    tags(
        (name = "System", description = "Liveness"),
        (name = "Quiz", description = "Questions, submissions and results")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
