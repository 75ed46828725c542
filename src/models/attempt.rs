// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents the 'quiz_attempts' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct QuizAttempt {
    pub id: i64,
    pub user_name: String,
    /// Number of questions this attempt was first to answer correctly.
    pub score: i64,
}

/// A single selected option.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AnswerInput {
    #[validate(range(min = 1, message = "question_id must be a positive id."))]
    pub question_id: i64,
    #[validate(range(min = 1, message = "option_id must be a positive id."))]
    pub option_id: i64,
}

/// DTO for `POST /submit`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitQuizRequest {
    #[validate(
        length(min = 1, max = 100, message = "user_name length must be between 1 and 100 characters."),
        custom(function = validate_user_name)
    )]
    pub user_name: String,
    #[validate(length(max = 500, message = "At most 500 answers per submission."), nested)]
    pub answers: Vec<AnswerInput>,
}

fn validate_user_name(user_name: &str) -> Result<(), validator::ValidationError> {
    if user_name.trim().is_empty() {
        return Err(validator::ValidationError::new("user_name_blank"));
    }
    Ok(())
}

/// Outcome of scoring one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptScore {
    pub attempt_id: i64,
    pub score: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitQuizResponse {
    pub message: String,
    pub score: i64,
    #[serde(rename = "attemptId")]
    pub attempt_id: i64,
}
