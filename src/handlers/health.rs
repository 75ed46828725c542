// src/handlers/health.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    db::QuizStore,
    error::AppError,
    models::health::{ErrorResponse, HealthResponse},
};

/// Confirms the database is reachable and reports its clock.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 500, description = "Database unreachable", body = ErrorResponse)
    )
)]
pub async fn health_check(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let time = store.server_time().await?;

    Ok(Json(HealthResponse {
        message: "Server running".to_string(),
        time,
    }))
}
