// tests/router_tests.rs

use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use quiz_backend::{
    config::Config,
    db::{QuizStore, SqliteQuizStore},
    routes,
    state::AppState,
};
use tower::ServiceExt;

async fn app_with_origins(origins: Option<&str>) -> axum::Router {
    let store = SqliteQuizStore::in_memory().await.unwrap();
    store.run_migrations().await.unwrap();

    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "CORS_ALLOWED_ORIGINS" => origins.map(String::from),
        _ => None,
    })
    .unwrap();

    routes::create_router(AppState {
        store: Arc::new(store),
        config,
    })
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = app_with_origins(None).await;

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let app = app_with_origins(None).await;

    let response = app
        .oneshot(Request::builder().uri("/submit").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app_with_origins(None).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(doc["paths"]["/submit"]["post"].is_object());
    assert!(doc["paths"]["/result/{id}"]["get"].is_object());
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let app = app_with_origins(None).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/questions")
                .header(header::ORIGIN, "http://quiz.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_restricted_to_configured_origins() {
    let allowed = app_with_origins(Some("http://localhost:3000")).await;
    let response = allowed
        .oneshot(
            Request::builder()
                .uri("/questions")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );

    let other = app_with_origins(Some("http://localhost:3000")).await;
    let response = other
        .oneshot(
            Request::builder()
                .uri("/questions")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
