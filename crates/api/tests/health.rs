mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_database_and_environment(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["environment"], "test");
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn responses_echo_the_request_id(pool: PgPool) {
    let app = build_test_app(pool);

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = common::send(app, request).await;

    assert_eq!(response.headers()["x-request-id"], "req-abc");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
