use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::AppEnv;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
    pub db_healthy: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = guestbay_db::health_check(&state.pool).await.is_ok();
    let environment = match state.config.app_env {
        AppEnv::Production => "production",
        AppEnv::Development => "development",
        AppEnv::Test => "test",
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment,
        db_healthy,
    })
}

/// Mounted at the root, outside `/api/v1`, so load balancers need no token.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
