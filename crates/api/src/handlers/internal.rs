//! Scheduler-facing handlers under `/internal`.
//!
//! All of them require [`RequireInternal`] and call the same functions as the
//! worker binary.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use guestbay_core::types::DbId;
use guestbay_worker::settlement::settle_payout;
use guestbay_worker::sweeper::{run_completion_sweep, run_expiry_sweep};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::internal::RequireInternal;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub payout_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct ExpireResponse {
    pub expired: usize,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub completed: usize,
}

/// POST /api/v1/internal/settlements
pub async fn settle(
    _internal: RequireInternal,
    State(state): State<AppState>,
    Json(input): Json<SettleRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = settle_payout(&state.pool, input.payout_id).await?;
    tracing::info!(
        payout_id = input.payout_id,
        status = outcome.status(),
        "Payout settlement processed",
    );
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/internal/sweeps/expire
pub async fn expire(
    _internal: RequireInternal,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let expired = run_expiry_sweep(&state.pool, Utc::now()).await?;
    if !expired.is_empty() {
        tracing::info!(count = expired.len(), "Expiry sweep applied");
    }
    Ok(Json(ExpireResponse {
        expired: expired.len(),
    }))
}

/// POST /api/v1/internal/sweeps/complete
pub async fn complete(
    _internal: RequireInternal,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let completed = run_completion_sweep(&state.pool, Utc::now()).await?;
    if !completed.is_empty() {
        tracing::info!(count = completed.len(), "Completion sweep applied");
    }
    Ok(Json(CompleteResponse {
        completed: completed.len(),
    }))
}
