//! Handlers for payment callbacks and payment audit.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use guestbay_core::error::CoreError;
use guestbay_core::search::{clamp_limit, clamp_offset};
use guestbay_db::repositories::PaymentRepo;

use super::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::payments::reconciler::{self, WebhookHeaders, REQUEST_ID_HEADER, SIGNATURE_HEADER};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/v1/payments/webhook
///
/// Gateway callback. Authenticated by `x-signature`, not by a bearer token.
/// The body is taken raw so the signature is checked before it is parsed.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let webhook_headers = WebhookHeaders {
        signature: header(&headers, SIGNATURE_HEADER),
        request_id: header(&headers, REQUEST_ID_HEADER),
    };
    let response = reconciler::handle_webhook(&state, &webhook_headers, &body).await?;
    Ok(Json(response))
}

/// GET /api/v1/payments/conflicts
///
/// Recorded events that contradicted their booking, newest first. Super
/// admins only.
pub async fn list_conflicts(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    if admin.principal.building_scope().is_some() {
        return Err(CoreError::Forbidden("Super admin role required".into()).into());
    }
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let events = PaymentRepo::list_conflicts(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: events }))
}
