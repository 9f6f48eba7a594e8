//! Handlers for the `/bookings` resource.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use guestbay_core::search::{clamp_limit, clamp_offset};
use guestbay_core::types::DbId;
use guestbay_core::validation::CreateBookingInput;
use guestbay_db::models::booking::BookingListQuery;
use guestbay_db::repositories::BookingRepo;
use serde::Deserialize;

use super::{building_filter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireResident;
use crate::reservation;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

/// Optional body of a cancellation request.
#[derive(Debug, Default, Deserialize)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

/// POST /api/v1/bookings
pub async fn create(
    RequireResident(user): RequireResident,
    State(state): State<AppState>,
    Json(input): Json<CreateBookingInput>,
) -> AppResult<impl IntoResponse> {
    let booking = reservation::create_booking(&state, &user.principal, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// POST /api/v1/bookings/{id}/cancel
///
/// The body is optional; `{ "reason": "..." }` is recorded when given.
pub async fn cancel(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CancelBookingRequest::default()
    } else {
        serde_json::from_slice::<CancelBookingRequest>(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid cancellation body: {e}")))?
    };
    let reason = request
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let booking = reservation::cancel_booking(&state, &user.principal, id, reason).await?;
    Ok(Json(SuccessResponse::new(booking)))
}

/// GET /api/v1/bookings
///
/// Residents see their own bookings; staff see the bookings of the buildings
/// they administer.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookingListQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let bookings = if user.principal.is_resident() {
        BookingRepo::list_for_resident(
            &state.pool,
            user.account_id(),
            params.status_id,
            limit,
            offset,
        )
        .await?
    } else {
        let building_id = building_filter(&user.principal, params.building_id)?;
        BookingRepo::list_for_building(&state.pool, building_id, params.status_id, limit, offset)
            .await?
    };
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = reservation::get_booking(&state, &user.principal, id).await?;
    Ok(Json(DataResponse { data: booking }))
}
