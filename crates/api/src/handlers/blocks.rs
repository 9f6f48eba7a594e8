//! Handlers for available-block search.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use guestbay_core::block::DurationClass;
use guestbay_core::error::CoreError;
use guestbay_core::search::{clamp_limit, clamp_offset};
use guestbay_db::models::block::BlockSearchQuery;
use guestbay_db::repositories::BlockRepo;

use super::{building_filter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/blocks/search
///
/// Future available blocks, soonest first. Filters: `building_id`, `date`
/// (UTC day), `duration_minutes` (120 or 240).
pub async fn search(
    user: AuthUser,
    State(state): State<AppState>,
    Query(mut params): Query<BlockSearchQuery>,
) -> AppResult<impl IntoResponse> {
    if let Some(minutes) = params.duration_minutes {
        if DurationClass::from_minutes(minutes).is_none() {
            return Err(CoreError::Validation(format!(
                "duration_minutes: {minutes} is not a block length"
            ))
            .into());
        }
    }
    params.building_id = building_filter(&user.principal, params.building_id)?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let blocks = BlockRepo::search_available(&state.pool, &params, limit, offset).await?;
    Ok(Json(DataResponse { data: blocks }))
}
