//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// POST   /{id}/cancel     -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bookings::list).post(bookings::create))
        .route("/{id}", get(bookings::get_by_id))
        .route("/{id}/cancel", post(bookings::cancel))
}
