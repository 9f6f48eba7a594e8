pub mod blocks;
pub mod bookings;
pub mod health;
pub mod internal;
pub mod payments;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /bookings                          create (resident), list
/// /bookings/{id}                     get
/// /bookings/{id}/cancel              cancel (owner or building admin)
///
/// /blocks/search                     available-block search
///
/// /payments/webhook                  gateway callback (x-signature)
/// /payments/conflicts                conflicting payment events (super admin)
///
/// /internal/settlements              settle a payout (x-cron-secret)
/// /internal/sweeps/expire            run the expiry sweep (x-cron-secret)
/// /internal/sweeps/complete          run the completion sweep (x-cron-secret)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/bookings", bookings::router())
        .nest("/blocks", blocks::router())
        .nest("/payments", payments::router())
        .nest("/internal", internal::router())
}
