use axum::routing::post;
use axum::Router;

use crate::handlers::internal;
use crate::state::AppState;

/// Routes mounted at `/internal`.
///
/// ```text
/// POST   /settlements         -> settle
/// POST   /sweeps/expire       -> expire
/// POST   /sweeps/complete     -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settlements", post(internal::settle))
        .route("/sweeps/expire", post(internal::expire))
        .route("/sweeps/complete", post(internal::complete))
}
