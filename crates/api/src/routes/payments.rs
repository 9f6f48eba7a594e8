use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// POST   /webhook         -> webhook
/// GET    /conflicts       -> list_conflicts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhook", post(payments::webhook))
        .route("/conflicts", get(payments::list_conflicts))
}
