use axum::routing::get;
use axum::Router;

use crate::handlers::blocks;
use crate::state::AppState;

/// Routes mounted at `/blocks`.
pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(blocks::search))
}
