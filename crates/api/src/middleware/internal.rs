//! Shared-secret guard for `/internal` routes called by the scheduler.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use guestbay_core::error::CoreError;
use guestbay_core::hashing::constant_time_eq;

use crate::error::AppError;
use crate::state::AppState;

pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Requires `x-cron-secret` to equal the configured `CRON_SECRET`.
///
/// With no secret configured every internal call is refused.
pub struct RequireInternal;

impl FromRequestParts<AppState> for RequireInternal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.cron_secret.as_deref() else {
            return Err(AppError::Core(CoreError::Forbidden(
                "Internal endpoints are disabled".into(),
            )));
        };

        let provided = parts
            .headers
            .get(CRON_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-cron-secret header".into()))
            })?;

        if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
            tracing::warn!("Rejected internal call with a wrong cron secret");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid cron secret".into(),
            )));
        }
        Ok(RequireInternal)
    }
}
