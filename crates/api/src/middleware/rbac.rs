//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects callers of the wrong account
//! kind with 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use guestbay_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a resident account.
pub struct RequireResident(pub AuthUser);

impl FromRequestParts<AppState> for RequireResident {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.principal.is_resident() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Resident account required".into(),
            )));
        }
        Ok(RequireResident(user))
    }
}

/// Requires a staff account (building admin or super admin). Building scope is
/// checked by the handler against the resource.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.principal.is_resident() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
