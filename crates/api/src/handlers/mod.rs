pub mod blocks;
pub mod bookings;
pub mod internal;
pub mod payments;

use guestbay_core::account::Principal;
use guestbay_core::error::CoreError;
use guestbay_core::types::DbId;

use crate::error::{AppError, AppResult};

/// Default and maximum page sizes for list endpoints.
const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Resolve the building filter for `principal`.
///
/// Scoped principals may only ask for their own building and default to it;
/// super admins may ask for any building or none.
pub(crate) fn building_filter(
    principal: &Principal,
    requested: Option<DbId>,
) -> AppResult<Option<DbId>> {
    match (principal.building_scope(), requested) {
        (Some(scope), Some(requested)) if requested != scope => Err(AppError::Core(
            CoreError::Forbidden("Building is outside your scope".into()),
        )),
        (Some(scope), _) => Ok(Some(scope)),
        (None, requested) => Ok(requested),
    }
}
