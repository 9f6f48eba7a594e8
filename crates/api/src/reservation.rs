//! Reservation engine: booking creation and cancellation.
//!
//! Every check that can be made without writing (payload shape, resident
//! status, denylist, start time and building scope) runs before
//! [`BookingRepo::reserve`] opens its transaction. The transaction itself
//! claims the block and writes the booking, or changes nothing.

use chrono::Utc;
use guestbay_core::account::Principal;
use guestbay_core::booking::BookingError;
use guestbay_core::codes::generate_confirmation_code;
use guestbay_core::error::CoreError;
use guestbay_core::types::DbId;
use guestbay_core::validation::{
    check_business_rules, denylist_probes, denylist_verdict, parse_create_request,
    CreateBookingInput,
};
use guestbay_db::models::booking::{
    Booking, BookingScope, CancelOutcome, NewBooking, ReservationConflict,
};
use guestbay_db::repositories::{AccountRepo, BlockRepo, BookingRepo, DenylistRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Create a pending booking for the calling resident.
pub async fn create_booking(
    state: &AppState,
    caller: &Principal,
    input: CreateBookingInput,
) -> AppResult<Booking> {
    let request = parse_create_request(input)?;

    // Status and building scope come from the account row, not the token.
    let account = AccountRepo::find_active_resident(&state.pool, caller.account_id)
        .await?
        .ok_or(BookingError::ResidentNotFound)?;
    let principal = account.principal().ok_or(BookingError::ResidentNotFound)?;
    let home_building = principal
        .building_scope()
        .ok_or(BookingError::ResidentNotFound)?;

    let block = BlockRepo::find_context(&state.pool, request.block_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "AvailabilityBlock",
            id: request.block_id,
        })?;

    let probes = denylist_probes(
        state.config.blind_index_key.as_bytes(),
        &account.identity(),
        &request.vehicle_plate,
    );
    let reasons = DenylistRepo::matching_reasons(&state.pool, home_building, &probes).await?;
    if let Err(err) = denylist_verdict(reasons) {
        tracing::info!(
            resident_id = account.id,
            block_id = block.block_id,
            "Booking refused by denylist",
        );
        return Err(err.into());
    }

    check_business_rules(&principal, block.building_id, block.start_time, Utc::now())?;

    let new_booking = NewBooking {
        block_id: block.block_id,
        resident_id: account.id,
        vehicle_plate: request.vehicle_plate,
        visitor_name: request.visitor_name,
        visitor_phone: request.visitor_phone,
        platform_rate_bps: block.platform_rate_bps,
        confirmation_code: generate_confirmation_code(),
    };

    match BookingRepo::reserve(&state.pool, &new_booking).await? {
        Ok(booking) => {
            tracing::info!(
                booking_id = booking.id,
                block_id = booking.block_id,
                resident_id = booking.resident_id,
                amount = booking.amount,
                "Booking created",
            );
            Ok(booking)
        }
        Err(conflict) => {
            tracing::info!(block_id = block.block_id, ?conflict, "Reservation refused");
            Err(match conflict {
                ReservationConflict::BlockUnavailable => BookingError::BlockUnavailable,
                ReservationConflict::DoubleBooking => BookingError::DoubleBooking,
            }
            .into())
        }
    }
}

/// Cancel a booking on behalf of its owner or an administrator of its
/// building. Cancelling an already cancelled booking succeeds without
/// changes.
pub async fn cancel_booking(
    state: &AppState,
    caller: &Principal,
    booking_id: DbId,
    reason: Option<&str>,
) -> AppResult<Booking> {
    let scope = load_scope(state, booking_id).await?;
    if !may_manage(caller, &scope) {
        return Err(BookingError::UnauthorizedCancellation.into());
    }

    let actor = format!("{}:{}", caller.kind.role_name(), caller.account_id);
    let outcome = BookingRepo::cancel(&state.pool, booking_id, &actor, reason)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        })?;

    match outcome {
        CancelOutcome::Cancelled(booking) => {
            tracing::info!(
                booking_id = booking.id,
                block_id = booking.block_id,
                cancelled_by = %actor,
                "Booking cancelled",
            );
            Ok(booking)
        }
        CancelOutcome::AlreadyCancelled(booking) => Ok(booking),
        CancelOutcome::NotCancellable(booking) => Err(CoreError::Conflict(format!(
            "Booking {} can no longer be cancelled",
            booking.id
        ))
        .into()),
    }
}

/// Load a booking for `caller`, who must own it or administer its building.
///
/// Callers without access get the same 404 as for a missing booking.
pub async fn get_booking(
    state: &AppState,
    caller: &Principal,
    booking_id: DbId,
) -> AppResult<Booking> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        })
    };
    let scope = load_scope(state, booking_id).await?;
    if !may_manage(caller, &scope) {
        return Err(not_found());
    }
    BookingRepo::find_by_id(&state.pool, booking_id)
        .await?
        .ok_or_else(not_found)
}

async fn load_scope(state: &AppState, booking_id: DbId) -> AppResult<BookingScope> {
    BookingRepo::find_scope(&state.pool, booking_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        }))
}

/// Owner or administrator of the booking's building.
fn may_manage(caller: &Principal, scope: &BookingScope) -> bool {
    let is_owner = caller.is_resident() && caller.account_id == scope.resident_id;
    is_owner || caller.administers(scope.building_id)
}
