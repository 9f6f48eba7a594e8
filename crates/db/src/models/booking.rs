//! Booking models and DTOs.

use guestbay_core::types::{Amount, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub block_id: DbId,
    pub spot_id: DbId,
    pub resident_id: DbId,
    pub vehicle_plate: String,
    pub visitor_name: String,
    pub visitor_phone: Option<String>,
    pub amount: Amount,
    pub platform_commission: Amount,
    pub owner_amount: Amount,
    pub status_id: StatusId,
    pub payment_status_id: StatusId,
    pub confirmation_code: String,
    pub cancellation_reason: Option<String>,
    pub cancelled_by: Option<String>,
    pub cancelled_at: Option<Timestamp>,
    pub confirmed_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the reservation transaction. The amount and its split are taken
/// from the block price as claimed inside the transaction.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub block_id: DbId,
    pub resident_id: DbId,
    pub vehicle_plate: String,
    pub visitor_name: String,
    pub visitor_phone: Option<String>,
    pub platform_rate_bps: i32,
    pub confirmation_code: String,
}

/// Who owns a booking and where, for cancellation authorization.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct BookingScope {
    pub booking_id: DbId,
    pub resident_id: DbId,
    pub building_id: DbId,
}

/// Why a reservation attempt was refused inside the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationConflict {
    /// The block was not `available` when the guarded update ran.
    BlockUnavailable,
    /// Another active booking overlaps the block on the same spot.
    DoubleBooking,
}

/// Outcome of a cancellation request that passed authorization.
#[derive(Debug, Clone)]
pub enum CancelOutcome {
    Cancelled(Booking),
    /// The booking was already cancelled; nothing changed.
    AlreadyCancelled(Booking),
    /// The booking is completed or a no-show and cannot be cancelled.
    NotCancellable(Booking),
}

/// Query parameters for `GET /api/v1/bookings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListQuery {
    pub status_id: Option<StatusId>,
    /// Admins only: restrict to one building.
    pub building_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
