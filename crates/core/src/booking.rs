//! Booking lifecycle errors and state machine.
//!
//! Status IDs mirror the `booking_statuses` seed data
//! (1-based SMALLSERIAL). They are duplicated from the `db` crate's status
//! enums because `core` has no internal deps.

/// How long a pending booking may wait for payment before the expiry sweeper
/// reclaims it.
pub const PAYMENT_WINDOW_MINUTES: i64 = 15;

/// Reservation-lifecycle failures surfaced to callers with a stable code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("Resident account not found or inactive")]
    ResidentNotFound,

    #[error("Booking blocked: {}", reasons.join(", "))]
    Blocked { reasons: Vec<String> },

    #[error("The selected block is no longer available")]
    BlockUnavailable,

    #[error("The spot already has an active booking for an overlapping period")]
    DoubleBooking,

    #[error("Cannot book a block that has already started")]
    PastTime,

    #[error("The block belongs to a different building")]
    BuildingMismatch,

    #[error("Only the booking owner or an administrator can cancel this booking")]
    UnauthorizedCancellation,

    #[error("Payment cannot be applied: {0}")]
    ReconciliationConflict(String),
}

impl BookingError {
    /// Machine-readable error code returned to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ResidentNotFound => "RESIDENT_NOT_FOUND",
            Self::Blocked { .. } => "BOOKING_BLOCKED",
            Self::BlockUnavailable => "BLOCK_UNAVAILABLE",
            Self::DoubleBooking => "DOUBLE_BOOKING_DETECTED",
            Self::PastTime => "PAST_TIME",
            Self::BuildingMismatch => "BUILDING_MISMATCH",
            Self::UnauthorizedCancellation => "UNAUTHORIZED_CANCELLATION",
            Self::ReconciliationConflict(_) => "RECONCILIATION_CONFLICT",
        }
    }
}

/// Booking status transitions.
pub mod state_machine {
    pub const PENDING: i16 = 1;
    pub const CONFIRMED: i16 = 2;
    pub const CANCELLED: i16 = 3;
    pub const COMPLETED: i16 = 4;
    pub const NO_SHOW: i16 = 5;

    /// Returns the set of valid target status IDs reachable from `from_status`.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // Pending -> Confirmed (payment), Cancelled (user, admin, expiry)
            PENDING => &[CONFIRMED, CANCELLED],
            // Confirmed -> Cancelled, Completed (sweeper), NoShow
            CONFIRMED => &[CANCELLED, COMPLETED, NO_SHOW],
            CANCELLED | COMPLETED | NO_SHOW => &[],
            _ => &[],
        }
    }

    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }
}
