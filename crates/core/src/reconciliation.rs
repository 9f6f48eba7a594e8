//! Payment reconciliation rules.
//!
//! Decides what a gateway event does to a booking given the booking's current
//! status and payment status. The repository applies the decision with a
//! status-guarded update while holding the booking row lock.

use serde::Serialize;

use crate::booking::state_machine::{CANCELLED, PENDING};
use crate::types::Amount;

/// Payment status IDs matching `payment_statuses` seed data.
pub mod payment_status {
    pub const PENDING: i16 = 1;
    pub const PAID: i16 = 2;
    pub const FAILED: i16 = 3;
    pub const REFUNDED: i16 = 4;
}

/// Normalized gateway payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStatus {
    Approved,
    Rejected,
    Cancelled,
    Refunded,
    /// In process, authorized, pending or anything else we do not act on.
    Other,
}

impl GatewayStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "cancelled" => Self::Cancelled,
            "refunded" | "charged_back" => Self::Refunded,
            _ => Self::Other,
        }
    }
}

/// What to do with the booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// `pending` -> `confirmed`, payment -> `paid`.
    Confirm,
    /// payment `pending` -> `failed`; booking status untouched.
    MarkFailed,
    /// payment `paid` -> `refunded`.
    MarkRefunded,
    /// Nothing to write.
    NoOp(&'static str),
    /// The event contradicts the booking. Recorded and reported.
    Conflict(String),
}

/// Current state of the booking the event refers to.
#[derive(Debug, Clone, Copy)]
pub struct BookingState {
    pub status_id: i16,
    pub payment_status_id: i16,
    pub amount: Amount,
}

pub fn decide(
    booking: BookingState,
    status: GatewayStatus,
    gateway_amount: Option<Amount>,
) -> Decision {
    match status {
        GatewayStatus::Approved => decide_approved(booking, gateway_amount),
        GatewayStatus::Rejected | GatewayStatus::Cancelled => match booking.payment_status_id {
            payment_status::PENDING => Decision::MarkFailed,
            payment_status::FAILED => Decision::NoOp("payment already marked failed"),
            _ => Decision::NoOp("payment already settled"),
        },
        GatewayStatus::Refunded => match booking.payment_status_id {
            payment_status::PAID => Decision::MarkRefunded,
            payment_status::REFUNDED => Decision::NoOp("payment already refunded"),
            _ => Decision::NoOp("refund for an unpaid booking"),
        },
        GatewayStatus::Other => Decision::NoOp("non-final gateway status"),
    }
}

fn decide_approved(booking: BookingState, gateway_amount: Option<Amount>) -> Decision {
    if booking.payment_status_id == payment_status::PAID {
        return Decision::NoOp("payment already applied");
    }
    if booking.status_id == CANCELLED {
        return Decision::Conflict("booking was cancelled before the payment was approved".into());
    }
    if booking.status_id != PENDING {
        return Decision::Conflict("booking is no longer awaiting payment".into());
    }
    if booking.payment_status_id == payment_status::REFUNDED {
        return Decision::Conflict("payment was already refunded".into());
    }
    if let Some(paid) = gateway_amount {
        if paid != booking.amount {
            return Decision::Conflict(format!(
                "paid amount {paid} does not match booking amount {}",
                booking.amount
            ));
        }
    }
    Decision::Confirm
}
