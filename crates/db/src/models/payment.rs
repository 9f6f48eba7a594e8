//! Payment gateway event models.

use guestbay_core::reconciliation::GatewayStatus;
use guestbay_core::types::{Amount, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `payment_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentEvent {
    pub id: DbId,
    pub booking_id: Option<DbId>,
    pub external_payment_id: String,
    pub gateway_status: String,
    pub source: String,
    pub request_id: Option<String>,
    pub amount: Option<Amount>,
    pub outcome: String,
    pub detail: Option<String>,
    pub raw_response: serde_json::Value,
    pub received_at: Timestamp,
}

/// What the reconciler decided for one gateway event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// A booking / payment transition was written.
    Applied,
    /// Recorded but refused: the booking state contradicts the event.
    Conflict,
    /// Recorded; no transition needed (already applied or non-final status).
    Ignored,
}

impl EventOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Conflict => "conflict",
            Self::Ignored => "ignored",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "applied" => Some(Self::Applied),
            "conflict" => Some(Self::Conflict),
            "ignored" => Some(Self::Ignored),
            _ => None,
        }
    }
}

/// A verified gateway payment, ready to reconcile.
#[derive(Debug, Clone)]
pub struct GatewayPayment {
    pub external_payment_id: String,
    /// Raw status string as the gateway reported it (stored for audit and
    /// used for duplicate detection).
    pub raw_status: String,
    pub status: GatewayStatus,
    /// Our booking id, taken from the payment's external reference.
    pub booking_id: Option<DbId>,
    pub amount: Option<Amount>,
    pub raw_response: serde_json::Value,
}

/// Audit context of the callback that delivered a payment.
#[derive(Debug, Clone)]
pub struct EventSource {
    /// `payment` or `simulator`.
    pub kind: &'static str,
    pub request_id: Option<String>,
}

/// Result of applying one gateway event.
#[derive(Debug, Clone)]
pub struct ReconcileResult {
    pub outcome: EventOutcome,
    /// True when the same event had already been processed.
    pub duplicate: bool,
    pub booking_id: Option<DbId>,
    pub detail: Option<String>,
}
