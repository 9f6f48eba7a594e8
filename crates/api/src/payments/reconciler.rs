//! Payment webhook reconciliation.
//!
//! A callback is verified against its `x-signature` before anything else is
//! read. `payment` events are resolved against the gateway; `simulator`
//! events carry the payment document inline and are only accepted outside
//! production with the simulator enabled. The verified payment is then
//! applied by [`PaymentRepo::reconcile`].

use guestbay_core::booking::BookingError;
use guestbay_core::error::CoreError;
use guestbay_core::types::DbId;
use guestbay_core::webhook_signature::Verification;
use guestbay_db::models::payment::{EventOutcome, EventSource, ReconcileResult};
use guestbay_db::repositories::PaymentRepo;
use serde::{Deserialize, Serialize};

use super::gateway::parse_payment;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "x-signature";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Webhook body: `{ "type": "payment" | "simulator", "data": { "id": ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Signature material taken from the request headers.
#[derive(Debug, Clone, Default)]
pub struct WebhookHeaders {
    pub signature: Option<String>,
    pub request_id: Option<String>,
}

/// Response body for an accepted callback.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub outcome: EventOutcome,
    pub duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<DbId>,
}

impl From<ReconcileResult> for WebhookResponse {
    fn from(result: ReconcileResult) -> Self {
        Self {
            success: true,
            outcome: result.outcome,
            duplicate: result.duplicate,
            booking_id: result.booking_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Payment,
    Simulator,
}

impl EventKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "payment" => Some(Self::Payment),
            "simulator" => Some(Self::Simulator),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Simulator => "simulator",
        }
    }
}

/// The notified payment id, `data.id`, as a string or a number.
fn external_id(data: &serde_json::Value) -> Option<String> {
    match data.get("id")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Verify, resolve and apply one gateway callback.
///
/// The raw body is read leniently only to find `data.id` for the signature
/// check; nothing about the payload is reported before the digest verifies.
/// A first-time conflict between the event and the booking state is recorded
/// and reported as `RECONCILIATION_CONFLICT`. Redeliveries of any recorded
/// event succeed with `duplicate: true`.
pub async fn handle_webhook(
    state: &AppState,
    headers: &WebhookHeaders,
    body: &[u8],
) -> AppResult<WebhookResponse> {
    let document: serde_json::Value =
        serde_json::from_slice(body).unwrap_or(serde_json::Value::Null);
    let external_id = external_id(&document["data"]);

    let verification = state.verifier.verify(
        external_id.as_deref(),
        headers.signature.as_deref(),
        headers.request_id.as_deref(),
    )?;

    let external_id =
        external_id.ok_or_else(|| AppError::BadRequest("data.id is required".into()))?;
    if verification == Verification::Skipped {
        tracing::warn!(%external_id, "Accepting unsigned payment callback");
    }
    let envelope: WebhookEnvelope = serde_json::from_value(document)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook body: {e}")))?;

    let Some(kind) = EventKind::parse(&envelope.kind) else {
        tracing::debug!(kind = %envelope.kind, %external_id, "Ignoring webhook event type");
        return Ok(WebhookResponse {
            success: true,
            outcome: EventOutcome::Ignored,
            duplicate: false,
            booking_id: None,
        });
    };

    let raw = match kind {
        EventKind::Payment => state.gateway.fetch_payment(&external_id).await?,
        EventKind::Simulator => {
            if !state.config.simulator_allowed() {
                return Err(CoreError::Forbidden("Simulator events are disabled".into()).into());
            }
            envelope.data
        }
    };
    let payment = parse_payment(raw, &external_id)?;

    let source = EventSource {
        kind: kind.as_str(),
        request_id: headers.request_id.clone(),
    };
    let result = PaymentRepo::reconcile(&state.pool, &payment, &source).await?;

    tracing::info!(
        external_payment_id = %payment.external_payment_id,
        gateway_status = %payment.raw_status,
        booking_id = ?result.booking_id,
        outcome = result.outcome.as_str(),
        duplicate = result.duplicate,
        "Payment event reconciled",
    );

    if result.outcome == EventOutcome::Conflict && !result.duplicate {
        let detail = result
            .detail
            .unwrap_or_else(|| "payment contradicts booking state".to_string());
        return Err(BookingError::ReconciliationConflict(detail).into());
    }

    Ok(result.into())
}
