//! Payment gateway client.
//!
//! The webhook body only names a payment; the authoritative status and amount
//! are fetched from the gateway through [`PaymentGateway`]. The HTTP
//! implementation talks to a MercadoPago-style `GET /v1/payments/{id}`.

use guestbay_core::reconciliation::GatewayStatus;
use guestbay_core::types::{Amount, DbId};
use guestbay_db::models::payment::GatewayPayment;

/// Errors from the gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("Gateway returned status {0}")]
    Status(u16),

    #[error("Payment {0} not found at gateway")]
    NotFound(String),

    /// The payment document lacks a field the reconciler needs.
    #[error("Malformed gateway payment: {0}")]
    Malformed(String),
}

/// Source of authoritative payment documents.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetch the raw payment document for `external_id`.
    async fn fetch_payment(&self, external_id: &str) -> Result<serde_json::Value, GatewayError>;
}

/// REST client for the payment gateway.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    pub fn with_client(client: reqwest::Client, base_url: String, token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            token,
        }
    }

    fn payment_url(&self, external_id: &str) -> String {
        format!(
            "{}/v1/payments/{}",
            self.base_url.trim_end_matches('/'),
            external_id
        )
    }
}

#[async_trait::async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn fetch_payment(&self, external_id: &str) -> Result<serde_json::Value, GatewayError> {
        let mut request = self.client.get(self.payment_url(external_id));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(external_id.to_string()));
        }
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

/// Turn a gateway payment document into a [`GatewayPayment`].
///
/// Reads `id`, `status`, `external_reference` (our booking id) and
/// `transaction_amount`. `fallback_id` is used when the document has no id.
pub fn parse_payment(
    raw: serde_json::Value,
    fallback_id: &str,
) -> Result<GatewayPayment, GatewayError> {
    let external_payment_id = match raw.get("id") {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ if !fallback_id.trim().is_empty() => fallback_id.trim().to_string(),
        _ => return Err(GatewayError::Malformed("missing payment id".into())),
    };

    let raw_status = raw
        .get("status")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GatewayError::Malformed("missing status".into()))?;

    let booking_id = raw.get("external_reference").and_then(parse_reference);

    let amount = match raw.get("transaction_amount") {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => Some(
            parse_amount(value)
                .ok_or_else(|| GatewayError::Malformed("invalid transaction_amount".into()))?,
        ),
    };

    Ok(GatewayPayment {
        external_payment_id,
        status: GatewayStatus::parse(&raw_status),
        raw_status,
        booking_id,
        amount,
        raw_response: raw,
    })
}

fn parse_reference(value: &serde_json::Value) -> Option<DbId> {
    let id = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}

/// Amounts are whole currency units; a fractional amount is rejected.
fn parse_amount(value: &serde_json::Value) -> Option<Amount> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as Amount)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_a_complete_payment() {
        let raw = json!({
            "id": 991,
            "status": "approved",
            "external_reference": "42",
            "transaction_amount": 5000.0,
        });
        let payment = parse_payment(raw.clone(), "ignored").unwrap();
        assert_eq!(payment.external_payment_id, "991");
        assert_eq!(payment.status, GatewayStatus::Approved);
        assert_eq!(payment.raw_status, "approved");
        assert_eq!(payment.booking_id, Some(42));
        assert_eq!(payment.amount, Some(5000));
        assert_eq!(payment.raw_response, raw);
    }

    #[test]
    fn falls_back_to_the_notified_id() {
        let payment = parse_payment(json!({ "status": "rejected" }), "pay-7").unwrap();
        assert_eq!(payment.external_payment_id, "pay-7");
        assert_eq!(payment.status, GatewayStatus::Rejected);
        assert_eq!(payment.booking_id, None);
        assert_eq!(payment.amount, None);
    }

    #[test]
    fn missing_status_is_malformed() {
        let err = parse_payment(json!({ "id": "p" }), "p").unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
    }

    #[test]
    fn fractional_amount_is_malformed() {
        let raw = json!({ "id": "p", "status": "approved", "transaction_amount": 10.5 });
        assert!(matches!(
            parse_payment(raw, "p").unwrap_err(),
            GatewayError::Malformed(_)
        ));
    }

    #[test]
    fn non_numeric_reference_has_no_booking() {
        let raw = json!({ "id": "p", "status": "approved", "external_reference": "abc" });
        assert_eq!(parse_payment(raw, "p").unwrap().booking_id, None);
    }

    #[test]
    fn payment_url_joins_without_double_slash() {
        let gateway = HttpPaymentGateway::new("https://gw.example/".into(), None);
        assert_eq!(
            gateway.payment_url("123"),
            "https://gw.example/v1/payments/123"
        );
    }
}
