//! Payment gateway callback signature verification.
//!
//! The gateway sends `x-signature: ts=<unix-ms>;v1=<hex-hmac>` together with
//! `x-request-id`. The signed manifest is
//! `id:<external-id>;request-id:<request-id>;ts:<ts>;` and the digest is
//! HMAC-SHA256 under the shared webhook secret.
//!
//! Verification fails closed. The only way to accept an unsigned callback is a
//! verifier built without a secret, with unsigned callbacks explicitly allowed,
//! outside production, and for a request that carries no signature at all.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Missing signature header or request id")]
    Missing,

    #[error("Malformed signature header")]
    Malformed,

    #[error("Signature does not match")]
    Mismatch,

    #[error("Webhook secret is not configured")]
    NotConfigured,
}

/// Parsed `x-signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub ts: String,
    pub v1: String,
}

/// Parse `ts=<ts>;v1=<hex>`. Parts may also be separated by commas and may
/// appear in any order; unknown parts are ignored.
pub fn parse_signature_header(header: &str) -> Result<SignatureHeader, SignatureError> {
    let mut ts = None;
    let mut v1 = None;
    for part in header.split([';', ',']) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        match key.trim() {
            "ts" => ts = Some(value.trim().to_string()),
            "v1" => v1 = Some(value.trim().to_string()),
            _ => {}
        }
    }
    match (ts, v1) {
        (Some(ts), Some(v1))
            if !ts.is_empty() && ts.bytes().all(|b| b.is_ascii_digit()) && !v1.is_empty() =>
        {
            Ok(SignatureHeader { ts, v1 })
        }
        _ => Err(SignatureError::Malformed),
    }
}

/// Canonical string the gateway signs.
pub fn manifest(external_id: &str, request_id: &str, ts: &str) -> String {
    format!("id:{external_id};request-id:{request_id};ts:{ts};")
}

/// Hex HMAC-SHA256 of `manifest` under `secret`.
pub fn sign(secret: &str, manifest: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(manifest.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Build a complete `x-signature` header value. Used by the simulator tooling
/// and tests.
pub fn signature_header(secret: &str, external_id: &str, request_id: &str, ts: &str) -> String {
    let digest = sign(secret, &manifest(external_id, request_id, ts));
    format!("ts={ts};v1={digest}")
}

/// Verify a parsed header against the expected manifest in constant time.
pub fn verify(
    secret: &str,
    external_id: &str,
    request_id: &str,
    header: &SignatureHeader,
) -> Result<(), SignatureError> {
    let expected = hex::decode(&header.v1).map_err(|_| SignatureError::Mismatch)?;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(manifest(external_id, request_id, &header.ts).as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Result of a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    /// Accepted without a signature (non-production, unsigned allowed).
    Skipped,
}

/// Verification policy for incoming callbacks.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secret: Option<String>,
    allow_unsigned: bool,
}

impl WebhookVerifier {
    /// Build a verifier. `allow_unsigned` is ignored in production.
    pub fn new(secret: Option<String>, allow_unsigned: bool, is_production: bool) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            allow_unsigned: allow_unsigned && !is_production,
        }
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Check one callback. A missing payment id counts as missing signature
    /// material, so an unreadable body is rejected the same way as a bad digest.
    pub fn verify(
        &self,
        external_id: Option<&str>,
        signature: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<Verification, SignatureError> {
        let Some(secret) = self.secret.as_deref() else {
            return if self.allow_unsigned && signature.is_none() {
                Ok(Verification::Skipped)
            } else {
                Err(SignatureError::NotConfigured)
            };
        };
        let (Some(external_id), Some(signature), Some(request_id)) =
            (external_id, signature, request_id)
        else {
            return Err(SignatureError::Missing);
        };
        let header = parse_signature_header(signature)?;
        verify(secret, external_id, request_id, &header)?;
        Ok(Verification::Verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(Some(SECRET.into()), false, true)
    }

    #[test]
    fn manifest_format() {
        assert_eq!(
            manifest("123", "req-1", "1700000000000"),
            "id:123;request-id:req-1;ts:1700000000000;"
        );
    }

    #[test]
    fn parses_semicolon_and_comma_forms() {
        let a = parse_signature_header("ts=1700;v1=abcd").unwrap();
        let b = parse_signature_header("v1=abcd, ts=1700").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.ts, "1700");
    }

    #[test]
    fn rejects_header_without_parts() {
        assert_eq!(parse_signature_header("v1=abcd"), Err(SignatureError::Malformed));
        assert_eq!(parse_signature_header("ts=x1;v1=ab"), Err(SignatureError::Malformed));
        assert_eq!(parse_signature_header(""), Err(SignatureError::Malformed));
    }

    #[test]
    fn correct_digest_is_accepted() {
        let header = signature_header(SECRET, "pay-9", "req-1", "1700000000000");
        assert_eq!(
            verifier().verify(Some("pay-9"), Some(&header), Some("req-1")),
            Ok(Verification::Verified)
        );
    }

    #[test]
    fn uppercase_digest_is_accepted() {
        let digest = sign(SECRET, &manifest("pay-9", "req-1", "17")).to_uppercase();
        let header = format!("ts=17;v1={digest}");
        assert!(verifier().verify(Some("pay-9"), Some(&header), Some("req-1")).is_ok());
    }

    #[test]
    fn tampered_digest_is_rejected() {
        let header = signature_header(SECRET, "pay-9", "req-1", "17");
        let tampered = header.replace("v1=", "v1=00");
        assert!(verifier().verify(Some("pay-9"), Some(&tampered), Some("req-1")).is_err());

        let mut flipped = header.clone();
        let last = flipped.pop().unwrap();
        flipped.push(if last == '0' { '1' } else { '0' });
        assert_eq!(
            verifier().verify(Some("pay-9"), Some(&flipped), Some("req-1")),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn digest_is_bound_to_id_request_and_timestamp() {
        let header = signature_header(SECRET, "pay-9", "req-1", "17");
        let v = verifier();
        assert_eq!(
            v.verify(Some("pay-10"), Some(&header), Some("req-1")),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            v.verify(Some("pay-9"), Some(&header), Some("req-2")),
            Err(SignatureError::Mismatch)
        );
        let other_ts = header.replace("ts=17", "ts=18");
        assert_eq!(
            v.verify(Some("pay-9"), Some(&other_ts), Some("req-1")),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn missing_material_is_rejected() {
        let header = signature_header(SECRET, "pay-9", "req-1", "17");
        let v = verifier();
        assert_eq!(v.verify(Some("pay-9"), None, Some("req-1")), Err(SignatureError::Missing));
        assert_eq!(v.verify(Some("pay-9"), Some(&header), None), Err(SignatureError::Missing));
        assert_eq!(v.verify(None, Some(&header), Some("req-1")), Err(SignatureError::Missing));
    }

    #[test]
    fn unsigned_skip_requires_explicit_opt_in_outside_production() {
        let dev = WebhookVerifier::new(None, true, false);
        assert_eq!(dev.verify(Some("p"), None, None), Ok(Verification::Skipped));

        let dev_not_allowed = WebhookVerifier::new(None, false, false);
        assert_eq!(
            dev_not_allowed.verify(Some("p"), None, None),
            Err(SignatureError::NotConfigured)
        );

        let prod = WebhookVerifier::new(None, true, true);
        assert_eq!(prod.verify(Some("p"), None, None), Err(SignatureError::NotConfigured));
    }

    #[test]
    fn signed_request_without_secret_is_rejected() {
        let dev = WebhookVerifier::new(Some(String::new()), true, false);
        assert!(!dev.has_secret());
        assert_eq!(
            dev.verify(Some("p"), Some("ts=1;v1=ab"), Some("r")),
            Err(SignatureError::NotConfigured)
        );
    }
}
