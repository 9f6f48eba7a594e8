//! Booking request validation.
//!
//! Three stateless checks run before the reservation transaction opens:
//! payload shape ([`parse_create_request`]), denylist verdict
//! ([`denylist_verdict`], fed by a read-only query) and temporal / building
//! rules ([`check_business_rules`]).

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::account::Principal;
use crate::booking::BookingError;
use crate::error::CoreError;
use crate::hashing::{blind_index, IndexedField};
use crate::types::{DbId, Timestamp};

static PLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 -]*$").expect("valid plate regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("valid phone regex"));

/// Booking request body as received from the client.
///
/// `block_id` is left untyped so a malformed id is reported as a validation
/// error rather than a body deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingInput {
    pub block_id: serde_json::Value,
    pub vehicle_plate: String,
    pub visitor_name: String,
    pub visitor_phone: Option<String>,
}

/// A structurally valid booking request.
///
/// The plate is checked as the client typed it (trimmed) and normalized
/// afterwards, so separators count towards its length.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub block_id: DbId,
    #[validate(
        length(min = 5, max = 12, message = "must be 5 to 12 characters"),
        regex(path = *PLATE_RE, message = "may only contain letters, digits and separators")
    )]
    pub vehicle_plate: String,
    #[validate(length(min = 3, max = 100, message = "must be 3 to 100 characters"))]
    pub visitor_name: String,
    #[validate(regex(path = *PHONE_RE, message = "must be 8 to 15 digits"))]
    pub visitor_phone: Option<String>,
}

/// Normalize a plate for storage and matching: uppercase, dashes and spaces
/// removed.
pub fn normalize_plate(plate: &str) -> String {
    plate
        .trim()
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn parse_block_id(raw: &serde_json::Value) -> Result<DbId, CoreError> {
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<DbId>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| CoreError::Validation("block_id: must be a positive id".into()))
}

/// Check payload shape and normalize it.
pub fn parse_create_request(input: CreateBookingInput) -> Result<CreateBookingRequest, CoreError> {
    let mut request = CreateBookingRequest {
        block_id: parse_block_id(&input.block_id)?,
        vehicle_plate: input.vehicle_plate.trim().to_string(),
        visitor_name: input.visitor_name.trim().to_string(),
        visitor_phone: input
            .visitor_phone
            .map(|p| p.chars().filter(|c| !c.is_whitespace()).collect::<String>())
            .filter(|p| !p.is_empty()),
    };
    request
        .validate()
        .map_err(|e| CoreError::Validation(format_validation_errors(&e)))?;
    request.vehicle_plate = normalize_plate(&request.vehicle_plate);
    Ok(request)
}

/// Render `ValidationErrors` as `field: message; field: message`, sorted by
/// field name so the output is stable.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {message}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Reject bookings for blocks that already started or that sit in another
/// building than the principal's scope.
pub fn check_business_rules(
    principal: &Principal,
    block_building_id: DbId,
    start_time: Timestamp,
    now: Timestamp,
) -> Result<(), BookingError> {
    if start_time <= now {
        return Err(BookingError::PastTime);
    }
    if let Some(scope) = principal.building_scope() {
        if scope != block_building_id {
            return Err(BookingError::BuildingMismatch);
        }
    }
    Ok(())
}

/// Identity fields of a resident as stored (already blind-indexed).
#[derive(Debug, Clone, Default)]
pub struct IdentityIndexes {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
}

/// Build the `(field, index)` pairs to look up in the denylist for one
/// booking attempt.
pub fn denylist_probes(
    key: &[u8],
    identity: &IdentityIndexes,
    plate: &str,
) -> Vec<(IndexedField, String)> {
    let mut probes = vec![(IndexedField::Plate, blind_index(key, IndexedField::Plate, plate))];
    let stored = [
        (IndexedField::Email, &identity.email),
        (IndexedField::Phone, &identity.phone),
        (IndexedField::Document, &identity.document),
    ];
    for (field, index) in stored {
        if let Some(index) = index {
            probes.push((field, index.clone()));
        }
    }
    probes
}

/// Turn the reasons of every matched denylist entry into a verdict.
///
/// Duplicate reasons are collapsed and the rest sorted.
pub fn denylist_verdict<I>(matched_reasons: I) -> Result<(), BookingError>
where
    I: IntoIterator<Item = String>,
{
    let reasons: BTreeSet<String> = matched_reasons.into_iter().collect();
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(BookingError::Blocked {
            reasons: reasons.into_iter().collect(),
        })
    }
}
