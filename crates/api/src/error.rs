use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use guestbay_core::booking::BookingError;
use guestbay_core::error::CoreError;
use guestbay_core::webhook_signature::SignatureError;
use guestbay_worker::settlement::SettlementError;
use serde_json::json;

use crate::payments::gateway::GatewayError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent `{error, code}` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `guestbay_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Webhook signature verification failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// The payment gateway could not be queried.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError::Core(CoreError::Booking(err))
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Booking(err) => (booking_status(err), err.code(), err.to_string()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Webhook / gateway ---
            AppError::Signature(err) => {
                tracing::warn!(error = %err, "Rejected webhook signature");
                (
                    StatusCode::FORBIDDEN,
                    "INVALID_SIGNATURE",
                    "Invalid webhook signature".to_string(),
                )
            }
            AppError::Gateway(err) => {
                tracing::error!(error = %err, "Payment gateway error");
                (
                    StatusCode::BAD_GATEWAY,
                    "GATEWAY_ERROR",
                    "Payment gateway unavailable".to_string(),
                )
            }

            // --- Settlement ---
            AppError::Settlement(err) => match err {
                SettlementError::PayoutNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Payout with id {id} not found"),
                ),
                SettlementError::NotFinalized(_) => {
                    (StatusCode::CONFLICT, "CONFLICT", err.to_string())
                }
                SettlementError::Database(db) => classify_sqlx_error(db),
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// HTTP status for each booking error code.
pub fn booking_status(err: &BookingError) -> StatusCode {
    match err {
        BookingError::ResidentNotFound => StatusCode::UNAUTHORIZED,
        BookingError::Blocked { .. } => StatusCode::FORBIDDEN,
        BookingError::BlockUnavailable => StatusCode::CONFLICT,
        BookingError::DoubleBooking => StatusCode::CONFLICT,
        BookingError::PastTime => StatusCode::BAD_REQUEST,
        BookingError::BuildingMismatch => StatusCode::FORBIDDEN,
        BookingError::UnauthorizedCancellation => StatusCode::FORBIDDEN,
        BookingError::ReconciliationConflict(_) => StatusCode::CONFLICT,
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some(guestbay_db::UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
