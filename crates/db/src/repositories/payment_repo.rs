//! Repository for `payment_events` and the booking payment transitions.

use guestbay_core::reconciliation::{decide, BookingState, Decision};
use guestbay_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use super::booking_repo::COLUMNS as BOOKING_COLUMNS;
use crate::models::booking::Booking;
use crate::models::payment::{
    EventOutcome, EventSource, GatewayPayment, PaymentEvent, ReconcileResult,
};
use crate::models::status::{BookingStatus, PaymentStatus};

const COLUMNS: &str = "\
    id, booking_id, external_payment_id, gateway_status, source, request_id, \
    amount, outcome, detail, raw_response, received_at";

pub struct PaymentRepo;

impl PaymentRepo {
    /// Apply one verified gateway event.
    ///
    /// The booking row is locked first, so deliveries for the same booking
    /// serialize here. An event already recorded for the same
    /// `(external_payment_id, gateway_status)` is not applied again; its
    /// stored outcome is returned with `duplicate = true`.
    pub async fn reconcile(
        pool: &PgPool,
        payment: &GatewayPayment,
        source: &EventSource,
    ) -> Result<ReconcileResult, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let booking = match payment.booking_id {
            Some(id) => lock_booking(&mut tx, id).await?,
            None => None,
        };

        if let Some(previous) =
            find_event_locked(&mut tx, &payment.external_payment_id, &payment.raw_status).await?
        {
            tx.rollback().await?;
            return Ok(replayed(previous));
        }

        let (outcome, detail) = match &booking {
            None => (EventOutcome::Ignored, Some("unknown booking reference".to_string())),
            Some(booking) => {
                let state = BookingState {
                    status_id: booking.status_id,
                    payment_status_id: booking.payment_status_id,
                    amount: booking.amount,
                };
                let decision = decide(state, payment.status, payment.amount);
                apply_decision(&mut tx, booking.id, decision).await?
            }
        };

        let inserted: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO payment_events \
                (booking_id, external_payment_id, gateway_status, source, request_id, \
                 amount, outcome, detail, raw_response) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT ON CONSTRAINT uq_payment_events_payment_status DO NOTHING \
             RETURNING id",
        )
        .bind(booking.as_ref().map(|b| b.id))
        .bind(&payment.external_payment_id)
        .bind(&payment.raw_status)
        .bind(source.kind)
        .bind(&source.request_id)
        .bind(payment.amount)
        .bind(outcome.as_str())
        .bind(&detail)
        .bind(&payment.raw_response)
        .fetch_optional(&mut *tx)
        .await?;

        if inserted.is_none() {
            // A concurrent delivery without a booking lock recorded the same
            // event first. Undo our writes and report theirs.
            tx.rollback().await?;
            let previous =
                Self::find_event(pool, &payment.external_payment_id, &payment.raw_status)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
            return Ok(replayed(previous));
        }

        tx.commit().await?;

        if outcome == EventOutcome::Conflict {
            tracing::warn!(
                external_payment_id = %payment.external_payment_id,
                booking_id = ?payment.booking_id,
                detail = ?detail,
                "Payment event conflicts with booking state",
            );
        }

        Ok(ReconcileResult {
            outcome,
            duplicate: false,
            booking_id: booking.map(|b| b.id),
            detail,
        })
    }

    pub async fn find_event(
        pool: &PgPool,
        external_payment_id: &str,
        gateway_status: &str,
    ) -> Result<Option<PaymentEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_events \
             WHERE external_payment_id = $1 AND gateway_status = $2"
        );
        sqlx::query_as::<_, PaymentEvent>(&query)
            .bind(external_payment_id)
            .bind(gateway_status)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Vec<PaymentEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_events WHERE booking_id = $1 ORDER BY received_at, id"
        );
        sqlx::query_as::<_, PaymentEvent>(&query)
            .bind(booking_id)
            .fetch_all(pool)
            .await
    }

    /// Recorded conflicts, newest first.
    pub async fn list_conflicts(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PaymentEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_events WHERE outcome = $1 \
             ORDER BY received_at DESC, id DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, PaymentEvent>(&query)
            .bind(EventOutcome::Conflict.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

async fn lock_booking(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: DbId,
) -> Result<Option<Booking>, sqlx::Error> {
    let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Booking>(&query)
        .bind(booking_id)
        .fetch_optional(&mut **tx)
        .await
}

async fn find_event_locked(
    tx: &mut Transaction<'_, Postgres>,
    external_payment_id: &str,
    gateway_status: &str,
) -> Result<Option<PaymentEvent>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM payment_events \
         WHERE external_payment_id = $1 AND gateway_status = $2"
    );
    sqlx::query_as::<_, PaymentEvent>(&query)
        .bind(external_payment_id)
        .bind(gateway_status)
        .fetch_optional(&mut **tx)
        .await
}

/// Write the decided transition with a status-guarded update.
async fn apply_decision(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: DbId,
    decision: Decision,
) -> Result<(EventOutcome, Option<String>), sqlx::Error> {
    let rows = match decision {
        Decision::Confirm => sqlx::query(
            "UPDATE bookings SET status_id = $2, payment_status_id = $3, confirmed_at = NOW() \
             WHERE id = $1 AND status_id = $4 AND payment_status_id <> $3",
        )
        .bind(booking_id)
        .bind(BookingStatus::Confirmed.id())
        .bind(PaymentStatus::Paid.id())
        .bind(BookingStatus::Pending.id())
        .execute(&mut **tx)
        .await?
        .rows_affected(),
        Decision::MarkFailed => sqlx::query(
            "UPDATE bookings SET payment_status_id = $2 WHERE id = $1 AND payment_status_id = $3",
        )
        .bind(booking_id)
        .bind(PaymentStatus::Failed.id())
        .bind(PaymentStatus::Pending.id())
        .execute(&mut **tx)
        .await?
        .rows_affected(),
        Decision::MarkRefunded => sqlx::query(
            "UPDATE bookings SET payment_status_id = $2 WHERE id = $1 AND payment_status_id = $3",
        )
        .bind(booking_id)
        .bind(PaymentStatus::Refunded.id())
        .bind(PaymentStatus::Paid.id())
        .execute(&mut **tx)
        .await?
        .rows_affected(),
        Decision::NoOp(why) => return Ok((EventOutcome::Ignored, Some(why.to_string()))),
        Decision::Conflict(why) => return Ok((EventOutcome::Conflict, Some(why))),
    };

    if rows == 1 {
        Ok((EventOutcome::Applied, None))
    } else {
        Ok((EventOutcome::Ignored, Some("booking changed before the update".to_string())))
    }
}

fn replayed(previous: PaymentEvent) -> ReconcileResult {
    ReconcileResult {
        outcome: EventOutcome::parse(&previous.outcome).unwrap_or(EventOutcome::Ignored),
        duplicate: true,
        booking_id: previous.booking_id,
        detail: previous.detail,
    }
}
