mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::{hours_from_now, reserve, seed, seed_block};
use guestbay_core::reconciliation::GatewayStatus;
use guestbay_core::sweeps::{EXPIRY_REASON, SYSTEM_ACTOR};
use guestbay_db::models::booking::CancelOutcome;
use guestbay_db::models::payment::{EventOutcome, EventSource, GatewayPayment, ReconcileResult};
use guestbay_db::models::status::{BlockStatus, BookingStatus, PaymentStatus};
use guestbay_db::repositories::{BlockRepo, BookingRepo, PaymentRepo};
use serde_json::json;
use sqlx::PgPool;

fn payment(external_id: &str, status: &str, booking_id: i64, amount: i64) -> GatewayPayment {
    GatewayPayment {
        external_payment_id: external_id.into(),
        raw_status: status.into(),
        status: GatewayStatus::parse(status),
        booking_id: Some(booking_id),
        amount: Some(amount),
        raw_response: json!({ "id": external_id, "status": status }),
    }
}

fn source() -> EventSource {
    EventSource {
        kind: "payment",
        request_id: Some("req-1".into()),
    }
}

async fn apply(pool: &PgPool, event: GatewayPayment) -> ReconcileResult {
    PaymentRepo::reconcile(pool, &event, &source()).await.unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approved_payment_confirms_booking(pool: PgPool) {
    let fx = seed(&pool).await;
    let block = seed_block(&pool, fx.spot.id, hours_from_now(24), 120, 5_000).await;
    let booking = reserve(&pool, block.id, fx.resident.id).await;

    let result = apply(&pool, payment("pay-1", "approved", booking.id, 5_000)).await;

    assert_eq!(result.outcome, EventOutcome::Applied);
    assert!(!result.duplicate);
    assert_eq!(result.booking_id, Some(booking.id));

    let updated = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(updated.status_id, BookingStatus::Confirmed.id());
    assert_eq!(updated.payment_status_id, PaymentStatus::Paid.id());
    assert!(updated.confirmed_at.is_some());

    let events = PaymentRepo::list_for_booking(&pool, booking.id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].raw_response["id"], "pay-1");
    assert_eq!(events[0].request_id.as_deref(), Some("req-1"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn redelivered_event_is_recognized_as_duplicate(pool: PgPool) {
    let fx = seed(&pool).await;
    let block = seed_block(&pool, fx.spot.id, hours_from_now(24), 120, 5_000).await;
    let booking = reserve(&pool, block.id, fx.resident.id).await;
    let event = payment("pay-1", "approved", booking.id, 5_000);

    PaymentRepo::reconcile(&pool, &event, &source()).await.unwrap();
    let again = PaymentRepo::reconcile(&pool, &event, &source()).await.unwrap();

    assert!(again.duplicate);
    assert_eq!(again.outcome, EventOutcome::Applied);
    assert_eq!(PaymentRepo::list_for_booking(&pool, booking.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_deliveries_apply_once(pool: PgPool) {
    let fx = seed(&pool).await;
    let block = seed_block(&pool, fx.spot.id, hours_from_now(24), 120, 5_000).await;
    let booking = reserve(&pool, block.id, fx.resident.id).await;
    let event = payment("pay-1", "approved", booking.id, 5_000);

    let deliveries = (0..4).map(|_| {
        let pool = pool.clone();
        let event = event.clone();
        async move { PaymentRepo::reconcile(&pool, &event, &source()).await }
    });
    let results = futures::future::join_all(deliveries).await;

    let fresh = results.iter().filter(|r| matches!(r, Ok(r) if !r.duplicate)).count();
    assert_eq!(fresh, 1);
    assert_eq!(PaymentRepo::list_for_booking(&pool, booking.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_after_cancellation_is_a_conflict(pool: PgPool) {
    let fx = seed(&pool).await;
    let block = seed_block(&pool, fx.spot.id, hours_from_now(24), 120, 5_000).await;
    let booking = reserve(&pool, block.id, fx.resident.id).await;
    let outcome = BookingRepo::cancel(&pool, booking.id, "system", None)
        .await
        .unwrap()
        .unwrap();
    assert_matches!(outcome, CancelOutcome::Cancelled(_));

    let result = apply(&pool, payment("pay-1", "approved", booking.id, 5_000)).await;

    assert_eq!(result.outcome, EventOutcome::Conflict);
    let still = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(still.status_id, BookingStatus::Cancelled.id());
    assert_eq!(still.payment_status_id, PaymentStatus::Pending.id());

    let conflicts = PaymentRepo::list_conflicts(&pool, 50, 0).await.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].booking_id, Some(booking.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn amount_mismatch_is_a_conflict(pool: PgPool) {
    let fx = seed(&pool).await;
    let block = seed_block(&pool, fx.spot.id, hours_from_now(24), 120, 5_000).await;
    let booking = reserve(&pool, block.id, fx.resident.id).await;

    let result = apply(&pool, payment("pay-1", "approved", booking.id, 100)).await;

    assert_eq!(result.outcome, EventOutcome::Conflict);
    let still = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(still.status_id, BookingStatus::Pending.id());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejection_then_approval_confirms(pool: PgPool) {
    let fx = seed(&pool).await;
    let block = seed_block(&pool, fx.spot.id, hours_from_now(24), 120, 5_000).await;
    let booking = reserve(&pool, block.id, fx.resident.id).await;

    let rejected = apply(&pool, payment("pay-1", "rejected", booking.id, 5_000)).await;
    assert_eq!(rejected.outcome, EventOutcome::Applied);
    let failed = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(failed.status_id, BookingStatus::Pending.id());
    assert_eq!(failed.payment_status_id, PaymentStatus::Failed.id());

    let approved = apply(&pool, payment("pay-2", "approved", booking.id, 5_000)).await;
    assert_eq!(approved.outcome, EventOutcome::Applied);
    let paid = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(paid.status_id, BookingStatus::Confirmed.id());
    assert_eq!(paid.payment_status_id, PaymentStatus::Paid.id());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_booking_is_recorded_and_ignored(pool: PgPool) {
    let mut event = payment("pay-404", "approved", 0, 5_000);
    event.booking_id = None;

    let result = PaymentRepo::reconcile(&pool, &event, &source()).await.unwrap();

    assert_eq!(result.outcome, EventOutcome::Ignored);
    assert_eq!(result.booking_id, None);
    let stored = PaymentRepo::find_event(&pool, "pay-404", "approved")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.outcome, "ignored");
}

// ---------------------------------------------------------------------------
// Confirmation racing the expiry sweep
// ---------------------------------------------------------------------------

async fn block_status(pool: &PgPool, block_id: i64) -> BlockStatus {
    let block = BlockRepo::find_by_id(pool, block_id).await.unwrap().unwrap();
    BlockStatus::from_id(block.status_id).unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_skips_a_booking_being_confirmed(pool: PgPool) {
    let fx = seed(&pool).await;
    let block = seed_block(&pool, fx.spot.id, hours_from_now(24), 120, 5_000).await;
    let booking = reserve(&pool, block.id, fx.resident.id).await;
    let cutoff = Utc::now() + Duration::minutes(1);

    let mut tx = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM bookings WHERE id = $1 FOR UPDATE")
        .bind(booking.id)
        .execute(&mut *tx)
        .await
        .unwrap();

    let released = BookingRepo::expire_stale(&pool, cutoff, EXPIRY_REASON, SYSTEM_ACTOR)
        .await
        .unwrap();
    assert!(released.is_empty());

    sqlx::query(
        "UPDATE bookings SET status_id = $2, payment_status_id = $3, confirmed_at = NOW() \
         WHERE id = $1",
    )
    .bind(booking.id)
    .bind(BookingStatus::Confirmed.id())
    .bind(PaymentStatus::Paid.id())
    .execute(&mut *tx)
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let released = BookingRepo::expire_stale(&pool, cutoff, EXPIRY_REASON, SYSTEM_ACTOR)
        .await
        .unwrap();
    assert!(released.is_empty());

    let booking = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(booking.status_id, BookingStatus::Confirmed.id());
    assert_eq!(booking.payment_status_id, PaymentStatus::Paid.id());
    assert_eq!(block_status(&pool, block.id).await, BlockStatus::Reserved);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_after_expiry_is_a_conflict(pool: PgPool) {
    let fx = seed(&pool).await;
    let block = seed_block(&pool, fx.spot.id, hours_from_now(24), 120, 5_000).await;
    let booking = reserve(&pool, block.id, fx.resident.id).await;

    let released = BookingRepo::expire_stale(
        &pool,
        Utc::now() + Duration::minutes(1),
        EXPIRY_REASON,
        SYSTEM_ACTOR,
    )
    .await
    .unwrap();
    assert_eq!(released.len(), 1);

    let result = apply(&pool, payment("pay-late", "approved", booking.id, 5_000)).await;
    assert_eq!(result.outcome, EventOutcome::Conflict);
    assert!(!result.duplicate);

    let booking = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(booking.status_id, BookingStatus::Cancelled.id());
    assert_eq!(booking.cancelled_by.as_deref(), Some(SYSTEM_ACTOR));
    assert_ne!(booking.payment_status_id, PaymentStatus::Paid.id());
    assert_eq!(block_status(&pool, block.id).await, BlockStatus::Available);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_approval_and_expiry_have_one_winner(pool: PgPool) {
    let fx = seed(&pool).await;
    let block = seed_block(&pool, fx.spot.id, hours_from_now(24), 120, 5_000).await;
    let booking = reserve(&pool, block.id, fx.resident.id).await;
    let event = payment("pay-race", "approved", booking.id, 5_000);
    let src = source();

    let (released, result) = tokio::join!(
        BookingRepo::expire_stale(
            &pool,
            Utc::now() + Duration::minutes(1),
            EXPIRY_REASON,
            SYSTEM_ACTOR,
        ),
        PaymentRepo::reconcile(&pool, &event, &src),
    );
    let released = released.unwrap();
    let result = result.unwrap();

    let booking = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    if released.is_empty() {
        assert_eq!(result.outcome, EventOutcome::Applied);
        assert_eq!(booking.status_id, BookingStatus::Confirmed.id());
        assert_eq!(block_status(&pool, block.id).await, BlockStatus::Reserved);
    } else {
        assert_eq!(result.outcome, EventOutcome::Conflict);
        assert_eq!(booking.status_id, BookingStatus::Cancelled.id());
        assert_eq!(block_status(&pool, block.id).await, BlockStatus::Available);
    }
}
