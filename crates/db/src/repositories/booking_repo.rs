//! Repository for the `bookings` table and the block transitions tied to it.

use guestbay_core::booking::state_machine;
use guestbay_core::pricing::split_booking_price;
use guestbay_core::types::{Amount, DbId, Timestamp};
use sqlx::PgPool;

use crate::models::booking::{
    Booking, BookingScope, CancelOutcome, NewBooking, ReservationConflict,
};
use crate::models::status::{BlockStatus, BookingStatus, PaymentStatus, StatusId};
use crate::{is_constraint_violation, EXCLUSION_VIOLATION, UNIQUE_VIOLATION};

pub(crate) const COLUMNS: &str = "\
    id, block_id, spot_id, resident_id, vehicle_plate, visitor_name, visitor_phone, \
    amount, platform_commission, owner_amount, status_id, payment_status_id, \
    confirmation_code, cancellation_reason, cancelled_by, cancelled_at, \
    confirmed_at, completed_at, created_at, updated_at";

const SPOT_PERIOD_EXCLUSION: &str = "ex_bookings_spot_period";
const ACTIVE_BLOCK_UNIQUE: &str = "uq_bookings_active_block";

/// A booking released by the expiry sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct ReleasedBooking {
    pub booking_id: DbId,
    pub block_id: DbId,
}

pub struct BookingRepo;

impl BookingRepo {
    // -----------------------------------------------------------------------
    // Reservation
    // -----------------------------------------------------------------------

    /// Claim the block and insert a pending booking in one transaction.
    ///
    /// Steps:
    /// 1. `available -> reserved` guarded update on the block. Zero rows means
    ///    someone else got there first.
    /// 2. Overlap check against active bookings on the same spot.
    /// 3. Insert. The spot/period exclusion constraint is the final arbiter
    ///    for concurrent inserts the check in step 2 could not see.
    ///
    /// Any refusal rolls the whole transaction back, so the block is never left
    /// reserved without a booking.
    pub async fn reserve(
        pool: &PgPool,
        input: &NewBooking,
    ) -> Result<Result<Booking, ReservationConflict>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed: Option<(DbId, Timestamp, Timestamp, Amount)> = sqlx::query_as(
            "UPDATE availability_blocks SET status_id = $2 \
             WHERE id = $1 AND status_id = $3 \
             RETURNING spot_id, start_time, end_time, base_price",
        )
        .bind(input.block_id)
        .bind(BlockStatus::Reserved.id())
        .bind(BlockStatus::Available.id())
        .fetch_optional(&mut *tx)
        .await?;

        let Some((spot_id, start_time, end_time, base_price)) = claimed else {
            tx.rollback().await?;
            return Ok(Err(ReservationConflict::BlockUnavailable));
        };

        let (overlaps,): (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                 SELECT 1 FROM bookings \
                 WHERE spot_id = $1 AND status_id = ANY($2) \
                   AND period && tstzrange($3, $4, '[)') \
             )",
        )
        .bind(spot_id)
        .bind(active_statuses())
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&mut *tx)
        .await?;

        if overlaps {
            tx.rollback().await?;
            return Ok(Err(ReservationConflict::DoubleBooking));
        }

        let split = split_booking_price(base_price, input.platform_rate_bps);
        let query = format!(
            "INSERT INTO bookings \
                (block_id, spot_id, period, resident_id, vehicle_plate, visitor_name, \
                 visitor_phone, amount, platform_commission, owner_amount, status_id, \
                 payment_status_id, confirmation_code) \
             VALUES ($1, $2, tstzrange($3, $4, '[)'), $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Booking>(&query)
            .bind(input.block_id)
            .bind(spot_id)
            .bind(start_time)
            .bind(end_time)
            .bind(input.resident_id)
            .bind(&input.vehicle_plate)
            .bind(&input.visitor_name)
            .bind(&input.visitor_phone)
            .bind(base_price)
            .bind(split.platform_commission)
            .bind(split.owner_amount)
            .bind(BookingStatus::Pending.id())
            .bind(PaymentStatus::Pending.id())
            .bind(&input.confirmation_code)
            .fetch_one(&mut *tx)
            .await;

        let booking = match inserted {
            Ok(booking) => booking,
            Err(e)
                if is_constraint_violation(&e, EXCLUSION_VIOLATION, SPOT_PERIOD_EXCLUSION)
                    || is_constraint_violation(&e, UNIQUE_VIOLATION, ACTIVE_BLOCK_UNIQUE) =>
            {
                // The failed statement aborted the transaction; dropping it
                // rolls back the block claim.
                return Ok(Err(ReservationConflict::DoubleBooking));
            }
            Err(e) => return Err(e),
        };

        tx.commit().await?;
        Ok(Ok(booking))
    }

    // -----------------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------------

    /// Owner and building of a booking.
    pub async fn find_scope(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Option<BookingScope>, sqlx::Error> {
        sqlx::query_as::<_, BookingScope>(
            "SELECT bk.id AS booking_id, bk.resident_id, ps.building_id \
             FROM bookings bk \
             JOIN parking_spots ps ON ps.id = bk.spot_id \
             WHERE bk.id = $1",
        )
        .bind(booking_id)
        .fetch_optional(pool)
        .await
    }

    /// Cancel a booking and release its block. The caller has already
    /// authorized `cancelled_by`.
    ///
    /// Idempotent: cancelling a cancelled booking reports
    /// [`CancelOutcome::AlreadyCancelled`] and writes nothing.
    pub async fn cancel(
        pool: &PgPool,
        booking_id: DbId,
        cancelled_by: &str,
        reason: Option<&str>,
    ) -> Result<Option<CancelOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        if current.status_id == state_machine::CANCELLED {
            tx.rollback().await?;
            return Ok(Some(CancelOutcome::AlreadyCancelled(current)));
        }
        if !state_machine::can_transition(current.status_id, state_machine::CANCELLED) {
            tx.rollback().await?;
            return Ok(Some(CancelOutcome::NotCancellable(current)));
        }

        let query = format!(
            "UPDATE bookings \
             SET status_id = $2, cancellation_reason = $3, cancelled_by = $4, cancelled_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let cancelled = sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .bind(BookingStatus::Cancelled.id())
            .bind(reason)
            .bind(cancelled_by)
            .fetch_one(&mut *tx)
            .await?;

        release_block(&mut tx, &[cancelled.block_id]).await?;

        tx.commit().await?;
        Ok(Some(CancelOutcome::Cancelled(cancelled)))
    }

    // -----------------------------------------------------------------------
    // Sweeps
    // -----------------------------------------------------------------------

    /// Cancel pending bookings created before `cutoff` whose payment is still
    /// pending or has failed, and release their blocks.
    ///
    /// Rows locked by a concurrent transaction (a payment being applied, a
    /// cancellation) are skipped and picked up by the next run.
    pub async fn expire_stale(
        pool: &PgPool,
        cutoff: Timestamp,
        reason: &str,
        cancelled_by: &str,
    ) -> Result<Vec<ReleasedBooking>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let unpaid = vec![PaymentStatus::Pending.id(), PaymentStatus::Failed.id()];
        let released = sqlx::query_as::<_, ReleasedBooking>(
            "UPDATE bookings \
             SET status_id = $1, cancellation_reason = $2, cancelled_by = $3, cancelled_at = NOW() \
             WHERE id IN ( \
                 SELECT id FROM bookings \
                 WHERE status_id = $4 AND payment_status_id = ANY($5) AND created_at < $6 \
                 ORDER BY created_at \
                 FOR UPDATE SKIP LOCKED \
             ) \
               AND status_id = $4 \
               AND payment_status_id = ANY($5) \
             RETURNING id AS booking_id, block_id",
        )
        .bind(BookingStatus::Cancelled.id())
        .bind(reason)
        .bind(cancelled_by)
        .bind(BookingStatus::Pending.id())
        .bind(&unpaid)
        .bind(cutoff)
        .fetch_all(&mut *tx)
        .await?;

        let block_ids: Vec<DbId> = released.iter().map(|r| r.block_id).collect();
        release_block(&mut tx, &block_ids).await?;

        tx.commit().await?;
        Ok(released)
    }

    /// Mark confirmed bookings whose block ended before `now` as completed.
    /// Returns the completed booking IDs.
    pub async fn complete_finished(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "UPDATE bookings bk SET status_id = $1, completed_at = NOW() \
             FROM availability_blocks ab \
             WHERE ab.id = bk.block_id \
               AND bk.status_id = $2 \
               AND ab.end_time < $3 \
             RETURNING bk.id",
        )
        .bind(BookingStatus::Completed.id())
        .bind(BookingStatus::Confirmed.id())
        .bind(now)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A resident's bookings, newest first.
    pub async fn list_for_resident(
        pool: &PgPool,
        resident_id: DbId,
        status_id: Option<StatusId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE resident_id = $1 AND ($2::SMALLINT IS NULL OR status_id = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(resident_id)
            .bind(status_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Bookings across buildings, optionally restricted to one. Staff view.
    pub async fn list_for_building(
        pool: &PgPool,
        building_id: Option<DbId>,
        status_id: Option<StatusId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let columns = prefixed_columns("bk");
        let query = format!(
            "SELECT {columns} FROM bookings bk \
             JOIN parking_spots ps ON ps.id = bk.spot_id \
             WHERE ($1::BIGINT IS NULL OR ps.building_id = $1) \
               AND ($2::SMALLINT IS NULL OR bk.status_id = $2) \
             ORDER BY bk.created_at DESC, bk.id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(building_id)
            .bind(status_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of active bookings holding a block. More than one would mean a
    /// double booking slipped through.
    pub async fn count_active_for_block(pool: &PgPool, block_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings WHERE block_id = $1 AND status_id = ANY($2)",
        )
        .bind(block_id)
        .bind(active_statuses())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}

fn active_statuses() -> Vec<StatusId> {
    vec![BookingStatus::Pending.id(), BookingStatus::Confirmed.id()]
}

fn prefixed_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `reserved -> available` for the given blocks.
async fn release_block(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    block_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if block_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "UPDATE availability_blocks SET status_id = $1 WHERE id = ANY($2) AND status_id = $3",
    )
    .bind(BlockStatus::Available.id())
    .bind(block_ids)
    .bind(BlockStatus::Reserved.id())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
