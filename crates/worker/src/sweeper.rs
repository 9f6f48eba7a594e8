//! Expiry and completion sweepers.
//!
//! The expiry sweeper reclaims bookings whose payment window elapsed; the
//! completion sweeper closes confirmed bookings whose block has ended. Each
//! run is one repository transaction, so a failed run changes nothing and is
//! simply retried on the next tick.

use std::time::Duration;

use chrono::Utc;
use guestbay_core::booking::PAYMENT_WINDOW_MINUTES;
use guestbay_core::sweeps::{EXPIRY_REASON, SYSTEM_ACTOR};
use guestbay_core::types::{DbId, Timestamp};
use guestbay_db::repositories::BookingRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Which sweeper to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Expiry,
    Completion,
}

impl Sweep {
    pub fn name(self) -> &'static str {
        match self {
            Self::Expiry => "expiry",
            Self::Completion => "completion",
        }
    }

    /// Run once against `now`. Returns the IDs of the bookings changed.
    pub async fn run_once(self, pool: &PgPool, now: Timestamp) -> Result<Vec<DbId>, sqlx::Error> {
        match self {
            Self::Expiry => run_expiry_sweep(pool, now).await,
            Self::Completion => run_completion_sweep(pool, now).await,
        }
    }
}

/// Cancel pending bookings older than the payment window and release their
/// blocks.
pub async fn run_expiry_sweep(pool: &PgPool, now: Timestamp) -> Result<Vec<DbId>, sqlx::Error> {
    let cutoff = now - chrono::Duration::minutes(PAYMENT_WINDOW_MINUTES);
    let released = BookingRepo::expire_stale(pool, cutoff, EXPIRY_REASON, SYSTEM_ACTOR).await?;
    for r in &released {
        tracing::debug!(booking_id = r.booking_id, block_id = r.block_id, "Booking expired");
    }
    Ok(released.into_iter().map(|r| r.booking_id).collect())
}

/// Mark confirmed bookings whose block ended as completed.
pub async fn run_completion_sweep(
    pool: &PgPool,
    now: Timestamp,
) -> Result<Vec<DbId>, sqlx::Error> {
    BookingRepo::complete_finished(pool, now).await
}

/// Run `sweep` every `period` until `cancel` fires.
///
/// Errors are logged and the loop carries on; the next tick retries.
pub async fn run(pool: PgPool, sweep: Sweep, period: Duration, cancel: CancellationToken) {
    tracing::info!(
        sweep = sweep.name(),
        interval_secs = period.as_secs(),
        "Sweeper started"
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(sweep = sweep.name(), "Sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep.run_once(&pool, Utc::now()).await {
                    Ok(changed) if !changed.is_empty() => {
                        tracing::info!(
                            sweep = sweep.name(),
                            count = changed.len(),
                            "Sweep applied"
                        );
                    }
                    Ok(_) => {
                        tracing::debug!(sweep = sweep.name(), "Sweep found nothing to do");
                    }
                    Err(e) => {
                        tracing::error!(sweep = sweep.name(), error = %e, "Sweep failed");
                    }
                }
            }
        }
    }
}
