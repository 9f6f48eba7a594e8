//! Sweepers run inside the API process when `RUN_SWEEPERS` is set.

use guestbay_worker::config::SweepSchedule;
use guestbay_worker::sweeper::{self, Sweep};
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn both sweep loops. They stop when `cancel` fires.
pub fn spawn_sweepers(
    pool: &PgPool,
    schedule: &SweepSchedule,
    cancel: &CancellationToken,
) -> Vec<JoinHandle<()>> {
    [
        (Sweep::Expiry, schedule.expiry_interval),
        (Sweep::Completion, schedule.completion_interval),
    ]
    .into_iter()
    .map(|(sweep, period)| {
        tokio::spawn(sweeper::run(pool.clone(), sweep, period, cancel.clone()))
    })
    .collect()
}
