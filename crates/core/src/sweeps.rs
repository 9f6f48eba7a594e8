//! Schedules for the periodic sweepers.

use std::time::Duration;

/// Default interval between expiry sweeps.
pub const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Default interval between completion sweeps.
pub const COMPLETION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Cancellation reason recorded on bookings reclaimed by the expiry sweeper.
pub const EXPIRY_REASON: &str = "Payment window elapsed";

/// Actor recorded for transitions performed by background jobs.
pub const SYSTEM_ACTOR: &str = "system";
