//! Sweep schedule configuration.

use std::time::Duration;

use guestbay_core::sweeps::{COMPLETION_SWEEP_INTERVAL, EXPIRY_SWEEP_INTERVAL};

/// How often each sweeper runs.
///
/// | Env var                          | Default |
/// |----------------------------------|---------|
/// | `EXPIRY_SWEEP_INTERVAL_SECS`     | `300`   |
/// | `COMPLETION_SWEEP_INTERVAL_SECS` | `3600`  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSchedule {
    pub expiry_interval: Duration,
    pub completion_interval: Duration,
}

impl Default for SweepSchedule {
    fn default() -> Self {
        Self {
            expiry_interval: EXPIRY_SWEEP_INTERVAL,
            completion_interval: COMPLETION_SWEEP_INTERVAL,
        }
    }
}

impl SweepSchedule {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expiry_interval: secs_from_env("EXPIRY_SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.expiry_interval),
            completion_interval: secs_from_env("COMPLETION_SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.completion_interval),
        }
    }
}

fn secs_from_env(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .as_deref()
        .and_then(parse_interval)
}

/// Parse a positive number of seconds. Zero is rejected because
/// `tokio::time::interval` panics on a zero period.
fn parse_interval(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_schedule() {
        let schedule = SweepSchedule::default();
        assert_eq!(schedule.expiry_interval, Duration::from_secs(300));
        assert_eq!(schedule.completion_interval, Duration::from_secs(3600));
    }

    #[test]
    fn interval_parsing() {
        assert_eq!(parse_interval("60"), Some(Duration::from_secs(60)));
        assert_eq!(parse_interval(" 5 "), Some(Duration::from_secs(5)));
        assert_eq!(parse_interval("0"), None);
        assert_eq!(parse_interval("-1"), None);
        assert_eq!(parse_interval("soon"), None);
    }
}
