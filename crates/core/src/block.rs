//! Availability block duration classes.
//!
//! Blocks are generated in exactly two lengths. The database stores the length
//! in minutes and a check constraint pins it to these values.

use serde::{Deserialize, Serialize};

/// Length of the short block class, in minutes.
pub const SHORT_BLOCK_MINUTES: i32 = 120;

/// Length of the long block class, in minutes.
pub const LONG_BLOCK_MINUTES: i32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationClass {
    Short,
    Long,
}

impl DurationClass {
    pub fn minutes(self) -> i32 {
        match self {
            Self::Short => SHORT_BLOCK_MINUTES,
            Self::Long => LONG_BLOCK_MINUTES,
        }
    }

    pub fn from_minutes(minutes: i32) -> Option<Self> {
        match minutes {
            SHORT_BLOCK_MINUTES => Some(Self::Short),
            LONG_BLOCK_MINUTES => Some(Self::Long),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_round_trip() {
        for class in [DurationClass::Short, DurationClass::Long] {
            assert_eq!(DurationClass::from_minutes(class.minutes()), Some(class));
        }
    }

    #[test]
    fn unknown_length_is_rejected() {
        assert_eq!(DurationClass::from_minutes(90), None);
    }
}
