//! Time management for telemetry collectors
//!
//! Provides a clock abstraction so the decoders stay pure: all wall-clock
//! reads go through a [`TimeSource`], which makes capture-time stamping
//! deterministic in tests and portable to targets without a system clock.

use chrono::{DateTime, TimeZone, Utc};

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Source of time for the collectors
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Create a source frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move the clock forward by `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Convert an epoch-millisecond timestamp to a UTC datetime
///
/// Used by sinks that render records with civil timestamps. Out-of-range
/// inputs clamp to the epoch rather than panic; the decoders never produce
/// timestamps a `u64` millisecond count cannot represent.
pub fn datetime_utc(timestamp: Timestamp) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(timestamp as i64)
        .single()
        .unwrap_or_else(|| Utc.timestamp_millis_opt(0).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut clock = FixedTime::new(1000);
        assert_eq!(clock.now(), 1000);
        assert!(!clock.is_wall_clock());

        clock.advance(500);
        assert_eq!(clock.now(), 1500);

        clock.set(42);
        assert_eq!(clock.now(), 42);
    }

    #[test]
    fn epoch_conversion() {
        let dt = datetime_utc(0);
        assert_eq!(dt.timestamp_millis(), 0);

        let dt = datetime_utc(1_700_000_000_000);
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_000);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_clock_is_wall_clock() {
        let clock = SystemClock;
        assert!(clock.is_wall_clock());
        assert!(clock.now() > 0);
    }
}
