//! Timestamp type and clock abstraction.
//!
//! Timestamps are Unix epoch milliseconds (UTC), the unit clients embed in
//! challenge messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in milliseconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Get the current system time as a `Timestamp`.
    ///
    /// A clock set before 1970 reads as the epoch.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Signed age of this timestamp relative to `now`. Negative when the
    /// timestamp lies in the future.
    pub fn age_at(&self, now: Timestamp) -> i64 {
        (now.0 as i128 - self.0 as i128).clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    /// Whether this timestamp + `ttl_ms` has passed relative to `now`.
    pub fn has_expired(&self, ttl_ms: u64, now: Timestamp) -> bool {
        now.0 >= self.0.saturating_add(ttl_ms)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of the current time. Injected so freshness and expiry checks can be
/// driven deterministically in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_is_signed() {
        let t = Timestamp::from_millis(10_000);
        assert_eq!(t.age_at(Timestamp::from_millis(12_500)), 2_500);
        assert_eq!(t.age_at(Timestamp::from_millis(9_000)), -1_000);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let t = Timestamp::from_millis(1_000);
        assert!(!t.has_expired(500, Timestamp::from_millis(1_499)));
        assert!(t.has_expired(500, Timestamp::from_millis(1_500)));
    }

    #[test]
    fn display_is_plain_millis() {
        assert_eq!(Timestamp::from_millis(1_700_000_000_123).to_string(), "1700000000123");
    }
}
