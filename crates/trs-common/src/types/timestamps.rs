//! Timestamp type for change events.
//!
//! Producers stamp each history record with the wall-clock time the change
//! was observed. The engine never orders by timestamp; `Order` is the only
//! ordering authority.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A wall-clock timestamp (microseconds since epoch).
///
/// # Example
///
/// ```rust
/// use trs_common::types::Timestamp;
///
/// let ts = Timestamp::now();
/// assert!(ts.as_micros() > 0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Zero timestamp (epoch).
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from microseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Creates a timestamp from the current system time.
    #[must_use]
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Self(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX))
    }

    /// Returns the timestamp as microseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}us)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format as ISO 8601 if reasonable
        if let Ok(secs) = i64::try_from(self.0 / 1_000_000) {
            #[allow(clippy::cast_possible_truncation)]
            let subsec_nanos = (self.0 % 1_000_000) as u32 * 1000;
            if let Some(dt) = chrono::DateTime::from_timestamp(secs, subsec_nanos) {
                return write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.6fZ"));
            }
        }
        write!(f, "{}us", self.0)
    }
}

impl From<u64> for Timestamp {
    #[inline]
    fn from(micros: u64) -> Self {
        Self::from_micros(micros)
    }
}

impl From<Timestamp> for u64 {
    #[inline]
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_units() {
        let ts = Timestamp::from_micros(1_500_000);
        assert_eq!(ts.as_micros(), 1_500_000);
    }

    #[test]
    fn test_timestamp_now_is_recent() {
        let before = Timestamp::now();
        let after = Timestamp::now();
        assert!(after >= before);
        assert!(before > Timestamp::ZERO);
    }

    #[test]
    fn test_timestamp_display() {
        let ts = Timestamp::from_micros(1_000_000);
        assert_eq!(ts.to_string(), "1970-01-01T00:00:01.000000Z");
    }
}
