//! Timestamp utilities
//!
//! Store timestamps are persisted as microseconds since the Unix epoch.

use chrono::{DateTime, TimeZone, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time as microseconds since the Unix epoch
pub fn now_micros() -> i64 {
    now().timestamp_micros()
}

/// Convert stored microseconds back to a UTC timestamp
///
/// Out-of-range values clamp to the Unix epoch.
pub fn from_micros(micros: i64) -> DateTime<Utc> {
    Utc.timestamp_micros(micros)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micros_roundtrip_preserves_precision() {
        let micros = 1_760_000_000_123_456;
        assert_eq!(from_micros(micros).timestamp_micros(), micros);
    }

    #[test]
    fn test_now_micros_is_recent() {
        // After 2000-01-01 and before 2100-01-01
        let micros = now_micros();
        assert!(micros > 946_684_800_000_000);
        assert!(micros < 4_102_444_800_000_000);
    }
}
