//! "Updated 5m ago" strings for the counter screen.
//!
//! Buckets are closed-open (`diff < threshold`) and counts are truncated,
//! never rounded up. A timestamp of `0` means the counter was never
//! written. Negative differences (the writer's clock ahead of ours) fall
//! into the "just now" bucket.

/// Milliseconds in one minute.
pub const MINUTE_MS: i64 = 60_000;
/// Milliseconds in one hour.
pub const HOUR_MS: i64 = 3_600_000;
/// Milliseconds in one day.
pub const DAY_MS: i64 = 86_400_000;

/// Format the time elapsed between `last_updated_ms` and `now_ms`.
pub fn relative_time(last_updated_ms: i64, now_ms: i64) -> String {
    if last_updated_ms == 0 {
        return String::from("Never");
    }

    let diff = now_ms.saturating_sub(last_updated_ms);
    if diff < MINUTE_MS {
        String::from("Updated just now")
    } else if diff < HOUR_MS {
        format!("Updated {}m ago", diff / MINUTE_MS)
    } else if diff < DAY_MS {
        format!("Updated {}h ago", diff / HOUR_MS)
    } else {
        format!("Updated {}d ago", diff / DAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn ago(delta_ms: i64) -> String {
        relative_time(NOW - delta_ms, NOW)
    }

    #[test]
    fn minute_boundary() {
        assert_eq!(ago(0), "Updated just now");
        assert_eq!(ago(59_999), "Updated just now");
        assert_eq!(ago(60_000), "Updated 1m ago");
        assert_eq!(ago(90_000), "Updated 1m ago");
    }

    #[test]
    fn hour_boundary() {
        assert_eq!(ago(3_599_999), "Updated 59m ago");
        assert_eq!(ago(3_600_000), "Updated 1h ago");
        assert_eq!(ago(7_199_999), "Updated 1h ago");
    }

    #[test]
    fn day_boundary() {
        assert_eq!(ago(86_399_999), "Updated 23h ago");
        assert_eq!(ago(86_400_000), "Updated 1d ago");
        assert_eq!(ago(10 * DAY_MS + 5), "Updated 10d ago");
    }

    #[test]
    fn zero_timestamp_is_never() {
        assert_eq!(relative_time(0, NOW), "Never");
        assert_eq!(relative_time(0, 0), "Never");
        assert_eq!(relative_time(0, i64::MAX), "Never");
    }

    #[test]
    fn future_timestamp_is_just_now() {
        assert_eq!(relative_time(NOW + 120_000, NOW), "Updated just now");
    }

    #[test]
    fn extreme_span_does_not_overflow() {
        assert_eq!(
            relative_time(i64::MIN, i64::MAX),
            format!("Updated {}d ago", i64::MAX / DAY_MS)
        );
    }
}
