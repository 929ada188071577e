//! Rate-limit reset countdown formatting
//!
//! Renders how long until a quota window reopens, for display next to a
//! blocked send action.

/// Fallback rendering when the backend supplied no usable reset timestamp.
pub const RESET_TIME_UNKNOWN: &str = "unknown";

/// Format the time remaining until `reset_unix` as a short countdown.
///
/// `reset_unix` is a Unix-seconds timestamp; `now_unix` is the caller's
/// current clock, passed in so the rendering is deterministic. Output is
/// `"{h}h {m}m"` when at least one full hour remains, `"{m}m"` otherwise.
/// A missing timestamp renders as [`RESET_TIME_UNKNOWN`]; a reset in the
/// past renders as `"0m"`.
///
/// # Examples
///
/// ```
/// use reqnest_common::time::format_reset_countdown;
///
/// assert_eq!(format_reset_countdown(Some(3661), 0), "1h 1m");
/// assert_eq!(format_reset_countdown(Some(300), 0), "5m");
/// assert_eq!(format_reset_countdown(None, 0), "unknown");
/// ```
pub fn format_reset_countdown(reset_unix: Option<i64>, now_unix: i64) -> String {
    let Some(reset) = reset_unix else {
        return RESET_TIME_UNKNOWN.to_string();
    };

    let remaining = reset.saturating_sub(now_unix).max(0) as u64;
    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for time::reset.
    use super::*;

    #[test]
    fn one_hour_one_minute() {
        assert_eq!(format_reset_countdown(Some(1_000_003_661), 1_000_000_000), "1h 1m");
    }

    #[test]
    fn minutes_only_below_an_hour() {
        assert_eq!(format_reset_countdown(Some(3599), 0), "59m");
        assert_eq!(format_reset_countdown(Some(61), 0), "1m");
    }

    #[test]
    fn sub_minute_rounds_down_to_zero() {
        assert_eq!(format_reset_countdown(Some(59), 0), "0m");
    }

    #[test]
    fn past_reset_clamps_to_zero() {
        assert_eq!(format_reset_countdown(Some(100), 200), "0m");
    }

    #[test]
    fn missing_timestamp_uses_fallback() {
        assert_eq!(format_reset_countdown(None, 0), RESET_TIME_UNKNOWN);
    }

    #[test]
    fn exact_hour_boundary() {
        assert_eq!(format_reset_countdown(Some(3600), 0), "1h 0m");
        assert_eq!(format_reset_countdown(Some(7260), 0), "2h 1m");
    }
}
