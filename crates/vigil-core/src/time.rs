//! Timestamp helpers

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in milliseconds since the Unix epoch
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Render `then` relative to `now` the way the dashboard cards do
/// (`"just now"`, `"30 sec ago"`, `"2 min ago"`, `"3 hours ago"`, `"2 days ago"`).
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);

    if secs < 5 {
        "just now".to_string()
    } else if secs < 60 {
        format!("{secs} sec ago")
    } else if secs < 3600 {
        format!("{} min ago", secs / 60)
    } else if secs < 86_400 {
        let hours = secs / 3600;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{hours} hours ago")
        }
    } else {
        let days = secs / 86_400;
        if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{days} days ago")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_current_timestamp() {
        let ts1 = current_timestamp_ms();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let ts2 = current_timestamp_ms();
        assert!(ts2 > ts1);
    }

    #[test]
    fn test_format_relative() {
        let now = Utc::now();
        assert_eq!(format_relative(now, now), "just now");
        assert_eq!(format_relative(now - Duration::seconds(30), now), "30 sec ago");
        assert_eq!(format_relative(now - Duration::seconds(45), now), "45 sec ago");
        assert_eq!(format_relative(now - Duration::minutes(2), now), "2 min ago");
        assert_eq!(format_relative(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(format_relative(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(format_relative(now - Duration::days(3), now), "3 days ago");
    }

    #[test]
    fn test_format_relative_future_clamps() {
        let now = Utc::now();
        assert_eq!(format_relative(now + Duration::minutes(1), now), "just now");
    }
}
