use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// At or below this many seconds the countdown switches to its urgent style.
pub const URGENT_THRESHOLD_SECS: u64 = 300;

/// Whole seconds left until `end_at`, floored, never negative.
pub fn remaining_seconds(end_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (end_at - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis / 1000) as u64
    }
}

/// `HH:MM:SS`; hours keep counting past 24.
pub fn format_countdown(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

pub fn is_urgent(remaining: u64) -> bool {
    remaining <= URGENT_THRESHOLD_SECS
}

pub fn is_expired(end_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    remaining_seconds(end_at, now) == 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerStatus {
    Scheduled,
    Active,
    Expired,
}

impl TimerStatus {
    pub fn of(start_at: DateTime<Utc>, end_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if is_expired(end_at, now) {
            TimerStatus::Expired
        } else if now < start_at {
            TimerStatus::Scheduled
        } else {
            TimerStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_countdown(0), "00:00:00");
        assert_eq!(format_countdown(59), "00:00:59");
        assert_eq!(format_countdown(3661), "01:01:01");
        assert_eq!(format_countdown(90061), "25:01:01");
        assert_eq!(format_countdown(360_000), "100:00:00");
    }

    #[test]
    fn remaining_is_floored_and_never_negative() {
        let now = Utc::now();
        assert_eq!(remaining_seconds(now + Duration::seconds(10), now), 10);
        assert_eq!(remaining_seconds(now + Duration::milliseconds(9_999), now), 9);
        assert_eq!(remaining_seconds(now + Duration::milliseconds(999), now), 0);
        assert_eq!(remaining_seconds(now - Duration::hours(3), now), 0);
    }

    #[test]
    fn remaining_decreases_by_one_per_second() {
        let start = Utc::now();
        let end = start + Duration::seconds(10);
        let seen: Vec<u64> = (0..13)
            .map(|tick| remaining_seconds(end, start + Duration::seconds(tick)))
            .collect();
        assert_eq!(seen, vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 0, 0]);
    }

    #[test]
    fn urgency_threshold_is_inclusive() {
        assert!(!is_urgent(301));
        assert!(is_urgent(300));
        assert!(is_urgent(0));
    }

    #[test]
    fn status_is_derived_from_now() {
        let now = Utc::now();
        let hour = Duration::hours(1);
        assert_eq!(TimerStatus::of(now + hour, now + hour * 2, now), TimerStatus::Scheduled);
        assert_eq!(TimerStatus::of(now - hour, now + hour, now), TimerStatus::Active);
        assert_eq!(TimerStatus::of(now - hour * 2, now - hour, now), TimerStatus::Expired);
    }
}
