//! Drop countdown

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Title shown while no custom title is configured.
pub const DEFAULT_DROP_TITLE: &str = "DROP INBOUND";

/// Headline shown once the drop has started.
pub const LIVE_HEADLINE: &str = "DROP LIVE";

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Homepage timer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropSettings {
    /// Title shown before the drop goes live
    pub drop_title: String,

    /// Drop time in milliseconds since the epoch, `0` when unset
    pub drop_end_at: i64,
}

impl Default for DropSettings {
    fn default() -> Self {
        Self {
            drop_title: DEFAULT_DROP_TITLE.to_string(),
            drop_end_at: 0,
        }
    }
}

impl DropSettings {
    /// Time remaining until the drop; all zero when unset or elapsed.
    pub fn time_left(&self, now: Timestamp) -> TimeLeft {
        if self.drop_end_at <= 0 {
            return TimeLeft::default();
        }

        TimeLeft::from_millis(self.drop_end_at.saturating_sub(now.as_millisecond()))
    }

    /// Whether the drop has started.
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.drop_end_at > 0 && now.as_millisecond() >= self.drop_end_at
    }

    /// Headline for the countdown banner.
    pub fn headline(&self, now: Timestamp) -> &str {
        if self.is_live(now) {
            LIVE_HEADLINE
        } else {
            &self.drop_title
        }
    }
}

/// Remaining time split into display units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeLeft {
    /// Whole days
    pub days: i64,

    /// Hours past the last whole day
    pub hours: i64,

    /// Minutes past the last whole hour
    pub minutes: i64,

    /// Seconds past the last whole minute
    pub seconds: i64,
}

impl TimeLeft {
    /// Split a millisecond duration; non-positive durations are zero.
    pub fn from_millis(diff: i64) -> Self {
        if diff <= 0 {
            return Self::default();
        }

        Self {
            days: diff / DAY_MS,
            hours: (diff / HOUR_MS) % 24,
            minutes: (diff / MINUTE_MS) % 60,
            seconds: (diff / SECOND_MS) % 60,
        }
    }

    /// Whether nothing is left.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn settings(drop_end_at: i64) -> DropSettings {
        DropSettings {
            drop_end_at,
            ..DropSettings::default()
        }
    }

    #[test]
    fn splits_remaining_time() -> TestResult {
        let end = 2 * DAY_MS + 3 * HOUR_MS + 4 * MINUTE_MS + 5 * SECOND_MS + 999;
        let left = settings(end).time_left(Timestamp::from_millisecond(0)?);

        assert_eq!(
            left,
            TimeLeft {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5,
            }
        );
        assert_eq!(left.to_string(), "02:03:04:05");

        Ok(())
    }

    #[test]
    fn unset_drop_is_zero_and_not_live() -> TestResult {
        let now = Timestamp::from_millisecond(1_000)?;
        let drop = settings(0);

        assert!(drop.time_left(now).is_zero());
        assert!(!drop.is_live(now));
        assert_eq!(drop.headline(now), DEFAULT_DROP_TITLE);

        Ok(())
    }

    #[test]
    fn elapsed_drop_is_live() -> TestResult {
        let drop = settings(5_000);
        let now = Timestamp::from_millisecond(5_000)?;

        assert!(drop.time_left(now).is_zero());
        assert!(drop.is_live(now));
        assert_eq!(drop.headline(now), LIVE_HEADLINE);

        Ok(())
    }

    #[test]
    fn custom_title_before_drop() -> TestResult {
        let drop = DropSettings {
            drop_title: "SEASON 3".to_string(),
            drop_end_at: 10_000,
        };

        assert_eq!(drop.headline(Timestamp::from_millisecond(0)?), "SEASON 3");

        Ok(())
    }

    #[test]
    fn missing_fields_use_defaults() -> TestResult {
        let drop: DropSettings = serde_json::from_str(r#"{"dropEndAt": 42}"#)?;

        assert_eq!(drop.drop_title, DEFAULT_DROP_TITLE);
        assert_eq!(drop.drop_end_at, 42);

        Ok(())
    }
}
