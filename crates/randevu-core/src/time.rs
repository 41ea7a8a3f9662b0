//! Time types for calendar events.
//!
//! This module provides [`EventTime`] for representing event start/end times
//! (which may be either a specific instant or an all-day date), and
//! [`Interval`], the half-open span of absolute time that all interval math
//! in the pipeline works on.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Represents the time of a calendar event.
///
/// Calendar events can have two types of times:
/// - **DateTime**: A specific point in time (with timezone, stored as UTC)
/// - **AllDay**: A civil date without a specific time (all-day events)
///
/// All-day dates are only turned into instants through a
/// [`CivilZone`](crate::civil::CivilZone), because their meaning depends on
/// the zone the calendar is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A specific datetime, stored in UTC.
    DateTime(DateTime<Utc>),
    /// An all-day event date (no specific time).
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates a new `EventTime::DateTime` from a UTC datetime.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Creates a new `EventTime::AllDay` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Returns `true` if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns the datetime if this is a `DateTime` variant.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            Self::AllDay(_) => None,
        }
    }

    /// Returns the date if this is an `AllDay` variant.
    pub fn as_date(&self) -> Option<&NaiveDate> {
        match self {
            Self::AllDay(d) => Some(d),
            Self::DateTime(_) => None,
        }
    }
}

/// A half-open interval `[start, end)` of absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    /// Start of the interval (inclusive).
    pub start: DateTime<Utc>,
    /// End of the interval (exclusive).
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Creates a new interval.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "Interval start must be <= end");
        Self { start, end }
    }

    /// Creates an interval, returning `None` when `start` is after `end`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates an interval from a start time and duration.
    pub fn from_duration(start: DateTime<Utc>, duration: Duration) -> Self {
        Self::new(start, start + duration)
    }

    /// Returns the duration of this interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Returns the duration in whole minutes.
    pub fn minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Returns true if the interval covers no time at all.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Checks if a datetime falls within this interval.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Returns true if `other` lies entirely inside this interval.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the two intervals share any instant.
    ///
    /// Intervals that merely touch (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Moves the start earlier by `lead`, keeping the end.
    pub fn with_lead(&self, lead: Duration) -> Self {
        Self {
            start: self.start - lead,
            end: self.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    mod event_time {
        use super::*;

        #[test]
        fn datetime_creation() {
            let dt = utc(2025, 2, 5, 10, 30);
            let et = EventTime::from_utc(dt);
            assert!(!et.is_all_day());
            assert_eq!(et.as_datetime(), Some(&dt));
            assert_eq!(et.as_date(), None);
        }

        #[test]
        fn allday_creation() {
            let d = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();
            let et = EventTime::from_date(d);
            assert!(et.is_all_day());
            assert_eq!(et.as_date(), Some(&d));
            assert_eq!(et.as_datetime(), None);
        }

        #[test]
        fn serde_shape() {
            let et = EventTime::from_date(NaiveDate::from_ymd_opt(2025, 2, 5).unwrap());
            let json = serde_json::to_string(&et).unwrap();
            assert_eq!(json, r#"{"type":"AllDay","value":"2025-02-05"}"#);
        }
    }

    mod interval {
        use super::*;

        #[test]
        fn creation() {
            let iv = Interval::new(utc(2025, 2, 5, 9, 0), utc(2025, 2, 5, 17, 0));
            assert_eq!(iv.duration(), Duration::hours(8));
            assert_eq!(iv.minutes(), 480);
            assert!(!iv.is_empty());
        }

        #[test]
        #[should_panic(expected = "start must be <= end")]
        fn inverted_interval_panics() {
            Interval::new(utc(2025, 2, 5, 17, 0), utc(2025, 2, 5, 9, 0));
        }

        #[test]
        fn try_new_rejects_inverted() {
            assert!(Interval::try_new(utc(2025, 2, 5, 17, 0), utc(2025, 2, 5, 9, 0)).is_none());
            assert!(Interval::try_new(utc(2025, 2, 5, 9, 0), utc(2025, 2, 5, 9, 0)).is_some());
        }

        #[test]
        fn half_open_contains() {
            let iv = Interval::new(utc(2025, 2, 5, 9, 0), utc(2025, 2, 5, 17, 0));
            assert!(iv.contains(utc(2025, 2, 5, 9, 0)));
            assert!(iv.contains(utc(2025, 2, 5, 16, 59)));
            assert!(!iv.contains(utc(2025, 2, 5, 17, 0)));
        }

        #[test]
        fn touching_intervals_do_not_overlap() {
            let a = Interval::new(utc(2025, 2, 5, 9, 0), utc(2025, 2, 5, 10, 0));
            let b = Interval::new(utc(2025, 2, 5, 10, 0), utc(2025, 2, 5, 11, 0));
            assert!(!a.overlaps(&b));
        }

        #[test]
        fn partial_overlap() {
            let a = Interval::new(utc(2025, 2, 5, 9, 0), utc(2025, 2, 5, 12, 0));
            let b = Interval::new(utc(2025, 2, 5, 11, 0), utc(2025, 2, 5, 13, 0));
            assert!(a.overlaps(&b));
            assert!(b.overlaps(&a));
        }

        #[test]
        fn lead_moves_start_only() {
            let iv = Interval::new(utc(2025, 2, 5, 10, 0), utc(2025, 2, 5, 12, 0));
            let led = iv.with_lead(Duration::minutes(10));
            assert_eq!(led.start, utc(2025, 2, 5, 9, 50));
            assert_eq!(led.end, iv.end);
            assert!(led.encloses(&iv));
        }
    }
}
