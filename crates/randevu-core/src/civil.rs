//! Civil-time arithmetic in one named zone.
//!
//! Business hours and blackout windows are wall-clock values ("08:00 on a
//! Tuesday in Istanbul"). [`CivilZone`] is the only place where such values
//! are turned into absolute instants and back; everything downstream works
//! on [`Interval`]s of UTC instants.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use chrono_tz::Tz;

use crate::policy::PolicyError;
use crate::time::{EventTime, Interval};

/// Upper bound when stepping over a DST gap; no real zone skips more than this.
const MAX_GAP_MINUTES: i64 = 180;

/// A fixed civil timezone used for every policy computation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CivilZone {
    tz: Tz,
}

impl fmt::Debug for CivilZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CivilZone").field(&self.tz.name()).finish()
    }
}

impl Default for CivilZone {
    fn default() -> Self {
        Self::new(chrono_tz::Europe::Istanbul)
    }
}

impl CivilZone {
    /// Creates a civil zone from a `chrono_tz` zone.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Parses an IANA zone name such as `Europe/Istanbul`.
    pub fn from_name(name: &str) -> Result<Self, PolicyError> {
        Tz::from_str(name)
            .map(Self::new)
            .map_err(|_| PolicyError::UnknownTimezone(name.to_string()))
    }

    /// Returns the IANA name of the zone.
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// Returns the civil date an instant falls on.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Converts a civil date and time-of-day into an instant.
    ///
    /// Ambiguous wall-clock times (DST fold) resolve to the earlier instant.
    /// Non-existent ones (DST gap) resolve to the first valid instant after
    /// the gap.
    pub fn at(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let naive = date.and_time(time);
        let mut candidate = naive;
        for _ in 0..=MAX_GAP_MINUTES {
            match self.tz.from_local_datetime(&candidate) {
                LocalResult::Single(dt) => return dt.with_timezone(&Utc),
                LocalResult::Ambiguous(earlier, _) => return earlier.with_timezone(&Utc),
                LocalResult::None => candidate += Duration::minutes(1),
            }
        }
        // Unreachable for real zone data; treat the wall clock as UTC.
        naive.and_utc()
    }

    /// Returns the instant of civil midnight starting `date`.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.at(date, NaiveTime::MIN)
    }

    /// Returns the civil day `date` as an interval of instants.
    ///
    /// Days are not always 24 hours long in zones with DST.
    pub fn day_bounds(&self, date: NaiveDate) -> Interval {
        let next = date.succ_opt().unwrap_or(date);
        Interval::new(self.start_of_day(date), self.start_of_day(next))
    }

    /// Resolves an event's start/end pair into an interval of instants.
    ///
    /// All-day dates are civil midnights in this zone; their end date is
    /// exclusive as delivered by calendar providers, and an all-day end that
    /// is not after its start still covers the start date. Returns `None`
    /// for inverted timed spans.
    pub fn resolve(&self, start: &EventTime, end: &EventTime) -> Option<Interval> {
        let end = match (start, end) {
            (EventTime::AllDay(s), EventTime::AllDay(e)) if e <= s => {
                EventTime::AllDay(s.succ_opt().unwrap_or(*s))
            }
            _ => *end,
        };
        Interval::try_new(self.instant(start), self.instant(&end))
    }

    fn instant(&self, time: &EventTime) -> DateTime<Utc> {
        match time {
            EventTime::DateTime(dt) => *dt,
            EventTime::AllDay(date) => self.start_of_day(*date),
        }
    }

    /// Expresses an instant with the zone's UTC offset at that instant.
    pub fn to_offset(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.tz).fixed_offset()
    }

    /// Returns the civil wall-clock reading of an instant.
    pub fn wall_clock(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }
}
