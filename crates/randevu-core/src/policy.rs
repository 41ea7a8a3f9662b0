//! Business-hour and blackout policy, resolved per civil date.
//!
//! Policy is configuration only. [`PolicyConfig::resolve`] turns it into a
//! [`DayPolicy`] for one date; [`DayPolicy::window`] and
//! [`DayPolicy::blackout_intervals`] then hand the availability deriver plain
//! instants via a [`CivilZone`].

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::civil::CivilZone;
use crate::time::Interval;

/// Errors raised while validating policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The timezone name is not in the IANA database.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// A weekday's business window ends before it starts.
    #[error("business hours for {weekday} end before they start ({start}-{end})")]
    InvalidBusinessWindow {
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },

    /// A blackout rule is empty, inverted or has an inverted date range.
    #[error("invalid blackout window: {0}")]
    InvalidBlackout(String),

    /// A minute setting must be positive.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i64 },
}

/// `HH:MM` (or `HH:MM:SS`) serde for wall-clock times in config files.
mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|_| D::Error::custom(format!("invalid time of day: {raw:?}")))
    }
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

/// A wall-clock window `[start, end)` within one civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockWindow {
    #[serde(with = "clock")]
    pub start: NaiveTime,
    #[serde(with = "clock")]
    pub end: NaiveTime,
}

impl ClockWindow {
    /// Creates a window from two wall-clock times.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Creates a window from hour/minute pairs.
    pub fn hm(start: (u32, u32), end: (u32, u32)) -> Self {
        Self::new(hm(start.0, start.1), hm(end.0, end.1))
    }

    /// A zero-length window marks a closed day.
    pub fn is_closed(&self) -> bool {
        self.start >= self.end
    }

    /// Places the window on `date` in `zone`.
    ///
    /// DST transitions can make the two ends resolve out of order; the
    /// result is then empty rather than inverted.
    pub fn to_interval(&self, zone: &CivilZone, date: NaiveDate) -> Interval {
        let start = zone.at(date, self.start);
        let end = zone.at(date, self.end).max(start);
        Interval::new(start, end)
    }
}

/// Business hours for every weekday. A closed day has `start == end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyHours {
    pub monday: ClockWindow,
    pub tuesday: ClockWindow,
    pub wednesday: ClockWindow,
    pub thursday: ClockWindow,
    pub friday: ClockWindow,
    pub saturday: ClockWindow,
    pub sunday: ClockWindow,
}

impl Default for WeeklyHours {
    fn default() -> Self {
        let long = ClockWindow::hm((8, 0), (21, 0));
        Self {
            monday: long,
            tuesday: long,
            wednesday: long,
            thursday: long,
            friday: long,
            saturday: long,
            sunday: ClockWindow::hm((8, 0), (9, 30)),
        }
    }
}

impl WeeklyHours {
    /// Returns the window configured for `weekday`.
    pub fn get(&self, weekday: Weekday) -> ClockWindow {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (Weekday, ClockWindow)> + '_ {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(|day| (day, self.get(day)))
    }
}

/// A recurring blackout sub-window on some weekdays, optionally limited to
/// a date range (both ends inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutRule {
    pub weekdays: Vec<Weekday>,
    #[serde(flatten)]
    pub window: ClockWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
}

impl BlackoutRule {
    /// Creates an open-ended rule.
    pub fn new(weekdays: Vec<Weekday>, window: ClockWindow) -> Self {
        Self {
            weekdays,
            window,
            from: None,
            until: None,
        }
    }

    /// Limits the rule to dates in `[from, until]`.
    #[must_use]
    pub fn between(mut self, from: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        self.from = from;
        self.until = until;
        self
    }

    /// Returns true if the rule blacks out part of `date`.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.weekdays.contains(&date.weekday())
            && self.from.is_none_or(|from| from <= date)
            && self.until.is_none_or(|until| date <= until)
    }
}

/// Named, overridable policy inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Shortest bookable slot.
    pub min_slot_minutes: i64,
    /// Margin kept free before a surgery.
    pub pre_op_buffer_minutes: i64,
    /// Events closer than this are merged into one block.
    pub merge_gap_minutes: i64,
    pub hours: WeeklyHours,
    pub blackouts: Vec<BlackoutRule>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_slot_minutes: 15,
            pre_op_buffer_minutes: 10,
            merge_gap_minutes: 15,
            hours: WeeklyHours::default(),
            blackouts: vec![BlackoutRule::new(
                vec![Weekday::Tue, Weekday::Wed, Weekday::Thu],
                ClockWindow::hm((19, 30), (20, 30)),
            )],
        }
    }
}

impl PolicyConfig {
    /// Checks every window and minute setting.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (field, value) in [
            ("min_slot_minutes", self.min_slot_minutes),
            ("merge_gap_minutes", self.merge_gap_minutes),
        ] {
            if value <= 0 {
                return Err(PolicyError::NonPositive { field, value });
            }
        }
        if self.pre_op_buffer_minutes < 0 {
            return Err(PolicyError::NonPositive {
                field: "pre_op_buffer_minutes",
                value: self.pre_op_buffer_minutes,
            });
        }

        for (weekday, window) in self.hours.iter() {
            if window.start > window.end {
                return Err(PolicyError::InvalidBusinessWindow {
                    weekday,
                    start: window.start,
                    end: window.end,
                });
            }
        }

        for rule in &self.blackouts {
            if rule.window.is_closed() {
                return Err(PolicyError::InvalidBlackout(format!(
                    "{}-{} is empty or inverted",
                    rule.window.start, rule.window.end
                )));
            }
            if let (Some(from), Some(until)) = (rule.from, rule.until) {
                if from > until {
                    return Err(PolicyError::InvalidBlackout(format!(
                        "date range {from}..{until} is inverted"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn min_slot(&self) -> Duration {
        Duration::minutes(self.min_slot_minutes)
    }

    pub fn pre_op_buffer(&self) -> Duration {
        Duration::minutes(self.pre_op_buffer_minutes)
    }

    pub fn merge_gap(&self) -> Duration {
        Duration::minutes(self.merge_gap_minutes)
    }

    /// Resolves the policy that applies on `date`.
    pub fn resolve(&self, date: NaiveDate) -> DayPolicy {
        DayPolicy {
            date,
            business: self.hours.get(date.weekday()),
            blackouts: self
                .blackouts
                .iter()
                .filter(|rule| rule.applies_on(date))
                .map(|rule| rule.window)
                .collect(),
        }
    }
}

/// The policy in force on one civil date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPolicy {
    pub date: NaiveDate,
    pub business: ClockWindow,
    pub blackouts: Vec<ClockWindow>,
}

impl DayPolicy {
    /// The business window as instants.
    pub fn window(&self, zone: &CivilZone) -> Interval {
        self.business.to_interval(zone, self.date)
    }

    /// Blackout windows as instants, sorted by start.
    pub fn blackout_intervals(&self, zone: &CivilZone) -> Vec<Interval> {
        let mut intervals: Vec<Interval> = self
            .blackouts
            .iter()
            .map(|w| w.to_interval(zone, self.date))
            .filter(|i| !i.is_empty())
            .collect();
        intervals.sort();
        intervals
    }
}
