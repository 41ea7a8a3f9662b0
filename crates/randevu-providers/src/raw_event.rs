//! Raw event type from calendar providers.
//!
//! [`RawEvent`] is what a provider hands back before any validation: start
//! and end may be missing or unparseable upstream, so both are optional here
//! and only [`normalize_event`](crate::normalize::normalize_event) decides
//! whether an event is usable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The time specification for a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RawEventTime {
    /// A specific datetime in UTC.
    DateTime(DateTime<Utc>),
    /// An all-day event date (no specific time).
    Date(NaiveDate),
}

impl RawEventTime {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::Date(date)
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

/// Provider-agnostic event data as fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Upstream identifier.
    pub id: String,
    /// Title as typed into the calendar; may carry patient names.
    pub summary: Option<String>,
    /// Upstream color tag (Google `colorId`).
    pub color_id: Option<String>,
    pub start: Option<RawEventTime>,
    pub end: Option<RawEventTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Upstream status (`confirmed`, `tentative`, `cancelled`).
    pub status: Option<String>,
}

impl RawEvent {
    /// Creates a raw event with an id and nothing else.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: None,
            color_id: None,
            start: None,
            end: None,
            location: None,
            description: None,
            status: None,
        }
    }

    /// Title, or the empty string when the event has none.
    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    /// Returns true if the upstream calendar marked the event as deleted.
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|s| s.eq_ignore_ascii_case("cancelled"))
    }

    /// Builder method to set both ends of the span.
    pub fn with_span(mut self, start: RawEventTime, end: RawEventTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_color(mut self, color_id: impl Into<String>) -> Self {
        self.color_id = Some(color_id.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(h: u32) -> DateTime<Utc> {
        format!("2025-02-05T{h:02}:00:00Z").parse().unwrap()
    }

    #[test]
    fn bare_event_has_no_span() {
        let event = RawEvent::new("evt-1");
        assert_eq!(event.title(), "");
        assert!(event.start.is_none());
        assert!(event.end.is_none());
        assert!(!event.is_cancelled());
    }

    #[test]
    fn builder() {
        let event = RawEvent::new("evt-1")
            .with_summary("K2 Ahmet")
            .with_color("5")
            .with_location("Klinik")
            .with_description("pansuman")
            .with_span(
                RawEventTime::from_datetime(utc(7)),
                RawEventTime::from_datetime(utc(8)),
            );
        assert_eq!(event.title(), "K2 Ahmet");
        assert_eq!(event.color_id.as_deref(), Some("5"));
        assert_eq!(event.start, Some(RawEventTime::DateTime(utc(7))));
        assert!(!event.start.is_some_and(|s| s.is_all_day()));
    }

    #[test]
    fn cancelled_status_is_case_insensitive() {
        assert!(RawEvent::new("a").with_status("Cancelled").is_cancelled());
        assert!(!RawEvent::new("b").with_status("confirmed").is_cancelled());
    }
}
