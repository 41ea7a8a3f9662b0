//! RawEvent to CalendarEvent conversion.
//!
//! Upstream data is tolerated, not trusted: an event without a start or an
//! end is dropped here, as is an event the upstream calendar reports as
//! deleted. Nothing in this module fails.

use randevu_core::{CalendarEvent, EventTime};
use tracing::debug;

use crate::raw_event::{RawEvent, RawEventTime};

/// Converts one raw event, or returns `None` if it is unusable.
pub fn normalize_event(raw: &RawEvent) -> Option<CalendarEvent> {
    if raw.is_cancelled() {
        return None;
    }
    let (start, end) = (raw.start?, raw.end?);

    let mut event = CalendarEvent::new(&raw.id, raw.title(), convert_time(start), convert_time(end));
    if let Some(ref color) = raw.color_id {
        event = event.with_color(color);
    }
    if let Some(ref location) = raw.location {
        event = event.with_location(location);
    }
    if let Some(ref description) = raw.description {
        event = event.with_description(description);
    }
    Some(event)
}

/// Converts a batch, dropping unusable events.
pub fn normalize_events(raw: &[RawEvent]) -> Vec<CalendarEvent> {
    let events: Vec<CalendarEvent> = raw.iter().filter_map(normalize_event).collect();
    let dropped = raw.len() - events.len();
    if dropped > 0 {
        debug!(dropped, kept = events.len(), "dropped unusable upstream events");
    }
    events
}

fn convert_time(raw: RawEventTime) -> EventTime {
    match raw {
        RawEventTime::DateTime(dt) => EventTime::from_utc(dt),
        RawEventTime::Date(date) => EventTime::from_date(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        format!("2025-02-05T{h:02}:{m:02}:00Z").parse().unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    fn timed(id: &str, title: &str) -> RawEvent {
        RawEvent::new(id).with_summary(title).with_span(
            RawEventTime::from_datetime(utc(7, 0)),
            RawEventTime::from_datetime(utc(7, 30)),
        )
    }

    mod single {
        use super::*;

        #[test]
        fn timed_event_keeps_fields() {
            let raw = timed("evt-1", "K2 Ahmet")
                .with_color("11")
                .with_location("Klinik")
                .with_description("2. kontrol");
            let event = normalize_event(&raw).unwrap();
            assert_eq!(event.id, "evt-1");
            assert_eq!(event.title, "K2 Ahmet");
            assert_eq!(event.color_id.as_deref(), Some("11"));
            assert_eq!(event.start, EventTime::from_utc(utc(7, 0)));
            assert_eq!(event.end, EventTime::from_utc(utc(7, 30)));
            assert_eq!(event.location.as_deref(), Some("Klinik"));
            assert_eq!(event.description.as_deref(), Some("2. kontrol"));
        }

        #[test]
        fn all_day_event() {
            let raw = RawEvent::new("holiday")
                .with_summary("Tatil")
                .with_span(RawEventTime::from_date(date(5)), RawEventTime::from_date(date(6)));
            let event = normalize_event(&raw).unwrap();
            assert!(event.is_all_day());
            assert_eq!(event.end, EventTime::from_date(date(6)));
        }

        #[test]
        fn missing_title_becomes_empty() {
            let raw = RawEvent::new("evt-1").with_span(
                RawEventTime::from_datetime(utc(7, 0)),
                RawEventTime::from_datetime(utc(8, 0)),
            );
            assert_eq!(normalize_event(&raw).unwrap().title, "");
        }
    }

    mod dropping {
        use super::*;

        #[test]
        fn missing_start_or_end() {
            let mut no_end = timed("a", "K1");
            no_end.end = None;
            let mut no_start = timed("b", "K1");
            no_start.start = None;
            assert!(normalize_event(&no_end).is_none());
            assert!(normalize_event(&no_start).is_none());
        }

        #[test]
        fn upstream_cancelled() {
            let raw = timed("a", "K1").with_status("cancelled");
            assert!(normalize_event(&raw).is_none());
        }

        #[test]
        fn batch_keeps_order_of_survivors() {
            let mut broken = timed("b", "K2");
            broken.start = None;
            let raw = vec![timed("a", "K1"), broken, timed("c", "K3")];
            let ids: Vec<String> = normalize_events(&raw).into_iter().map(|e| e.id).collect();
            assert_eq!(ids, vec!["a", "c"]);
        }
    }
}
