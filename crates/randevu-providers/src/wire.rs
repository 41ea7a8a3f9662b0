//! Google Calendar v3 `events.list` wire format.
//!
//! Shared by the HTTP client and the file provider, which reads exported
//! responses of the same shape. Decoding is lenient: a field that cannot be
//! parsed becomes `None` on the [`RawEvent`], and normalization drops the
//! event later.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::raw_event::{RawEvent, RawEventTime};

/// One page of `events.list`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

/// An exported events file: either a full response or a bare item array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum EventsDocument {
    Page(EventListResponse),
    Items(Vec<ApiEvent>),
}

impl EventsDocument {
    pub fn into_items(self) -> Vec<ApiEvent> {
        match self {
            Self::Page(page) => {
                if page.next_page_token.is_some() {
                    warn!(items = page.items.len(), "exported page is not the last one; later pages are missing");
                }
                page.items
            }
            Self::Items(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub color_id: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEventTime {
    pub date: Option<String>,
    pub date_time: Option<String>,
}

impl ApiEventTime {
    /// `dateTime` wins over `date` when both are present.
    fn parse(&self) -> Option<RawEventTime> {
        if let Some(ref dt) = self.date_time {
            return DateTime::parse_from_rfc3339(dt)
                .map(|parsed| RawEventTime::DateTime(parsed.with_timezone(&Utc)))
                .map_err(|e| debug!(error = %e, "unparseable dateTime"))
                .ok();
        }
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(RawEventTime::Date)
            .map_err(|e| debug!(error = %e, "unparseable date"))
            .ok()
    }
}

impl ApiEvent {
    /// Converts to a [`RawEvent`]; events without an id have no identity
    /// and are skipped.
    pub fn into_raw(self) -> Option<RawEvent> {
        let id = self.id?;
        Some(RawEvent {
            start: self.start.as_ref().and_then(ApiEventTime::parse),
            end: self.end.as_ref().and_then(ApiEventTime::parse),
            id,
            summary: self.summary,
            color_id: self.color_id,
            location: self.location,
            description: self.description,
            status: self.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn parses_page_with_token() {
        let json = r#"{
            "items": [
                {
                    "id": "evt1",
                    "summary": "K2 Ahmet",
                    "colorId": "11",
                    "start": { "dateTime": "2025-02-05T10:00:00+03:00" },
                    "end": { "dateTime": "2025-02-05T10:20:00+03:00" },
                    "status": "confirmed"
                }
            ],
            "nextPageToken": "page-2"
        }"#;
        let page: EventListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("page-2"));

        let raw = page.items.into_iter().next().unwrap().into_raw().unwrap();
        assert_eq!(raw.id, "evt1");
        assert_eq!(raw.color_id.as_deref(), Some("11"));
        assert_eq!(
            raw.start,
            Some(RawEventTime::DateTime(utc("2025-02-05T07:00:00Z")))
        );
        assert_eq!(
            raw.end,
            Some(RawEventTime::DateTime(utc("2025-02-05T07:20:00Z")))
        );
    }

    #[test]
    fn parses_all_day_event() {
        let json = r#"{
            "id": "holiday",
            "summary": "Tatil",
            "start": { "date": "2025-02-05" },
            "end": { "date": "2025-02-06" }
        }"#;
        let raw = serde_json::from_str::<ApiEvent>(json)
            .unwrap()
            .into_raw()
            .unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();
        assert_eq!(raw.start, Some(RawEventTime::Date(day)));
    }

    #[test]
    fn malformed_times_become_none() {
        let json = r#"{
            "id": "broken",
            "start": { "dateTime": "yesterday at noon" },
            "end": {}
        }"#;
        let raw = serde_json::from_str::<ApiEvent>(json)
            .unwrap()
            .into_raw()
            .unwrap();
        assert!(raw.start.is_none());
        assert!(raw.end.is_none());
    }

    #[test]
    fn missing_id_is_skipped() {
        let json = r#"{ "summary": "ghost" }"#;
        assert!(serde_json::from_str::<ApiEvent>(json).unwrap().into_raw().is_none());
    }

    #[test]
    fn document_accepts_both_shapes() {
        let page: EventsDocument = serde_json::from_str(r#"{"items": [{"id": "a"}]}"#).unwrap();
        let bare: EventsDocument = serde_json::from_str(r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
        assert_eq!(page.into_items().len(), 1);
        assert_eq!(bare.into_items().len(), 2);
    }
}
