//! CalendarProvider trait definition.
//!
//! A provider answers one question: which events does the upstream calendar
//! hold from a lower bound onwards. Pagination, authentication and file
//! handling stay inside the implementation; callers always receive the fully
//! drained list.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{RawEvent, RawEventTime};

/// Events returned by one fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub events: Vec<RawEvent>,
    /// Number of upstream pages drained to build `events`.
    pub pages: usize,
}

impl FetchResult {
    pub fn with_events(events: Vec<RawEvent>) -> Self {
        Self { events, pages: 1 }
    }

    /// Builder method to record how many pages were read.
    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages;
        self
    }
}

/// Options for fetching events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Events ending at or before this instant are not wanted.
    pub time_min: Option<DateTime<Utc>>,
    /// Events starting at or after this instant are not wanted.
    pub time_max: Option<DateTime<Utc>>,
    /// Upstream page size hint.
    pub page_size: Option<usize>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_min(mut self, time_min: DateTime<Utc>) -> Self {
        self.time_min = Some(time_min);
        self
    }

    pub fn with_time_max(mut self, time_max: DateTime<Utc>) -> Self {
        self.time_max = Some(time_max);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Whether a fetched event falls inside the requested bounds.
    ///
    /// Only timed bounds are checked; all-day events and events with a
    /// missing end are always admitted and left to later stages.
    pub fn admits(&self, event: &RawEvent) -> bool {
        let instant = |time: Option<RawEventTime>| match time {
            Some(RawEventTime::DateTime(dt)) => Some(dt),
            _ => None,
        };
        let ends_after_min = match (self.time_min, instant(event.end)) {
            (Some(min), Some(end)) => end > min,
            _ => true,
        };
        let starts_before_max = match (self.time_max, instant(event.start)) {
            (Some(max), Some(start)) => start < max,
            _ => true,
        };
        ends_after_min && starts_before_max
    }
}

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe, so the caching layer can hold a
/// `Box<dyn CalendarProvider>` chosen at runtime.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An upstream source of calendar events.
pub trait CalendarProvider: Send + Sync {
    /// Short name used in logs and error messages (e.g. "google", "file").
    fn name(&self) -> &str;

    /// Fetches every event matching `options`, draining all pages.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, rejected credentials,
    /// unreadable files and undecodable responses.
    fn fetch_events(&self, options: FetchOptions) -> BoxFuture<'_, ProviderResult<FetchResult>>;
}

/// A provider that always fails with the same error.
///
/// Stands in when the configured provider cannot be built, so the caching
/// layer can still serve a snapshot.
#[derive(Debug)]
pub struct ErrorProvider {
    name: String,
    error: ProviderError,
}

impl ErrorProvider {
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl CalendarProvider for ErrorProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events(&self, _options: FetchOptions) -> BoxFuture<'_, ProviderResult<FetchResult>> {
        // ProviderError is not Clone because of its boxed source.
        let error =
            ProviderError::new(self.error.code(), self.error.message()).with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use chrono::NaiveDate;

    fn utc(h: u32) -> DateTime<Utc> {
        format!("2025-02-05T{h:02}:00:00Z").parse().unwrap()
    }

    fn timed(start: u32, end: u32) -> RawEvent {
        RawEvent::new("evt").with_span(
            RawEventTime::from_datetime(utc(start)),
            RawEventTime::from_datetime(utc(end)),
        )
    }

    mod options {
        use super::*;

        #[test]
        fn builder() {
            let options = FetchOptions::new()
                .with_time_min(utc(6))
                .with_time_max(utc(20))
                .with_page_size(250);
            assert_eq!(options.time_min, Some(utc(6)));
            assert_eq!(options.time_max, Some(utc(20)));
            assert_eq!(options.page_size, Some(250));
        }

        #[test]
        fn unbounded_admits_everything() {
            assert!(FetchOptions::new().admits(&timed(1, 2)));
            assert!(FetchOptions::new().admits(&RawEvent::new("no-span")));
        }

        #[test]
        fn bounds_are_half_open() {
            let options = FetchOptions::new().with_time_min(utc(8)).with_time_max(utc(12));
            assert!(!options.admits(&timed(7, 8)));
            assert!(options.admits(&timed(7, 9)));
            assert!(options.admits(&timed(11, 13)));
            assert!(!options.admits(&timed(12, 13)));
        }

        #[test]
        fn all_day_events_are_admitted() {
            let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
            let event = RawEvent::new("holiday")
                .with_span(RawEventTime::from_date(day), RawEventTime::from_date(day));
            let options = FetchOptions::new().with_time_min(utc(8));
            assert!(options.admits(&event));
        }
    }

    #[test]
    fn fetch_result_pages() {
        let result = FetchResult::with_events(vec![timed(7, 8)]).with_pages(3);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.pages, 3);
        assert_eq!(FetchResult::default().pages, 0);
    }

    #[tokio::test]
    async fn error_provider_always_fails() {
        let provider = ErrorProvider::new("google", ProviderError::configuration("no token"));
        let err = provider.fetch_events(FetchOptions::new()).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
        assert_eq!(err.provider(), Some("google"));
        assert_eq!(provider.name(), "google");
    }
}
