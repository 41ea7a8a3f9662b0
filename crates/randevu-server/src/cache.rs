//! Event cache with TTL (Time-To-Live) support.
//!
//! The cache holds a single entry: the last event list fetched from the
//! upstream calendar together with the window it was fetched for. Freshness
//! is judged against an injected clock reading, never `Instant::now()`.

use chrono::{DateTime, Duration, Utc};
use randevu_core::CalendarEvent;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lower and upper fetch bounds; `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
}

impl FetchWindow {
    pub fn new(time_min: Option<DateTime<Utc>>, time_max: Option<DateTime<Utc>>) -> Self {
        Self { time_min, time_max }
    }

    /// Whether data fetched for `self` answers a request for `other`.
    pub fn covers(&self, other: &FetchWindow) -> bool {
        let lower = match (self.time_min, other.time_min) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => mine <= theirs,
        };
        let upper = match (self.time_max, other.time_max) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => mine >= theirs,
        };
        lower && upper
    }
}

/// Cache entry containing events and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub events: Vec<CalendarEvent>,
    /// When the upstream answered.
    pub fetched_at: DateTime<Utc>,
    pub window: FetchWindow,
}

impl CacheEntry {
    pub fn new(events: Vec<CalendarEvent>, fetched_at: DateTime<Utc>, window: FetchWindow) -> Self {
        Self {
            events,
            fetched_at,
            window,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    /// Returns true if the entry is younger than `ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}

/// Single-entry event cache.
#[derive(Debug)]
pub struct EventCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl Default for EventCache {
    fn default() -> Self {
        Self::new(Duration::minutes(5))
    }
}

impl EventCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The entry, if it is fresh and was fetched for a covering window.
    pub fn fresh(&self, now: DateTime<Utc>, window: &FetchWindow) -> Option<&CacheEntry> {
        self.entry
            .as_ref()
            .filter(|entry| entry.is_fresh(now, self.ttl) && entry.window.covers(window))
    }

    /// The entry regardless of age, if it was fetched for a covering window.
    pub fn stale(&self, window: &FetchWindow) -> Option<&CacheEntry> {
        self.entry.as_ref().filter(|entry| entry.window.covers(window))
    }

    /// Replaces the entry. Concurrent refreshes race; the last one wins.
    pub fn store(&mut self, entry: CacheEntry) {
        debug!(
            events = entry.events.len(),
            fetched_at = %entry.fetched_at,
            "stored cache entry"
        );
        self.entry = Some(entry);
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}
