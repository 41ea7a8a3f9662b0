//! Caching source adapter.
//!
//! [`CachedSource`] answers "which events exist in this window" in four
//! tiers, stopping at the first that succeeds:
//!
//! 1. a fresh cache entry covering the window
//! 2. the upstream provider (result cached and snapshotted)
//! 3. the cached entry, however old
//! 4. the on-disk snapshot
//!
//! Fallback tiers only answer for windows they were fetched for; a day the
//! fallback never saw would otherwise look empty and be offered as free.
//!
//! Callers cannot tell the tiers apart from the events alone; the tier is
//! reported in [`Sourced::origin`] and logged.

use std::fmt;
use std::sync::Arc;

use randevu_core::CalendarEvent;
use randevu_providers::{CalendarProvider, FetchOptions, ProviderError, normalize_events};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, EventCache, FetchWindow};
use crate::clock::Clock;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::snapshot::SnapshotStore;

/// Which tier produced a [`Sourced`] answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    Cache,
    Upstream,
    StaleCache,
    Snapshot,
}

impl SourceOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Upstream => "upstream",
            Self::StaleCache => "stale_cache",
            Self::Snapshot => "snapshot",
        }
    }

    /// True for the two fallback tiers.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::StaleCache | Self::Snapshot)
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events plus the tier they came from.
#[derive(Debug, Clone)]
pub struct Sourced {
    pub events: Vec<CalendarEvent>,
    pub origin: SourceOrigin,
}

/// Provider wrapped in a TTL cache and a disk snapshot.
pub struct CachedSource {
    provider: Box<dyn CalendarProvider>,
    cache: RwLock<EventCache>,
    snapshot: Option<SnapshotStore>,
    clock: Arc<dyn Clock>,
    page_size: Option<usize>,
}

impl fmt::Debug for CachedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSource")
            .field("provider", &self.provider.name())
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

impl CachedSource {
    pub fn new(provider: Box<dyn CalendarProvider>, config: &ServerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            cache: RwLock::new(EventCache::new(config.ttl())),
            snapshot: config.snapshot_path.as_ref().map(SnapshotStore::new),
            clock,
            page_size: None,
        }
    }

    /// Builder: page size hint passed to the provider.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Drops the in-memory entry; the snapshot is kept.
    pub async fn invalidate(&self) {
        self.cache.write().await.clear();
    }

    /// Returns the events of `window`, falling back through the tiers.
    ///
    /// # Errors
    ///
    /// [`ServerError::NoData`] when upstream fails and neither the cache nor
    /// the snapshot holds an entry covering `window`.
    pub async fn events(&self, window: FetchWindow) -> ServerResult<Sourced> {
        let now = self.clock.now();

        if let Some(entry) = self.cache.read().await.fresh(now, &window) {
            debug!(
                age_secs = entry.age(now).num_seconds(),
                events = entry.events.len(),
                "serving fresh cache"
            );
            return Ok(Sourced {
                events: entry.events.clone(),
                origin: SourceOrigin::Cache,
            });
        }

        // The lock is not held across the fetch; a concurrent refresh may
        // overwrite this one.
        match self.fetch(window).await {
            Ok(entry) => {
                let events = entry.events.clone();
                self.persist(&entry).await;
                self.cache.write().await.store(entry);
                Ok(Sourced {
                    events,
                    origin: SourceOrigin::Upstream,
                })
            }
            Err(error) => self.fall_back(error, &window).await,
        }
    }

    async fn fetch(&self, window: FetchWindow) -> Result<CacheEntry, ProviderError> {
        let mut options = FetchOptions::new();
        options.time_min = window.time_min;
        options.time_max = window.time_max;
        options.page_size = self.page_size;

        let result = self.provider.fetch_events(options).await?;
        let events = normalize_events(&result.events);
        info!(
            provider = self.provider.name(),
            fetched = result.events.len(),
            kept = events.len(),
            pages = result.pages,
            "fetched events from upstream"
        );
        Ok(CacheEntry::new(events, self.clock.now(), window))
    }

    async fn persist(&self, entry: &CacheEntry) {
        if let Some(ref store) = self.snapshot {
            if let Err(e) = store.save(entry).await {
                warn!(error = %e, "failed to write snapshot");
            }
        }
    }

    async fn fall_back(&self, error: ProviderError, window: &FetchWindow) -> ServerResult<Sourced> {
        warn!(
            provider = self.provider.name(),
            error = %error,
            retryable = error.is_retryable(),
            "upstream fetch failed"
        );

        if let Some(entry) = self.cache.read().await.stale(window) {
            warn!(
                age_secs = entry.age(self.clock.now()).num_seconds(),
                events = entry.events.len(),
                "serving stale cache"
            );
            return Ok(Sourced {
                events: entry.events.clone(),
                origin: SourceOrigin::StaleCache,
            });
        }

        if let Some(ref store) = self.snapshot {
            match store.load().await {
                Ok(Some(entry)) if entry.window.covers(window) => {
                    warn!(
                        path = %store.path().display(),
                        fetched_at = %entry.fetched_at,
                        events = entry.events.len(),
                        "serving on-disk snapshot"
                    );
                    return Ok(Sourced {
                        events: entry.events,
                        origin: SourceOrigin::Snapshot,
                    });
                }
                Ok(Some(entry)) => debug!(
                    path = %store.path().display(),
                    fetched_at = %entry.fetched_at,
                    "snapshot does not cover the requested window"
                ),
                Ok(None) => debug!(path = %store.path().display(), "no snapshot on disk"),
                Err(e) => warn!(error = %e, "failed to read snapshot"),
            }
        }

        Err(ServerError::NoData { source: error })
    }
}
