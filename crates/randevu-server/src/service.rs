//! Request-scoped schedule service.
//!
//! Each call reads events through the [`CachedSource`] and runs the pure
//! pipeline over them. No state survives a call except the source's cache.

use std::sync::Arc;

use randevu_core::{Language, Pipeline, PublicEvent, ScheduleRequest};
use tracing::{info, instrument};

use crate::cache::FetchWindow;
use crate::clock::Clock;
use crate::error::ServerResult;
use crate::source::CachedSource;

/// Source adapter and pipeline wired together.
#[derive(Debug)]
pub struct ScheduleService {
    source: CachedSource,
    pipeline: Pipeline,
    clock: Arc<dyn Clock>,
}

impl ScheduleService {
    pub fn new(source: CachedSource, pipeline: Pipeline, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            pipeline,
            clock,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn source(&self) -> &CachedSource {
        &self.source
    }

    /// Public records for an explicit request.
    #[instrument(skip(self), fields(first_day = %request.first_day, days = request.days))]
    pub async fn schedule(&self, request: &ScheduleRequest) -> ServerResult<Vec<PublicEvent>> {
        let range = request.range(self.pipeline.zone());
        let sourced = self
            .source
            .events(FetchWindow::new(Some(range.start), Some(range.end)))
            .await?;
        let records = self.pipeline.run(&sourced.events, request);
        info!(
            origin = %sourced.origin,
            events = sourced.events.len(),
            records = records.len(),
            "served schedule"
        );
        Ok(records)
    }

    /// Public records for `days` days starting today, with past time never
    /// offered as available.
    pub async fn upcoming(&self, days: u32, language: Language) -> ServerResult<Vec<PublicEvent>> {
        let now = self.clock.now();
        let today = self.pipeline.zone().date_of(now);
        let request = ScheduleRequest::new(today, days)
            .with_not_before(now)
            .with_language(language);
        self.schedule(&request).await
    }
}
