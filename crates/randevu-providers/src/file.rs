//! Provider backed by an exported events file.
//!
//! The file holds a Google `events.list` response, or just its `items`
//! array. Useful offline and as a reproducible fixture for the pipeline.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CalendarProvider, FetchOptions, FetchResult};
use crate::raw_event::RawEvent;
use crate::wire::EventsDocument;

/// Reads events from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub const NAME: &'static str = "file";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn fetch(&self, options: FetchOptions) -> ProviderResult<FetchResult> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.read_error(e))?;
        let events = parse_events(&content).map_err(|e| e.with_provider(Self::NAME))?;
        let total = events.len();
        let events: Vec<RawEvent> = events.into_iter().filter(|e| options.admits(e)).collect();
        debug!(
            path = %self.path.display(),
            total,
            kept = events.len(),
            "read events file"
        );
        Ok(FetchResult::with_events(events))
    }

    fn read_error(&self, error: io::Error) -> ProviderError {
        let message = format!("{}", self.path.display());
        let base = match error.kind() {
            io::ErrorKind::NotFound => ProviderError::not_found(message),
            _ => ProviderError::unreadable(message),
        };
        base.with_provider(Self::NAME).with_source(error)
    }
}

/// Parses an events document into raw events, skipping id-less items.
pub fn parse_events(json: &str) -> ProviderResult<Vec<RawEvent>> {
    let document: EventsDocument = serde_json::from_str(json).map_err(|e| {
        ProviderError::invalid_response(format!("invalid events file: {}", e)).with_source(e)
    })?;
    Ok(document
        .into_items()
        .into_iter()
        .filter_map(|item| item.into_raw())
        .collect())
}

impl CalendarProvider for FileProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch_events(&self, options: FetchOptions) -> BoxFuture<'_, ProviderResult<FetchResult>> {
        Box::pin(self.fetch(options))
    }
}
