//! Google Calendar provider implementation.

use tracing::{debug, instrument};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CalendarProvider, FetchOptions, FetchResult};

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;

/// Reads one Google calendar through the v3 API.
#[derive(Debug)]
pub struct GoogleProvider {
    config: GoogleConfig,
    client: GoogleCalendarClient,
}

impl GoogleProvider {
    pub const NAME: &'static str = "google";

    /// Creates a provider; fails if the configuration is incomplete.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|e| ProviderError::configuration(e).with_provider(Self::NAME))?;
        let client = GoogleCalendarClient::new(&config.access_token, config.timeout)
            .map_err(|e| e.with_provider(Self::NAME))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    #[instrument(skip(self), fields(calendar = %self.config.calendar_id))]
    async fn fetch(&self, options: FetchOptions) -> ProviderResult<FetchResult> {
        let options = FetchOptions {
            page_size: options.page_size.or(Some(self.config.page_size)),
            ..options
        };
        let (events, pages) = self
            .client
            .list_events(&self.config.calendar_id, &options)
            .await
            .map_err(|e| e.with_provider(Self::NAME))?;
        debug!(count = events.len(), pages, "google fetch complete");
        Ok(FetchResult::with_events(events).with_pages(pages))
    }
}

impl CalendarProvider for GoogleProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch_events(&self, options: FetchOptions) -> BoxFuture<'_, ProviderResult<FetchResult>> {
        Box::pin(self.fetch(options))
    }
}
