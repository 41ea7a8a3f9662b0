//! Google Calendar provider configuration.

use std::time::Duration;

/// Configuration for the Google Calendar provider.
///
/// Token acquisition happens outside this crate; the provider only ever
/// sends the bearer token it is given.
#[derive(Clone)]
pub struct GoogleConfig {
    /// Calendar to read, e.g. `"primary"` or a group calendar address.
    pub calendar_id: String,
    /// OAuth access token with `calendar.readonly` scope.
    pub access_token: String,
    /// Request timeout.
    pub timeout: Duration,
    /// `maxResults` per page.
    pub page_size: usize,
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("calendar_id", &self.calendar_id)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Largest page the events endpoint serves.
    pub const MAX_PAGE_SIZE: usize = 2500;

    pub const DEFAULT_PAGE_SIZE: usize = 250;

    pub fn new(calendar_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            access_token: access_token.into(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.calendar_id.trim().is_empty() {
            return Err("calendar_id is required".to_string());
        }
        if self.access_token.trim().is_empty() {
            return Err("access_token is required".to_string());
        }
        if !(1..=Self::MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(format!(
                "page_size must be between 1 and {}",
                Self::MAX_PAGE_SIZE
            ));
        }
        Ok(())
    }
}
