//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Settings of the caching source adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// How long a fetched event list is served without asking upstream.
    pub cache_ttl: Duration,
    /// Last-known-good snapshot location; `None` disables the disk tier.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(Self::DEFAULT_TTL_SECS),
            snapshot_path: None,
        }
    }
}

impl ServerConfig {
    pub const DEFAULT_TTL_SECS: u64 = 300;

    /// Builder: set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Builder: enable the on-disk snapshot.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// TTL as a chrono duration, saturating on overflow.
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.cache_ttl).unwrap_or(chrono::Duration::MAX)
    }
}
