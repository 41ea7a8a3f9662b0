//! Caching half of the calendar source adapter, plus the request-scoped
//! schedule service.
//!
//! - [`CachedSource`]: fresh cache, upstream, stale cache, disk snapshot
//! - [`ScheduleService`]: one source read and one pipeline run per request
//! - [`Clock`]: injectable time, so cache expiry is testable
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use randevu_core::{Language, Pipeline};
//! use randevu_providers::FileProvider;
//! use randevu_server::{CachedSource, ScheduleService, ServerConfig, SystemClock};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let clock = Arc::new(SystemClock);
//! let source = CachedSource::new(
//!     Box::new(FileProvider::new("events.json")),
//!     &ServerConfig::default(),
//!     clock.clone(),
//! );
//! let service = ScheduleService::new(source, Pipeline::default(), clock);
//! let records = service.upcoming(7, Language::Tr).await?;
//! # Ok(())
//! # }
//! ```

mod cache;
mod clock;
mod config;
mod error;
mod service;
mod snapshot;
mod source;

pub use cache::{CacheEntry, EventCache, FetchWindow};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use service::ScheduleService;
pub use snapshot::SnapshotStore;
pub use source::{CachedSource, SourceOrigin, Sourced};
