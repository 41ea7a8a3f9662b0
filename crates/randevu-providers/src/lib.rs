//! Upstream half of the calendar source adapter.
//!
//! - [`CalendarProvider`]: the trait every event source implements
//! - [`GoogleProvider`](google::GoogleProvider): Calendar v3 over HTTPS
//!   (feature `google`)
//! - [`FileProvider`]: an exported events file on disk
//! - [`normalize_events`]: raw events to the core's [`CalendarEvent`],
//!   dropping the unusable ones
//!
//! ```text
//!  Google API        events.json
//!      │                  │
//!      ▼                  ▼
//! GoogleProvider     FileProvider
//!      └───── RawEvent ───┘
//!               │ normalize_events()
//!               ▼
//!         CalendarEvent
//! ```
//!
//! [`CalendarEvent`]: randevu_core::CalendarEvent

pub mod error;
pub mod file;
#[cfg(feature = "google")]
pub mod google;
pub mod normalize;
pub mod provider;
pub mod raw_event;
mod wire;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use file::FileProvider;
pub use normalize::{normalize_event, normalize_events};
pub use provider::{BoxFuture, CalendarProvider, ErrorProvider, FetchOptions, FetchResult};
pub use raw_event::{RawEvent, RawEventTime};
