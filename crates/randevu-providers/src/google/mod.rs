//! Google Calendar provider.
//!
//! Reads a single calendar with a bearer token, expanding recurring events
//! server-side (`singleEvents=true`) and draining every result page.
//!
//! # Example
//!
//! ```ignore
//! use randevu_providers::google::{GoogleConfig, GoogleProvider};
//!
//! let provider = GoogleProvider::new(GoogleConfig::new("primary", token))?;
//! let result = provider.fetch_events(FetchOptions::new().with_time_min(now)).await?;
//! ```

mod client;
mod config;
mod provider;

pub use client::GoogleCalendarClient;
pub use config::GoogleConfig;
pub use provider::GoogleProvider;
