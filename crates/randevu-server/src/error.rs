//! Server error types.

use std::io;
use std::path::PathBuf;

use randevu_core::PolicyError;
use randevu_providers::ProviderError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving a schedule.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Snapshot file could not be read or written.
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot file exists but does not decode.
    #[error("snapshot at {path} is corrupt: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Pipeline configuration rejected.
    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Upstream failed and neither the cache nor a snapshot could stand in.
    #[error("no calendar data available: {source}")]
    NoData {
        #[source]
        source: ProviderError,
    },
}

impl ServerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
