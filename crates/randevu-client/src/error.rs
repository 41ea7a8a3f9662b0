//! Client error types.

use randevu_core::{PolicyError, TracingError};
use randevu_providers::ProviderError;
use randevu_server::ServerError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider construction failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The schedule could not be produced.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Output could not be serialized.
    #[error("failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),

    /// Logging could not be initialised.
    #[error(transparent)]
    Tracing(#[from] TracingError),
}

impl ClientError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<PolicyError> for ClientError {
    fn from(err: PolicyError) -> Self {
        Self::Config(err.to_string())
    }
}
