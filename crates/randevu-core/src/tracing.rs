//! Tracing setup shared by the randevu crates.
//!
//! # Usage
//!
//! For the CLI:
//! ```ignore
//! use randevu_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::cli(debug))?;
//! ```
//!
//! For a long-running service:
//! ```ignore
//! init_tracing(TracingConfig::service())?;
//! ```
//!
//! Event titles and normalized names are only ever logged at `TRACE`.
//! Nothing below `DEBUG` is enabled unless asked for explicitly.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Log targets of the workspace crates.
pub const TARGETS: &[&str] = &["randevu", "randevu_core", "randevu_providers", "randevu_server"];

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Compact single-line format (default)
    #[default]
    Compact,
    /// JSON lines, for log shippers
    Json,
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for the workspace targets when RUST_LOG is not set
    pub default_level: Level,
    pub output_format: TracingOutputFormat,
    /// Whether to include file/line information in logs
    pub include_location: bool,
    pub include_target: bool,
    pub include_timestamp: bool,
    /// Whether to include span open/close events
    pub include_span_events: bool,
    /// Write to stderr so stdout stays machine-readable
    pub to_stderr: bool,
    /// Custom env filter directive (overrides default_level if set)
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_target: true,
            include_timestamp: true,
            include_span_events: false,
            to_stderr: true,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// CLI preset: quiet by default, `DEBUG` with source locations when
    /// `debug` is set.
    #[must_use]
    pub fn cli(debug: bool) -> Self {
        if debug {
            Self {
                default_level: Level::DEBUG,
                include_location: true,
                include_timestamp: false,
                ..Self::default()
            }
        } else {
            Self::default()
        }
    }

    /// Service preset: JSON lines at `INFO` with span events.
    #[must_use]
    pub fn service() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Json,
            include_location: true,
            include_span_events: true,
            ..Self::default()
        }
    }

    /// Set the default log level
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set a custom env filter directive
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// The filter directive used when neither `env_filter` nor `RUST_LOG`
    /// is set: every workspace target at `default_level`, others at `WARN`.
    pub fn default_directive(&self) -> String {
        std::iter::once("warn".to_string())
            .chain(
                TARGETS
                    .iter()
                    .map(|target| format!("{}={}", target, self.default_level)),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    fn filter(&self) -> Result<EnvFilter, TracingError> {
        match &self.env_filter {
            Some(filter) => Ok(EnvFilter::try_new(filter)?),
            None => Ok(EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(self.default_directive()))?),
        }
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.include_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        macro_rules! finish {
            ($layer:expr) => {{
                let layer = $layer
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(self.include_target)
                    .with_span_events(span_events);
                if self.to_stderr {
                    if self.include_timestamp {
                        layer.with_writer(std::io::stderr).boxed()
                    } else {
                        layer.without_time().with_writer(std::io::stderr).boxed()
                    }
                } else if self.include_timestamp {
                    layer.boxed()
                } else {
                    layer.without_time().boxed()
                }
            }};
        }

        match self.output_format {
            TracingOutputFormat::Pretty => finish!(fmt::layer().pretty()),
            TracingOutputFormat::Compact => finish!(fmt::layer().compact()),
            TracingOutputFormat::Json => finish!(fmt::layer().json()),
        }
    }
}

/// Initialize tracing with the given configuration.
///
/// Call once at startup. `RUST_LOG` overrides the default directive.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set or if
/// the env filter directive is invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.filter()?;
    let subscriber = tracing_subscriber::registry()
        .with(config.layer())
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
