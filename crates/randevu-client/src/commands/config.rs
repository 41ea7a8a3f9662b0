//! `randevu config`: inspect the configuration.

use std::path::{Path, PathBuf};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// The file the configuration was (or would be) read from.
pub fn source_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(ClientConfig::default_path)
}

/// Renders the effective configuration, defaults included.
pub fn render(config: &ClientConfig) -> ClientResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| ClientError::config(format!("failed to serialize config: {}", e)))
}

/// Dump the effective configuration to stdout.
pub fn dump(config: &ClientConfig, explicit: Option<&Path>) -> ClientResult<()> {
    println!("# config.toml ({})", source_path(explicit).display());
    println!("{}", render(config)?);
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    config.validate()?;

    #[cfg(feature = "google")]
    if let Some(ref google) = config.google {
        google.to_provider_config()?;
        println!("Google access token resolved.");
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration and snapshot paths.
pub fn path(config: &ClientConfig, explicit: Option<&Path>) -> ClientResult<()> {
    println!("config: {}", source_path(explicit).display());
    println!("snapshot: {}", config.snapshot_path().display());
    Ok(())
}
