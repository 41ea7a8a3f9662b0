//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/randevu/config.toml` by default. Every policy input the
//! pipeline uses is named here and can be overridden.
//!
//! The Google `access_token` supports secret references (`pass::…`,
//! `env::…`), see [`crate::secret`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use randevu_core::{CivilZone, ClassifierConfig, Language, Pipeline, PipelineConfig, PolicyConfig};
use randevu_server::ServerConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

const DEFAULT_TIMEZONE: &str = "Europe/Istanbul";

/// Configuration for the randevu client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// IANA zone all business hours are expressed in.
    pub timezone: String,

    /// Language of generated titles.
    pub language: Language,

    /// Debug mode.
    pub debug: bool,

    /// Google Calendar settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<GoogleSettings>,

    pub cache: CacheSettings,

    pub policy: PolicyConfig,

    pub classifier: ClassifierConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            language: Language::default(),
            debug: false,
            google: None,
            cache: CacheSettings::default(),
            policy: PolicyConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Upstream cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds a fetched event list is served without refetching.
    pub ttl_secs: u64,

    /// Last-known-good snapshot; defaults to the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: ServerConfig::DEFAULT_TTL_SECS,
            snapshot_path: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it does
    /// not exist.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> ClientResult<Self> {
        toml::from_str(content).map_err(|e| ClientError::config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("randevu")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("randevu")
    }

    pub fn zone(&self) -> ClientResult<CivilZone> {
        Ok(CivilZone::from_name(&self.timezone)?)
    }

    pub fn pipeline_config(&self) -> ClientResult<PipelineConfig> {
        Ok(PipelineConfig {
            zone: self.zone()?,
            classifier: self.classifier.clone(),
            policy: self.policy.clone(),
            ..PipelineConfig::default()
        })
    }

    /// Builds the pipeline, validating every policy input.
    pub fn pipeline(&self) -> ClientResult<Pipeline> {
        Ok(Pipeline::new(self.pipeline_config()?)?)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.cache
            .snapshot_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("snapshot.json"))
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::default()
            .with_cache_ttl(Duration::from_secs(self.cache.ttl_secs))
            .with_snapshot_path(self.snapshot_path())
    }

    /// Checks everything that can be checked without network access.
    pub fn validate(&self) -> ClientResult<()> {
        self.pipeline()?;
        if self.classifier.surgery_duration_minutes <= 0 {
            return Err(ClientError::config(
                "classifier.surgery_duration_minutes must be positive",
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ClientError::config("cache.ttl_secs must be positive"));
        }
        if let Some(ref google) = self.google {
            google.validate()?;
        }
        Ok(())
    }
}

/// Google Calendar provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// Calendar to read.
    pub calendar_id: String,

    /// OAuth bearer token (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Events per upstream page.
    pub page_size: usize,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            calendar_id: "primary".to_string(),
            access_token: None,
            timeout_secs: 30,
            page_size: 250,
        }
    }
}

impl GoogleSettings {
    fn validate(&self) -> ClientResult<()> {
        if self.calendar_id.trim().is_empty() {
            return Err(ClientError::config("google.calendar_id must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::config("google.timeout_secs must be positive"));
        }
        if self.page_size == 0 || self.page_size > 2500 {
            return Err(ClientError::config(format!(
                "google.page_size must be between 1 and 2500, got {}",
                self.page_size
            )));
        }
        if self.access_token.is_none() {
            return Err(ClientError::config(format!(
                "google.access_token is missing. Add to {}:\n  \
                 [google]\n  \
                 access_token = \"env::RANDEVU_GOOGLE_TOKEN\"",
                ClientConfig::default_path().display()
            )));
        }
        Ok(())
    }

    /// Resolves the token (expanding secret references) and builds the
    /// provider configuration.
    #[cfg(feature = "google")]
    pub fn to_provider_config(&self) -> ClientResult<randevu_providers::google::GoogleConfig> {
        use randevu_providers::google::GoogleConfig;

        self.validate()?;
        let raw = self.access_token.as_deref().unwrap_or_default();
        let token = crate::secret::resolve(raw)
            .map_err(|e| ClientError::config(format!("failed to resolve access_token: {}", e)))?;

        let config = GoogleConfig::new(&self.calendar_id, token)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_page_size(self.page_size);
        config.validate().map_err(ClientError::Config)?;
        Ok(config)
    }
}
