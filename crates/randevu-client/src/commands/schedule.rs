//! `randevu schedule`: print the public schedule.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use randevu_core::{Language, PublicEvent, ScheduleRequest};
use randevu_providers::{CalendarProvider, FileProvider};
use randevu_server::{CachedSource, Clock, ScheduleService, ServerConfig, SystemClock};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Options of one `schedule` invocation.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOptions {
    /// First day; `None` means today with past time clipped.
    pub from: Option<NaiveDate>,
    pub days: u32,
    pub events_file: Option<PathBuf>,
    pub language: Option<Language>,
    pub pretty: bool,
}

fn provider(
    config: &ClientConfig,
    options: &ScheduleOptions,
) -> ClientResult<Box<dyn CalendarProvider>> {
    if let Some(ref path) = options.events_file {
        debug!(path = %path.display(), "reading events from file");
        return Ok(Box::new(FileProvider::new(path)));
    }

    #[cfg(feature = "google")]
    if let Some(ref google) = config.google {
        let provider = randevu_providers::google::GoogleProvider::new(google.to_provider_config()?)?;
        return Ok(Box::new(provider));
    }

    Err(ClientError::config(format!(
        "no event source: pass --events-file or add a [google] section to {}",
        ClientConfig::default_path().display()
    )))
}

fn server_config(config: &ClientConfig, options: &ScheduleOptions) -> ServerConfig {
    let server = config.server_config();
    // Offline runs must not overwrite the upstream snapshot.
    if options.events_file.is_some() {
        ServerConfig {
            snapshot_path: None,
            ..server
        }
    } else {
        server
    }
}

/// Builds the service for one invocation.
pub fn service(
    config: &ClientConfig,
    options: &ScheduleOptions,
    clock: Arc<dyn Clock>,
) -> ClientResult<ScheduleService> {
    let pipeline = config.pipeline()?;
    let mut source = CachedSource::new(
        provider(config, options)?,
        &server_config(config, options),
        clock.clone(),
    );
    if let Some(ref google) = config.google {
        source = source.with_page_size(google.page_size);
    }
    Ok(ScheduleService::new(source, pipeline, clock))
}

/// Computes the public records for `options`.
pub async fn records(
    config: &ClientConfig,
    options: &ScheduleOptions,
    clock: Arc<dyn Clock>,
) -> ClientResult<Vec<PublicEvent>> {
    let service = service(config, options, clock)?;
    let language = options.language.unwrap_or(config.language);
    let records = match options.from {
        Some(first_day) => {
            let request = ScheduleRequest::new(first_day, options.days).with_language(language);
            service.schedule(&request).await?
        }
        None => service.upcoming(options.days, language).await?,
    };
    Ok(records)
}

/// Prints the schedule as a JSON array.
pub async fn run(config: &ClientConfig, options: ScheduleOptions) -> ClientResult<()> {
    let records = records(config, &options, Arc::new(SystemClock)).await?;
    let json = if options.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use randevu_core::Category;
    use randevu_server::ManualClock;

    // Monday 2025-02-10, Istanbul (UTC+3).
    const EVENTS: &str = r#"[
        {
            "id": "k1",
            "summary": "K1 Fatma Şahin",
            "start": { "dateTime": "2025-02-10T10:00:00+03:00" },
            "end": { "dateTime": "2025-02-10T10:20:00+03:00" }
        },
        {
            "id": "o1",
            "summary": "online Hasan Öztürk",
            "start": { "dateTime": "2025-02-10T18:00:00+03:00" },
            "end": { "dateTime": "2025-02-10T18:30:00+03:00" }
        }
    ]"#;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 2, 10, 5, 0, 0).unwrap()))
    }

    fn options(path: PathBuf) -> ScheduleOptions {
        ScheduleOptions {
            from: NaiveDate::from_ymd_opt(2025, 2, 10),
            days: 1,
            events_file: Some(path),
            language: Some(Language::En),
            pretty: false,
        }
    }

    #[tokio::test]
    async fn file_source_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, EVENTS).unwrap();

        let records = records(&ClientConfig::default(), &options(path), clock())
            .await
            .unwrap();

        let busy: Vec<(&str, Category)> = records
            .iter()
            .filter(|r| r.category != Category::Available)
            .map(|r| (r.id.as_str(), r.category))
            .collect();
        assert_eq!(busy, vec![("k1", Category::Control), ("o1", Category::Online)]);
        assert_eq!(records[0].id, "available-20250210T0800");
        assert_eq!(records[0].title, "Available");

        let json = serde_json::to_string(&records).unwrap();
        for leak in ["Fatma", "Şahin", "Hasan", "Öztürk"] {
            assert!(!json.contains(leak), "{leak} leaked");
        }
    }

    #[tokio::test]
    async fn file_runs_leave_the_snapshot_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, EVENTS).unwrap();
        let snapshot = dir.path().join("snapshot.json");

        let mut config = ClientConfig::default();
        config.cache.snapshot_path = Some(snapshot.clone());
        records(&config, &options(path), clock()).await.unwrap();

        assert!(!snapshot.exists());
    }

    #[tokio::test]
    async fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = records(
            &ClientConfig::default(),
            &options(dir.path().join("missing.json")),
            clock(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ClientError::Server(_)));
    }

    #[test]
    fn no_source_configured() {
        let options = ScheduleOptions {
            days: 1,
            ..ScheduleOptions::default()
        };
        let err = service(&ClientConfig::default(), &options, clock()).unwrap_err();
        assert!(err.to_string().contains("--events-file"));
    }
}
