//! Google Calendar API client.
//!
//! A thin wrapper over `events.list` that follows `nextPageToken` until the
//! listing is exhausted.

use std::time::Duration;

use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::FetchOptions;
use crate::raw_event::RawEvent;
use crate::wire::EventListResponse;

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Creates a client authenticating with a bearer token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::configuration("failed to build HTTP client").with_source(e))?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
            base_url: CALENDAR_API_BASE.to_string(),
        })
    }

    /// Points the client at another API root, e.g. a recording proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Lists every event of a calendar matching `options`.
    ///
    /// Returns the events and the number of pages read.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        options: &FetchOptions,
    ) -> ProviderResult<(Vec<RawEvent>, usize)> {
        let mut all_events = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0;

        loop {
            let page = self
                .list_events_page(calendar_id, options, page_token.as_deref())
                .await?;
            pages += 1;

            all_events.extend(page.items.into_iter().filter_map(|event| event.into_raw()));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = all_events.len(), pages, "fetched events from google");
        Ok((all_events, pages))
    }

    async fn list_events_page(
        &self,
        calendar_id: &str,
        options: &FetchOptions,
        page_token: Option<&str>,
    ) -> ProviderResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        let mut request = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("singleEvents", "true"), ("orderBy", "startTime")]);

        if let Some(min) = options.time_min {
            request = request.query(&[("timeMin", min.to_rfc3339())]);
        }
        if let Some(max) = options.time_max {
            request = request.query(&[("timeMax", max.to_rfc3339())]);
        }
        if let Some(size) = options.page_size {
            request = request.query(&[("maxResults", size.to_string())]);
        }
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else {
                format!("request failed: {}", e)
            };
            ProviderError::network(message).with_source(e)
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }

        if let Some(error) = status_error(status) {
            return Err(error);
        }

        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e)).with_source(e)
        })?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
                .with_source(e)
        })
    }
}

/// Maps a non-success status to an error, or `None` for 2xx.
fn status_error(status: reqwest::StatusCode) -> Option<ProviderError> {
    use reqwest::StatusCode;

    match status {
        s if s.is_success() => None,
        StatusCode::UNAUTHORIZED => Some(ProviderError::authentication(
            "access token expired or invalid",
        )),
        StatusCode::FORBIDDEN => Some(ProviderError::authorization("access denied to calendar")),
        StatusCode::NOT_FOUND => Some(ProviderError::not_found("calendar not found")),
        s if s.is_server_error() => Some(ProviderError::server(format!("API error ({})", s))),
        s => Some(ProviderError::invalid_response(format!(
            "unexpected status ({})",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use reqwest::StatusCode;

    #[test]
    fn status_mapping() {
        let code = |s: StatusCode| status_error(s).map(|e| e.code());
        assert_eq!(code(StatusCode::OK), None);
        assert_eq!(
            code(StatusCode::UNAUTHORIZED),
            Some(ProviderErrorCode::AuthenticationFailed)
        );
        assert_eq!(
            code(StatusCode::FORBIDDEN),
            Some(ProviderErrorCode::AuthorizationFailed)
        );
        assert_eq!(code(StatusCode::NOT_FOUND), Some(ProviderErrorCode::NotFound));
        assert_eq!(
            code(StatusCode::BAD_GATEWAY),
            Some(ProviderErrorCode::ServerError)
        );
        assert_eq!(
            code(StatusCode::BAD_REQUEST),
            Some(ProviderErrorCode::InvalidResponse)
        );
    }

    #[test]
    fn server_errors_are_retryable() {
        assert!(status_error(StatusCode::SERVICE_UNAVAILABLE)
            .is_some_and(|e| e.is_retryable()));
        assert!(!status_error(StatusCode::UNAUTHORIZED).is_some_and(|e| e.is_retryable()));
    }

    #[test]
    fn builds_with_custom_base() {
        let client = GoogleCalendarClient::new("token", Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        assert_eq!(client.base_url, "http://127.0.0.1:9");
    }

    mod http {
        use super::*;
        use chrono::{TimeZone, Utc};
        use serde_json::json;
        use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const EVENTS_PATH: &str = "/calendars/clinic/events";

        fn item(id: &str, hour: u32) -> serde_json::Value {
            json!({
                "id": id,
                "summary": "K1",
                "start": { "dateTime": format!("2025-02-10T{:02}:00:00+03:00", hour) },
                "end": { "dateTime": format!("2025-02-10T{:02}:20:00+03:00", hour) }
            })
        }

        async fn client(server: &MockServer) -> GoogleCalendarClient {
            GoogleCalendarClient::new("ya29.test", Duration::from_secs(5))
                .unwrap()
                .with_base_url(server.uri())
        }

        #[tokio::test]
        async fn drains_every_page() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path(EVENTS_PATH))
                .and(header("authorization", "Bearer ya29.test"))
                .and(query_param("singleEvents", "true"))
                .and(query_param("orderBy", "startTime"))
                .and(query_param("maxResults", "2"))
                .and(query_param_is_missing("pageToken"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "items": [item("a", 9), item("b", 10)],
                    "nextPageToken": "page-2"
                })))
                .expect(1)
                .mount(&server)
                .await;

            Mock::given(method("GET"))
                .and(path(EVENTS_PATH))
                .and(query_param("pageToken", "page-2"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "items": [item("c", 11), { "summary": "no id" }]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let options = FetchOptions::new()
                .with_time_min(Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap())
                .with_page_size(2);
            let (events, pages) = client(&server)
                .await
                .list_events("clinic", &options)
                .await
                .unwrap();

            let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids, vec!["a", "b", "c"]);
            assert_eq!(pages, 2);
        }

        #[tokio::test]
        async fn rate_limit_reports_retry_after() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(EVENTS_PATH))
                .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
                .mount(&server)
                .await;

            let err = client(&server)
                .await
                .list_events("clinic", &FetchOptions::new())
                .await
                .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::RateLimited);
            assert!(err.is_retryable());
            assert!(err.to_string().contains("retry after 30 seconds"));
        }

        #[tokio::test]
        async fn expired_token_is_an_authentication_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(EVENTS_PATH))
                .respond_with(ResponseTemplate::new(401))
                .mount(&server)
                .await;

            let err = client(&server)
                .await
                .list_events("clinic", &FetchOptions::new())
                .await
                .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
            assert!(!err.is_retryable());
        }

        #[tokio::test]
        async fn failure_on_a_later_page_fails_the_listing() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(EVENTS_PATH))
                .and(query_param_is_missing("pageToken"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "items": [item("a", 9)],
                    "nextPageToken": "page-2"
                })))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path(EVENTS_PATH))
                .and(query_param("pageToken", "page-2"))
                .respond_with(ResponseTemplate::new(503))
                .mount(&server)
                .await;

            let err = client(&server)
                .await
                .list_events("clinic", &FetchOptions::new())
                .await
                .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::ServerError);
        }
    }
}
