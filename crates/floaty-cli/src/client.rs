//! Shared client utilities, error types, and telemetry wiring for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::anyhow;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use crate::settings::EffectiveConfig;

/// Header carrying the bearer token on authenticated pool-service calls.
pub(crate) const HEADER_AUTH_TOKEN: &str = "X-AUTH-TOKEN";
pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CLI-level error type distinguishing input validation failures, requests
/// the service refused to acknowledge, and operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Request(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Request(_) => 1,
            Self::Failure(_) => 2,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Request(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

/// Dependencies constructed from environment flags and CLI options.
#[derive(Clone)]
pub(crate) struct CliDependencies {
    pub(crate) client: Client,
    pub(crate) telemetry: Option<TelemetryEmitter>,
}

impl CliDependencies {
    /// Construct a configured HTTP client and optional telemetry emitter.
    pub(crate) fn from_env(timeout_secs: u64, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            telemetry: TelemetryEmitter::from_env(),
        })
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) settings: EffectiveConfig,
}

/// Telemetry emitter used to forward CLI outcomes.
#[derive(Clone)]
pub(crate) struct TelemetryEmitter {
    pub(crate) client: Client,
    pub(crate) endpoint: Url,
}

impl TelemetryEmitter {
    #[must_use]
    pub(crate) fn from_env() -> Option<Self> {
        let endpoint = std::env::var("FLOATY_TELEMETRY_ENDPOINT").ok()?;
        let endpoint = endpoint.parse().ok()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .ok()?;
        Some(Self { client, endpoint })
    }

    pub(crate) async fn emit(
        &self,
        trace_id: &str,
        command: &str,
        outcome: &str,
        exit_code: i32,
        message: Option<&str>,
    ) {
        let event = TelemetryEvent {
            command,
            outcome,
            trace_id,
            exit_code,
            message,
            timestamp_ms: timestamp_now_ms(),
        };

        if let Err(err) = self
            .client
            .post(self.endpoint.clone())
            .json(&event)
            .send()
            .await
        {
            tracing::debug!(error = %err, "telemetry emit failed");
        }
    }
}

#[derive(Serialize)]
struct TelemetryEvent<'a> {
    command: &'a str,
    outcome: &'a str,
    trace_id: &'a str,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    timestamp_ms: u64,
}

/// Millisecond timestamp helper for telemetry.
#[must_use]
pub(crate) fn timestamp_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Parse a pool-service base URL.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Resolve the pool-service base URL from the effective settings. A missing
/// URL only surfaces here, at the moment a collaborator call is attempted.
pub(crate) fn resolve_base_url(settings: &EffectiveConfig) -> CliResult<Url> {
    let raw = settings.url.as_deref().ok_or_else(|| {
        CliError::validation("pool service URL is required (pass --url or set url in ~/.floaty.yml)")
    })?;
    parse_url(raw).map_err(CliError::validation)
}

/// Classify an HTTP non-success response into a CLI error, folding the
/// service's `message`/`reason` field into the diagnostic when present.
pub(crate) async fn classify_problem(response: reqwest::Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();

    let body_text = String::from_utf8_lossy(&bytes).to_string();
    let body = serde_json::from_slice::<Value>(&bytes).ok();

    let message = body
        .as_ref()
        .and_then(|value| value.get("message").or_else(|| value.get("reason")))
        .and_then(Value::as_str)
        .map_or_else(|| body_text.trim().to_string(), str::to_string);

    if matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::CONFLICT
    ) {
        if message.is_empty() {
            CliError::validation(format!("request rejected with status {status}"))
        } else {
            CliError::validation(message)
        }
    } else if message.is_empty() {
        CliError::failure(anyhow!("request failed with status {status}"))
    } else {
        CliError::failure(anyhow!("{message} (status {status})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;

    #[test]
    fn validation_and_request_errors_exit_one() {
        assert_eq!(CliError::validation("bad input").exit_code(), 1);
        assert_eq!(CliError::request("not acknowledged").exit_code(), 1);
    }

    #[test]
    fn failures_exit_two() {
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 2);
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("not a url").is_err());
        assert!(parse_url("http://pool.example/api/v1").is_ok());
    }

    #[test]
    fn resolve_base_url_requires_a_configured_url() {
        let settings = EffectiveConfig::default();
        let err = resolve_base_url(&settings).expect_err("missing URL should fail");
        assert!(matches!(err, CliError::Validation(message) if message.contains("--url")));
    }

    #[tokio::test]
    async fn classify_problem_reads_the_service_message() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/vm/missing");
            then.status(404)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({"ok": false, "message": "no such vm"}));
        });

        let response = reqwest::get(format!("{}/vm/missing", server.base_url())).await?;
        let err = classify_problem(response).await;
        assert!(matches!(err, CliError::Validation(message) if message.contains("no such vm")));
        Ok(())
    }

    #[tokio::test]
    async fn classify_problem_maps_server_errors_to_failures() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/status");
            then.status(500).body("pool on fire");
        });

        let response = reqwest::get(format!("{}/status", server.base_url())).await?;
        let err = classify_problem(response).await;
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("pool on fire"));
        Ok(())
    }

    #[tokio::test]
    async fn telemetry_emitter_emits_event() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/telemetry");
            then.status(200);
        });

        let emitter = TelemetryEmitter {
            client: Client::new(),
            endpoint: format!("{}/telemetry", server.base_url())
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid URL"))?,
        };

        emitter
            .emit("trace", "command", "success", 0, Some("message"))
            .await;

        mock.assert();
        Ok(())
    }
}
