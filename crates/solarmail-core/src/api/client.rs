use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{Instrument, debug, debug_span, error, warn};

use crate::api::error::ApiError;
use crate::api::types::{AnalysisResult, EmailSummary, HealthStatus, SyncAck, SyncStatus};
use crate::config::{ApiConfig, DEFAULT_TIMEOUT_MS};

pub const API_VERSION_PREFIX: &str = "/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);
pub const DEFAULT_EMAIL_LIMIT: u32 = 20;
pub const MAX_EMAIL_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum GatewayBuildError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Typed client for the SolarMail service.
///
/// Holds only immutable configuration, so clones are cheap and any number of
/// calls may be in flight at once. Each call gets its own deadline.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    http: Client,
    api_base: String,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl ApiGateway {
    pub fn new(
        http: Client,
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self, GatewayBuildError> {
        let base_url = base_url.as_ref().trim();
        let parsed = Url::parse(base_url).map_err(|err| GatewayBuildError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayBuildError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        if timeout.is_zero() {
            return Err(GatewayBuildError::ZeroTimeout);
        }

        Ok(Self {
            http,
            api_base: format!("{}{}", base_url.trim_end_matches('/'), API_VERSION_PREFIX),
            timeout,
            default_headers: HeaderMap::new(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, GatewayBuildError> {
        let http = Client::builder()
            .user_agent(concat!("solarmail/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::new(http, &config.base_url, config.timeout())
    }

    /// Headers sent with every call. They are merged over the JSON
    /// content-type header and win on conflicts.
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// The service root with the versioned prefix applied.
    pub fn base_url(&self) -> &str {
        &self.api_base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        self.execute(Method::GET, "/health", &[], None).await
    }

    /// Lists up to `limit` emails in the order the service returns them.
    pub async fn get_emails(&self, limit: u32) -> Result<Vec<EmailSummary>, ApiError> {
        if !(1..=MAX_EMAIL_LIMIT).contains(&limit) {
            return Err(ApiError::validation(format!(
                "Limit must be between 1 and {MAX_EMAIL_LIMIT}"
            )));
        }
        self.execute(Method::GET, "/emails", &[("limit", limit.to_string())], None)
            .await
    }

    pub async fn get_email(&self, id: i64) -> Result<EmailSummary, ApiError> {
        if id < 1 {
            return Err(ApiError::validation("Invalid email ID"));
        }
        self.execute(Method::GET, &format!("/emails/{id}"), &[], None)
            .await
    }

    pub async fn analyze_email(&self, subject: &str, body: &str) -> Result<AnalysisResult, ApiError> {
        if subject.is_empty() && body.is_empty() {
            return Err(ApiError::validation("Subject or body is required"));
        }
        let request = json!({ "subject": subject, "body": body });
        self.execute(Method::POST, "/analyze", &[], Some(request))
            .await
    }

    pub async fn get_sync_status(&self, address: &str) -> Result<SyncStatus, ApiError> {
        if address.trim().is_empty() || !address.contains('@') {
            return Err(ApiError::validation("Invalid email address"));
        }
        self.execute(
            Method::GET,
            "/sync/status",
            &[("email", address.to_string())],
            None,
        )
        .await
    }

    pub async fn trigger_sync(&self) -> Result<SyncAck, ApiError> {
        self.execute(Method::POST, "/sync/trigger", &[], None).await
    }

    /// Liveness probe: `true` iff [`ApiGateway::health_check`] succeeds.
    pub async fn ping(&self) -> bool {
        match self.health_check().await {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, kind = ?err.kind(), "ping failed");
                false
            }
        }
    }

    async fn execute<T>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let span = debug_span!("api_call", method = %method, endpoint);
        async move {
            let url = format!("{}{}", self.api_base, endpoint);
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.extend(self.default_headers.clone());

            let mut request = self.http.request(method, &url).headers(headers);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(&body);
            }

            debug!("sending request");
            let exchange = async {
                let response = request
                    .send()
                    .await
                    .map_err(|err| self.classify_request_error(err, endpoint))?;
                let status = response.status();
                let text = response
                    .text()
                    .await
                    .map_err(|err| self.classify_request_error(err, endpoint))?;
                Ok::<_, ApiError>((status, text))
            };

            // Dropping `exchange` on expiry aborts the in-flight request.
            let outcome = match tokio::time::timeout(self.timeout, exchange).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ApiError::timeout(self.timeout_ms(), endpoint)),
            };
            let (status, text) = outcome.inspect_err(|err| {
                warn!(error = %err, kind = ?err.kind(), "request failed");
            })?;

            if !status.is_success() {
                let err = ApiError::protocol(protocol_message(status, &text), status.as_u16(), endpoint);
                warn!(status = status.as_u16(), error = %err, "service rejected request");
                return Err(err);
            }

            serde_json::from_str(&text).map_err(|source| {
                error!(error = %source, "service returned malformed body");
                ApiError::Decode {
                    endpoint: endpoint.to_string(),
                    source,
                }
            })
        }
        .instrument(span)
        .await
    }

    fn classify_request_error(&self, err: reqwest::Error, endpoint: &str) -> ApiError {
        if err.is_timeout() {
            ApiError::timeout(self.timeout_ms(), endpoint)
        } else {
            ApiError::transport(endpoint, err)
        }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Picks the message out of an error body (`detail`, then `message`), falling
/// back to the status line.
fn protocol_message(status: StatusCode, body: &str) -> String {
    let fallback = format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    );

    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return fallback;
    };

    ["detail", "message"]
        .iter()
        .find_map(|key| match fields.get(*key) {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) if text.is_empty() => None,
            Some(Value::String(text)) => Some(text.clone()),
            // FastAPI reports request validation problems as a list.
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or(fallback)
}
