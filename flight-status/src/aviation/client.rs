//! Aviation API HTTP client.
//!
//! Issues single GET calls against the aviationstack REST API. The access
//! key is fixed when the client is built and appended to every request;
//! callers only ever supply the endpoint and its filter parameters.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use super::error::{TransportError, truncate_body};
use super::types::{Params, RawResponse};

/// Default base URL for the aviationstack API.
pub const DEFAULT_BASE_URL: &str = "https://api.aviationstack.com/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Query parameter carrying the credential.
const ACCESS_KEY_PARAM: &str = "access_key";

/// Something that can perform one upstream call.
///
/// The production implementation is [`AviationClient`]; tests substitute
/// [`MockTransport`](super::MockTransport) to count and inspect calls.
pub trait FlightTransport {
    /// Fetch `endpoint` with the given parameters.
    fn call(
        &self,
        endpoint: &str,
        params: &Params,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// Configuration for the aviation client.
#[derive(Clone)]
pub struct AviationConfig {
    /// Access key sent as the `access_key` query parameter
    pub api_key: String,
    /// Base URL for the API, without a trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AviationConfig {
    /// Create a new config with the given access key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing or a paid-tier host).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl fmt::Debug for AviationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AviationConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Aviation API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct AviationClient {
    http: reqwest::Client,
    base_url: String,
    access_key: Arc<str>,
}

impl AviationClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AviationConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Build(e.without_url().to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            access_key: config.api_key.into(),
        })
    }

    /// Full URL for an endpoint.
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

impl fmt::Debug for AviationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AviationClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FlightTransport for AviationClient {
    async fn call(&self, endpoint: &str, params: &Params) -> Result<RawResponse, TransportError> {
        let url = self.endpoint_url(endpoint);
        debug!(endpoint, params = ?params, "calling aviation API");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[(ACCESS_KEY_PARAM, &*self.access_key)])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TransportError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        let body = response.text().await?;

        let value: Value = serde_json::from_str(&body).map_err(|e| TransportError::Json {
            message: e.to_string(),
            body: Some(truncate_body(&body)),
        })?;

        Ok(Arc::new(value))
    }
}
