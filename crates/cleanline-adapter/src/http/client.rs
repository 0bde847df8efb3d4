/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::http::{AdapterError, Result};
use crate::types::ErrorBody;

/// Default base URL for the cleanline API
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the cleanline backend
#[derive(Debug, Clone)]
pub struct CleanlineClient {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
}

impl CleanlineClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client pointed at a specific backend
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build request builder for an API endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        Ok(self
            .http_client
            .request(method, url)
            .header("x-request-id", Uuid::new_v4().to_string()))
    }

    /// Send a request and decode a JSON body, mapping error payloads to `AdapterError`
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                AdapterError::Timeout {
                    duration: self.timeout.as_secs(),
                }
            } else {
                AdapterError::Http(err)
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "api response");

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|err| {
                AdapterError::InvalidResponse(format!("unexpected response body: {err}"))
            });
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|payload| payload.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Err(match status {
            StatusCode::UNAUTHORIZED => AdapterError::Authentication { message },
            StatusCode::FORBIDDEN => AdapterError::Forbidden(message),
            StatusCode::TOO_MANY_REQUESTS => AdapterError::RateLimit {
                retry_after: retry_after.unwrap_or(1),
            },
            _ => AdapterError::api_error(status, message),
        })
    }
}
