//! Low-level HTTP client for the booking API.
//!
//! Handles bearer authentication, status mapping and JSON decoding. Every
//! failure is turned into a [`ProviderError`] with a matching code.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::{ProviderError, ProviderResult};

use super::config::HttpConfig;

/// HTTP client for booking API requests.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: HttpConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ProviderError::network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Performs a GET request on `path` and decodes the JSON body.
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> ProviderResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(url = %url, "GET");

        let mut request = self.client.get(&url).query(query);
        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("request timeout")
            } else if e.is_connect() {
                ProviderError::network(format!("connection failed: {}", e))
            } else {
                ProviderError::network(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        trace!(status = %status, "response received");

        if status == StatusCode::TOO_MANY_REQUESTS {
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

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::authentication(format!(
                "session rejected ({})",
                status
            )));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found(format!("{} not found", path)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::server(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
                .with_source(e)
        })
    }
}
