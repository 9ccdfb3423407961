//! HTTP client for the drift analytics service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{AnalysisResult, Baseline, DriftApi, HistoryPoint};
use crate::error::ApiError;

/// Default backend address (the service's development server).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// [`DriftApi`] implementation backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    description: String,
}

impl HttpApi {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpApiBuilder {
        HttpApiBuilder::default()
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        // Timeouts and resets while reading the body stay transient
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DriftApi for HttpApi {
    async fn initialize(&self) -> Result<Baseline, ApiError> {
        let url = self.url("/api/initialize");
        debug!(%url, "POST");

        let response = self.client.post(&url).send().await?;
        let value: serde_json::Value = Self::decode(response).await?;
        Ok(Baseline::from_value(&value))
    }

    async fn analyze(&self) -> Result<AnalysisResult, ApiError> {
        let url = self.url("/api/analyze");
        debug!(%url, "GET");

        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn history(&self) -> Result<Vec<HistoryPoint>, ApiError> {
        let url = self.url("/api/history");
        debug!(%url, "GET");

        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpApi`].
#[derive(Debug, Default)]
pub struct HttpApiBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpApiBuilder {
    /// Set the service address (e.g., "http://localhost:5000").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpApi, ApiError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let base_url = normalize_base_url(
            self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
        );
        let description = format!("http: {}", base_url);

        Ok(HttpApi {
            client,
            base_url,
            description,
        })
    }
}

// Endpoint paths start with '/', so drop any trailing ones from the base.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let api = HttpApi::builder().build().unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:5000");
        assert_eq!(api.description(), "http: http://127.0.0.1:5000");
    }

    #[test]
    fn test_builder_custom() {
        let api = HttpApi::builder()
            .base_url("http://drift.local:8080/")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        assert_eq!(api.base_url(), "http://drift.local:8080");
        assert_eq!(api.url("/api/analyze"), "http://drift.local:8080/api/analyze");
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://a:1//"), "http://a:1");
        assert_eq!(normalize_base_url(" http://a:1 "), "http://a:1");
        assert_eq!(normalize_base_url("http://a:1"), "http://a:1");
    }
}
