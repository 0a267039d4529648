//! HTTP client for a running forecast server.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;

use forecast_core::{ConflictForecastRequest, ConflictForecastResponse};

/// API generation to call. `V2` runs the scan on the server's blocking pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    fn prefix(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

/// Blocking client for the forecast endpoints.
pub struct ForecastClient {
    client: Client,
    base_url: String,
    version: ApiVersion,
}

impl ForecastClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the server (e.g., "http://localhost:8080")
    /// * `version` - Endpoint generation to call
    pub fn new(base_url: impl Into<String>, version: ApiVersion) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            version,
        }
    }

    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}/forecasts/{}", self.base_url, self.version.prefix(), resource)
    }

    /// Submit a request and return the detected conflicts.
    pub fn conflicts(&self, request: &ConflictForecastRequest) -> Result<ConflictForecastResponse> {
        let value = self.post("conflicts", request)?;
        serde_json::from_value(value).context("Failed to parse conflict forecast response")
    }

    /// Submit a request and return the rendered GeoJSON feature collection.
    pub fn conflict_features(&self, request: &ConflictForecastRequest) -> Result<Value> {
        self.post("conflict-features", request)
    }

    fn post(&self, resource: &str, request: &ConflictForecastRequest) -> Result<Value> {
        let url = self.endpoint(resource);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .with_context(|| format!("Failed to send forecast request to {}", url))?;

        let status = response.status();
        let body = response.text().context("Failed to read forecast response")?;
        if !status.is_success() {
            bail!("Server returned {} for {}: {}", status, url, body);
        }
        serde_json::from_str(&body).context("Forecast response is not JSON")
    }
}
