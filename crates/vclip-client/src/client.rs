//! Clip service HTTP client.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use vclip_models::{GenerateClipsRequest, GenerateClipsResponse, TaskSnapshot};

use crate::error::{ClientError, ClientResult};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the clip service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the clip service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("VCLIP_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("VCLIP_REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for the clip generation service.
///
/// Calls are never retried; a failed call surfaces immediately so the
/// caller can notify the user and let them resubmit.
#[derive(Debug, Clone)]
pub struct ClipClient {
    http: Client,
    base_url: String,
}

impl ClipClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start clip generation for a source video.
    pub async fn submit(&self, request: &GenerateClipsRequest) -> ClientResult<GenerateClipsResponse> {
        let url = format!("{}/generate-clips", self.base_url);
        debug!(url = %url, source = %request.url, style = %request.style, "Submitting clip generation");

        let response = self.http.post(&url).json(request).send().await?;
        let response = Self::check_status(response, "start clip generation")?;
        Self::decode(response).await
    }

    /// Fetch the current snapshot of a task.
    pub async fn poll_status(&self, task_id: &str) -> ClientResult<TaskSnapshot> {
        let url = format!("{}/status/{}", self.base_url, urlencoding::encode(task_id));
        debug!(task_id = %task_id, "Polling task status");

        let response = self.http.get(&url).send().await?;
        let response = Self::check_status(response, "get task status")?;
        Self::decode(response).await
    }

    /// Download the rendered binary of a clip.
    pub async fn fetch_clip_binary(&self, clip_id: &str) -> ClientResult<Bytes> {
        let url = format!("{}/clips/{}/download", self.base_url, urlencoding::encode(clip_id));
        debug!(clip_id = %clip_id, "Downloading clip");

        let response = self.http.get(&url).send().await?;
        let response = Self::check_status(response, "download clip")?;
        Ok(response.bytes().await?)
    }

    /// Check if the service is healthy. Never fails; problems are logged.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<HealthResponse>().await {
                    Ok(health) => health.status == "healthy" || health.status == "ok",
                    // A 2xx without the expected body still means the service answered.
                    Err(_) => true,
                }
            }
            Ok(response) => {
                warn!("Clip service health check failed: {}", response.status());
                false
            }
            Err(e) => {
                warn!("Clip service health check error: {}", e);
                false
            }
        }
    }

    fn check_status(response: Response, operation: &'static str) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            debug!(status = %status, operation, "Clip service request failed");
            Err(ClientError::from_status(operation, status))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}
