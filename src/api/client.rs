use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::types::{ChatRequest, ChatResponse};
use super::RoadmapBackend;
use crate::config::{ApiConfig, RequestConfig};
use crate::error::{ApiError, ApiResult};

/// Client for the chat/roadmap HTTP API
#[derive(Clone)]
pub struct RoadmapApiClient {
    client: Client,
    base_url: String,
    request_config: RequestConfig,
}

impl RoadmapApiClient {
    /// Create a new API client
    pub fn new(config: &ApiConfig, request_config: RequestConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_config,
        })
    }

    /// Fetch the current roadmap, retrying transport and server failures
    pub async fn fetch_roadmap(&self) -> ApiResult<serde_json::Value> {
        let url = format!("{}/api/roadmap", self.base_url);

        let mut last_error = None;
        let mut retries = 0;

        while retries <= self.request_config.max_retries {
            if retries > 0 {
                let delay = backoff_delay(self.request_config.retry_delay_ms, retries);
                warn!(
                    retry = retries,
                    delay_ms = delay.as_millis(),
                    "Retrying roadmap request"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();

            match self.execute_get(&url).await {
                Ok(payload) => {
                    info!(
                        latency_ms = start.elapsed().as_millis(),
                        "Roadmap fetched"
                    );
                    return Ok(payload);
                }
                Err(e) => {
                    error!(
                        error = %e,
                        latency_ms = start.elapsed().as_millis(),
                        retry = retries,
                        "Roadmap fetch failed"
                    );
                    last_error = Some(e);
                    retries += 1;
                }
            }
        }

        Err(ApiError::Unavailable {
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
            retries,
        })
    }

    /// Send one chat message. Not retried, since the server may already
    /// have acted on it.
    pub async fn send_chat(&self, message: &str) -> ApiResult<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest::new(message);

        debug!(chars = message.chars().count(), "Sending chat message");
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = check_status(response).await?;

        let chat: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse {
                    message: format!("Failed to parse chat response: {}", e),
                })?;

        info!(
            latency_ms = start.elapsed().as_millis(),
            has_roadmap = chat.roadmap.is_some(),
            "Chat response received"
        );

        Ok(chat)
    }

    /// Execute a single GET (internal)
    async fn execute_get(&self, url: &str) -> ApiResult<serde_json::Value> {
        debug!(url = %url, "Requesting roadmap");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse {
                message: format!("Failed to parse roadmap response: {}", e),
            })
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout {
                timeout_ms: self.request_config.timeout_ms,
            }
        } else {
            ApiError::Http(e)
        }
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("Unknown").to_string()
    } else {
        body
    };
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RoadmapBackend for RoadmapApiClient {
    async fn fetch_roadmap(&self) -> ApiResult<serde_json::Value> {
        RoadmapApiClient::fetch_roadmap(self).await
    }

    async fn send_chat(&self, message: &str) -> ApiResult<ChatResponse> {
        RoadmapApiClient::send_chat(self, message).await
    }
}

/// Delay before retry number `retry` (1-based), doubling each time and
/// saturating instead of overflowing.
fn backoff_delay(base_ms: u64, retry: u32) -> Duration {
    let factor = 2_u64
        .checked_pow(retry.saturating_sub(1))
        .unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor))
}
