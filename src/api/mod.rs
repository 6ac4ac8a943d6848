//! HTTP client for the chat/roadmap API.
//!
//! - `GET /api/roadmap` returns the current roadmap
//! - `POST /api/chat` sends a message and may return a replacement roadmap

mod client;
mod types;


pub use client::RoadmapApiClient;
pub use types::{ChatRequest, ChatResponse};

use async_trait::async_trait;

use crate::error::ApiResult;

/// The remote side of a chat session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoadmapBackend: Send + Sync {
    /// Fetch the current roadmap payload
    async fn fetch_roadmap(&self) -> ApiResult<serde_json::Value>;

    /// Send a chat message
    async fn send_chat(&self, message: &str) -> ApiResult<ChatResponse>;
}
