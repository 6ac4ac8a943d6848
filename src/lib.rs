//! # Roadmap Client
//!
//! Client-side core for a chat-driven learning roadmap: it mirrors the
//! roadmap tree the server sends, converts it into nodes and edges for a
//! graph-layout component, and tracks which nodes are new since the last
//! update.
//!
//! ## Features
//!
//! - **Snapshots**: flat (`parent` references) and nested (`children`) payloads behind one type
//! - **Diffing**: new node ids by set difference against the last snapshot
//! - **Conversion**: display nodes with level, shape, and color by category
//! - **Store**: full replacement of snapshots, stale responses discarded
//! - **Views**: detail panel model and markdown-lite formatting
//!
//! ## Architecture
//!
//! ```text
//! ChatSession → RoadmapApiClient (HTTP) → chat/roadmap server
//!      ↓
//! RoadmapStore → convert + DiffTracker → GraphData
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use roadmap_client::{Config, ChatSession};
//! use roadmap_client::api::RoadmapApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = RoadmapApiClient::new(&config.api, config.request.clone())?;
//!     let mut session = ChatSession::new(client, config.display.clone());
//!     session.load_roadmap().await;
//!     session.send_message("I'm interested in data science").await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// HTTP client for the chat/roadmap API.
pub mod api;
/// Configuration loaded from the environment.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Markdown-lite formatting and link labels.
pub mod format;
/// Roadmap model, diffing, conversion, and store.
pub mod roadmap;
/// Chat session controller.
pub mod session;
/// Detail panel and placeholder view models.
pub mod view;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use session::ChatSession;
