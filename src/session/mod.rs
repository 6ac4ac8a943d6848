//! Chat session: one user action, one request, one transcript update.
//!
//! A [`ChatSession`] owns the roadmap store and transcript for one user.
//! Failures never escape; they degrade to a placeholder roadmap or an
//! apology in the transcript.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, error, warn};

use crate::api::RoadmapBackend;
use crate::config::DisplayConfig;
use crate::error::RoadmapResult;
use crate::format::ExpandableMessage;
use crate::roadmap::{RoadmapSnapshot, RoadmapStore, RoadmapUpdate};
use crate::view::DetailView;

/// First bot message of every session.
pub const WELCOME_MESSAGE: &str = "Hi there! I'm your CareerPath.AI advisor. I can help \
personalize your learning roadmap based on your interests. Let me know what field you're \
interested in!";

/// Shown when a chat request fails.
pub const ERROR_MESSAGE: &str =
    "Sorry, I encountered an error while processing your message. Please try again.";

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    System,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "You"),
            Sender::Bot => write!(f, "Bot"),
            Sender::System => write!(f, "System"),
        }
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    /// Source text.
    pub text: String,
    pub rendered: ExpandableMessage,
}

/// Result of one chat exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOutcome {
    /// Bot reply, absent when the request failed.
    pub reply: Option<String>,
    /// Applied roadmap change, if the response carried a usable one.
    pub update: Option<RoadmapUpdate>,
    pub failed: bool,
}

/// Client state for one user talking to the roadmap API.
pub struct ChatSession<B> {
    backend: B,
    store: RoadmapStore,
    transcript: Vec<ChatMessage>,
    display: DisplayConfig,
}

impl<B: RoadmapBackend> ChatSession<B> {
    /// Start a session with the welcome message in its transcript.
    pub fn new(backend: B, display: DisplayConfig) -> Self {
        let mut session = Self {
            backend,
            store: RoadmapStore::new(),
            transcript: Vec::new(),
            display,
        };
        session.push(Sender::Bot, WELCOME_MESSAGE);
        session
    }

    /// Fetch the roadmap from the server, falling back to the placeholder
    /// roadmap when it cannot be reached.
    pub async fn load_roadmap(&mut self) -> Option<RoadmapUpdate> {
        let ticket = self.store.begin_request();

        match self.backend.fetch_roadmap().await {
            Ok(payload) => match RoadmapSnapshot::from_value(payload) {
                Ok(snapshot) => self.store.apply(ticket, snapshot),
                Err(e) => {
                    self.store.apply_malformed(ticket, &e);
                    None
                }
            },
            Err(e) => {
                error!(error = %e, "Error fetching roadmap, using placeholder");
                self.store.apply(ticket, RoadmapSnapshot::placeholder())
            }
        }
    }

    /// Send a message and fold the response into the transcript and roadmap.
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn send_message(&mut self, text: &str) -> Option<ChatOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.push(Sender::User, text);
        let ticket = self.store.begin_request();

        let response = match self.backend.send_chat(text).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Error sending chat message");
                self.push(Sender::Bot, ERROR_MESSAGE);
                return Some(ChatOutcome {
                    failed: true,
                    ..ChatOutcome::default()
                });
            }
        };

        if !response.response.is_empty() {
            self.push(Sender::Bot, &response.response);
        }

        let update = match response.snapshot() {
            None => {
                warn!("No roadmap data received from server");
                None
            }
            Some(Err(e)) => {
                self.store.apply_malformed(ticket, &e);
                None
            }
            Some(Ok(snapshot)) => self.store.apply(ticket, snapshot),
        };

        if let Some(update) = &update {
            if let Some(hint) = &response.new_nodes {
                compare_server_hint(hint, &update.new_node_ids);
            }
            if update.has_new_nodes() {
                let notice = format!(
                    "✨ Added {} new topics to your roadmap: {}",
                    update.new_node_ids.len(),
                    update.new_node_labels.join(", ")
                );
                self.push(Sender::System, &notice);
            }
        }

        Some(ChatOutcome {
            reply: Some(response.response),
            update,
            failed: false,
        })
    }

    fn push(&mut self, sender: Sender, text: &str) {
        let rendered = match sender {
            Sender::Bot => ExpandableMessage::new(text, self.display.preview_chars),
            Sender::User | Sender::System => ExpandableMessage::plain(text),
        };
        self.transcript.push(ChatMessage {
            sender,
            text: text.to_string(),
            rendered,
        });
    }

    /// The roadmap store.
    pub fn store(&self) -> &RoadmapStore {
        &self.store
    }

    /// Every message so far, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Detail panel for a node of the current roadmap.
    pub fn detail_view(&self, id: &str) -> RoadmapResult<DetailView> {
        self.store.detail_view(id)
    }
}

fn compare_server_hint(hint: &[String], computed: &[String]) {
    let hint: HashSet<&str> = hint.iter().map(String::as_str).collect();
    let computed: HashSet<&str> = computed.iter().map(String::as_str).collect();
    if hint != computed {
        debug!(
            server = hint.len(),
            client = computed.len(),
            "Server newNodes differs from client diff"
        );
    }
}
