use serde::{Deserialize, Serialize};

use crate::error::RoadmapResult;
use crate::roadmap::RoadmapSnapshot;

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response from `POST /api/chat`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// Bot reply text
    #[serde(default)]
    pub response: String,
    /// Replacement roadmap, flat or nested
    #[serde(default)]
    pub roadmap: Option<serde_json::Value>,
    /// Ids the server considers new
    #[serde(default, rename = "newNodes")]
    pub new_nodes: Option<Vec<String>>,
}

impl ChatRequest {
    /// Create a chat request
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ChatResponse {
    /// Create a reply without a roadmap
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }

    /// Attach a roadmap payload
    pub fn with_roadmap(mut self, roadmap: serde_json::Value) -> Self {
        self.roadmap = Some(roadmap);
        self
    }

    /// Parse the attached roadmap, if any
    pub fn snapshot(&self) -> Option<RoadmapResult<RoadmapSnapshot>> {
        self.roadmap
            .clone()
            .map(RoadmapSnapshot::from_value)
    }
}
