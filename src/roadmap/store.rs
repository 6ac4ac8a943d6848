use serde::Serialize;
use tracing::{debug, info, warn};

use super::convert::{convert, GraphData};
use super::diff::DiffTracker;
use super::types::{RoadmapNode, RoadmapSnapshot};
use crate::error::{RoadmapError, RoadmapResult};
use crate::view::{DetailView, Placeholder};

/// Sequence number handed out when a request is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// The raw sequence number.
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// What the roadmap panel currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GraphView {
    Empty { placeholder: Placeholder },
    Graph { graph: GraphData },
}

impl GraphView {
    fn empty() -> Self {
        GraphView::Empty {
            placeholder: Placeholder::default(),
        }
    }

    /// The graph, if one is drawn.
    pub fn graph(&self) -> Option<&GraphData> {
        match self {
            GraphView::Graph { graph } => Some(graph),
            GraphView::Empty { .. } => None,
        }
    }

    /// Number of drawn nodes.
    pub fn node_count(&self) -> usize {
        self.graph().map_or(0, |g| g.nodes.len())
    }
}

/// Summary of an applied snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadmapUpdate {
    pub new_node_ids: Vec<String>,
    /// Labels of the new nodes, falling back to the id.
    pub new_node_labels: Vec<String>,
    pub node_count: usize,
}

impl RoadmapUpdate {
    /// Whether the snapshot introduced any nodes.
    pub fn has_new_nodes(&self) -> bool {
        !self.new_node_ids.is_empty()
    }
}

/// Client-side mirror of the server roadmap.
#[derive(Debug)]
pub struct RoadmapStore {
    snapshot: Option<RoadmapSnapshot>,
    tracker: DiffTracker,
    view: GraphView,
    next_seq: u64,
    last_applied: u64,
}

impl Default for RoadmapStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadmapStore {
    /// An empty store showing the placeholder.
    pub fn new() -> Self {
        Self {
            snapshot: None,
            tracker: DiffTracker::new(),
            view: GraphView::empty(),
            next_seq: 0,
            last_applied: 0,
        }
    }

    /// Start a request whose response may later be applied.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.next_seq += 1;
        RequestTicket(self.next_seq)
    }

    /// Whether a response for `ticket` would still be applied.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 > self.last_applied
    }

    /// Apply the snapshot from a response, unless a newer response has
    /// already been applied.
    pub fn apply(
        &mut self,
        ticket: RequestTicket,
        snapshot: RoadmapSnapshot,
    ) -> Option<RoadmapUpdate> {
        if !self.accept(ticket) {
            return None;
        }
        Some(self.replace(snapshot))
    }

    /// Show the empty placeholder for a response that carried an unusable
    /// roadmap. Returns `false` if the response was stale.
    pub fn apply_malformed(&mut self, ticket: RequestTicket, error: &RoadmapError) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        warn!(error = %error, "Malformed roadmap payload, showing empty roadmap");
        self.snapshot = None;
        self.view = GraphView::empty();
        true
    }

    fn accept(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            warn!(
                seq = ticket.0,
                last_applied = self.last_applied,
                "Discarding stale roadmap response"
            );
            return false;
        }
        self.last_applied = ticket.0;
        true
    }

    /// Replace the stored snapshot in full.
    ///
    /// A snapshot with nothing to draw shows the placeholder and leaves the
    /// diff state untouched.
    pub fn replace(&mut self, snapshot: RoadmapSnapshot) -> RoadmapUpdate {
        if snapshot.is_empty() {
            debug!("Empty roadmap received, waiting for specific interests");
            self.view = GraphView::empty();
            self.snapshot = Some(snapshot);
            return RoadmapUpdate::default();
        }

        let graph = convert(&snapshot, &mut self.tracker);
        let new_node_labels = graph
            .new_node_ids
            .iter()
            .map(|id| {
                graph
                    .node(id)
                    .map(|n| n.label.clone())
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| id.clone())
            })
            .collect();

        let update = RoadmapUpdate {
            new_node_ids: graph.new_node_ids.clone(),
            new_node_labels,
            node_count: graph.nodes.len(),
        };

        info!(
            nodes = update.node_count,
            new = update.new_node_ids.len(),
            "Roadmap updated"
        );

        self.snapshot = Some(snapshot);
        self.view = GraphView::Graph { graph };
        update
    }

    /// Fall back to the minimal one-node roadmap.
    pub fn load_placeholder(&mut self) -> RoadmapUpdate {
        self.replace(RoadmapSnapshot::placeholder())
    }

    /// What the panel shows.
    pub fn view(&self) -> &GraphView {
        &self.view
    }

    /// The current snapshot, if any.
    pub fn snapshot(&self) -> Option<&RoadmapSnapshot> {
        self.snapshot.as_ref()
    }

    /// Diff state after the last applied snapshot.
    pub fn tracker(&self) -> &DiffTracker {
        &self.tracker
    }

    /// Look up a node, including one synthesized during conversion.
    pub fn node(&self, id: &str) -> Option<&RoadmapNode> {
        if let Some(node) = self.view.graph().and_then(|g| g.node(id)) {
            return Some(&node.data);
        }
        self.snapshot.as_ref().and_then(|s| s.find(id))
    }

    /// Display label for a node id, or the id itself when unknown.
    pub fn label_of(&self, id: &str) -> String {
        self.node(id)
            .map(|n| n.label.clone())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| id.to_string())
    }

    /// Detail panel for a node.
    pub fn detail_view(&self, id: &str) -> RoadmapResult<DetailView> {
        let node = self.node(id).ok_or_else(|| RoadmapError::UnknownNode {
            node_id: id.to_string(),
        })?;
        let detail = self.snapshot.as_ref().and_then(|s| s.detail(id));
        Ok(DetailView::build(&node.label, detail.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> RoadmapSnapshot {
        RoadmapSnapshot::from_value(value).unwrap()
    }

    fn three_nodes() -> RoadmapSnapshot {
        snapshot(json!({
            "nodes": [
                {"id": "root", "label": "Root", "type": "root"},
                {"id": "catA", "label": "Cat A", "type": "category", "parent": "root"},
                {"id": "topicB", "label": "Topic B", "type": "topic", "parent": "catA"}
            ],
            "nodeDetails": {"topicB": {"content": "About B"}}
        }))
    }

    #[test]
    fn test_new_store_shows_placeholder() {
        let store = RoadmapStore::new();
        assert!(matches!(store.view(), GraphView::Empty { .. }));
        assert_eq!(store.view().node_count(), 0);
    }

    #[test]
    fn test_replace_reports_new_labels() {
        let mut store = RoadmapStore::new();
        store.replace(snapshot(json!({
            "nodes": [
                {"id": "root", "label": "Root"},
                {"id": "catA", "label": "Cat A", "parent": "root"}
            ]
        })));

        let update = store.replace(three_nodes());
        assert_eq!(update.new_node_ids, vec!["topicB"]);
        assert_eq!(update.new_node_labels, vec!["Topic B"]);
        assert_eq!(update.node_count, 3);
        assert!(update.has_new_nodes());
    }

    #[test]
    fn test_empty_nested_root_shows_placeholder() {
        let mut store = RoadmapStore::new();
        store.replace(three_nodes());
        let before = store.tracker().clone();

        let update = store.replace(snapshot(json!({"id": "root", "title": "Root", "children": []})));
        assert!(!update.has_new_nodes());
        assert_eq!(store.view().node_count(), 0);
        assert_eq!(store.tracker(), &before);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut store = RoadmapStore::new();
        let older = store.begin_request();
        let newer = store.begin_request();

        assert!(store.apply(newer, three_nodes()).is_some());
        assert!(!store.is_current(older));
        assert!(store
            .apply(older, snapshot(json!({"nodes": [{"id": "root", "label": "Old"}]})))
            .is_none());
        assert_eq!(store.view().node_count(), 3);
    }

    #[test]
    fn test_malformed_payload_shows_empty() {
        let mut store = RoadmapStore::new();
        store.replace(three_nodes());

        let ticket = store.begin_request();
        let err = RoadmapSnapshot::from_value(json!({"nodes": 7})).unwrap_err();
        assert!(store.apply_malformed(ticket, &err));
        assert!(store.snapshot().is_none());
        assert_eq!(store.view().node_count(), 0);
    }

    #[test]
    fn test_detail_lookup() {
        let mut store = RoadmapStore::new();
        store.replace(three_nodes());

        let view = store.detail_view("topicB").unwrap();
        assert_eq!(view.title, "Topic B");
        assert_eq!(view.content_html, "About B");

        let view = store.detail_view("catA").unwrap();
        assert_eq!(view.content_html, crate::view::NO_DETAIL_TEXT);

        assert!(matches!(
            store.detail_view("nope"),
            Err(RoadmapError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_nested_detail_lookup() {
        let mut store = RoadmapStore::new();
        store.replace(snapshot(json!({
            "id": "root",
            "title": "Root",
            "children": [{"id": "t", "title": "T", "content": "inline", "resources": ["plain text"]}]
        })));

        let view = store.detail_view("t").unwrap();
        assert_eq!(view.content_html, "inline");
        assert_eq!(view.resources.len(), 1);
    }

    #[test]
    fn test_synthesized_root_is_addressable() {
        let mut store = RoadmapStore::new();
        store.replace(snapshot(json!({"nodes": [{"id": "a", "label": "A"}]})));
        assert_eq!(store.label_of("root"), crate::roadmap::DEFAULT_ROOT_LABEL);
        assert!(store.detail_view("root").is_ok());
        assert_eq!(store.label_of("unknown"), "unknown");
    }

    #[test]
    fn test_placeholder_roadmap() {
        let mut store = RoadmapStore::new();
        let update = store.load_placeholder();
        assert_eq!(update.node_count, 1);
        assert_eq!(store.view().node_count(), 1);
        let view = store.detail_view("root").unwrap();
        assert!(view.content_html.contains("starting point"));
    }
}
