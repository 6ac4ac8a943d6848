//! Conversion of roadmap snapshots into display nodes and edges.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::diff::DiffTracker;
use super::reconcile::reconcile_flat;
use super::types::{NodeCategory, RoadmapNode, RoadmapSnapshot};

/// Border color used for nodes that are new since the last snapshot.
pub const HIGHLIGHT_BORDER: &str = "#38b2ac";

/// Shape of a display node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Box,
    Diamond,
    Circle,
}

/// Fill and border color of a display node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeColor {
    pub background: &'static str,
    pub border: &'static str,
}

/// Visual attributes for a node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub shape: NodeShape,
    pub color: NodeColor,
}

const fn style(shape: NodeShape, background: &'static str, border: &'static str) -> NodeStyle {
    NodeStyle {
        shape,
        color: NodeColor { background, border },
    }
}

const DEFAULT_STYLE: NodeStyle = style(NodeShape::Box, "#3182ce", "#2c5282");

/// Style lookup by category, with the default style for `Other`.
pub fn style_for(category: NodeCategory) -> NodeStyle {
    match category {
        NodeCategory::Root => style(NodeShape::Box, "#3182ce", "#2c5282"),
        NodeCategory::Category => style(NodeShape::Diamond, "#805ad5", "#553c9a"),
        NodeCategory::Topic => style(NodeShape::Box, "#38a169", "#276749"),
        NodeCategory::Subtopic => style(NodeShape::Box, "#dd6b20", "#9c4221"),
        NodeCategory::Resource => style(NodeShape::Box, "#4a5568", "#a0aec0"),
        NodeCategory::Decision => style(NodeShape::Circle, "#e53e3e", "#9b2c2c"),
        NodeCategory::Other => DEFAULT_STYLE,
    }
}

/// A node ready for a graph-layout component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Depth below the root (root is 0).
    pub level: usize,
    pub category: NodeCategory,
    pub shape: NodeShape,
    pub color: NodeColor,
    /// The source node.
    pub data: RoadmapNode,
}

/// A directed parent to child edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// Flat graph form of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Ids not present in the previous snapshot, in traversal order.
    pub new_node_ids: Vec<String>,
}

impl GraphData {
    /// Look up a display node.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Whether the node is new since the previous snapshot.
    pub fn is_new(&self, id: &str) -> bool {
        self.new_node_ids.iter().any(|n| n == id)
    }

    /// Border to draw for a node, switching to the highlight for new nodes.
    pub fn border_for(&self, node: &GraphNode) -> &'static str {
        if self.is_new(&node.id) {
            HIGHLIGHT_BORDER
        } else {
            node.color.border
        }
    }
}

/// Convert a snapshot into display nodes and edges, diffing its ids
/// against `tracker` and updating it to this snapshot's ids.
pub fn convert(snapshot: &RoadmapSnapshot, tracker: &mut DiffTracker) -> GraphData {
    let (nodes, edges) = match snapshot {
        RoadmapSnapshot::Nested(root) => convert_nested(root),
        RoadmapSnapshot::Flat { nodes, .. } => convert_flat(nodes),
    };

    let new_node_ids = tracker.update(nodes.iter().map(|n| n.id.as_str()));

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        new = new_node_ids.len(),
        "Converted roadmap snapshot"
    );

    GraphData {
        nodes,
        edges,
        new_node_ids,
    }
}

fn graph_node(node: &RoadmapNode, level: usize) -> GraphNode {
    let category = node.category();
    let NodeStyle { shape, color } = style_for(category);
    GraphNode {
        id: node.id.clone(),
        label: node.label.clone(),
        level,
        category,
        shape,
        color,
        data: node.clone(),
    }
}

fn convert_nested(root: &RoadmapNode) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut seen = HashSet::new();
    let mut stack: Vec<(&RoadmapNode, Option<&str>, usize)> = vec![(root, None, 0)];

    while let Some((node, parent, level)) = stack.pop() {
        if !seen.insert(node.id.as_str()) {
            warn!(node_id = %node.id, "Skipping subtree with duplicate node id");
            continue;
        }

        nodes.push(graph_node(node, level));
        if let Some(parent) = parent {
            edges.push(GraphEdge {
                from: parent.to_string(),
                to: node.id.clone(),
            });
        }

        // Reverse so the first child is popped first.
        for child in node.children().iter().rev() {
            stack.push((child, Some(node.id.as_str()), level + 1));
        }
    }

    (nodes, edges)
}

fn convert_flat(source: &[RoadmapNode]) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let reconciled = reconcile_flat(source);

    let nodes = reconciled
        .nodes
        .iter()
        .zip(&reconciled.levels)
        .map(|(node, &level)| graph_node(node, level))
        .collect();

    let edges = reconciled
        .nodes
        .iter()
        .zip(&reconciled.parents)
        .filter_map(|(node, parent)| {
            parent.map(|p| GraphEdge {
                from: reconciled.nodes[p].id.clone(),
                to: node.id.clone(),
            })
        })
        .collect();

    (nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn edge(from: &str, to: &str) -> GraphEdge {
        GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    fn nested_sample() -> RoadmapNode {
        RoadmapNode::new("root", "AI Engineer")
            .with_category("ROOT")
            .with_children(vec![
                RoadmapNode::new("cat1", "Foundations")
                    .with_category("CATEGORY")
                    .with_children(vec![
                        RoadmapNode::new("t1", "Python").with_category("TOPIC"),
                        RoadmapNode::new("t2", "Statistics").with_category("TOPIC"),
                    ]),
                RoadmapNode::new("d1", "Specialize?").with_category("DECISION"),
            ])
    }

    fn flat(nodes: Vec<RoadmapNode>) -> RoadmapSnapshot {
        RoadmapSnapshot::Flat {
            nodes,
            node_details: HashMap::new(),
        }
    }

    #[test]
    fn test_style_table() {
        assert_eq!(style_for(NodeCategory::Category).shape, NodeShape::Diamond);
        assert_eq!(style_for(NodeCategory::Decision).shape, NodeShape::Circle);
        assert_eq!(style_for(NodeCategory::Topic).color.background, "#38a169");
        assert_eq!(style_for(NodeCategory::Resource).color.border, "#a0aec0");
        assert_eq!(style_for(NodeCategory::Other), DEFAULT_STYLE);
    }

    #[test]
    fn test_nested_preorder_with_levels() {
        let mut tracker = DiffTracker::new();
        let graph = convert(&RoadmapSnapshot::Nested(nested_sample()), &mut tracker);

        let order: Vec<(&str, usize)> = graph
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.level))
            .collect();
        assert_eq!(
            order,
            vec![("root", 0), ("cat1", 1), ("t1", 2), ("t2", 2), ("d1", 1)]
        );
        assert_eq!(
            graph.edges,
            vec![
                edge("root", "cat1"),
                edge("cat1", "t1"),
                edge("cat1", "t2"),
                edge("root", "d1"),
            ]
        );
        assert_eq!(graph.edges.len(), graph.nodes.len() - 1);
        assert_eq!(graph.node("d1").unwrap().shape, NodeShape::Circle);
    }

    #[test]
    fn test_payload_is_source_node() {
        let mut tracker = DiffTracker::new();
        let root = nested_sample();
        let graph = convert(&RoadmapSnapshot::Nested(root.clone()), &mut tracker);
        assert_eq!(graph.nodes[0].data, root);
        assert_eq!(graph.node("cat1").unwrap().data.children().len(), 2);
    }

    #[test]
    fn test_flat_scenario() {
        let mut tracker = DiffTracker::new();
        let graph = convert(
            &flat(vec![
                RoadmapNode::new("root", "Root").with_category("root"),
                RoadmapNode::new("catA", "A")
                    .with_category("category")
                    .with_parent("root"),
                RoadmapNode::new("topicB", "B")
                    .with_category("topic")
                    .with_parent("catA"),
            ]),
            &mut tracker,
        );

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges, vec![edge("root", "catA"), edge("catA", "topicB")]);
    }

    #[test]
    fn test_flat_orphans_get_root_edges() {
        let mut tracker = DiffTracker::new();
        let graph = convert(
            &flat(vec![
                RoadmapNode::new("root", "Root"),
                RoadmapNode::new("a", "A"),
                RoadmapNode::new("b", "B").with_parent("missing"),
            ]),
            &mut tracker,
        );
        assert_eq!(graph.edges, vec![edge("root", "a"), edge("root", "b")]);
    }

    #[test]
    fn test_missing_category_uses_default_style() {
        let mut tracker = DiffTracker::new();
        let graph = convert(
            &flat(vec![RoadmapNode::new("root", "Root")]),
            &mut tracker,
        );
        assert_eq!(graph.nodes[0].shape, DEFAULT_STYLE.shape);
        assert_eq!(graph.nodes[0].color, DEFAULT_STYLE.color);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_new_nodes_and_highlight() {
        let mut tracker = DiffTracker::from_ids(["root", "cat1"]);
        let graph = convert(&RoadmapSnapshot::Nested(nested_sample()), &mut tracker);
        assert_eq!(graph.new_node_ids, vec!["t1", "t2", "d1"]);

        let cat = graph.node("cat1").unwrap();
        let topic = graph.node("t1").unwrap();
        assert_eq!(graph.border_for(cat), "#553c9a");
        assert_eq!(graph.border_for(topic), HIGHLIGHT_BORDER);
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let snapshot = RoadmapSnapshot::Nested(nested_sample());
        let mut tracker = DiffTracker::new();
        let first = convert(&snapshot, &mut tracker);
        let second = convert(&snapshot, &mut tracker);

        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.edges, second.edges);
        assert_eq!(first.new_node_ids.len(), 5);
        assert!(second.new_node_ids.is_empty());
    }

    #[test]
    fn test_nested_duplicate_subtree_skipped() {
        let root = RoadmapNode::new("root", "Root").with_children(vec![
            RoadmapNode::new("a", "A"),
            RoadmapNode::new("a", "A again")
                .with_children(vec![RoadmapNode::new("b", "B")]),
        ]);
        let mut tracker = DiffTracker::new();
        let graph = convert(&RoadmapSnapshot::Nested(root), &mut tracker);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges, vec![edge("root", "a")]);
    }

    #[test]
    fn test_graph_serializes_camel_case() {
        let mut tracker = DiffTracker::new();
        let graph = convert(
            &flat(vec![RoadmapNode::new("root", "Root").with_category("root")]),
            &mut tracker,
        );
        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(value["newNodeIds"], serde_json::json!(["root"]));
        assert_eq!(value["nodes"][0]["shape"], "box");
        assert_eq!(value["nodes"][0]["color"]["background"], "#3182ce");
    }
}
