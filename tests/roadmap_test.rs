//! Structural properties of snapshot conversion.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::{HashMap, HashSet};

use roadmap_client::roadmap::{convert, DiffTracker, GraphData, RoadmapNode, RoadmapSnapshot};

/// Build a nested tree with `fanout` children per node down to `depth`.
fn nested_tree(depth: usize, fanout: usize) -> RoadmapNode {
    fn build(id: String, depth: usize, fanout: usize) -> RoadmapNode {
        let children = if depth == 0 {
            Vec::new()
        } else {
            (0..fanout)
                .map(|i| build(format!("{}.{}", id, i), depth - 1, fanout))
                .collect()
        };
        RoadmapNode::new(id.clone(), id).with_children(children)
    }
    let mut root = build("n".to_string(), depth, fanout);
    root.id = "root".to_string();
    root
}

fn assert_tree_rooted_at_root(graph: &GraphData) {
    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids.len(), graph.nodes.len(), "ids must be unique");
    assert_eq!(graph.edges.len(), graph.nodes.len() - 1);

    let mut inbound: HashMap<&str, usize> = HashMap::new();
    for edge in &graph.edges {
        assert!(ids.contains(edge.from.as_str()), "dangling edge source {}", edge.from);
        assert!(ids.contains(edge.to.as_str()), "dangling edge target {}", edge.to);
        *inbound.entry(edge.to.as_str()).or_default() += 1;
    }
    assert!(!inbound.contains_key("root"));
    for id in &ids {
        if *id != "root" {
            assert_eq!(inbound.get(id), Some(&1), "node {} needs one parent", id);
        }
    }
}

#[test]
fn test_nested_trees_have_n_minus_one_edges() {
    for (depth, fanout) in [(0, 0), (1, 3), (3, 2), (2, 5)] {
        let mut tracker = DiffTracker::new();
        let graph = convert(
            &RoadmapSnapshot::Nested(nested_tree(depth, fanout)),
            &mut tracker,
        );
        assert_tree_rooted_at_root(&graph);
    }
}

#[test]
fn test_malformed_flat_lists_still_form_a_tree() {
    let snapshot = RoadmapSnapshot::from_value(json!({
        "nodes": [
            {"id": "a", "label": "A", "parent": "ghost"},
            {"id": "b", "label": "B", "parent": "c"},
            {"id": "c", "label": "C", "parent": "b"},
            {"id": "d", "label": "D", "parent": "d"},
            {"id": "e", "label": "E"},
            {"id": "e", "label": "E again", "parent": "a"},
            {"id": "root", "label": "Root", "parent": "e"}
        ]
    }))
    .unwrap();

    let mut tracker = DiffTracker::new();
    let graph = convert(&snapshot, &mut tracker);
    assert_tree_rooted_at_root(&graph);
    assert_eq!(graph.nodes.len(), 6);
}

#[test]
fn test_flat_nodes_without_parent_hang_off_root() {
    let snapshot = RoadmapSnapshot::from_value(json!({
        "nodes": [
            {"id": "root", "label": "Root"},
            {"id": "x", "label": "X"},
            {"id": "y", "label": "Y"},
            {"id": "z", "label": "Z", "parent": "x"}
        ]
    }))
    .unwrap();

    let mut tracker = DiffTracker::new();
    let graph = convert(&snapshot, &mut tracker);
    let from_root: Vec<&str> = graph
        .edges
        .iter()
        .filter(|e| e.from == "root")
        .map(|e| e.to.as_str())
        .collect();
    assert_eq!(from_root, vec!["x", "y"]);
}

#[test]
fn test_new_ids_are_set_difference() {
    let old = RoadmapSnapshot::Nested(nested_tree(2, 2));
    let new = RoadmapSnapshot::Nested(nested_tree(3, 2));

    let mut tracker = DiffTracker::new();
    let first = convert(&old, &mut tracker);
    let second = convert(&new, &mut tracker);

    let old_ids: HashSet<&str> = first.nodes.iter().map(|n| n.id.as_str()).collect();
    let new_ids: HashSet<&str> = second.nodes.iter().map(|n| n.id.as_str()).collect();
    let expected: HashSet<&str> = new_ids.difference(&old_ids).copied().collect();
    let reported: HashSet<&str> = second.new_node_ids.iter().map(String::as_str).collect();

    assert_eq!(reported, expected);
    assert_eq!(reported.len(), second.new_node_ids.len());

    let stored: HashSet<&str> = tracker.ids().collect();
    assert_eq!(stored, new_ids);
}

#[test]
fn test_shrinking_snapshot_forgets_removed_nodes() {
    let mut tracker = DiffTracker::new();
    convert(&RoadmapSnapshot::Nested(nested_tree(3, 2)), &mut tracker);
    convert(&RoadmapSnapshot::Nested(nested_tree(1, 2)), &mut tracker);
    assert_eq!(tracker.len(), 3);

    let regrown = convert(&RoadmapSnapshot::Nested(nested_tree(2, 2)), &mut tracker);
    assert_eq!(regrown.new_node_ids.len(), 4);
}
