//! Turning a flat node list with parent references into a tree rooted at `root`.

use std::collections::{HashMap, HashSet};
use tracing::warn;

use super::types::{RoadmapNode, DEFAULT_ROOT_LABEL, ROOT_ID};

/// A flat node list whose parent links form a single tree.
#[derive(Debug, Clone, Default)]
pub(crate) struct Reconciled {
    /// Nodes in source order; a synthesized root comes first.
    pub nodes: Vec<RoadmapNode>,
    /// Index of each node's parent; `None` only for the root.
    pub parents: Vec<Option<usize>>,
    /// Distance from the root.
    pub levels: Vec<usize>,
}

/// Resolve parent references so every non-root node has exactly one parent
/// and every node is reachable from the root.
///
/// - a node without a parent hangs off `root`
/// - a parent id that does not exist is replaced by `root`
/// - a parent cycle is broken by re-parenting its first node to `root`
/// - duplicate ids keep their first occurrence
/// - a missing `root` node is synthesized
pub(crate) fn reconcile_flat(source: &[RoadmapNode]) -> Reconciled {
    let mut seen = HashSet::new();
    let mut nodes: Vec<RoadmapNode> = Vec::with_capacity(source.len() + 1);
    for node in source {
        if seen.insert(node.id.as_str()) {
            nodes.push(node.clone());
        } else {
            warn!(node_id = %node.id, "Dropping node with duplicate id");
        }
    }

    if nodes.is_empty() {
        return Reconciled::default();
    }

    if !seen.contains(ROOT_ID) {
        warn!("Flat roadmap has no root node, synthesizing one");
        nodes.insert(
            0,
            RoadmapNode::new(ROOT_ID, DEFAULT_ROOT_LABEL).with_category("root"),
        );
    }

    let Some(root) = nodes.iter().position(RoadmapNode::is_root) else {
        return Reconciled::default();
    };

    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut parents: Vec<Option<usize>> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            if i == root {
                if let Some(parent) = node.parent_id() {
                    warn!(parent = %parent, "Ignoring parent reference on root node");
                }
                return None;
            }
            match node.parent_id() {
                None => Some(root),
                Some(parent) => match index.get(parent) {
                    Some(&p) if p != i => Some(p),
                    Some(_) => {
                        warn!(node_id = %node.id, "Node is its own parent, attaching to root");
                        Some(root)
                    }
                    None => {
                        warn!(
                            node_id = %node.id,
                            parent = %parent,
                            "Parent does not exist, attaching to root"
                        );
                        Some(root)
                    }
                },
            }
        })
        .collect();

    break_cycles(&nodes, &mut parents, root);
    let levels = compute_levels(&parents, root);

    Reconciled {
        nodes,
        parents,
        levels,
    }
}

fn break_cycles(nodes: &[RoadmapNode], parents: &mut [Option<usize>], root: usize) {
    for start in 0..parents.len() {
        let mut visited = HashSet::new();
        let mut current = start;
        while current != root {
            if !visited.insert(current) {
                warn!(node_id = %nodes[current].id, "Breaking parent cycle, attaching to root");
                parents[current] = Some(root);
                visited.clear();
                current = start;
                continue;
            }
            match parents[current] {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }
}

fn compute_levels(parents: &[Option<usize>], root: usize) -> Vec<usize> {
    let mut levels: Vec<Option<usize>> = vec![None; parents.len()];
    levels[root] = Some(0);

    for start in 0..parents.len() {
        let mut chain = Vec::new();
        let mut current = start;
        let base = loop {
            if let Some(level) = levels[current] {
                break level;
            }
            chain.push(current);
            match parents[current] {
                Some(parent) => current = parent,
                None => break 0,
            }
        };
        for (depth, node) in chain.into_iter().rev().enumerate() {
            levels[node] = Some(base + depth + 1);
        }
    }

    levels.into_iter().map(|l| l.unwrap_or(0)).collect()
}
