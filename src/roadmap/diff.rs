//! Detection of nodes that are new since the last applied snapshot.

use std::collections::HashSet;
use tracing::debug;

/// Set of node ids seen in the last applied snapshot.
///
/// Each [`update`](DiffTracker::update) replaces the stored set with exactly
/// the ids of the new snapshot; ids missing from it are forgotten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffTracker {
    seen: HashSet<String>,
}

impl DiffTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker that already knows the given ids.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Return the ids not seen before, in input order and without
    /// duplicates, and remember exactly `ids` from now on.
    pub fn update<I, S>(&mut self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current = HashSet::new();
        let mut fresh = Vec::new();

        for id in ids {
            let id = id.as_ref();
            if current.insert(id.to_string()) && !self.seen.contains(id) {
                fresh.push(id.to_string());
            }
        }

        debug!(
            previous = self.seen.len(),
            current = current.len(),
            new = fresh.len(),
            "Diffed roadmap node ids"
        );

        self.seen = current;
        fresh
    }

    /// Same result as [`update`](DiffTracker::update) without changing state.
    pub fn peek_new<I, S>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut visited = HashSet::new();
        ids.into_iter()
            .filter_map(|id| {
                let id = id.as_ref();
                (visited.insert(id.to_string()) && !self.seen.contains(id))
                    .then(|| id.to_string())
            })
            .collect()
    }

    /// Whether the id was part of the last applied snapshot.
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Number of remembered ids.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no ids are remembered.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Remembered ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.seen.iter().map(String::as_str)
    }
}
