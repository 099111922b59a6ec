use std::collections::BTreeMap;

use serde::Serialize;
use smallvec::SmallVec;

use crate::{CoreError, NodeLabel};

/// Labels of the ring the visualizer starts from.
pub const DEFAULT_RING_LABELS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

/// Neighbor lists stay inline for the ring case (two neighbors per node).
pub type Neighbors = SmallVec<[NodeLabel; 4]>;

/// Undirected graph keyed by label.
///
/// Invariants:
/// - `v ∈ neighbors(u)` iff `u ∈ neighbors(v)`.
/// - Every neighbor is itself a key.
/// - No self-loops, no parallel edges.
///
/// Neighbor lists keep edge insertion order; BFS tie-breaking depends on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphModel {
    adjacency: BTreeMap<NodeLabel, Neighbors>,
    revision: u64,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ring: every label is added, then each label is connected to
    /// its successor, wrapping around. Duplicate or empty labels are skipped.
    pub fn ring(labels: &[&str]) -> Self {
        let mut graph = Self::new();
        for label in labels {
            graph.add_node(label);
        }
        if labels.len() > 1 {
            for (i, from) in labels.iter().enumerate() {
                let to = labels[(i + 1) % labels.len()];
                graph.connect(from, to);
            }
        }
        graph
    }

    /// Adds a node with no neighbors. No-op if the label is empty or present.
    pub fn add_node(&mut self, label: &str) -> bool {
        self.try_add_node(label).is_ok()
    }

    pub fn try_add_node(&mut self, label: &str) -> Result<(), CoreError> {
        if label.is_empty() {
            return Err(CoreError::InvalidLabel {
                label: String::new(),
                reason: "label is empty",
            });
        }
        if self.adjacency.contains_key(label) {
            return Err(CoreError::InvalidLabel {
                label: label.to_string(),
                reason: "label already exists",
            });
        }
        self.adjacency.insert(NodeLabel::from(label), Neighbors::new());
        self.revision += 1;
        Ok(())
    }

    /// Removes a node and every edge incident to it. No-op if absent.
    pub fn remove_node(&mut self, label: &str) -> bool {
        self.try_remove_node(label).is_ok()
    }

    /// Returns the former neighbors of the removed node, in adjacency order.
    pub fn try_remove_node(&mut self, label: &str) -> Result<Vec<NodeLabel>, CoreError> {
        let Some(detached) = self.adjacency.remove(label) else {
            return Err(not_found(label));
        };
        for neighbor in &detached {
            if let Some(list) = self.adjacency.get_mut(neighbor) {
                list.retain(|n| n.as_str() != label);
            }
        }
        self.revision += 1;
        Ok(detached.into_vec())
    }

    /// Adds the undirected edge `a`–`b`. No-op on self-loops, unknown
    /// labels, or an existing edge.
    pub fn connect(&mut self, a: &str, b: &str) -> bool {
        self.try_connect(a, b).is_ok()
    }

    pub fn try_connect(&mut self, a: &str, b: &str) -> Result<(), CoreError> {
        if a == b {
            return Err(CoreError::SelfLoop {
                label: a.to_string(),
            });
        }
        let (Some((a_key, a_list)), Some(b_key)) = (
            self.adjacency.get_key_value(a),
            self.adjacency.get_key_value(b).map(|(k, _)| k),
        ) else {
            let missing = if self.has_node(a) { b } else { a };
            return Err(not_found(missing));
        };
        if a_list.iter().any(|n| n.as_str() == b) {
            return Err(CoreError::EdgeExists {
                from: a.to_string(),
                to: b.to_string(),
            });
        }
        let (a_key, b_key) = (a_key.clone(), b_key.clone());
        if let Some(list) = self.adjacency.get_mut(a) {
            list.push(b_key);
        }
        if let Some(list) = self.adjacency.get_mut(b) {
            list.push(a_key);
        }
        self.revision += 1;
        Ok(())
    }

    pub fn neighbors(&self, label: &str) -> Result<&[NodeLabel], CoreError> {
        self.adjacency
            .get(label)
            .map(SmallVec::as_slice)
            .ok_or_else(|| not_found(label))
    }

    pub fn has_node(&self, label: &str) -> bool {
        self.adjacency.contains_key(label)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|list| list.iter().any(|n| n.as_str() == b))
    }

    /// All labels in lexicographic order.
    pub fn labels(&self) -> impl ExactSizeIterator<Item = &NodeLabel> + '_ {
        self.adjacency.keys()
    }

    /// The stored key for `label`, borrowed for the lifetime of the graph.
    pub(crate) fn key(&self, label: &str) -> Option<&NodeLabel> {
        self.adjacency.get_key_value(label).map(|(k, _)| k)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(SmallVec::len).sum::<usize>() / 2
    }

    pub fn degree(&self, label: &str) -> Option<usize> {
        self.adjacency.get(label).map(SmallVec::len)
    }

    /// Every edge once, as `(lesser, greater)` label pairs, sorted.
    pub fn edges(&self) -> Vec<(NodeLabel, NodeLabel)> {
        let mut edges: Vec<(NodeLabel, NodeLabel)> = self
            .adjacency
            .iter()
            .flat_map(|(from, list)| {
                list.iter()
                    .filter(move |to| from < *to)
                    .map(move |to| (from.clone(), to.clone()))
            })
            .collect();
        edges.sort();
        edges
    }

    /// Replaces the whole graph, keeping the revision counter monotonic.
    pub fn replace_with(&mut self, fresh: GraphModel) {
        let revision = self.revision + 1;
        *self = fresh;
        self.revision = revision;
    }

    /// Bumped on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

fn not_found(label: &str) -> CoreError {
    CoreError::NotFound {
        label: label.to_string(),
    }
}
