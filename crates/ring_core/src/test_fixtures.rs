//! Shared test fixtures for `ring_core` and downstream crates.
//!
//! `default_ring()` is the seven-node A..G ring the visualizer starts from.
//! `path_graph()` builds an open chain, handy for unreachable-target cases
//! once a link is removed.

use crate::{GraphModel, GraphRules, NodeLabel, DEFAULT_RING_LABELS};

pub fn default_ring() -> GraphModel {
    GraphModel::ring(&DEFAULT_RING_LABELS)
}

pub fn default_rules() -> GraphRules {
    GraphRules::default()
}

/// `labels[0] - labels[1] - ... - labels[n-1]`, not closed.
pub fn path_graph(labels: &[&str]) -> GraphModel {
    let mut graph = GraphModel::new();
    for label in labels {
        graph.add_node(label);
    }
    for pair in labels.windows(2) {
        graph.connect(pair[0], pair[1]);
    }
    graph
}

pub fn label(name: &str) -> NodeLabel {
    NodeLabel::from(name)
}

pub fn labels(names: &[&str]) -> Vec<NodeLabel> {
    names.iter().map(|n| NodeLabel::from(*n)).collect()
}
