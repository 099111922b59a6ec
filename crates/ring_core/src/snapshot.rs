//! Read-only view of the graph for front ends to redraw from.

use serde::Serialize;

use crate::{GraphModel, LayoutAssigner, NodeLabel, Position};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub label: NodeLabel,
    pub position: Position,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub from: NodeLabel,
    pub to: NodeLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub revision: u64,
    /// Sorted by label, which is also ring order.
    pub nodes: Vec<NodeView>,
    /// Each edge once, `from < to`.
    pub edges: Vec<EdgeView>,
}

impl GraphSnapshot {
    pub fn capture(graph: &GraphModel, assigner: &LayoutAssigner) -> Self {
        let layout = assigner.assign(graph.labels());
        let nodes = layout
            .into_iter()
            .map(|(label, position)| NodeView {
                degree: graph.degree(label.as_str()).unwrap_or(0),
                label,
                position,
            })
            .collect();
        let edges = graph
            .edges()
            .into_iter()
            .map(|(from, to)| EdgeView { from, to })
            .collect();
        Self {
            revision: graph.revision(),
            nodes,
            edges,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &NodeLabel> + '_ {
        self.nodes.iter().map(|n| &n.label)
    }
}
