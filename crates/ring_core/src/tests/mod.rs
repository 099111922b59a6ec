use super::*;
use crate::test_fixtures::{default_ring, default_rules, label, path_graph};

mod bfs;

// --- Shared test helpers ------------------------------------------------

fn add_node(label: &str, connect_to: Option<&str>) -> GraphCommand {
    GraphCommand::AddNode {
        label: label.to_string(),
        connect_to: connect_to.map(str::to_string),
    }
}

fn trace_summary(run: &BfsRun) -> Vec<String> {
    run.trace
        .iter()
        .map(|e| match (&e.kind, &e.parent) {
            (TraceKind::Queued, Some(parent)) => format!("queued {} from {parent}", e.label),
            (kind, _) => format!("{kind:?} {}", e.label).to_lowercase(),
        })
        .collect()
}

fn assert_symmetric(graph: &GraphModel) {
    for node in graph.labels() {
        for neighbor in graph.neighbors(node.as_str()).unwrap() {
            assert!(
                graph.has_edge(neighbor.as_str(), node.as_str()),
                "edge {node}-{neighbor} is not mirrored"
            );
        }
    }
}
