//! `ring_core`: graph model, BFS trace and ring layout for the visualizer.
//!
//! No IO, no timing. Front ends call the mutators, ask for a layout, run a
//! traversal and replay its trace at whatever pace they like.

pub mod bfs;
mod commands;
mod graph;
mod layout;
mod replay;
mod snapshot;
#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;
mod types;

pub use bfs::{reconstruct_path, traverse, BfsRun, ShortestPath, Traversal};
pub use commands::{
    apply_command, normalize_label, AutoConnectPolicy, ConnectReason, GraphCommand, GraphEvent,
    GraphRules,
};
pub use graph::{GraphModel, Neighbors, DEFAULT_RING_LABELS};
pub use layout::{Canvas, LayoutAssigner};
pub use replay::{delay_after, replay_schedule, ReplayStep, DEFAULT_STEP};
pub use snapshot::{EdgeView, GraphSnapshot, NodeView};
pub use types::*;

/// Runs BFS from `start` to `end` and collects the whole trace.
pub fn run_bfs(graph: &GraphModel, start: &str, end: &str) -> Result<BfsRun, CoreError> {
    bfs::run(graph, start, end)
}

#[cfg(test)]
mod tests;
