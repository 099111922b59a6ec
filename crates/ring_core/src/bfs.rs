//! Breadth-first search producing a replayable visitation trace.
//!
//! The traversal is a lazy iterator over [`TraceEntry`] values. It borrows
//! the graph immutably, so the graph cannot change while a trace is being
//! produced. Each call to [`traverse`] starts from a fresh queue, visited set
//! and parent map.

use std::collections::{BTreeMap, VecDeque};

use ahash::AHashSet;
use serde::Serialize;

use crate::{CoreError, GraphModel, NodeLabel, TraceEntry, TraceKind, TraversalState};

/// Lazily generated BFS trace from `start` toward `end`.
pub struct Traversal<'g> {
    graph: &'g GraphModel,
    start: &'g NodeLabel,
    end: &'g NodeLabel,
    queue: VecDeque<&'g NodeLabel>,
    visited: AHashSet<&'g NodeLabel>,
    parents: BTreeMap<NodeLabel, NodeLabel>,
    pending: VecDeque<TraceEntry>,
    state: TraversalState,
    next_order: usize,
}

/// Starts a traversal. Fails if either endpoint is missing from the graph.
pub fn traverse<'g>(
    graph: &'g GraphModel,
    start: &str,
    end: &str,
) -> Result<Traversal<'g>, CoreError> {
    let start = graph.key(start).ok_or_else(|| CoreError::InvalidStart {
        label: start.to_string(),
    })?;
    let end = graph.key(end).ok_or_else(|| CoreError::InvalidEnd {
        label: end.to_string(),
    })?;
    Ok(Traversal {
        graph,
        start,
        end,
        queue: VecDeque::new(),
        visited: AHashSet::new(),
        parents: BTreeMap::new(),
        pending: VecDeque::new(),
        state: TraversalState::Idle,
        next_order: 0,
    })
}

/// Runs BFS to completion and collects the trace.
pub fn run(graph: &GraphModel, start: &str, end: &str) -> Result<BfsRun, CoreError> {
    Ok(traverse(graph, start, end)?.finish())
}

impl Traversal<'_> {
    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Parent links discovered so far.
    pub fn parents(&self) -> &BTreeMap<NodeLabel, NodeLabel> {
        &self.parents
    }

    /// Drains the remaining trace and returns the completed run.
    pub fn finish(mut self) -> BfsRun {
        let trace: Vec<TraceEntry> = self.by_ref().collect();
        BfsRun {
            start: self.start.clone(),
            end: self.end.clone(),
            outcome: self.state,
            trace,
            parents: self.parents,
        }
    }

    fn entry(
        &mut self,
        kind: TraceKind,
        label: NodeLabel,
        parent: Option<NodeLabel>,
    ) -> TraceEntry {
        let order = self.next_order;
        self.next_order += 1;
        TraceEntry {
            order,
            kind,
            label,
            parent,
        }
    }

    /// Pops nodes until one yields trace entries or the run terminates.
    fn advance(&mut self) -> TraceEntry {
        loop {
            let Some(current) = self.queue.pop_front() else {
                self.state = TraversalState::Unreachable;
                return self.entry(TraceKind::Unreachable, self.end.clone(), None);
            };

            if current == self.end {
                self.state = TraversalState::Found;
                let parent = self.parents.get(current).cloned();
                return self.entry(TraceKind::Found, current.clone(), parent);
            }

            // Labels in a neighbor list are always keys of the graph.
            let graph = self.graph;
            let neighbors = graph.neighbors(current.as_str()).unwrap_or(&[]);
            for neighbor in neighbors {
                if self.visited.insert(neighbor) {
                    self.parents.insert(neighbor.clone(), current.clone());
                    self.queue.push_back(neighbor);
                    let entry =
                        self.entry(TraceKind::Queued, neighbor.clone(), Some(current.clone()));
                    self.pending.push_back(entry);
                }
            }

            if let Some(entry) = self.pending.pop_front() {
                return entry;
            }
        }
    }
}

impl Iterator for Traversal<'_> {
    type Item = TraceEntry;

    fn next(&mut self) -> Option<TraceEntry> {
        if let Some(entry) = self.pending.pop_front() {
            return Some(entry);
        }
        match self.state {
            TraversalState::Idle => {
                self.state = TraversalState::Running;
                self.visited.insert(self.start);
                self.queue.push_back(self.start);
                Some(self.entry(TraceKind::Start, self.start.clone(), None))
            }
            TraversalState::Running => Some(self.advance()),
            TraversalState::Found | TraversalState::Unreachable => None,
        }
    }
}

/// A completed BFS run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BfsRun {
    pub start: NodeLabel,
    pub end: NodeLabel,
    pub outcome: TraversalState,
    pub trace: Vec<TraceEntry>,
    pub parents: BTreeMap<NodeLabel, NodeLabel>,
}

impl BfsRun {
    pub fn found(&self) -> bool {
        self.outcome == TraversalState::Found
    }

    /// Walks parent links back from `end` to `start`.
    pub fn path(&self) -> Result<ShortestPath, CoreError> {
        reconstruct_path(&self.parents, &self.start, &self.end)
    }

    /// Labels in the order they were first highlighted (start, then each
    /// queued discovery).
    pub fn visit_order(&self) -> Vec<&NodeLabel> {
        self.trace
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Start | TraceKind::Queued))
            .map(|e| &e.label)
            .collect()
    }
}

/// Rebuilds the start→end path from a parent map.
pub fn reconstruct_path(
    parents: &BTreeMap<NodeLabel, NodeLabel>,
    start: &NodeLabel,
    end: &NodeLabel,
) -> Result<ShortestPath, CoreError> {
    let no_path = || CoreError::NoPath {
        start: start.to_string(),
        end: end.to_string(),
    };
    let mut nodes = vec![end.clone()];
    let mut current = end;
    while current != start {
        // A parent chain can never be longer than the map itself.
        if nodes.len() > parents.len() + 1 {
            return Err(no_path());
        }
        let Some(prev) = parents.get(current) else {
            return Err(no_path());
        };
        nodes.push(prev.clone());
        current = prev;
    }
    nodes.reverse();
    Ok(ShortestPath { nodes })
}

/// Node sequence from start to end, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortestPath {
    pub nodes: Vec<NodeLabel>,
}

impl ShortestPath {
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Consecutive `(from, to)` pairs. Empty when start equals end.
    pub fn edges(&self) -> Vec<(NodeLabel, NodeLabel)> {
        self.nodes
            .windows(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect()
    }
}

impl std::fmt::Display for ShortestPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.nodes.iter().map(NodeLabel::as_str).collect();
        f.write_str(&labels.join("-"))
    }
}
