//! Type definitions for `ring_core`.
//!
//! Labels, positions, trace entries and the error taxonomy shared by the
//! graph model, the BFS engine and the layout assigner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(NodeLabel);

// ---------------------------------------------------------------------------
// Layout types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Label → canvas coordinate. Ordered by label so iteration matches the ring.
pub type Layout = BTreeMap<NodeLabel, Position>;

// ---------------------------------------------------------------------------
// BFS trace types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// The start node, emitted once before any expansion.
    Start,
    /// A neighbor discovered for the first time.
    Queued,
    /// The popped node equals the target. Terminal.
    Found,
    /// The queue emptied without reaching the target. Terminal.
    Unreachable,
}

impl TraceKind {
    pub fn is_terminal(self) -> bool {
        matches!(self, TraceKind::Found | TraceKind::Unreachable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub order: usize,
    pub kind: TraceKind,
    pub label: NodeLabel,
    /// The node that discovered `label`. `None` for the start node and for
    /// an `Unreachable` entry.
    pub parent: Option<NodeLabel>,
}

/// Per-run traversal state: `Idle → Running → {Found, Unreachable}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalState {
    Idle,
    Running,
    Found,
    Unreachable,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoreError {
    #[error("invalid label '{label}': {reason}")]
    InvalidLabel { label: String, reason: &'static str },

    #[error("node '{label}' not found")]
    NotFound { label: String },

    #[error("cannot connect '{label}' to itself")]
    SelfLoop { label: String },

    #[error("edge {from}-{to} already exists")]
    EdgeExists { from: String, to: String },

    #[error("start node '{label}' is not in the graph")]
    InvalidStart { label: String },

    #[error("end node '{label}' is not in the graph")]
    InvalidEnd { label: String },

    #[error("no path from '{start}' to '{end}'")]
    NoPath { start: String, end: String },
}
