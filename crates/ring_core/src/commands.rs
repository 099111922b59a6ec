//! Graph commands issued by a front end and the events they produce.
//!
//! Mutations on [`GraphModel`] are silent no-ops when their preconditions do
//! not hold. The command layer keeps that forgiving behaviour but reports
//! what happened, including why a command was ignored.

use serde::{Deserialize, Serialize};

use crate::{CoreError, GraphModel, NodeLabel, DEFAULT_RING_LABELS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GraphCommand {
    AddNode {
        label: String,
        #[serde(default)]
        connect_to: Option<String>,
    },
    RemoveNode {
        label: String,
    },
    AddEdge {
        from: String,
        to: String,
    },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectReason {
    /// The connect-to target chosen alongside a new node.
    Requested,
    /// Added by the [`AutoConnectPolicy`].
    AutoConnect,
    /// An explicit add-edge command.
    Edge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum GraphEvent {
    NodeAdded {
        label: NodeLabel,
    },
    NodeRemoved {
        label: NodeLabel,
        detached: Vec<NodeLabel>,
    },
    Connected {
        from: NodeLabel,
        to: NodeLabel,
        reason: ConnectReason,
    },
    GraphReset {
        labels: Vec<NodeLabel>,
    },
    Rejected {
        command: GraphCommand,
        error: CoreError,
    },
}

/// Extra edge added whenever a node is added.
///
/// The visualizer closes the ring by tying every new node back to an anchor
/// node ("A" by default) unless it is already adjacent to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AutoConnectPolicy {
    RingClosure { anchor: NodeLabel },
    Disabled,
}

impl Default for AutoConnectPolicy {
    fn default() -> Self {
        AutoConnectPolicy::RingClosure {
            anchor: NodeLabel::from("A"),
        }
    }
}

impl AutoConnectPolicy {
    /// The node `added` should additionally be connected to, if any.
    pub fn target<'g>(&self, graph: &'g GraphModel, added: &str) -> Option<&'g NodeLabel> {
        match self {
            AutoConnectPolicy::RingClosure { anchor } => {
                let anchor = graph.key(anchor.as_str())?;
                let already = anchor.as_str() == added || graph.has_edge(added, anchor.as_str());
                (!already).then_some(anchor)
            }
            AutoConnectPolicy::Disabled => None,
        }
    }
}

/// Session rules applied by [`apply_command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRules {
    pub auto_connect: AutoConnectPolicy,
    /// Labels of the ring restored by [`GraphCommand::Reset`].
    pub ring_labels: Vec<NodeLabel>,
}

impl Default for GraphRules {
    fn default() -> Self {
        Self {
            auto_connect: AutoConnectPolicy::default(),
            ring_labels: DEFAULT_RING_LABELS.iter().map(|l| NodeLabel::from(*l)).collect(),
        }
    }
}

impl GraphRules {
    pub fn initial_graph(&self) -> GraphModel {
        let labels: Vec<&str> = self.ring_labels.iter().map(NodeLabel::as_str).collect();
        GraphModel::ring(&labels)
    }
}

/// Labels typed by a user are trimmed and upper-cased.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Applies one command and returns every event it produced, in order.
pub fn apply_command(
    graph: &mut GraphModel,
    command: &GraphCommand,
    rules: &GraphRules,
) -> Vec<GraphEvent> {
    let mut events = Vec::new();
    let result = match command {
        GraphCommand::AddNode { label, connect_to } => {
            add_node(graph, label, connect_to.as_deref(), rules, &mut events)
        }
        GraphCommand::RemoveNode { label } => graph.try_remove_node(label).map(|detached| {
            events.push(GraphEvent::NodeRemoved {
                label: NodeLabel::from(label.as_str()),
                detached,
            });
        }),
        GraphCommand::AddEdge { from, to } => graph.try_connect(from, to).map(|()| {
            events.push(GraphEvent::Connected {
                from: NodeLabel::from(from.as_str()),
                to: NodeLabel::from(to.as_str()),
                reason: ConnectReason::Edge,
            });
        }),
        GraphCommand::Reset => {
            graph.replace_with(rules.initial_graph());
            events.push(GraphEvent::GraphReset {
                labels: graph.labels().cloned().collect(),
            });
            Ok(())
        }
    };
    if let Err(error) = result {
        events.push(GraphEvent::Rejected {
            command: command.clone(),
            error,
        });
    }
    events
}

fn add_node(
    graph: &mut GraphModel,
    raw_label: &str,
    connect_to: Option<&str>,
    rules: &GraphRules,
    events: &mut Vec<GraphEvent>,
) -> Result<(), CoreError> {
    let label = normalize_label(raw_label);
    graph.try_add_node(&label)?;
    events.push(GraphEvent::NodeAdded {
        label: NodeLabel::from(label.as_str()),
    });

    // An unknown connect-to target is ignored; the node itself stays.
    if let Some(target) = connect_to.map(normalize_label) {
        if graph.connect(&label, &target) {
            events.push(GraphEvent::Connected {
                from: NodeLabel::from(label.as_str()),
                to: NodeLabel::from(target.as_str()),
                reason: ConnectReason::Requested,
            });
        }
    }

    if let Some(anchor) = rules.auto_connect.target(graph, &label).cloned() {
        if graph.connect(&label, anchor.as_str()) {
            events.push(GraphEvent::Connected {
                from: NodeLabel::from(label.as_str()),
                to: anchor,
                reason: ConnectReason::AutoConnect,
            });
        }
    }
    Ok(())
}
