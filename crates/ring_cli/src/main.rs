use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ring_core::{
    apply_command, delay_after, traverse, ConnectReason, GraphCommand, GraphEvent, GraphModel,
    GraphSnapshot, TraceEntry, TraceKind,
};
use ring_world::{build_initial_graph, load_config_or_default, VisualizerConfig};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "ring_cli", about = "BFS ring visualizer CLI")]
struct Cli {
    /// Visualizer config JSON. Built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Graph edits applied in order before anything else:
    /// `add:H`, `add:H:C` (connect to C), `remove:C`, `edge:B-E`, `reset`.
    #[arg(long = "op", global = true)]
    ops: Vec<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run BFS and replay the trace step by step.
    Run {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Override the configured pause after each discovered node.
        #[arg(long)]
        step_ms: Option<u64>,
        /// Replay without pausing.
        #[arg(long, conflicts_with = "step_ms")]
        no_delay: bool,
        /// Print the completed run as JSON instead of replaying it.
        #[arg(long)]
        json: bool,
    },
    /// Print the graph and its ring layout.
    Layout {
        #[arg(long)]
        json: bool,
    },
}

// ---------------------------------------------------------------------------
// Graph edits
// ---------------------------------------------------------------------------

fn parse_op(op: &str) -> Result<GraphCommand> {
    let mut parts = op.splitn(3, ':');
    let verb = parts.next().unwrap_or_default();
    let command = match (verb, parts.next(), parts.next()) {
        ("add", Some(label), connect_to) => GraphCommand::AddNode {
            label: label.to_string(),
            connect_to: connect_to.map(str::to_string),
        },
        ("remove", Some(label), None) => GraphCommand::RemoveNode {
            label: label.to_string(),
        },
        ("edge", Some(pair), None) => {
            let Some((from, to)) = pair.split_once('-') else {
                bail!("edge op must look like edge:FROM-TO, got '{op}'");
            };
            GraphCommand::AddEdge {
                from: from.to_string(),
                to: to.to_string(),
            }
        }
        ("reset", None, None) => GraphCommand::Reset,
        _ => bail!("unrecognised op '{op}'"),
    };
    Ok(command)
}

fn describe(event: &GraphEvent) -> String {
    match event {
        GraphEvent::NodeAdded { label } => format!("Node {label} added with circular update."),
        GraphEvent::NodeRemoved { label, .. } => format!("Node {label} removed."),
        GraphEvent::Connected {
            from,
            to,
            reason: ConnectReason::Requested,
        } => format!("Connected {from} to {to}"),
        GraphEvent::Connected {
            from,
            to,
            reason: ConnectReason::AutoConnect,
        } => format!("Also connected {from} to {to} to complete the circle"),
        GraphEvent::Connected {
            from,
            to,
            reason: ConnectReason::Edge,
        } => format!("Edge {from}-{to} added"),
        GraphEvent::GraphReset { .. } => "Graph reset.".to_string(),
        GraphEvent::Rejected { command, error } => format!("Ignored {command:?}: {error}"),
    }
}

fn build_graph(config: &VisualizerConfig, ops: &[String]) -> Result<GraphModel> {
    let rules = config.rules();
    let mut graph = build_initial_graph(config);
    for op in ops {
        let command = parse_op(op).with_context(|| format!("parsing --op {op}"))?;
        for event in apply_command(&mut graph, &command, &rules) {
            if matches!(event, GraphEvent::Rejected { .. }) {
                tracing::debug!(?event, "command rejected");
            }
            log(&describe(&event));
        }
    }
    Ok(graph)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn log(message: &str) {
    println!("[LOG] {message}");
}

fn print_layout(snapshot: &GraphSnapshot) {
    println!(
        "revision={}  nodes={}  edges={}",
        snapshot.revision,
        snapshot.nodes.len(),
        snapshot.edges.len(),
    );
    println!("{}", "-".repeat(60));
    for node in &snapshot.nodes {
        println!(
            "{label:>6}  x={x:8.2}  y={y:8.2}  connections={degree}",
            label = node.label,
            x = node.position.x,
            y = node.position.y,
            degree = node.degree,
        );
    }
    let edges: Vec<String> = snapshot
        .edges
        .iter()
        .map(|e| format!("{}-{}", e.from, e.to))
        .collect();
    println!("edges: [{}]", edges.join(", "));
}

fn describe_entry(entry: &TraceEntry) -> String {
    match (entry.kind, &entry.parent) {
        (TraceKind::Start, _) => format!("Starting BFS from: {}", entry.label),
        (TraceKind::Queued, Some(parent)) => format!("Queueing: {} from: {parent}", entry.label),
        (TraceKind::Queued, None) => format!("Queueing: {}", entry.label),
        (TraceKind::Found, _) => format!("Destination {} found.", entry.label),
        (TraceKind::Unreachable, _) => format!("Destination {} not reachable.", entry.label),
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn run(graph: &GraphModel, start: &str, end: &str, step: Duration, json: bool) -> Result<()> {
    if json {
        let run = ring_core::run_bfs(graph, start, end)?;
        let body = serde_json::json!({
            "run": run,
            "path": run.path().ok(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let mut traversal = traverse(graph, start, end)?;
    for entry in traversal.by_ref() {
        log(&describe_entry(&entry));
        let delay = delay_after(&entry, step);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    // The trace is already drained; only the parent links remain.
    let run = traversal.finish();
    match run.path() {
        Ok(path) => log(&format!(
            "Path from {start} to {end}: {path} ({} hops)",
            path.hops()
        )),
        Err(err) => tracing::debug!(%err, "no path to draw"),
    }
    Ok(())
}

fn layout(config: &VisualizerConfig, graph: &GraphModel, json: bool) -> Result<()> {
    let snapshot = GraphSnapshot::capture(graph, &config.layout());
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_layout(&snapshot);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config_or_default(cli.config.as_deref())?;
    let graph = build_graph(&config, &cli.ops)?;

    match cli.command {
        Commands::Run {
            start,
            end,
            step_ms,
            no_delay,
            json,
        } => {
            let step = if no_delay {
                Duration::ZERO
            } else {
                step_ms.map_or_else(|| config.step_delay(), Duration::from_millis)
            };
            run(&graph, &start, &end, step, json)?;
        }
        Commands::Layout { json } => layout(&config, &graph, json)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_with_and_without_target() {
        assert_eq!(
            parse_op("add:H").unwrap(),
            GraphCommand::AddNode {
                label: "H".to_string(),
                connect_to: None
            }
        );
        assert_eq!(
            parse_op("add:H:C").unwrap(),
            GraphCommand::AddNode {
                label: "H".to_string(),
                connect_to: Some("C".to_string())
            }
        );
    }

    #[test]
    fn parse_edge_remove_reset() {
        assert_eq!(
            parse_op("edge:B-E").unwrap(),
            GraphCommand::AddEdge {
                from: "B".to_string(),
                to: "E".to_string()
            }
        );
        assert_eq!(
            parse_op("remove:C").unwrap(),
            GraphCommand::RemoveNode {
                label: "C".to_string()
            }
        );
        assert_eq!(parse_op("reset").unwrap(), GraphCommand::Reset);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_op("edge:BE").is_err());
        assert!(parse_op("remove").is_err());
        assert!(parse_op("explode:A").is_err());
    }

    #[test]
    fn build_graph_applies_ops_in_order() {
        let ops = vec!["add:H".to_string(), "remove:A".to_string()];
        let graph = build_graph(&VisualizerConfig::default(), &ops).unwrap();
        assert!(graph.has_node("H"));
        assert_eq!(graph.degree("H"), Some(0), "H lost its only edge with A");
    }

    #[test]
    fn ops_parse_before_and_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "ring_cli", "--op", "add:H:C", "run", "--start", "A", "--end", "D", "--op",
            "edge:B-E", "--no-delay",
        ])
        .unwrap();
        assert_eq!(cli.ops, vec!["add:H:C", "edge:B-E"]);
        assert!(matches!(cli.command, Commands::Run { no_delay: true, .. }));

        let graph = build_graph(&VisualizerConfig::default(), &cli.ops).unwrap();
        assert!(graph.has_edge("H", "C"));
        assert!(graph.has_edge("B", "E"));
    }

    #[test]
    fn describe_entry_matches_log_lines() {
        let graph = build_initial_graph(&VisualizerConfig::default());
        let run = ring_core::run_bfs(&graph, "A", "B").unwrap();
        let lines: Vec<String> = run.trace.iter().map(describe_entry).collect();
        assert_eq!(
            lines,
            vec![
                "Starting BFS from: A",
                "Queueing: B from: A",
                "Queueing: G from: A",
                "Destination B found.",
            ]
        );
    }

    #[test]
    fn describe_auto_connect() {
        let event = GraphEvent::Connected {
            from: "H".into(),
            to: "A".into(),
            reason: ConnectReason::AutoConnect,
        };
        assert_eq!(
            describe(&event),
            "Also connected H to A to complete the circle"
        );
    }
}
