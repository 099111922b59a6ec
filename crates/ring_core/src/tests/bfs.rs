use super::*;

// --- Trace ordering -----------------------------------------------------

#[test]
fn test_default_ring_a_to_d_trace() {
    let graph = default_ring();
    let run = run_bfs(&graph, "A", "D").unwrap();
    assert_eq!(
        trace_summary(&run),
        vec![
            "start a",
            "queued B from A",
            "queued G from A",
            "queued C from B",
            "queued F from G",
            "queued D from C",
            "queued E from F",
            "found d",
        ]
    );
    assert_eq!(run.outcome, TraversalState::Found);
}

#[test]
fn test_default_ring_a_to_d_path_goes_via_b() {
    let graph = default_ring();
    let path = run_bfs(&graph, "A", "D").unwrap().path().unwrap();
    assert_eq!(path.to_string(), "A-B-C-D");
    assert_eq!(path.hops(), 3);
    assert_eq!(
        path.edges(),
        vec![
            (label("A"), label("B")),
            (label("B"), label("C")),
            (label("C"), label("D")),
        ]
    );
}

#[test]
fn test_trace_order_indices_are_sequential() {
    let graph = default_ring();
    let run = run_bfs(&graph, "C", "G").unwrap();
    for (i, entry) in run.trace.iter().enumerate() {
        assert_eq!(entry.order, i);
    }
}

#[test]
fn test_trace_shape_start_queued_terminal() {
    let graph = default_ring();
    let run = run_bfs(&graph, "B", "F").unwrap();
    let (first, rest) = run.trace.split_first().unwrap();
    let (last, middle) = rest.split_last().unwrap();
    assert_eq!(first.kind, TraceKind::Start);
    assert!(middle.iter().all(|e| e.kind == TraceKind::Queued));
    assert!(last.kind.is_terminal());
}

#[test]
fn test_neighbor_insertion_order_breaks_ties() {
    // Same edges as the default ring, but A learns about G first.
    let mut graph = GraphModel::new();
    for l in DEFAULT_RING_LABELS {
        graph.add_node(l);
    }
    graph.connect("G", "A");
    for pair in DEFAULT_RING_LABELS.windows(2) {
        graph.connect(pair[0], pair[1]);
    }
    let run = run_bfs(&graph, "A", "D").unwrap();
    let visit: Vec<&str> = run.visit_order().into_iter().map(NodeLabel::as_str).collect();
    assert_eq!(visit, vec!["A", "G", "B", "F", "C", "E", "D"]);
    // D is discovered from C (B's branch) before E can reach it.
    assert_eq!(run.path().unwrap().to_string(), "A-B-C-D");
}

#[test]
fn test_found_entry_carries_parent() {
    let graph = default_ring();
    let run = run_bfs(&graph, "A", "C").unwrap();
    let last = run.trace.last().unwrap();
    assert_eq!(last.kind, TraceKind::Found);
    assert_eq!(last.parent, Some(label("B")));
}

// --- Degenerate runs ----------------------------------------------------

#[test]
fn test_start_equals_end_is_immediate_found() {
    let graph = default_ring();
    let run = run_bfs(&graph, "A", "A").unwrap();
    assert_eq!(trace_summary(&run), vec!["start a", "found a"]);
    let path = run.path().unwrap();
    assert!(path.edges().is_empty());
    assert_eq!(path.hops(), 0);
}

#[test]
fn test_invalid_endpoints_are_reported() {
    let graph = default_ring();
    assert_eq!(
        run_bfs(&graph, "Z", "A").unwrap_err(),
        CoreError::InvalidStart {
            label: "Z".to_string()
        }
    );
    assert_eq!(
        run_bfs(&graph, "A", "Z").unwrap_err(),
        CoreError::InvalidEnd {
            label: "Z".to_string()
        }
    );
}

#[test]
fn test_unreachable_target() {
    let mut graph = default_ring();
    graph.remove_node("D");
    graph.add_node("D");
    let run = run_bfs(&graph, "A", "D").unwrap();
    let last = run.trace.last().unwrap();
    assert_eq!(last.kind, TraceKind::Unreachable);
    assert_eq!(last.label, label("D"));
    assert_eq!(run.outcome, TraversalState::Unreachable);
    assert!(!run.found());
    assert_eq!(
        run.path().unwrap_err(),
        CoreError::NoPath {
            start: "A".to_string(),
            end: "D".to_string()
        }
    );
    // Every other node was still discovered.
    assert_eq!(run.visit_order().len(), 6);
}

#[test]
fn test_unreachable_on_open_chain_after_cut() {
    let mut graph = path_graph(&["A", "B", "C", "D"]);
    graph.remove_node("B");
    let run = run_bfs(&graph, "A", "D").unwrap();
    assert_eq!(trace_summary(&run), vec!["start a", "unreachable d"]);
}

// --- Laziness and freshness ---------------------------------------------

#[test]
fn test_traversal_is_lazy_and_tracks_state() {
    let graph = default_ring();
    let mut traversal = traverse(&graph, "A", "D").unwrap();
    assert_eq!(traversal.state(), TraversalState::Idle);

    let first = traversal.next().unwrap();
    assert_eq!(first.kind, TraceKind::Start);
    assert_eq!(traversal.state(), TraversalState::Running);
    assert!(traversal.parents().is_empty());

    let second = traversal.next().unwrap();
    assert_eq!(second.label, label("B"));
    // Both of A's neighbors got parents in the same expansion step.
    assert_eq!(traversal.parents().len(), 2);

    let rest: Vec<TraceEntry> = traversal.by_ref().collect();
    assert_eq!(rest.last().unwrap().kind, TraceKind::Found);
    assert_eq!(traversal.state(), TraversalState::Found);
    assert!(traversal.next().is_none());
}

#[test]
fn test_repeated_runs_are_identical() {
    let graph = default_ring();
    let first = run_bfs(&graph, "E", "B").unwrap();
    let second = run_bfs(&graph, "E", "B").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parent_map_does_not_leak_between_runs() {
    let graph = default_ring();
    let long = run_bfs(&graph, "A", "E").unwrap();
    let short = run_bfs(&graph, "A", "B").unwrap();
    assert!(long.parents.len() > short.parents.len());
    assert_eq!(short.parents.len(), 2);
    assert!(!short.parents.contains_key("E"));
}

#[test]
fn test_reconstruct_path_rejects_missing_links() {
    let parents = std::collections::BTreeMap::from([(label("C"), label("B"))]);
    let err = reconstruct_path(&parents, &label("A"), &label("C")).unwrap_err();
    assert!(matches!(err, CoreError::NoPath { .. }));
}

#[test]
fn test_run_serializes_with_snake_case_kinds() {
    let graph = default_ring();
    let run = run_bfs(&graph, "A", "B").unwrap();
    let json = serde_json::to_value(&run).unwrap();
    assert_eq!(json["outcome"], "found");
    assert_eq!(json["trace"][0]["kind"], "start");
    assert_eq!(json["trace"][1]["kind"], "queued");
    assert_eq!(json["trace"][1]["parent"], "A");
}
