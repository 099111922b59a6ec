use crate::state::{AppState, Session};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
    routing::{delete, get, post},
    Router,
};
use ring_core::{
    apply_command, delay_after, run_bfs, BfsRun, CoreError, GraphCommand, GraphEvent,
    GraphSnapshot,
};
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[cfg(test)]
pub fn make_router(state: AppState) -> Router {
    make_router_with_cors(state, HeaderValue::from_static("http://localhost:5173"))
}

pub fn make_router_with_cors(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/meta", get(meta_handler))
        .route("/api/v1/graph", get(graph_handler))
        .route("/api/v1/nodes", post(add_node_handler))
        .route("/api/v1/nodes/:label", delete(remove_node_handler))
        .route("/api/v1/edges", post(add_edge_handler))
        .route("/api/v1/reset", post(reset_handler))
        .route("/api/v1/bfs", post(bfs_handler))
        .route("/api/v1/bfs/stream", get(bfs_stream_handler))
        .route("/api/v1/events", get(events_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

fn error_status(error: &CoreError) -> StatusCode {
    match error {
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::InvalidStart { .. } | CoreError::InvalidEnd { .. } => StatusCode::BAD_REQUEST,
        CoreError::InvalidLabel { .. }
        | CoreError::SelfLoop { .. }
        | CoreError::EdgeExists { .. }
        | CoreError::NoPath { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn error_response(error: &CoreError) -> Response {
    (
        error_status(error),
        Json(serde_json::json!({ "error": error.to_string(), "detail": error })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Graph queries and mutations
// ---------------------------------------------------------------------------

pub async fn meta_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let session = app_state.session.lock();
    Json(serde_json::json!({
        "revision": session.graph.revision(),
        "nodes": session.graph.node_count(),
        "edges": session.graph.edge_count(),
        "step_delay_ms": u64::try_from(session.step_delay.as_millis()).unwrap_or(u64::MAX),
        "auto_connect": session.rules.auto_connect,
    }))
}

pub async fn graph_handler(State(app_state): State<AppState>) -> Json<GraphSnapshot> {
    let session = app_state.session.lock();
    Json(GraphSnapshot::capture(&session.graph, &session.layout))
}

#[derive(Deserialize)]
pub struct AddNodeRequest {
    pub label: String,
    #[serde(default)]
    pub connect_to: Option<String>,
}

#[derive(Deserialize)]
pub struct AddEdgeRequest {
    pub from: String,
    pub to: String,
}

pub async fn add_node_handler(
    State(app_state): State<AppState>,
    Json(request): Json<AddNodeRequest>,
) -> Response {
    apply(
        &app_state,
        &GraphCommand::AddNode {
            label: request.label,
            connect_to: request.connect_to,
        },
    )
}

pub async fn remove_node_handler(
    State(app_state): State<AppState>,
    Path(label): Path<String>,
) -> Response {
    apply(&app_state, &GraphCommand::RemoveNode { label })
}

pub async fn add_edge_handler(
    State(app_state): State<AppState>,
    Json(request): Json<AddEdgeRequest>,
) -> Response {
    apply(
        &app_state,
        &GraphCommand::AddEdge {
            from: request.from,
            to: request.to,
        },
    )
}

pub async fn reset_handler(State(app_state): State<AppState>) -> Response {
    apply(&app_state, &GraphCommand::Reset)
}

/// Applies a command, broadcasts what changed, and answers with the events
/// plus a fresh snapshot so the caller can redraw in one round trip.
fn apply(app_state: &AppState, command: &GraphCommand) -> Response {
    let (events, snapshot) = {
        let mut guard = app_state.session.lock();
        let Session {
            ref mut graph,
            ref rules,
            ref layout,
            ..
        } = *guard;
        let events = apply_command(graph, command, rules);
        (events, GraphSnapshot::capture(graph, layout))
    };

    let mut status = StatusCode::OK;
    for event in &events {
        match event {
            GraphEvent::Rejected { error, .. } => {
                tracing::debug!(%error, ?command, "command rejected");
                status = error_status(error);
            }
            _ => tracing::info!(?event, revision = snapshot.revision, "graph updated"),
        }
    }
    if status == StatusCode::OK {
        // No subscribers is fine.
        let _ = app_state.event_tx.send(events.clone());
    }

    (
        status,
        Json(serde_json::json!({ "events": events, "graph": snapshot })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// BFS
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct BfsRequest {
    pub start: String,
    pub end: String,
}

fn run_summary(run_id: Uuid, run: &BfsRun) -> serde_json::Value {
    serde_json::json!({
        "run_id": run_id,
        "start": run.start,
        "end": run.end,
        "outcome": run.outcome,
        "path": run.path().ok(),
    })
}

/// Runs BFS under the session lock and releases it before returning.
fn run_locked(
    app_state: &AppState,
    request: &BfsRequest,
) -> Result<(BfsRun, Duration), CoreError> {
    let session = app_state.session.lock();
    let run = run_bfs(&session.graph, &request.start, &request.end)?;
    Ok((run, session.step_delay))
}

pub async fn bfs_handler(
    State(app_state): State<AppState>,
    Json(request): Json<BfsRequest>,
) -> Response {
    match run_locked(&app_state, &request) {
        Ok((run, _)) => {
            let run_id = Uuid::new_v4();
            tracing::info!(
                %run_id,
                start = %run.start,
                end = %run.end,
                outcome = ?run.outcome,
                "bfs run"
            );
            let mut body = run_summary(run_id, &run);
            body["trace"] = serde_json::json!(run.trace);
            Json(body).into_response()
        }
        Err(error) => error_response(&error),
    }
}

/// Replays a BFS trace as server-sent events, pausing after each discovery.
/// Dropping the connection cancels the replay.
pub async fn bfs_stream_handler(
    State(app_state): State<AppState>,
    Query(request): Query<BfsRequest>,
) -> Response {
    let (run, step) = match run_locked(&app_state, &request) {
        Ok(found) => found,
        Err(error) => return error_response(&error),
    };
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, start = %run.start, end = %run.end, "bfs replay started");

    let stream = async_stream::stream! {
        for entry in &run.trace {
            let data = serde_json::to_string(entry).unwrap_or_default();
            yield Ok::<Event, Infallible>(
                Event::default()
                    .event("trace")
                    .id(entry.order.to_string())
                    .data(data),
            );
            let delay = delay_after(entry, step);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        let done = run_summary(run_id, &run);
        yield Ok(Event::default().event("done").data(done.to_string()));
    };

    Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)).text("ping"))
        .into_response()
}

// ---------------------------------------------------------------------------
// Graph event stream
// ---------------------------------------------------------------------------

pub async fn events_handler(
    State(app_state): State<AppState>,
) -> Sse<impl futures_core::Stream<Item = Result<Event, Infallible>>> {
    let mut rx = app_state.event_tx.subscribe();
    let session = app_state.session.clone();

    let stream = async_stream::stream! {
        let mut heartbeat = tokio::time::interval(Duration::from_secs(5));
        heartbeat.tick().await; // discard the immediate first tick
        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Ok(events) if !events.is_empty() => {
                            let data = serde_json::to_string(&events).unwrap_or_default();
                            yield Ok(Event::default().event("graph").data(data));
                        }
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = heartbeat.tick() => {
                    let revision = session.lock().graph.revision();
                    let hb = serde_json::json!({"heartbeat": true, "revision": revision});
                    yield Ok(Event::default().data(hb.to_string()));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}
