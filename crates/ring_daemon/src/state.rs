use parking_lot::Mutex;
use ring_core::{GraphEvent, GraphModel, GraphRules, LayoutAssigner};
use ring_world::{build_initial_graph, VisualizerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Everything a front end can observe or change. Graph mutation and
/// traversal both happen under the session lock, never concurrently.
pub struct Session {
    pub graph: GraphModel,
    pub rules: GraphRules,
    pub layout: LayoutAssigner,
    pub step_delay: Duration,
}

impl Session {
    pub fn from_config(config: &VisualizerConfig) -> Self {
        Self {
            graph: build_initial_graph(config),
            rules: config.rules(),
            layout: config.layout(),
            step_delay: config.step_delay(),
        }
    }
}

pub type SharedSession = Arc<Mutex<Session>>;
pub type EventTx = broadcast::Sender<Vec<GraphEvent>>;

#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub event_tx: EventTx,
}

impl AppState {
    pub fn new(config: &VisualizerConfig) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            session: Arc::new(Mutex::new(Session::from_config(config))),
            event_tx,
        }
    }
}
