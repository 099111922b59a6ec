//! Visualizer configuration and initial-graph construction shared between
//! `ring_cli` and `ring_daemon`.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use ring_core::{
    normalize_label, AutoConnectPolicy, Canvas, GraphModel, GraphRules, LayoutAssigner,
    NodeLabel, DEFAULT_RING_LABELS, DEFAULT_STEP,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub canvas: Canvas,
    /// Labels of the starting ring, connected in this order.
    pub ring_labels: Vec<String>,
    /// Pause after each discovered node when replaying a trace.
    pub step_delay_ms: u64,
    pub auto_connect: AutoConnectPolicy,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            ring_labels: DEFAULT_RING_LABELS.iter().map(ToString::to_string).collect(),
            step_delay_ms: u64::try_from(DEFAULT_STEP.as_millis()).unwrap_or(500),
            auto_connect: AutoConnectPolicy::default(),
        }
    }
}

impl VisualizerConfig {
    pub fn rules(&self) -> GraphRules {
        GraphRules {
            auto_connect: self.auto_connect.clone(),
            ring_labels: self
                .ring_labels
                .iter()
                .map(|l| NodeLabel::from(l.as_str()))
                .collect(),
        }
    }

    pub fn layout(&self) -> LayoutAssigner {
        LayoutAssigner::new(self.canvas)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// Rejects configurations that would produce a broken or undrawable ring.
pub fn validate_config(config: &VisualizerConfig) -> Result<()> {
    let canvas = &config.canvas;
    ensure!(
        canvas.width > 0.0 && canvas.height > 0.0,
        "canvas must have positive dimensions, got {}x{}",
        canvas.width,
        canvas.height,
    );
    ensure!(
        canvas.radius > 0.0,
        "ring radius must be positive, got {}",
        canvas.radius,
    );
    ensure!(
        canvas.radius * 2.0 <= canvas.width.min(canvas.height),
        "ring radius {} does not fit a {}x{} canvas",
        canvas.radius,
        canvas.width,
        canvas.height,
    );

    let mut seen = HashSet::new();
    for label in &config.ring_labels {
        ensure!(!label.trim().is_empty(), "ring labels must be non-empty");
        // Anything else could never be typed back through AddNode.
        ensure!(
            *label == normalize_label(label),
            "ring label '{label}' must be trimmed and upper-case",
        );
        ensure!(seen.insert(label.as_str()), "duplicate ring label '{label}'");
    }
    Ok(())
}

pub fn load_config(path: &Path) -> Result<VisualizerConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file: {}", path.display()))?;
    let config: VisualizerConfig = serde_json::from_str(&json)
        .with_context(|| format!("parsing config file: {}", path.display()))?;
    validate_config(&config).with_context(|| format!("validating {}", path.display()))?;
    Ok(config)
}

/// Loads `path` if given, otherwise the built-in defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<VisualizerConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(VisualizerConfig::default()),
    }
}

pub fn build_initial_graph(config: &VisualizerConfig) -> GraphModel {
    config.rules().initial_graph()
}
