//! Loading visualizer configs from disk: the shipped `content/` file, partial
//! overrides, and malformed input.

use std::io::Write;
use std::path::PathBuf;

use ring_core::{AutoConnectPolicy, Canvas};
use ring_world::{build_initial_graph, load_config, load_config_or_default, VisualizerConfig};

/// Integration tests run from the crate directory, so we go up two levels.
fn shipped_config() -> PathBuf {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    PathBuf::from(manifest).join("../../content/visualizer.json")
}

fn write_temp(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn shipped_config_matches_defaults() {
    let config = load_config(&shipped_config()).unwrap();
    assert_eq!(config, VisualizerConfig::default());
}

#[test]
fn partial_config_fills_in_defaults() {
    let file = write_temp(r#"{ "step_delay_ms": 50 }"#);
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.step_delay_ms, 50);
    assert_eq!(config.ring_labels.len(), 7);
    assert_eq!(config.auto_connect, AutoConnectPolicy::default());
}

#[test]
fn custom_ring_and_disabled_policy() {
    let file = write_temp(
        r#"{
            "ring_labels": ["N1", "N2", "N3", "N4"],
            "auto_connect": { "mode": "disabled" }
        }"#,
    );
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.auto_connect, AutoConnectPolicy::Disabled);
    let graph = build_initial_graph(&config);
    assert_eq!(graph.node_count(), 4);
    assert!(graph.has_edge("N4", "N1"));
}

#[test]
fn malformed_json_reports_path() {
    let file = write_temp("{ not json");
    let err = load_config(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("parsing config file"), "{err:#}");
}

#[test]
fn invalid_values_are_rejected_on_load() {
    let file = write_temp(r#"{ "canvas": { "width": 0.0, "height": 700.0, "radius": 120.0 } }"#);
    let err = load_config(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("positive dimensions"), "{err:#}");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(load_config_or_default(Some(missing.as_path())).is_err());
    assert!(load_config_or_default(None).is_ok());
}

#[test]
fn padded_ring_label_is_rejected() {
    let file = write_temp(r#"{ "ring_labels": ["A", "B", " C"] }"#);
    let err = load_config(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("trimmed and upper-case"), "{err:#}");
}

#[test]
fn lowercase_ring_label_is_rejected() {
    // "b" would otherwise slip past the duplicate check next to "B".
    let file = write_temp(r#"{ "ring_labels": ["A", "B", "b"] }"#);
    let err = load_config(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("trimmed and upper-case"), "{err:#}");
}

#[test]
fn partial_canvas_keeps_other_dimensions() {
    let file = write_temp(r#"{ "canvas": { "radius": 100.0 } }"#);
    let config = load_config(file.path()).unwrap();
    assert_eq!(
        config.canvas,
        Canvas {
            radius: 100.0,
            ..Canvas::default()
        }
    );
}
