//! Headless scenarios against the built-in lessons

use lumen_app::headless_report::ReportStatus;
use lumen_app::headless_runner::{run_loaded_scenario, run_scenario, RunOutcome};
use lumen_app::headless_scenario::HeadlessScenario;
use lumen_app::prelude::*;
use tracing_subscriber::EnvFilter;

/// RUST_LOG=lumen_app=trace shows each scenario step
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn run(input: &str) -> RunOutcome {
    init_tracing();
    let mut renderer = SnapshotRenderer::new();
    run_scenario(input, None, LumenConfig::default(), &mut renderer).unwrap()
}

fn assert_passed(outcome: &RunOutcome) {
    let report = outcome.report();
    assert!(
        !outcome.is_failed(),
        "step {:?} ({:?}) failed: {:?}",
        report.failed_step_index,
        report.assertion,
        report.message
    );
}

#[test]
fn test_categories_scenario() {
    let outcome = run(include_str!("scenarios/categories.json"));
    assert_passed(&outcome);
    let report = outcome.report();
    assert_eq!(report.lesson, "categories");
    assert_eq!(report.stats.rebuilds, 2);
    assert_eq!(report.stats.snapped, 0);
    assert!(report.stats.elapsed_frames > 3);
}

#[test]
fn test_transitions_scenario() {
    let outcome = run(include_str!("scenarios/transitions.json"));
    assert_passed(&outcome);
    assert!(outcome.report().stats.elapsed_ms > 2.0 * 750.0 - 1.0);
}

#[test]
fn test_pressable_scenario() {
    let outcome = run(include_str!("scenarios/pressable_button.json"));
    assert_passed(&outcome);
    assert_eq!(outcome.report().stats.elapsed_frames, 0);
}

#[test]
fn test_failed_assertion_reports_step() {
    let outcome = run(r#"{
        "lesson": "categories",
        "steps": [
            { "type": "tap", "id": "Home" },
            { "type": "settle" },
            { "type": "assert_attr", "id": "square", "attr": "x", "value": 260.0 },
            { "type": "assert_exists", "id": "square" }
        ]
    }"#);
    assert!(outcome.is_failed());
    let report = outcome.report();
    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(report.failed_step_index, Some(2));
    assert_eq!(report.assertion.as_deref(), Some("assert_attr"));
    assert_eq!(report.code.as_deref(), Some("attr_mismatch"));
}

#[test]
fn test_scenario_on_existing_runtime() {
    let scenario = HeadlessScenario::from_json(
        r#"{ "steps": [
            { "type": "tap", "id": "screen" },
            { "type": "settle" },
            { "type": "assert_attr", "id": "screen", "attr": "width", "value": 390.0 }
        ] }"#,
    )
    .unwrap();
    let mut runtime = lessons::launch("matched_geometry", LumenConfig::default()).unwrap();
    runtime.advance(100.0);

    let mut renderer = SnapshotRenderer::new();
    let outcome = run_loaded_scenario(&scenario, &mut runtime, &mut renderer).unwrap();
    assert_passed(&outcome);
    // Stats only cover the scenario itself
    assert!((outcome.report().stats.elapsed_ms - 350.0).abs() < 1e-2);
    assert_eq!(renderer.len() as u64, outcome.report().stats.elapsed_frames);
}

#[test]
fn test_config_changes_frame_pacing() {
    let config = LumenConfig::from_toml("[animation]\nframe_interval_ms = 50.0\n").unwrap();
    let mut renderer = SnapshotRenderer::new();
    let outcome = run_scenario(
        r#"{ "steps": [{ "type": "tap", "id": "button" }, { "type": "settle" }] }"#,
        Some("transitions"),
        config,
        &mut renderer,
    )
    .unwrap();
    assert_passed(&outcome);
    assert_eq!(outcome.report().stats.elapsed_frames, 15);
}
