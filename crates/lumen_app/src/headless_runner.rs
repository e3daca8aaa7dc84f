//! Scenario runner that drives a lesson without a window.

use crate::config::LumenConfig;
use crate::headless_assert::{
    evaluate_assert_attr, evaluate_assert_exists, evaluate_assert_missing,
    evaluate_assert_text_contains, AssertionResult, DiagnosticsSnapshot,
};
use crate::headless_report::{HeadlessReport, RunStats};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use crate::lessons;
use crate::renderer::Renderer;
use crate::runtime::Runtime;
use anyhow::{anyhow, Result};
use lumen_core::{InputEvent, InputKind};

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Parse scenario JSON and run it against a freshly launched lesson.
///
/// `lesson` overrides the lesson named in the scenario.
pub fn run_scenario(
    input: &str,
    lesson: Option<&str>,
    config: LumenConfig,
    renderer: &mut dyn Renderer,
) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    let lesson = lesson
        .or(scenario.lesson.as_deref())
        .ok_or_else(|| anyhow!("no lesson given and the scenario does not name one"))?;
    let mut runtime = lessons::launch(lesson, config)?;
    run_loaded_scenario(&scenario, &mut runtime, renderer)
}

/// Run a pre-loaded scenario against an existing runtime.
pub fn run_loaded_scenario(
    scenario: &HeadlessScenario,
    runtime: &mut Runtime,
    renderer: &mut dyn Renderer,
) -> Result<RunOutcome> {
    let lesson = runtime.view_name().to_string();
    let interval = runtime.config().animation.frame_interval_ms;
    let started_ms = runtime.time_ms();
    let started_rebuilds = runtime.rebuild_count();
    let started_snapped = runtime.snapped_count();
    let mut elapsed_frames: u64 = 0;

    tracing::debug!(%lesson, steps = scenario.steps.len(), "running scenario");

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::trace!(step_index, ?step, "step");
        let result = match step {
            ScenarioStep::Tap { id } => dispatch(runtime, InputKind::Tap, id)?,
            ScenarioStep::Press { id } => dispatch(runtime, InputKind::PressDown, id)?,
            ScenarioStep::Release { id } => dispatch(runtime, InputKind::PressUp, id)?,
            ScenarioStep::Tick { frames } => {
                for _ in 0..*frames {
                    renderer.render(&runtime.advance(interval));
                }
                elapsed_frames += u64::from(*frames);
                AssertionResult::Passed
            }
            ScenarioStep::Wait { ms } => {
                let mut remaining = *ms as f32;
                while remaining > 0.0 {
                    let dt = remaining.min(interval);
                    renderer.render(&runtime.advance(dt));
                    remaining -= dt;
                    elapsed_frames += 1;
                }
                AssertionResult::Passed
            }
            ScenarioStep::Settle => {
                elapsed_frames += runtime.settle(renderer) as u64;
                AssertionResult::Passed
            }
            ScenarioStep::AssertExists { id } => evaluate_assert_exists(id, &snapshot(runtime)),
            ScenarioStep::AssertMissing { id } => evaluate_assert_missing(id, &snapshot(runtime)),
            ScenarioStep::AssertTextContains { id, value } => {
                evaluate_assert_text_contains(id, value, &snapshot(runtime))
            }
            ScenarioStep::AssertAttr {
                id,
                attr,
                value,
                tolerance,
            } => evaluate_assert_attr(id, attr, *value, *tolerance, &snapshot(runtime)),
        };

        if let AssertionResult::Failed { code, message } = result {
            tracing::debug!(step_index, %code, %message, "scenario failed");
            let stats = RunStats {
                elapsed_frames,
                elapsed_ms: runtime.time_ms() - started_ms,
                rebuilds: runtime.rebuild_count() - started_rebuilds,
                snapped: runtime.snapped_count() - started_snapped,
            };
            let report = HeadlessReport::failed(
                &lesson,
                step_name(step),
                step_index,
                code,
                message,
                stats,
            );
            return Ok(RunOutcome::Failed { report });
        }
    }

    let stats = RunStats {
        elapsed_frames,
        elapsed_ms: runtime.time_ms() - started_ms,
        rebuilds: runtime.rebuild_count() - started_rebuilds,
        snapped: runtime.snapped_count() - started_snapped,
    };
    Ok(RunOutcome::Passed {
        report: HeadlessReport::passed(&lesson, stats),
    })
}

fn snapshot(runtime: &Runtime) -> DiagnosticsSnapshot {
    DiagnosticsSnapshot::capture(&runtime.presented())
}

fn dispatch(runtime: &mut Runtime, kind: InputKind, id: &str) -> Result<AssertionResult> {
    if runtime.dispatch(InputEvent::new(kind, id))? {
        Ok(AssertionResult::Passed)
    } else {
        Ok(AssertionResult::Failed {
            code: "missing_target".to_string(),
            message: format!("{id}: no node to receive {kind:?}"),
        })
    }
}

fn step_name(step: &ScenarioStep) -> &'static str {
    match step {
        ScenarioStep::Tap { .. } => "tap",
        ScenarioStep::Press { .. } => "press",
        ScenarioStep::Release { .. } => "release",
        ScenarioStep::Tick { .. } => "tick",
        ScenarioStep::Wait { .. } => "wait",
        ScenarioStep::Settle => "settle",
        ScenarioStep::AssertExists { .. } => "assert_exists",
        ScenarioStep::AssertMissing { .. } => "assert_missing",
        ScenarioStep::AssertTextContains { .. } => "assert_text_contains",
        ScenarioStep::AssertAttr { .. } => "assert_attr",
    }
}
