//! Scenario definition for headless lesson runs.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("scenario has no steps")]
    Empty,
}

/// Sequence of headless steps run against one lesson.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    /// Lesson to launch when none is given by the caller
    #[serde(default)]
    pub lesson: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self, ScenarioError> {
        let scenario: HeadlessScenario = serde_json::from_str(input)?;
        if scenario.steps.is_empty() {
            return Err(ScenarioError::Empty);
        }
        Ok(scenario)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

/// One scenario step. Element ids are node names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Tap a named node
    Tap { id: String },
    /// Press down on a named node
    Press { id: String },
    /// Release a press on a named node
    Release { id: String },
    /// Advance a number of frames at the configured interval
    Tick { frames: u32 },
    /// Advance wall time, one frame interval at a time
    Wait { ms: u64 },
    /// Advance until every animation has finished
    Settle,
    AssertExists { id: String },
    AssertMissing { id: String },
    AssertTextContains { id: String, value: String },
    /// Compare one animatable attribute of a presented node
    AssertAttr {
        id: String,
        attr: String,
        value: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
}

fn default_tolerance() -> f32 {
    0.01
}

impl ScenarioStep {
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            ScenarioStep::AssertExists { .. }
                | ScenarioStep::AssertMissing { .. }
                | ScenarioStep::AssertTextContains { .. }
                | ScenarioStep::AssertAttr { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let scenario = HeadlessScenario::from_json(
            r#"{
                "lesson": "pressable_button",
                "steps": [
                    { "type": "press", "id": "button" },
                    { "type": "tick", "frames": 2 },
                    { "type": "assert_attr", "id": "button", "attr": "scale", "value": 0.9 },
                    { "type": "settle" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.lesson.as_deref(), Some("pressable_button"));
        assert_eq!(scenario.steps.len(), 4);
        assert_eq!(
            scenario.steps[2],
            ScenarioStep::AssertAttr {
                id: "button".into(),
                attr: "scale".into(),
                value: 0.9,
                tolerance: 0.01,
            }
        );
        assert!(scenario.steps[2].is_assertion());
        assert!(!scenario.steps[3].is_assertion());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            HeadlessScenario::from_json(r#"{ "steps": [] }"#),
            Err(ScenarioError::Empty)
        ));
        assert!(matches!(
            HeadlessScenario::from_json(r#"{ "steps": [{ "type": "fly" }] }"#),
            Err(ScenarioError::Parse(_))
        ));
    }
}
