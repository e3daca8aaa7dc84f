//! Input events
//!
//! The core does no gesture recognition. Hosts deliver these discrete
//! signals and views translate them into state writes.

use serde::{Deserialize, Serialize};

/// Kind of discrete input signal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Completed tap (press + release inside the target)
    Tap,
    PressDown,
    PressUp,
    /// Press left the target or was interrupted
    PressCancel,
}

impl InputKind {
    /// Whether this signal changes a pressable's pressed state
    pub fn is_press(&self) -> bool {
        matches!(
            self,
            InputKind::PressDown | InputKind::PressUp | InputKind::PressCancel
        )
    }
}

/// A UI event addressed to a named target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: InputKind,
    /// Target name as declared on the view node
    pub target: String,
    /// Host timestamp in milliseconds
    #[serde(default)]
    pub timestamp_ms: f64,
}

impl InputEvent {
    pub fn new(kind: InputKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            timestamp_ms: 0.0,
        }
    }

    pub fn tap(target: impl Into<String>) -> Self {
        Self::new(InputKind::Tap, target)
    }

    pub fn press_down(target: impl Into<String>) -> Self {
        Self::new(InputKind::PressDown, target)
    }

    pub fn press_up(target: impl Into<String>) -> Self {
        Self::new(InputKind::PressUp, target)
    }

    pub fn at(mut self, timestamp_ms: f64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}
