//! Animation curves attached to transactions

use crate::easing::Easing;
use crate::spring::SpringConfig;
use serde::{Deserialize, Serialize};

/// Default duration of the named timed curves, in milliseconds
pub const DEFAULT_DURATION_MS: f32 = 350.0;

/// How a transaction's changes are interpolated
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum AnimationSpec {
    /// Fixed-duration easing curve
    Timed { easing: Easing, duration_ms: f32 },
    /// Damped oscillator; runs until settled
    Spring(SpringConfig),
}

impl AnimationSpec {
    pub fn timed(easing: Easing, duration_ms: f32) -> Self {
        AnimationSpec::Timed {
            easing,
            duration_ms: duration_ms.max(0.0),
        }
    }

    pub fn linear(duration_ms: f32) -> Self {
        Self::timed(Easing::Linear, duration_ms)
    }

    pub fn ease_in(duration_ms: f32) -> Self {
        Self::timed(Easing::EaseIn, duration_ms)
    }

    pub fn ease_out(duration_ms: f32) -> Self {
        Self::timed(Easing::EaseOut, duration_ms)
    }

    pub fn ease_in_out(duration_ms: f32) -> Self {
        Self::timed(Easing::EaseInOut, duration_ms)
    }

    /// The standard UI spring
    pub fn spring() -> Self {
        AnimationSpec::Spring(SpringConfig::standard())
    }

    pub fn spring_with(response: f32, damping_fraction: f32) -> Self {
        AnimationSpec::Spring(SpringConfig::from_response(response, damping_fraction))
    }

    /// Spring from raw physical parameters
    pub fn interpolating_spring(stiffness: f32, damping: f32, mass: f32) -> Self {
        AnimationSpec::Spring(SpringConfig::new(stiffness, damping, mass))
    }

    /// Fixed duration, or `None` for springs
    pub fn duration_ms(&self) -> Option<f32> {
        match self {
            AnimationSpec::Timed { duration_ms, .. } => Some(*duration_ms),
            AnimationSpec::Spring(_) => None,
        }
    }

    pub fn is_spring(&self) -> bool {
        matches!(self, AnimationSpec::Spring(_))
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::ease_in_out(DEFAULT_DURATION_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(AnimationSpec::linear(200.0).duration_ms(), Some(200.0));
        assert_eq!(AnimationSpec::spring().duration_ms(), None);
        assert_eq!(AnimationSpec::default().duration_ms(), Some(DEFAULT_DURATION_MS));
    }

    #[test]
    fn test_negative_duration_is_clamped() {
        assert_eq!(AnimationSpec::linear(-5.0).duration_ms(), Some(0.0));
    }

    #[test]
    fn test_spring_with_uses_response() {
        let AnimationSpec::Spring(config) = AnimationSpec::spring_with(0.5, 1.0) else {
            panic!("expected spring");
        };
        assert!((config.damping_ratio() - 1.0).abs() < 1e-4);
    }
}
