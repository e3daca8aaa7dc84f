//! Motions
//!
//! A [`Motion`] animates one scalar channel from a start value to a target,
//! either along a timed easing curve or with a spring. Retargeting always
//! starts from the value currently presented, so interrupting a motion never
//! makes the channel jump.

use crate::easing::Easing;
use crate::spec::AnimationSpec;
use crate::spring::Spring;
use lumen_core::geometry::lerp;

/// Fixed-duration interpolation
#[derive(Clone, Debug, PartialEq)]
pub struct TimedMotion {
    from: f32,
    to: f32,
    easing: Easing,
    duration_ms: f32,
    elapsed_ms: f32,
}

impl TimedMotion {
    pub fn new(from: f32, to: f32, easing: Easing, duration_ms: f32) -> Self {
        Self {
            from,
            to,
            easing,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Value at normalized progress `t`; exact target at `t >= 1`
    fn sample(&self, t: f32) -> f32 {
        if t >= 1.0 {
            return self.to;
        }
        lerp(self.from, self.to, self.easing.apply(t))
    }

    pub fn value(&self) -> f32 {
        self.sample(self.progress())
    }

    /// Instantaneous rate of change in units per second
    pub fn velocity(&self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }
        let t = self.progress();
        let h = 1e-3;
        let (a, b) = ((t - h).max(0.0), (t + h).min(1.0));
        let slope = (self.sample(b) - self.sample(a)) / (b - a);
        slope * 1000.0 / self.duration_ms
    }

    pub fn remaining_ms(&self) -> f32 {
        (self.duration_ms - self.elapsed_ms).max(0.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn step(&mut self, dt_ms: f32) {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
    }
}

/// One animated channel
#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
    Timed(TimedMotion),
    Spring(Spring),
}

impl Motion {
    /// Animate from `from` to `to` along `spec`
    pub fn new(from: f32, to: f32, spec: &AnimationSpec) -> Self {
        Self::with_velocity(from, to, 0.0, spec)
    }

    fn with_velocity(from: f32, to: f32, velocity: f32, spec: &AnimationSpec) -> Self {
        match *spec {
            AnimationSpec::Timed {
                easing,
                duration_ms,
            } => Motion::Timed(TimedMotion::new(from, to, easing, duration_ms)),
            AnimationSpec::Spring(config) => {
                let mut spring = Spring::new(config, from).with_velocity(velocity);
                spring.set_target(to);
                Motion::Spring(spring)
            }
        }
    }

    pub fn value(&self) -> f32 {
        match self {
            Motion::Timed(m) => m.value(),
            Motion::Spring(s) => s.value(),
        }
    }

    pub fn target(&self) -> f32 {
        match self {
            Motion::Timed(m) => m.to,
            Motion::Spring(s) => s.target(),
        }
    }

    pub fn velocity(&self) -> f32 {
        match self {
            Motion::Timed(m) => m.velocity(),
            Motion::Spring(s) => s.velocity(),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Motion::Timed(m) => m.is_finished(),
            Motion::Spring(s) => s.is_settled(),
        }
    }

    /// Time left for timed motions; `None` for springs
    pub fn remaining_ms(&self) -> Option<f32> {
        match self {
            Motion::Timed(m) => Some(m.remaining_ms()),
            Motion::Spring(_) => None,
        }
    }

    /// Advance by `dt_ms` milliseconds
    pub fn step(&mut self, dt_ms: f32) {
        match self {
            Motion::Timed(m) => m.step(dt_ms),
            Motion::Spring(s) => s.step(dt_ms / 1000.0),
        }
    }

    /// Head for a new target from the current value.
    ///
    /// Springs keep their velocity whatever the previous curve was.
    pub fn retarget(&mut self, to: f32, spec: &AnimationSpec) {
        let from = self.value();
        let velocity = self.velocity();
        *self = Self::with_velocity(from, to, velocity, spec);
    }

    /// Jump to the target
    pub fn snap(&mut self) {
        match self {
            Motion::Timed(m) => m.elapsed_ms = m.duration_ms,
            Motion::Spring(s) => s.snap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_motion_midpoint_and_end() {
        let mut m = Motion::new(0.0, 10.0, &AnimationSpec::linear(100.0));
        m.step(50.0);
        assert!((m.value() - 5.0).abs() < 1e-5);
        assert!(!m.is_finished());
        m.step(50.0);
        assert_eq!(m.value(), 10.0);
        assert!(m.is_finished());
        assert_eq!(m.remaining_ms(), Some(0.0));
    }

    #[test]
    fn test_overstep_lands_on_target() {
        let mut m = Motion::new(3.0, 7.5, &AnimationSpec::ease_in_out(350.0));
        m.step(1000.0);
        assert_eq!(m.value(), 7.5);
    }

    #[test]
    fn test_zero_duration_is_immediately_done() {
        let m = Motion::new(0.0, 1.0, &AnimationSpec::linear(0.0));
        assert!(m.is_finished());
        assert_eq!(m.value(), 1.0);
    }

    #[test]
    fn test_retarget_is_continuous() {
        let spec = AnimationSpec::ease_in_out(400.0);
        let mut m = Motion::new(0.0, 100.0, &spec);
        m.step(200.0);
        let before = m.value();
        m.retarget(-50.0, &spec);
        assert!((m.value() - before).abs() < 1e-4);
        assert_eq!(m.target(), -50.0);
        m.step(400.0);
        assert_eq!(m.value(), -50.0);
    }

    #[test]
    fn test_retarget_into_spring_keeps_velocity() {
        let mut m = Motion::new(0.0, 100.0, &AnimationSpec::linear(1000.0));
        m.step(500.0);
        let v = m.velocity();
        assert!((v - 100.0).abs() < 0.5);
        m.retarget(0.0, &AnimationSpec::spring());
        assert!((m.velocity() - v).abs() < 1e-4);
        assert!((m.value() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_spring_motion_settles() {
        let mut m = Motion::new(0.0, 1.0, &AnimationSpec::spring());
        assert_eq!(m.remaining_ms(), None);
        for _ in 0..240 {
            m.step(1000.0 / 60.0);
        }
        assert!(m.is_finished());
        assert_eq!(m.value(), 1.0);
    }

    #[test]
    fn test_snap() {
        let mut m = Motion::new(0.0, 4.0, &AnimationSpec::spring());
        m.snap();
        assert!(m.is_finished());
        assert_eq!(m.value(), 4.0);
    }
}
