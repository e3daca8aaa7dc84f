//! Spring physics
//!
//! Damped harmonic oscillator integrated with RK4. A spring has no fixed
//! duration: it runs until both displacement and velocity fall under the
//! rest thresholds, then snaps exactly onto its target.

use serde::{Deserialize, Serialize};

/// Displacement below which a spring may come to rest
pub const REST_DISPLACEMENT: f32 = 1e-3;
/// Speed (units per second) below which a spring may come to rest
pub const REST_VELOCITY: f32 = 1e-2;

/// Largest integration step in seconds; larger frame deltas are sub-stepped
const MAX_STEP: f32 = 1.0 / 240.0;

/// Physical parameters of a spring
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Build from a perceptual description.
    ///
    /// `response` is the undamped period in seconds; `damping_fraction` is the
    /// damping ratio (1.0 = critically damped). Mass is fixed at 1.
    pub fn from_response(response: f32, damping_fraction: f32) -> Self {
        let response = response.max(1e-3);
        let omega = std::f32::consts::TAU / response;
        Self {
            stiffness: omega * omega,
            damping: 2.0 * damping_fraction * omega,
            mass: 1.0,
        }
    }

    /// Default UI spring: 0.55s response, 0.825 damping fraction
    pub fn standard() -> Self {
        Self::from_response(0.55, 0.825)
    }

    /// Fast, no visible overshoot
    pub fn stiff() -> Self {
        Self::new(400.0, 40.0, 1.0)
    }

    /// Quick with a hint of bounce; used for press feedback
    pub fn snappy() -> Self {
        Self::new(300.0, 24.0, 1.0)
    }

    pub fn gentle() -> Self {
        Self::new(120.0, 18.0, 1.0)
    }

    pub fn wobbly() -> Self {
        Self::new(180.0, 10.0, 1.0)
    }

    /// Damping ratio ζ = c / (2·√(k·m))
    pub fn damping_ratio(&self) -> f32 {
        let critical = 2.0 * (self.stiffness * self.mass).sqrt();
        if critical <= 0.0 {
            return 0.0;
        }
        self.damping / critical
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// A single animated scalar driven by a spring
#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    settled: bool,
}

impl Spring {
    /// Create a spring resting at `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            settled: true,
        }
    }

    /// Start with an initial velocity (units per second)
    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self.settled = self.at_rest();
        self
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Move the rest point; keeps the current value and velocity
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
        self.settled = self.at_rest();
    }

    /// Jump to the target and stop
    pub fn snap(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
        self.settled = true;
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.settled || dt <= 0.0 {
            return;
        }

        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP);
            self.integrate(h);
            remaining -= h;
        }

        if self.at_rest() {
            self.snap();
        }
    }

    fn at_rest(&self) -> bool {
        (self.value - self.target).abs() < REST_DISPLACEMENT && self.velocity.abs() < REST_VELOCITY
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let mass = self.config.mass.max(1e-3);
        (-self.config.stiffness * (x - self.target) - self.config.damping * v) / mass
    }

    /// One classic RK4 step of x' = v, v' = a(x, v)
    fn integrate(&mut self, h: f32) {
        let (x, v) = (self.value, self.velocity);

        let k1x = v;
        let k1v = self.acceleration(x, v);

        let k2x = v + 0.5 * h * k1v;
        let k2v = self.acceleration(x + 0.5 * h * k1x, k2x);

        let k3x = v + 0.5 * h * k2v;
        let k3v = self.acceleration(x + 0.5 * h * k2x, k3x);

        let k4x = v + h * k3v;
        let k4v = self.acceleration(x + h * k3x, k4x);

        self.value = x + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity = v + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }
}
