//! Lumen Animation System
//!
//! Easing curves, spring physics, and per-channel motions.
//!
//! # Features
//!
//! - **Timed curves**: linear and cubic-bezier easing over a fixed duration
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Motions**: one animated scalar that can be retargeted mid-flight
//! - **Scheduler**: ticks every motion and snaps runaway springs

pub mod easing;
pub mod motion;
pub mod scheduler;
pub mod spec;
pub mod spring;

pub use easing::Easing;
pub use motion::Motion;
pub use scheduler::{AnimationScheduler, MotionId};
pub use spec::AnimationSpec;
pub use spring::{Spring, SpringConfig};
