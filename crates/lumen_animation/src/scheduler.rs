//! Animation scheduler
//!
//! Owns every in-flight motion and advances them on each frame tick. The
//! scheduler never reads a clock; the host hands it elapsed milliseconds.

use crate::motion::Motion;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct MotionId;
}

struct ScheduledMotion {
    motion: Motion,
    ticks: u32,
}

/// The animation scheduler that ticks all active motions
pub struct AnimationScheduler {
    motions: SlotMap<MotionId, ScheduledMotion>,
    /// Ticks after which an unfinished motion is snapped to its target
    max_ticks: Option<u32>,
    snapped: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            motions: SlotMap::with_key(),
            max_ticks: None,
            snapped: 0,
        }
    }

    /// Snap motions that are still running after `max_ticks` ticks
    pub fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn set_max_ticks(&mut self, max_ticks: Option<u32>) {
        self.max_ticks = max_ticks;
    }

    pub fn add(&mut self, motion: Motion) -> MotionId {
        self.motions.insert(ScheduledMotion { motion, ticks: 0 })
    }

    pub fn get(&self, id: MotionId) -> Option<&Motion> {
        self.motions.get(id).map(|m| &m.motion)
    }

    /// Mutable access; resets the motion's tick budget since callers use
    /// this to retarget
    pub fn get_mut(&mut self, id: MotionId) -> Option<&mut Motion> {
        self.motions.get_mut(id).map(|m| {
            m.ticks = 0;
            &mut m.motion
        })
    }

    pub fn remove(&mut self, id: MotionId) -> Option<Motion> {
        self.motions.remove(id).map(|m| m.motion)
    }

    pub fn value(&self, id: MotionId) -> Option<f32> {
        self.get(id).map(Motion::value)
    }

    /// Advance every unfinished motion by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        for (id, scheduled) in self.motions.iter_mut() {
            if scheduled.motion.is_finished() {
                continue;
            }
            scheduled.motion.step(dt_ms);
            scheduled.ticks = scheduled.ticks.saturating_add(1);

            if let Some(max) = self.max_ticks {
                if scheduled.ticks >= max && !scheduled.motion.is_finished() {
                    tracing::warn!(
                        motion = ?id,
                        ticks = scheduled.ticks,
                        "motion did not settle, snapping to target"
                    );
                    scheduled.motion.snap();
                    self.snapped += 1;
                }
            }
        }
    }

    /// Check if any motions are still running
    pub fn has_active_animations(&self) -> bool {
        self.motions.values().any(|m| !m.motion.is_finished())
    }

    /// Shortest time until a running timed motion completes.
    ///
    /// Frame sequences clamp their step to this so the last frame of a
    /// timed animation lands exactly on its end.
    pub fn next_deadline_ms(&self) -> Option<f32> {
        self.motions
            .values()
            .filter(|m| !m.motion.is_finished())
            .filter_map(|m| m.motion.remaining_ms())
            .filter(|remaining| *remaining > 0.0)
            .reduce(f32::min)
    }

    /// Drop finished motions
    pub fn prune(&mut self) {
        self.motions.retain(|_, m| !m.motion.is_finished());
    }

    pub fn clear(&mut self) {
        self.motions.clear();
    }

    pub fn motion_count(&self) -> usize {
        self.motions.len()
    }

    /// Number of motions force-snapped by the tick safeguard
    pub fn snapped_count(&self) -> u64 {
        self.snapped
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::AnimationSpec;

    #[test]
    fn test_tick_advances_all() {
        let mut scheduler = AnimationScheduler::new();
        let a = scheduler.add(Motion::new(0.0, 10.0, &AnimationSpec::linear(100.0)));
        let b = scheduler.add(Motion::new(0.0, 1.0, &AnimationSpec::linear(200.0)));
        assert!(scheduler.has_active_animations());

        scheduler.tick(100.0);
        assert_eq!(scheduler.value(a), Some(10.0));
        assert!((scheduler.value(b).unwrap() - 0.5).abs() < 1e-5);

        scheduler.tick(100.0);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_next_deadline() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.add(Motion::new(0.0, 1.0, &AnimationSpec::linear(100.0)));
        scheduler.add(Motion::new(0.0, 1.0, &AnimationSpec::linear(40.0)));
        scheduler.add(Motion::new(0.0, 1.0, &AnimationSpec::spring()));
        assert_eq!(scheduler.next_deadline_ms(), Some(40.0));
        scheduler.tick(40.0);
        assert_eq!(scheduler.next_deadline_ms(), Some(60.0));
    }

    #[test]
    fn test_max_ticks_snaps_undamped_spring() {
        let mut scheduler = AnimationScheduler::new().with_max_ticks(30);
        let id = scheduler.add(Motion::new(
            0.0,
            1.0,
            &AnimationSpec::interpolating_spring(100.0, 0.0, 1.0),
        ));
        for _ in 0..29 {
            scheduler.tick(16.0);
        }
        assert!(scheduler.has_active_animations());
        scheduler.tick(16.0);
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.value(id), Some(1.0));
        assert_eq!(scheduler.snapped_count(), 1);
    }

    #[test]
    fn test_prune_keeps_running_motions() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.add(Motion::new(0.0, 1.0, &AnimationSpec::linear(10.0)));
        let keep = scheduler.add(Motion::new(0.0, 1.0, &AnimationSpec::linear(100.0)));
        scheduler.tick(10.0);
        scheduler.prune();
        assert_eq!(scheduler.motion_count(), 1);
        assert!(scheduler.get(keep).is_some());
    }
}
