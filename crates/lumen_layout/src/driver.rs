//! Transition driver
//!
//! Owns the presented tree. Each transaction hands the driver a freshly laid
//! out target tree; the driver matches it against what is currently on
//! screen and starts one motion per changed channel. Channels whose target
//! did not change keep their in-flight motion, changed ones retarget from
//! the value currently presented.
//!
//! Removed subtrees stay on screen as ghosts until their removal transition
//! completes. A ghost takes back the placeholder slot it left behind when
//! there is one, otherwise it is appended to its former parent.

use crate::diff::{match_trees, NodePath, TreeMatch};
use crate::node::{channel, Channels, ViewNode};
use crate::transition::{Phase, TransitionContext};
use lumen_animation::{AnimationScheduler, AnimationSpec, Motion, MotionId};
use lumen_core::Size;
use rustc_hash::FxHashMap;

/// Default frame interval, 60 frames per second
pub const DEFAULT_FRAME_INTERVAL_MS: f32 = 1000.0 / 60.0;

/// Shortest frame step the driver will take
pub const MIN_FRAME_INTERVAL_MS: f32 = 1.0;
/// Default tick budget before a running motion is snapped
pub const DEFAULT_MAX_TICKS: u32 = 600;

/// Frame pacing for [`frames`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriverConfig {
    pub viewport: Size,
    pub frame_interval_ms: f32,
    pub max_ticks: Option<u32>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(390.0, 844.0),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            max_ticks: Some(DEFAULT_MAX_TICKS),
        }
    }
}

type Track = [Option<MotionId>; channel::COUNT];

const NO_TRACK: Track = [None; channel::COUNT];

fn track_is_idle(track: &Track) -> bool {
    track.iter().all(Option::is_none)
}

/// A removed subtree still animating out
#[derive(Debug)]
struct Ghost {
    node: ViewNode,
    /// Former parent, as a path into the current target
    parent: NodePath,
    /// Placeholder index to occupy, if the parent kept one
    slot: Option<usize>,
    track: Track,
}

/// One presented frame
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Milliseconds since the transaction began
    pub time_ms: f32,
    pub tree: ViewNode,
}

pub struct TransitionDriver {
    viewport: Size,
    scheduler: AnimationScheduler,
    target: ViewNode,
    tracks: FxHashMap<NodePath, Track>,
    ghosts: Vec<Ghost>,
}

impl TransitionDriver {
    /// Start presenting `initial`, which must already be laid out
    pub fn new(viewport: Size, initial: ViewNode) -> Self {
        Self {
            viewport,
            scheduler: AnimationScheduler::new(),
            target: initial,
            tracks: FxHashMap::default(),
            ghosts: Vec::new(),
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: Option<u32>) -> Self {
        self.scheduler.set_max_ticks(max_ticks);
        self
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Tree the driver is heading for
    pub fn target(&self) -> &ViewNode {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_animations()
    }

    /// Shortest time until a running timed motion completes
    pub fn next_deadline_ms(&self) -> Option<f32> {
        self.scheduler.next_deadline_ms()
    }

    pub fn ghost_count(&self) -> usize {
        self.ghosts.len()
    }

    pub fn motion_count(&self) -> usize {
        self.scheduler.motion_count()
    }

    /// Motions force-snapped by the tick safeguard
    pub fn snapped_count(&self) -> u64 {
        self.scheduler.snapped_count()
    }

    /// Target tree with every in-flight channel value applied, ghosts excluded
    fn presented_base(&self) -> ViewNode {
        let mut tree = self.target.clone();
        for (path, track) in &self.tracks {
            if let Some(node) = tree.at_mut(path) {
                self.apply_track(node, track);
            }
        }
        tree
    }

    fn apply_track(&self, node: &mut ViewNode, track: &Track) {
        let mut channels = node.channels();
        for (c, id) in track.iter().enumerate() {
            if let Some(value) = id.and_then(|id| self.scheduler.value(id)) {
                channels[c] = value;
            }
        }
        node.set_channels(&channels);
    }

    /// The tree as it should be drawn right now
    pub fn presented(&self) -> ViewNode {
        let mut tree = self.presented_base();
        for ghost in &self.ghosts {
            let mut node = ghost.node.clone();
            self.apply_track(&mut node, &ghost.track);
            let Some(parent) = tree.at_mut(&ghost.parent) else {
                continue;
            };
            match ghost.slot {
                Some(i) if parent.children.get(i).is_some_and(ViewNode::is_empty) => {
                    parent.children[i] = node;
                }
                _ => parent.children.push(node),
            }
        }
        tree
    }

    /// Begin a transaction towards `new`, which must already be laid out.
    ///
    /// Without a spec every changed channel jumps to its new value and
    /// removed nodes disappear at once.
    pub fn begin(&mut self, new: ViewNode, spec: Option<&AnimationSpec>) -> TreeMatch {
        let current = self.presented_base();
        let matched = match_trees(&current, &new);

        let mut old_tracks = std::mem::take(&mut self.tracks);
        let mut tracks: FxHashMap<NodePath, Track> = FxHashMap::default();

        for pair in &matched.pairs {
            let (Some(from), Some(to)) = (current.at(&pair.old), new.at(&pair.new)) else {
                continue;
            };
            let previous = old_tracks.remove(&pair.old).unwrap_or(NO_TRACK);
            let track = self.retarget(previous, &from.channels(), &to.channels(), spec);
            if !track_is_idle(&track) {
                tracks.insert(pair.new.clone(), track);
            }
        }

        if let Some(spec) = spec {
            for path in &matched.insertions {
                let Some(node) = new.at(path) else {
                    continue;
                };
                let transition = node.transition.clone().unwrap_or_default();
                if transition.is_identity(Phase::Insertion) {
                    continue;
                }
                let cx = TransitionContext {
                    frame: node.frame,
                    viewport: self.viewport,
                };
                let active = transition.active(node.clone(), Phase::Insertion, &cx);
                let track = self.retarget(NO_TRACK, &active.channels(), &node.channels(), Some(spec));
                if !track_is_idle(&track) {
                    tracks.insert(path.clone(), track);
                }
            }
        }

        // Ghosts from earlier transactions follow their parent or go
        let previous_ghosts = std::mem::take(&mut self.ghosts);
        for mut ghost in previous_ghosts {
            match matched.pair_for_old(&ghost.parent) {
                Some(pair) => {
                    ghost.parent = pair.new.clone();
                    self.ghosts.push(ghost);
                }
                None => self.drop_track(&ghost.track),
            }
        }

        for path in &matched.removals {
            let previous = old_tracks.remove(path).unwrap_or(NO_TRACK);
            let ghost = spec.and_then(|spec| self.removal_ghost(&current, path, &matched, &new, previous, spec));
            match ghost {
                Some(ghost) => self.ghosts.push(ghost),
                None => self.drop_track(&previous),
            }
        }

        // Whatever is left belonged to nodes that no longer exist
        for track in old_tracks.values() {
            self.drop_track(track);
        }

        tracing::debug!(
            animated = spec.is_some(),
            pairs = matched.pairs.len(),
            moves = matched.moves().count(),
            insertions = matched.insertions.len(),
            removals = matched.removals.len(),
            motions = self.scheduler.motion_count(),
            "transition started"
        );

        self.target = new;
        self.tracks = tracks;
        matched
    }

    fn removal_ghost(
        &mut self,
        current: &ViewNode,
        path: &NodePath,
        matched: &TreeMatch,
        new: &ViewNode,
        previous: Track,
        spec: &AnimationSpec,
    ) -> Option<Ghost> {
        let presented = current.at(path)?;
        let laid_out = self.target.at(path)?;
        let transition = laid_out.transition.clone().unwrap_or_default();
        if transition.is_identity(Phase::Removal) {
            return None;
        }

        let parent = matched.pair_for_old(&path.parent()?)?.new.clone();
        let slot = path
            .index()
            .filter(|&i| new.at(&parent).and_then(|p| p.children.get(i)).is_some_and(ViewNode::is_empty));

        let cx = TransitionContext {
            frame: laid_out.frame,
            viewport: self.viewport,
        };
        let active = transition.active(laid_out.clone(), Phase::Removal, &cx);
        let track = self.retarget(previous, &presented.channels(), &active.channels(), Some(spec));
        if track_is_idle(&track) {
            return None;
        }

        tracing::trace!(path = %path, parent = %parent, ?slot, "node leaving");
        Some(Ghost {
            node: presented.clone(),
            parent,
            slot,
            track,
        })
    }

    /// Carry a node's motions over to new targets
    fn retarget(
        &mut self,
        previous: Track,
        from: &Channels,
        to: &Channels,
        spec: Option<&AnimationSpec>,
    ) -> Track {
        let mut track = NO_TRACK;
        for c in 0..channel::COUNT {
            let target = to[c];
            track[c] = match (previous[c], spec) {
                (Some(id), _) if self.scheduler.get(id).is_some_and(|m| m.target() == target) => {
                    Some(id)
                }
                (Some(id), Some(spec)) => match self.scheduler.get_mut(id) {
                    Some(motion) => {
                        motion.retarget(target, spec);
                        Some(id)
                    }
                    None => self.start(from[c], target, spec),
                },
                (Some(id), None) => {
                    self.scheduler.remove(id);
                    None
                }
                (None, Some(spec)) => self.start(from[c], target, spec),
                (None, None) => None,
            };
        }
        track
    }

    fn start(&mut self, from: f32, to: f32, spec: &AnimationSpec) -> Option<MotionId> {
        if from == to {
            return None;
        }
        let motion = Motion::new(from, to, spec);
        if motion.is_finished() {
            return None;
        }
        Some(self.scheduler.add(motion))
    }

    fn drop_track(&mut self, track: &Track) {
        for id in track.iter().flatten() {
            self.scheduler.remove(*id);
        }
    }

    /// Advance every motion by `dt_ms` and retire finished ones
    pub fn tick(&mut self, dt_ms: f32) {
        self.scheduler.tick(dt_ms);

        let scheduler = &mut self.scheduler;
        let mut retire = |track: &mut Track| {
            for slot in track.iter_mut() {
                if let Some(id) = *slot {
                    if scheduler.get(id).map_or(true, Motion::is_finished) {
                        scheduler.remove(id);
                        *slot = None;
                    }
                }
            }
            !track_is_idle(track)
        };

        self.tracks.retain(|_, track| retire(track));
        let before = self.ghosts.len();
        self.ghosts.retain_mut(|ghost| retire(&mut ghost.track));
        if self.ghosts.len() < before {
            tracing::trace!(removed = before - self.ghosts.len(), "ghosts dropped");
        }
    }
}

/// Lazy, time-indexed frames of one transaction
pub struct FrameSequence {
    driver: TransitionDriver,
    interval_ms: f32,
    time_ms: f32,
    started: bool,
}

impl FrameSequence {
    pub fn driver(&self) -> &TransitionDriver {
        &self.driver
    }
}

impl Iterator for FrameSequence {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if !self.started {
            self.started = true;
            return Some(Frame {
                time_ms: 0.0,
                tree: self.driver.presented(),
            });
        }
        if !self.driver.is_animating() {
            return None;
        }

        // Never step past a timed motion's end so it gets its own frame
        let dt = match self.driver.next_deadline_ms() {
            Some(deadline) => self.interval_ms.min(deadline),
            None => self.interval_ms,
        };
        self.driver.tick(dt);
        self.time_ms += dt;
        Some(Frame {
            time_ms: self.time_ms,
            tree: self.driver.presented(),
        })
    }
}

/// Frames animating from `old` to `new`, both already laid out.
///
/// The first frame is at t=0. Timed specs end with a frame at exactly the
/// duration, equal to `new`; springs run until every channel settles; no
/// spec yields the single frame `new`.
pub fn frames(
    old: ViewNode,
    new: ViewNode,
    spec: Option<&AnimationSpec>,
    config: &DriverConfig,
) -> FrameSequence {
    let mut driver = TransitionDriver::new(config.viewport, old).with_max_ticks(config.max_ticks);
    driver.begin(new, spec);
    FrameSequence {
        driver,
        interval_ms: config.frame_interval_ms.max(MIN_FRAME_INTERVAL_MS),
        time_ms: 0.0,
        started: false,
    }
}
