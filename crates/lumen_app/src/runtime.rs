//! Host runtime
//!
//! Owns the state store, one root view, and the transition driver. The host
//! feeds it input events and frame timestamps; the runtime turns them into
//! transactions, rebuilds only when a cell the last build read was written,
//! and hands presented trees to a renderer.

use crate::clock::FrameClock;
use crate::config::LumenConfig;
use crate::error::Result;
use crate::renderer::Renderer;
use crate::view::{EventCx, Transaction, View};
use lumen_animation::AnimationSpec;
use lumen_core::fsm::StateMachine;
use lumen_core::{Batch, BuildCx, CellId, InputEvent, OwnerId, StateCell, StateStore};
use lumen_layout::{layout, Frame, TransitionDriver, TreeMatch, ViewNode};
use rustc_hash::FxHashMap;

/// Upper bound on frames stepped by [`Runtime::settle`] when the motion
/// safeguard is disabled
const SETTLE_FRAME_LIMIT: usize = 100_000;

pub struct Runtime {
    config: LumenConfig,
    store: StateStore,
    owner: OwnerId,
    view: Box<dyn View>,
    driver: TransitionDriver,
    clock: FrameClock,
    presses: FxHashMap<CellId, StateMachine>,
    time_ms: f64,
    rebuilds: u64,
    last_match: Option<TreeMatch>,
}

impl Runtime {
    /// Create the root view with `init`, which declares its cells under
    /// the given owner, and build it once
    pub fn new<V, F>(config: LumenConfig, name: &str, init: F) -> Result<Self>
    where
        V: View + 'static,
        F: FnOnce(&mut StateStore, OwnerId) -> V,
    {
        let mut store = StateStore::new();
        let owner = store.create_owner(name);
        let view = init(&mut store, owner);
        Self::with_view(config, store, owner, Box::new(view))
    }

    /// Run an already constructed view over `store`
    pub fn with_view(
        config: LumenConfig,
        mut store: StateStore,
        owner: OwnerId,
        view: Box<dyn View>,
    ) -> Result<Self> {
        config.validate()?;
        let viewport = config.viewport_size();
        let initial = build_tree(&mut store, owner, view.as_ref(), &config)?;
        let driver = TransitionDriver::new(viewport, initial).with_max_ticks(config.max_ticks());

        tracing::debug!(view = store.owner_name(owner).unwrap_or_default(), "runtime started");
        Ok(Self {
            config,
            store,
            owner,
            view,
            driver,
            clock: FrameClock::new(),
            presses: FxHashMap::default(),
            time_ms: 0.0,
            rebuilds: 1,
            last_match: None,
        })
    }

    pub fn config(&self) -> &LumenConfig {
        &self.config
    }

    pub fn view_name(&self) -> &str {
        self.store.owner_name(self.owner).unwrap_or_default()
    }

    /// Owner of the root view's cells
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn read<T: Clone + Default + 'static>(&self, cell: StateCell<T>) -> T {
        self.store.read(cell)
    }

    /// Write one cell outside any transaction; changes apply immediately
    pub fn write<T: 'static>(&mut self, cell: StateCell<T>, value: T) -> Result<()> {
        let commit = self.store.write(cell, value);
        self.apply(Transaction {
            commit,
            animation: None,
        })
    }

    /// Apply a batch of writes as one transaction
    pub fn transaction(
        &mut self,
        animation: Option<AnimationSpec>,
        f: impl FnOnce(&mut Batch<'_>),
    ) -> Result<()> {
        let commit = self.store.batch(f);
        self.apply(Transaction { commit, animation })
    }

    /// Apply a batch whose visual changes animate along `spec`
    pub fn with_animation(&mut self, spec: AnimationSpec, f: impl FnOnce(&mut Batch<'_>)) -> Result<()> {
        self.transaction(Some(spec), f)
    }

    /// Deliver an input event to the view.
    ///
    /// Returns `false` without touching state when no node carries the
    /// event's target name.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<bool> {
        if self.driver.target().find(&event.target).is_none() {
            tracing::debug!(node = %event.target, kind = ?event.kind, "event target not found");
            return Ok(false);
        }
        tracing::trace!(node = %event.target, kind = ?event.kind, "dispatch");

        let transactions = {
            let mut cx = EventCx::new(&mut self.store, &mut self.presses);
            self.view.handle(&event, &mut cx);
            cx.into_transactions()
        };
        for transaction in transactions {
            self.apply(transaction)?;
        }
        Ok(true)
    }

    fn apply(&mut self, transaction: Transaction) -> Result<()> {
        let Transaction { commit, animation } = transaction;
        if !commit.dirty_owners.contains(&self.owner) {
            tracing::trace!(
                transaction = commit.transaction.0,
                writes = commit.mutated.len(),
                "no rebuild needed"
            );
            return Ok(());
        }

        let tree = build_tree(&mut self.store, self.owner, self.view.as_ref(), &self.config)?;
        self.rebuilds += 1;
        tracing::debug!(
            view = self.view_name(),
            transaction = commit.transaction.0,
            animated = animation.is_some(),
            "rebuild"
        );
        self.last_match = Some(self.driver.begin(tree, animation.as_ref()));
        Ok(())
    }

    /// Advance animations to host timestamp `timestamp_ms`
    pub fn tick(&mut self, timestamp_ms: f64) -> Frame {
        let dt = self.clock.advance(timestamp_ms);
        self.advance(dt)
    }

    /// Advance animations by `dt_ms`
    pub fn advance(&mut self, dt_ms: f32) -> Frame {
        let dt_ms = dt_ms.max(0.0);
        self.driver.tick(dt_ms);
        self.time_ms += dt_ms as f64;
        tracing::trace!(dt_ms, time_ms = self.time_ms, "tick");
        self.frame()
    }

    /// Step frame by frame until every motion has finished, rendering each
    /// frame. Returns the number of frames stepped.
    pub fn settle(&mut self, renderer: &mut dyn Renderer) -> usize {
        let interval = self.config.animation.frame_interval_ms;
        let mut frames = 0;
        while self.driver.is_animating() {
            if frames >= SETTLE_FRAME_LIMIT {
                tracing::warn!(frames, "animations still running, giving up");
                break;
            }
            let dt = match self.driver.next_deadline_ms() {
                Some(deadline) => interval.min(deadline),
                None => interval,
            };
            let frame = self.advance(dt);
            renderer.render(&frame);
            frames += 1;
        }
        frames
    }

    /// Current presented frame
    pub fn frame(&self) -> Frame {
        Frame {
            time_ms: self.time_ms as f32,
            tree: self.driver.presented(),
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.render(&self.frame());
    }

    pub fn presented(&self) -> ViewNode {
        self.driver.presented()
    }

    /// Laid-out tree of the latest build
    pub fn target(&self) -> &ViewNode {
        self.driver.target()
    }

    pub fn is_animating(&self) -> bool {
        self.driver.is_animating()
    }

    /// Times the view has been built, the initial build included
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Match computed by the latest rebuild
    pub fn last_match(&self) -> Option<&TreeMatch> {
        self.last_match.as_ref()
    }

    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    pub fn snapped_count(&self) -> u64 {
        self.driver.snapped_count()
    }
}

fn build_tree(
    store: &mut StateStore,
    owner: OwnerId,
    view: &dyn View,
    config: &LumenConfig,
) -> Result<ViewNode> {
    let (mut tree, reads) = {
        let mut cx = BuildCx::new(store, owner);
        let tree = view.build(&mut cx);
        (tree, cx.into_reads())
    };
    store.record_reads(reads);
    store.mark_built(owner);
    layout(&mut tree, config.viewport_size())?;
    Ok(tree)
}
