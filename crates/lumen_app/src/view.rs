//! Views and their event context

use lumen_animation::AnimationSpec;
use lumen_core::fsm::{self, StateMachine};
use lumen_core::{Batch, BuildCx, CellId, Commit, InputEvent, InputKind, StateCell, StateStore};
use lumen_layout::ViewNode;
use rustc_hash::FxHashMap;

/// A declarative view.
///
/// `build` must be a pure function of the cells it reads through `cx`: the
/// runtime calls it again only when one of those cells is written.
pub trait View {
    fn build(&self, cx: &mut BuildCx<'_>) -> ViewNode;

    /// React to an input event addressed to a named node
    fn handle(&self, _event: &InputEvent, _cx: &mut EventCx<'_>) {}
}

/// A committed batch of writes and the animation it asked for
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub commit: Commit,
    pub animation: Option<AnimationSpec>,
}

/// Write access handed to [`View::handle`].
///
/// Every write or batch becomes its own transaction; the runtime applies
/// them in order once the handler returns.
pub struct EventCx<'a> {
    store: &'a mut StateStore,
    presses: &'a mut FxHashMap<CellId, StateMachine>,
    transactions: Vec<Transaction>,
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(
        store: &'a mut StateStore,
        presses: &'a mut FxHashMap<CellId, StateMachine>,
    ) -> Self {
        Self {
            store,
            presses,
            transactions: Vec::new(),
        }
    }

    pub fn read<T: Clone + Default + 'static>(&self, cell: StateCell<T>) -> T {
        self.store.read(cell)
    }

    /// Write one cell without animation
    pub fn write<T: 'static>(&mut self, cell: StateCell<T>, value: T) {
        let commit = self.store.write(cell, value);
        self.transactions.push(Transaction {
            commit,
            animation: None,
        });
    }

    /// Apply a batch, optionally animated
    pub fn transaction(&mut self, animation: Option<AnimationSpec>, f: impl FnOnce(&mut Batch<'_>)) {
        let commit = self.store.batch(f);
        self.transactions.push(Transaction { commit, animation });
    }

    /// Apply a batch whose visual changes animate along `spec`
    pub fn with_animation(&mut self, spec: AnimationSpec, f: impl FnOnce(&mut Batch<'_>)) {
        self.transaction(Some(spec), f);
    }

    /// Feed a press signal to the press machine behind `cell`.
    ///
    /// The cell is written only when the pressed state actually changes.
    /// Returns whether the pressable is now pressed.
    pub fn route_press(&mut self, cell: StateCell<bool>, kind: InputKind) -> bool {
        let machine = self.presses.entry(cell.id()).or_insert_with(fsm::press::machine);
        let was_pressed = machine.is_in(fsm::press::PRESSED);
        let pressed = fsm::apply_press(machine, kind);
        if pressed != was_pressed {
            self.write(cell, pressed);
        }
        pressed
    }

    pub(crate) fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_press_writes_on_change_only() {
        let mut store = StateStore::new();
        let owner = store.create_owner("button");
        let pressed = store.create_cell(owner, "pressed", false);
        let mut presses = FxHashMap::default();

        let mut cx = EventCx::new(&mut store, &mut presses);
        assert!(cx.route_press(pressed, InputKind::PressDown));
        assert!(cx.route_press(pressed, InputKind::PressDown));
        assert!(!cx.route_press(pressed, InputKind::PressUp));
        assert!(!cx.route_press(pressed, InputKind::PressCancel));

        let transactions = cx.into_transactions();
        assert_eq!(transactions.len(), 2);
        assert!(transactions.iter().all(|t| t.animation.is_none()));
        assert!(!store.read(pressed));
    }

    #[test]
    fn test_batches_keep_call_order() {
        let mut store = StateStore::new();
        let owner = store.create_owner("view");
        let count = store.create_cell(owner, "count", 0u32);
        let mut presses = FxHashMap::default();

        let mut cx = EventCx::new(&mut store, &mut presses);
        cx.write(count, 1);
        cx.with_animation(AnimationSpec::spring(), |tx| tx.update(count, |c| *c += 1));
        assert_eq!(cx.read(count), 2);

        let transactions = cx.into_transactions();
        assert_eq!(transactions[0].animation, None);
        assert_eq!(transactions[1].animation, Some(AnimationSpec::spring()));
        assert!(transactions[0].commit.transaction < transactions[1].commit.transaction);
    }
}
