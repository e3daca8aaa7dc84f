//! State store
//!
//! Views own typed [`StateCell`]s. Reads made while building a view are
//! recorded through an explicit [`BuildCx`], so a write only marks an owner
//! dirty when the owner's previous build actually looked at that cell.
//!
//! Writes are grouped into batches. A batch is the unit of rebuild: however
//! many cells it touches, its [`Commit`] lists each dirty owner once.
//!
//! The store holds `Box<dyn Any>` values and is therefore `!Send`; all
//! mutation stays on the thread that created it.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::any::Any;
use std::marker::PhantomData;

new_key_type! {
    /// Untyped identifier of a state cell
    pub struct CellId;
    /// Identifier of the view that owns a set of cells
    pub struct OwnerId;
}

/// Monotonic identifier of a committed batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(pub u64);

/// Typed handle to a value in a [`StateStore`]
pub struct StateCell<T> {
    id: CellId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateCell<T> {
    pub fn id(&self) -> CellId {
        self.id
    }
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateCell<T> {}

impl<T> std::fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StateCell").field(&self.id).finish()
    }
}

impl<T> PartialEq for StateCell<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for StateCell<T> {}

struct CellSlot {
    name: String,
    owner: OwnerId,
    value: Box<dyn Any>,
}

#[derive(Default)]
struct OwnerSlot {
    name: String,
    /// Cells read by the last build; `None` until the owner has been built once
    dependencies: Option<FxHashSet<CellId>>,
}

/// Result of applying one batch of writes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Commit {
    pub transaction: TransactionId,
    /// Cells written, in call order (a cell written twice appears twice)
    pub mutated: SmallVec<[CellId; 4]>,
    /// Owners whose last build read a mutated cell, each listed once
    pub dirty_owners: SmallVec<[OwnerId; 2]>,
}

impl Commit {
    /// Whether this batch needs a rebuild of at least one owner
    pub fn needs_rebuild(&self) -> bool {
        !self.dirty_owners.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.mutated.is_empty()
    }
}

/// Owner of every state cell in an application
pub struct StateStore {
    cells: SlotMap<CellId, CellSlot>,
    owners: SlotMap<OwnerId, OwnerSlot>,
    next_transaction: u64,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            cells: SlotMap::with_key(),
            owners: SlotMap::with_key(),
            next_transaction: 0,
        }
    }

    /// Register a view that will own cells
    pub fn create_owner(&mut self, name: impl Into<String>) -> OwnerId {
        self.owners.insert(OwnerSlot {
            name: name.into(),
            dependencies: None,
        })
    }

    /// Declare a new cell owned by `owner`
    pub fn create_cell<T: 'static>(
        &mut self,
        owner: OwnerId,
        name: impl Into<String>,
        initial: T,
    ) -> StateCell<T> {
        let id = self.cells.insert(CellSlot {
            name: name.into(),
            owner,
            value: Box::new(initial),
        });
        StateCell {
            id,
            _marker: PhantomData,
        }
    }

    /// Borrow the current value of a cell
    pub fn get<T: 'static>(&self, cell: StateCell<T>) -> Option<&T> {
        self.cells.get(cell.id)?.value.downcast_ref::<T>()
    }

    /// Read a copy of the current value.
    ///
    /// A handle from another store reads as `T::default()`.
    pub fn read<T: Clone + Default + 'static>(&self, cell: StateCell<T>) -> T {
        match self.get(cell) {
            Some(value) => value.clone(),
            None => {
                tracing::warn!(cell = ?cell.id, "read of unknown state cell");
                T::default()
            }
        }
    }

    /// Debug name of a cell
    pub fn cell_name(&self, id: CellId) -> Option<&str> {
        self.cells.get(id).map(|slot| slot.name.as_str())
    }

    /// Owner of a cell
    pub fn cell_owner(&self, id: CellId) -> Option<OwnerId> {
        self.cells.get(id).map(|slot| slot.owner)
    }

    pub fn owner_name(&self, id: OwnerId) -> Option<&str> {
        self.owners.get(id).map(|slot| slot.name.as_str())
    }

    /// Cells read by the owner's most recent build
    pub fn dependencies(&self, owner: OwnerId) -> Option<&FxHashSet<CellId>> {
        self.owners.get(owner)?.dependencies.as_ref()
    }

    /// Write a single cell outside of any batch.
    ///
    /// This is an implicit one-write batch.
    pub fn write<T: 'static>(&mut self, cell: StateCell<T>, value: T) -> Commit {
        self.batch(|tx| tx.write(cell, value))
    }

    /// Apply a group of writes as one transaction
    pub fn batch<F>(&mut self, f: F) -> Commit
    where
        F: FnOnce(&mut Batch<'_>),
    {
        let mut batch = Batch {
            store: self,
            mutated: SmallVec::new(),
        };
        f(&mut batch);
        let mutated = batch.mutated;
        self.commit(mutated)
    }

    /// Replace the recorded dependencies of every owner touched by a build
    pub fn record_reads(&mut self, reads: FxHashMap<OwnerId, FxHashSet<CellId>>) {
        for (owner, cells) in reads {
            if let Some(slot) = self.owners.get_mut(owner) {
                slot.dependencies = Some(cells);
            }
        }
    }

    /// Mark an owner as built even if it read nothing
    pub fn mark_built(&mut self, owner: OwnerId) {
        if let Some(slot) = self.owners.get_mut(owner) {
            slot.dependencies.get_or_insert_with(FxHashSet::default);
        }
    }

    fn set_raw<T: 'static>(&mut self, cell: StateCell<T>, value: T) -> bool {
        let Some(slot) = self.cells.get_mut(cell.id) else {
            tracing::warn!(cell = ?cell.id, "write to unknown state cell");
            return false;
        };
        if !slot.value.is::<T>() {
            tracing::warn!(cell = %slot.name, "write with mismatched type ignored");
            return false;
        }
        tracing::trace!(cell = %slot.name, "state write");
        slot.value = Box::new(value);
        true
    }

    fn commit(&mut self, mutated: SmallVec<[CellId; 4]>) -> Commit {
        self.next_transaction += 1;
        let transaction = TransactionId(self.next_transaction);

        let mut dirty_owners: SmallVec<[OwnerId; 2]> = SmallVec::new();
        for id in &mutated {
            let Some(owner) = self.cell_owner(*id) else {
                continue;
            };
            if dirty_owners.contains(&owner) {
                continue;
            }
            let observed = match self.owners.get(owner).map(|o| o.dependencies.as_ref()) {
                Some(Some(deps)) => deps.contains(id),
                // Never built: the first build is still pending
                Some(None) => true,
                None => false,
            };
            if observed {
                dirty_owners.push(owner);
            }
        }

        tracing::debug!(
            transaction = transaction.0,
            writes = mutated.len(),
            dirty = dirty_owners.len(),
            "commit"
        );

        Commit {
            transaction,
            mutated,
            dirty_owners,
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for writing cells inside [`StateStore::batch`]
pub struct Batch<'a> {
    store: &'a mut StateStore,
    mutated: SmallVec<[CellId; 4]>,
}

impl Batch<'_> {
    /// Read a cell, seeing writes made earlier in this batch
    pub fn read<T: Clone + Default + 'static>(&self, cell: StateCell<T>) -> T {
        self.store.read(cell)
    }

    pub fn write<T: 'static>(&mut self, cell: StateCell<T>, value: T) {
        if self.store.set_raw(cell, value) {
            self.mutated.push(cell.id);
        }
    }

    /// Read-modify-write a cell.
    ///
    /// Unlike [`Batch::read`], which falls back to `T::default()`, a handle
    /// that does not resolve in this store (another store's cell, or a
    /// different value type) is skipped: `f` is not called and nothing is
    /// recorded, so no default is ever written back.
    pub fn update<T, F>(&mut self, cell: StateCell<T>, f: F)
    where
        T: Clone + 'static,
        F: FnOnce(&mut T),
    {
        let Some(mut value) = self.store.get(cell).cloned() else {
            tracing::warn!(cell = ?cell.id, "update of unknown state cell skipped");
            return;
        };
        f(&mut value);
        self.write(cell, value);
    }

    /// Number of writes recorded so far
    pub fn len(&self) -> usize {
        self.mutated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutated.is_empty()
    }
}

/// Build context handed to views.
///
/// Records which cells each owner reads so the store can decide who needs a
/// rebuild later. Owners nest: [`BuildCx::scope`] attributes reads to a child
/// view for the duration of a closure.
pub struct BuildCx<'a> {
    store: &'a StateStore,
    owners: Vec<OwnerId>,
    reads: FxHashMap<OwnerId, FxHashSet<CellId>>,
}

impl<'a> BuildCx<'a> {
    pub fn new(store: &'a StateStore, owner: OwnerId) -> Self {
        let mut reads = FxHashMap::default();
        reads.insert(owner, FxHashSet::default());
        Self {
            store,
            owners: vec![owner],
            reads,
        }
    }

    /// The owner whose build is currently running
    pub fn owner(&self) -> Option<OwnerId> {
        self.owners.last().copied()
    }

    /// Read a cell and record the dependency
    pub fn read<T: Clone + Default + 'static>(&mut self, cell: StateCell<T>) -> T {
        if let Some(owner) = self.owner() {
            self.reads.entry(owner).or_default().insert(cell.id);
        }
        self.store.read(cell)
    }

    /// Build a child view, attributing its reads to `owner`
    pub fn scope<R>(&mut self, owner: OwnerId, f: impl FnOnce(&mut Self) -> R) -> R {
        self.owners.push(owner);
        self.reads.entry(owner).or_default();
        let result = f(self);
        self.owners.pop();
        result
    }

    /// Finish the build and hand back the recorded reads
    pub fn into_reads(self) -> FxHashMap<OwnerId, FxHashSet<CellId>> {
        self.reads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built_store() -> (StateStore, OwnerId, StateCell<i32>, StateCell<bool>) {
        let mut store = StateStore::new();
        let owner = store.create_owner("counter");
        let count = store.create_cell(owner, "count", 0i32);
        let flag = store.create_cell(owner, "flag", false);

        let mut cx = BuildCx::new(&store, owner);
        let _ = cx.read(count);
        let reads = cx.into_reads();
        store.record_reads(reads);

        (store, owner, count, flag)
    }

    #[test]
    fn test_read_write() {
        let (mut store, _, count, _) = built_store();
        assert_eq!(store.read(count), 0);
        store.write(count, 5);
        assert_eq!(store.read(count), 5);
        assert_eq!(store.get(count), Some(&5));
    }

    #[test]
    fn test_update_skips_foreign_handle() {
        let mut other = StateStore::new();
        let other_owner = other.create_owner("other");
        let foreign = other.create_cell(other_owner, "count", 41u32);

        // Same slot key, different value type
        let mut store = StateStore::new();
        let owner = store.create_owner("view");
        let title = store.create_cell(owner, "title", String::from("hello"));
        assert_eq!(foreign.id(), title.id());

        let mut called = false;
        let commit = store.batch(|tx| {
            tx.update(foreign, |n| {
                called = true;
                *n += 1;
            });
            tx.write(foreign, 7);
        });
        assert!(!called);
        assert!(commit.mutated.is_empty());
        assert_eq!(store.read(title), "hello");
        assert_eq!(store.read(foreign), 0);
    }

    #[test]
    fn test_write_is_implicit_batch() {
        let (mut store, owner, count, _) = built_store();
        let commit = store.write(count, 1);
        assert_eq!(commit.mutated.len(), 1);
        assert_eq!(commit.dirty_owners.as_slice(), &[owner]);
        assert!(commit.needs_rebuild());
    }

    #[test]
    fn test_unread_cell_does_not_dirty_owner() {
        let (mut store, _, _, flag) = built_store();
        let commit = store.write(flag, true);
        assert!(!commit.needs_rebuild());
        assert!(store.read(flag));
    }

    #[test]
    fn test_batch_dirties_owner_once() {
        let (mut store, owner, count, flag) = built_store();
        let commit = store.batch(|tx| {
            tx.write(count, 1);
            tx.write(flag, true);
            tx.write(count, 2);
        });
        assert_eq!(commit.mutated.len(), 3);
        assert_eq!(commit.dirty_owners.as_slice(), &[owner]);
        assert_eq!(store.read(count), 2);
    }

    #[test]
    fn test_batch_applies_in_call_order() {
        let (mut store, _, count, _) = built_store();
        store.batch(|tx| {
            tx.write(count, 10);
            assert_eq!(tx.read(count), 10);
            tx.update(count, |v| *v *= 3);
        });
        assert_eq!(store.read(count), 30);
    }

    #[test]
    fn test_transaction_ids_increase() {
        let (mut store, _, count, _) = built_store();
        let a = store.write(count, 1);
        let b = store.write(count, 2);
        assert!(b.transaction > a.transaction);
    }

    #[test]
    fn test_unbuilt_owner_is_dirty() {
        let mut store = StateStore::new();
        let owner = store.create_owner("fresh");
        let cell = store.create_cell(owner, "value", 0u8);
        let commit = store.write(cell, 1);
        assert_eq!(commit.dirty_owners.as_slice(), &[owner]);
    }

    #[test]
    fn test_scoped_reads_attribute_to_child() {
        let mut store = StateStore::new();
        let parent = store.create_owner("parent");
        let child = store.create_owner("child");
        let a = store.create_cell(parent, "a", 0u32);
        let b = store.create_cell(child, "b", 0u32);

        let mut cx = BuildCx::new(&store, parent);
        cx.read(a);
        cx.scope(child, |cx| {
            cx.read(b);
        });
        let reads = cx.into_reads();
        store.record_reads(reads);

        assert!(store.dependencies(parent).is_some_and(|d| d.contains(&a.id())));
        assert!(store.dependencies(child).is_some_and(|d| d.contains(&b.id())));
        assert!(!store.dependencies(parent).is_some_and(|d| d.contains(&b.id())));

        let commit = store.write(b, 3);
        assert_eq!(commit.dirty_owners.as_slice(), &[child]);
    }

    #[test]
    fn test_names() {
        let (store, owner, count, _) = built_store();
        assert_eq!(store.cell_name(count.id()), Some("count"));
        assert_eq!(store.owner_name(owner), Some("counter"));
        assert_eq!(store.cell_owner(count.id()), Some(owner));
    }
}
