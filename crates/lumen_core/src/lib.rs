//! Lumen Core Runtime
//!
//! Foundational primitives for the Lumen declarative UI core:
//!
//! - **State cells**: owned, typed values whose writes mark their owner dirty
//! - **Batched transactions**: one rebuild per batch, however many writes
//! - **State machines**: press interaction states for pressable views
//! - **Geometry**: points, rects, colors shared by layout and animation
//!
//! # Example
//!
//! ```rust
//! use lumen_core::reactive::{BuildCx, StateStore};
//!
//! let mut store = StateStore::new();
//! let owner = store.create_owner("toggle");
//! let shown = store.create_cell(owner, "shown", false);
//!
//! let mut cx = BuildCx::new(&store, owner);
//! let _ = cx.read(shown);
//! let reads = cx.into_reads();
//! store.record_reads(reads);
//!
//! let commit = store.write(shown, true);
//! assert!(commit.needs_rebuild());
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;
pub mod reactive;

pub use events::{InputEvent, InputKind};
pub use fsm::{StateId, StateMachine, Transition};
pub use geometry::{Color, Point, Rect, Shadow, Size};
pub use reactive::{
    Batch, BuildCx, CellId, Commit, OwnerId, StateCell, StateStore, TransactionId,
};
