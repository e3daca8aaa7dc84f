//! Lumen Application Runtime
//!
//! Hosts one root view: turns input events into transactions, rebuilds the
//! view when a cell it read was written, and presents animated frames to a
//! [`Renderer`].
//!
//! # Example
//!
//! ```rust
//! use lumen_app::prelude::*;
//!
//! let mut runtime = lessons::launch("matched_geometry", LumenConfig::default())?;
//! runtime.dispatch(InputEvent::tap("screen"))?;
//!
//! let mut frames = SnapshotRenderer::new();
//! runtime.settle(&mut frames);
//! assert_eq!(frames.last().map(|f| &f.tree), Some(runtime.target()));
//! # Ok::<(), lumen_app::LumenError>(())
//! ```

mod clock;
mod config;
mod error;
mod renderer;
mod runtime;
mod view;

pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_scenario;
pub mod lessons;

pub use clock::{FrameClock, MAX_FRAME_DELTA_MS};
pub use config::{AnimationConfig, ConfigError, LumenConfig, ViewportConfig, CONFIG_FILE};
pub use error::{LumenError, Result};
pub use renderer::{describe, Renderer, SnapshotRenderer, TextRenderer};
pub use runtime::Runtime;
pub use view::{EventCx, Transaction, View};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::LumenConfig;
    pub use crate::error::{LumenError, Result};
    pub use crate::lessons;
    pub use crate::renderer::{Renderer, SnapshotRenderer};
    pub use crate::runtime::Runtime;
    pub use crate::view::{EventCx, View};

    pub use lumen_animation::AnimationSpec;
    pub use lumen_core::{BuildCx, InputEvent, InputKind, OwnerId, StateCell, StateStore};
    pub use lumen_layout::prelude::*;
}
