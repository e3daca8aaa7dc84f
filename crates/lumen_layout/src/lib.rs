//! Lumen View Tree
//!
//! Declarative view nodes, the modifier pipeline, flexbox layout powered by
//! Taffy, and the driver that animates one laid-out tree into the next.

pub mod builder;
pub mod diff;
pub mod driver;
pub mod layout;
pub mod modifier;
pub mod node;
pub mod transition;

pub use diff::{match_trees, GeometryNamespace, MatchKind, NodePair, NodePath, TreeMatch};
pub use driver::{frames, DriverConfig, Frame, FrameSequence, TransitionDriver};
pub use layout::{layout, LayoutError};
pub use modifier::{ButtonFormat, InteractionState, Modifier, ModifierChain, PressableStyle};
pub use node::{
    channel, Channels, EdgeInsets, Font, GeometryTag, Length, Namespace, NodeKind, NodeStyle,
    ShapeKind, StackAxis, ViewNode,
};
pub use transition::{Edge, Phase, TransitionContext, TransitionSpec};

/// Everything a `build` function usually needs
pub mod prelude {
    pub use crate::builder::*;
    pub use crate::modifier::{ButtonFormat, Modifier, ModifierChain, PressableStyle};
    pub use crate::node::{EdgeInsets, Font, Length, Namespace, ViewNode};
    pub use crate::transition::{Edge, TransitionSpec};
    pub use lumen_core::{Color, Shadow};
}
