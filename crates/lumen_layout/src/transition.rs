//! Insertion and removal transitions
//!
//! A transition describes the *active* state of a node while it enters or
//! leaves the tree. The node as built is always the identity state:
//! insertions animate from active to identity, removals from identity to
//! active. `Combined(a, b)` applies `a` and then `b`.

use crate::modifier::{InteractionState, ModifierChain};
use crate::node::ViewNode;
use lumen_core::{Rect, Size};

/// Screen edge for move transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Leading,
    Trailing,
    Top,
    Bottom,
}

/// Which side of a transition is being resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Insertion,
    Removal,
}

/// Geometry a transition may depend on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionContext {
    /// Laid-out frame of the transitioning node
    pub frame: Rect,
    pub viewport: Size,
}

/// How a node enters and leaves the tree
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionSpec {
    /// Appear and disappear without animation
    Identity,
    /// Fade
    Opacity,
    /// Grow from / shrink to the given scale
    Scale(f32),
    /// Slide fully past the given viewport edge
    Move(Edge),
    /// Translate by a fixed amount
    Offset { x: f32, y: f32 },
    /// Spin by `degrees` while travelling in from / out to the bottom-right
    /// corner, one viewport away
    Rotating { degrees: f32 },
    /// Arbitrary active-state modifiers
    Modifier { active: ModifierChain },
    Combined(Box<TransitionSpec>, Box<TransitionSpec>),
    Asymmetric {
        insertion: Box<TransitionSpec>,
        removal: Box<TransitionSpec>,
    },
}

impl TransitionSpec {
    /// Half-turn rotating transition
    pub fn rotating() -> Self {
        TransitionSpec::Rotating { degrees: 180.0 }
    }

    pub fn rotating_by(degrees: f32) -> Self {
        TransitionSpec::Rotating { degrees }
    }

    pub fn asymmetric(insertion: TransitionSpec, removal: TransitionSpec) -> Self {
        TransitionSpec::Asymmetric {
            insertion: Box::new(insertion),
            removal: Box::new(removal),
        }
    }

    /// Rotate on screen, slide off through the leading edge
    pub fn rotate_on() -> Self {
        Self::asymmetric(Self::rotating(), TransitionSpec::Move(Edge::Leading))
    }

    pub fn modifier(active: impl Into<ModifierChain>) -> Self {
        TransitionSpec::Modifier {
            active: active.into(),
        }
    }

    /// Apply `self`, then `other`
    pub fn combined(self, other: TransitionSpec) -> Self {
        TransitionSpec::Combined(Box::new(self), Box::new(other))
    }

    /// Whether the transition changes nothing for this phase
    pub fn is_identity(&self, phase: Phase) -> bool {
        match self {
            TransitionSpec::Identity => true,
            TransitionSpec::Modifier { active } => active.is_empty(),
            TransitionSpec::Combined(a, b) => a.is_identity(phase) && b.is_identity(phase),
            TransitionSpec::Asymmetric { insertion, removal } => match phase {
                Phase::Insertion => insertion.is_identity(phase),
                Phase::Removal => removal.is_identity(phase),
            },
            _ => false,
        }
    }

    /// The node in this transition's active state for `phase`
    pub fn active(&self, node: ViewNode, phase: Phase, cx: &TransitionContext) -> ViewNode {
        let mut node = node;
        match self {
            TransitionSpec::Identity => {}
            TransitionSpec::Opacity => node.style.opacity = 0.0,
            TransitionSpec::Scale(s) => node.style.scale *= s,
            TransitionSpec::Move(edge) => {
                let (dx, dy) = match edge {
                    Edge::Leading => (-cx.frame.max_x(), 0.0),
                    Edge::Trailing => (cx.viewport.width - cx.frame.x(), 0.0),
                    Edge::Top => (0.0, -cx.frame.max_y()),
                    Edge::Bottom => (0.0, cx.viewport.height - cx.frame.y()),
                };
                node.style.offset.x += dx;
                node.style.offset.y += dy;
            }
            TransitionSpec::Offset { x, y } => {
                node.style.offset.x += x;
                node.style.offset.y += y;
            }
            TransitionSpec::Rotating { degrees } => {
                node.style.rotation += degrees;
                if *degrees != 0.0 {
                    node.style.offset.x += cx.viewport.width;
                    node.style.offset.y += cx.viewport.height;
                }
            }
            TransitionSpec::Modifier { active } => {
                node = active.apply(node, InteractionState::RELEASED);
            }
            TransitionSpec::Combined(a, b) => {
                node = b.active(a.active(node, phase, cx), phase, cx);
            }
            TransitionSpec::Asymmetric { insertion, removal } => {
                node = match phase {
                    Phase::Insertion => insertion.active(node, phase, cx),
                    Phase::Removal => removal.active(node, phase, cx),
                };
            }
        }
        node
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        TransitionSpec::Opacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::Modifier;
    use crate::node::{NodeKind, ShapeKind};

    fn card() -> ViewNode {
        let mut node = ViewNode::new(NodeKind::Shape {
            shape: ShapeKind::RoundedRectangle,
        });
        node.frame = Rect::new(70.0, 200.0, 250.0, 350.0);
        node
    }

    fn cx() -> TransitionContext {
        TransitionContext {
            frame: card().frame,
            viewport: Size::new(390.0, 844.0),
        }
    }

    #[test]
    fn test_rotating_active_state() {
        let active = TransitionSpec::rotating().active(card(), Phase::Insertion, &cx());
        assert_eq!(active.style.rotation, 180.0);
        assert_eq!(active.style.offset.x, 390.0);
        assert_eq!(active.style.offset.y, 844.0);
    }

    #[test]
    fn test_zero_rotation_is_stationary() {
        let active = TransitionSpec::rotating_by(0.0).active(card(), Phase::Insertion, &cx());
        assert_eq!(active, card());
    }

    #[test]
    fn test_asymmetric_picks_phase() {
        let spec = TransitionSpec::rotate_on();
        let inserted = spec.active(card(), Phase::Insertion, &cx());
        assert_eq!(inserted.style.rotation, 180.0);

        let removed = spec.active(card(), Phase::Removal, &cx());
        assert_eq!(removed.style.rotation, 0.0);
        assert_eq!(removed.style.offset.x, -320.0);
        assert_eq!(removed.style.offset.y, 0.0);
        // Fully past the leading edge
        assert!(removed.frame.max_x() + removed.style.offset.x <= 0.0);
    }

    #[test]
    fn test_move_edges() {
        let c = cx();
        let off = |edge| TransitionSpec::Move(edge).active(card(), Phase::Removal, &c).style.offset;
        assert_eq!(off(Edge::Trailing).x, 320.0);
        assert_eq!(off(Edge::Top).y, -550.0);
        assert_eq!(off(Edge::Bottom).y, 644.0);
    }

    #[test]
    fn test_combined_applies_in_order() {
        let spec = TransitionSpec::Opacity.combined(TransitionSpec::modifier(Modifier::Opacity(0.5)));
        let active = spec.active(card(), Phase::Insertion, &cx());
        assert_eq!(active.style.opacity, 0.0);

        let spec = TransitionSpec::Scale(0.5).combined(TransitionSpec::Scale(0.5));
        assert_eq!(spec.active(card(), Phase::Removal, &cx()).style.scale, 0.25);
    }

    #[test]
    fn test_identity_detection() {
        assert!(TransitionSpec::Identity.is_identity(Phase::Insertion));
        let spec = TransitionSpec::asymmetric(TransitionSpec::Identity, TransitionSpec::Opacity);
        assert!(spec.is_identity(Phase::Insertion));
        assert!(!spec.is_identity(Phase::Removal));
    }
}
