//! Node constructors used by `build` functions

use crate::node::{Font, NodeKind, ShapeKind, StackAxis, ViewNode};

pub fn rect() -> ViewNode {
    ViewNode::new(NodeKind::Shape {
        shape: ShapeKind::Rectangle,
    })
}

/// Rounded rectangle with the given corner radius
pub fn rounded_rect(radius: f32) -> ViewNode {
    ViewNode::new(NodeKind::Shape {
        shape: ShapeKind::RoundedRectangle,
    })
    .corner_radius(radius)
}

pub fn circle() -> ViewNode {
    ViewNode::new(NodeKind::Shape {
        shape: ShapeKind::Circle,
    })
}

pub fn capsule() -> ViewNode {
    ViewNode::new(NodeKind::Shape {
        shape: ShapeKind::Capsule,
    })
}

/// Body-font text
pub fn text(content: impl Into<String>) -> ViewNode {
    ViewNode::new(NodeKind::Text {
        content: content.into(),
        font: Font::Body,
    })
}

pub fn stack(axis: StackAxis, children: impl IntoIterator<Item = ViewNode>) -> ViewNode {
    ViewNode::new(NodeKind::Stack { axis }).children(children)
}

/// Children left to right
pub fn hstack(children: impl IntoIterator<Item = ViewNode>) -> ViewNode {
    stack(StackAxis::Horizontal, children)
}

/// Children top to bottom
pub fn vstack(children: impl IntoIterator<Item = ViewNode>) -> ViewNode {
    stack(StackAxis::Vertical, children)
}

/// Children layered back to front
pub fn zstack(children: impl IntoIterator<Item = ViewNode>) -> ViewNode {
    stack(StackAxis::Depth, children)
}

pub fn spacer() -> ViewNode {
    ViewNode::new(NodeKind::Spacer)
}

pub fn empty() -> ViewNode {
    ViewNode::empty()
}

/// Conditional content.
///
/// A false condition leaves a placeholder so siblings keep their structural
/// position, which is what lets the node be seen as inserted or removed.
pub fn when(condition: bool, content: impl FnOnce() -> ViewNode) -> ViewNode {
    if condition {
        content()
    } else {
        ViewNode::empty()
    }
}

/// One child per item
pub fn for_each<T>(
    items: impl IntoIterator<Item = T>,
    content: impl FnMut(T) -> ViewNode,
) -> impl Iterator<Item = ViewNode> {
    items.into_iter().map(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_when_keeps_position() {
        let on = vstack([text("a"), when(true, rect), text("b")]);
        let off = vstack([text("a"), when(false, rect), text("b")]);
        assert_eq!(on.children.len(), off.children.len());
        assert!(off.children[1].is_empty());
        assert!(!on.children[1].is_empty());
    }

    #[test]
    fn test_for_each() {
        let row = hstack(for_each(["Home", "Popular", "Saved"], |name| text(name).named(name)));
        assert_eq!(row.children.len(), 3);
        assert_eq!(row.children[2].text_content(), Some("Saved"));
    }

    #[test]
    fn test_rounded_rect_radius() {
        assert_eq!(rounded_rect(25.0).style.corner_radius, 25.0);
    }
}
