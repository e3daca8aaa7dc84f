//! Flexbox layout
//!
//! Maps a built [`ViewNode`] tree onto a taffy tree, computes it inside the
//! viewport, and writes absolute frames back into every node.
//!
//! - horizontal and vertical stacks are flex rows and columns, centered on
//!   both axes, with `spacing` as the gap
//! - depth stacks are a single-cell grid; children share the cell and are
//!   centered in it
//! - `Fill` grows along the parent's main axis and stretches across it
//! - shapes without an explicit length fill what they are offered
//! - stacks without an explicit length fill along any axis a child fills
//! - text leaves use an estimated size from font size and character count
//! - placeholders take no space

use crate::node::{Length, NodeKind, StackAxis, ViewNode};
use lumen_core::{Rect, Size};
use taffy::geometry::{Rect as TaffyRect, Size as TaffySize};
use taffy::prelude::{
    length, line, AlignItems, AlignSelf, AvailableSpace, Dimension, Display, FlexDirection,
    JustifyContent, JustifyItems, JustifySelf, NodeId, Style, TaffyTree,
};
use thiserror::Error;

/// Average glyph advance as a fraction of the font size
const GLYPH_WIDTH: f32 = 0.55;
/// Line height as a multiple of the font size
const LINE_HEIGHT: f32 = 1.2;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("viewport must be finite and non-negative, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("layout engine error: {0}")]
    Engine(#[from] taffy::TaffyError),
}

/// Estimated intrinsic size of a text leaf
pub fn measure_text(content: &str, font_size: f32) -> Size {
    let chars = content.chars().count() as f32;
    Size::new(chars * font_size * GLYPH_WIDTH, font_size * LINE_HEIGHT)
}

/// Lay out `root` inside `viewport`, filling in every node's frame
pub fn layout(root: &mut ViewNode, viewport: Size) -> Result<(), LayoutError> {
    if !(viewport.width.is_finite() && viewport.height.is_finite())
        || viewport.width < 0.0
        || viewport.height < 0.0
    {
        return Err(LayoutError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let mut tree: TaffyTree<()> = TaffyTree::new();
    tree.disable_rounding();

    let content = build_node(&mut tree, root, None)?;
    let screen = tree.new_with_children(
        Style {
            display: Display::Grid,
            size: TaffySize {
                width: length(viewport.width),
                height: length(viewport.height),
            },
            align_items: Some(AlignItems::Center),
            justify_items: Some(JustifyItems::Center),
            ..Default::default()
        },
        &[content],
    )?;

    tree.compute_layout(
        screen,
        TaffySize {
            width: AvailableSpace::Definite(viewport.width),
            height: AvailableSpace::Definite(viewport.height),
        },
    )?;

    write_frames(&tree, content, root, (0.0, 0.0))?;
    tracing::trace!(
        nodes = root.visible_count(),
        width = viewport.width,
        height = viewport.height,
        "layout computed"
    );
    Ok(())
}

fn build_node(
    tree: &mut TaffyTree<()>,
    node: &ViewNode,
    parent: Option<StackAxis>,
) -> Result<NodeId, LayoutError> {
    let style = style_for(node, parent);
    let axis = match node.kind {
        NodeKind::Stack { axis } => Some(axis),
        _ => None,
    };

    if node.children.is_empty() {
        return Ok(tree.new_leaf(style)?);
    }

    let children = node
        .children
        .iter()
        .map(|child| build_node(tree, child, axis.or(Some(StackAxis::Depth))))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tree.new_with_children(style, &children)?)
}

fn style_for(node: &ViewNode, parent: Option<StackAxis>) -> Style {
    let mut style = Style::default();

    match &node.kind {
        NodeKind::Empty => {
            style.display = Display::None;
            return style;
        }
        NodeKind::Stack { axis } => container_style(&mut style, *axis, node.layout.spacing),
        NodeKind::Spacer => {
            if matches!(
                parent,
                Some(StackAxis::Horizontal) | Some(StackAxis::Vertical)
            ) {
                style.flex_grow = 1.0;
                style.flex_basis = length(0.0);
            }
        }
        NodeKind::Text { .. } | NodeKind::Shape { .. } => {}
    }

    let p = node.layout.padding;
    if !p.is_zero() {
        style.padding = TaffyRect {
            left: length(p.leading),
            right: length(p.trailing),
            top: length(p.top),
            bottom: length(p.bottom),
        };
    }

    let (width, height) = requested_lengths(node);
    let parent = parent.unwrap_or(StackAxis::Depth);
    apply_length(&mut style, width, Axis::Width, parent);
    apply_length(&mut style, height, Axis::Height, parent);
    style
}

fn container_style(style: &mut Style, axis: StackAxis, spacing: f32) {
    match axis {
        StackAxis::Horizontal | StackAxis::Vertical => {
            style.display = Display::Flex;
            style.flex_direction = if axis == StackAxis::Horizontal {
                FlexDirection::Row
            } else {
                FlexDirection::Column
            };
            style.align_items = Some(AlignItems::Center);
            style.justify_content = Some(JustifyContent::Center);
            style.gap = TaffySize {
                width: length(spacing),
                height: length(spacing),
            };
        }
        StackAxis::Depth => {
            style.display = Display::Grid;
            style.align_items = Some(AlignItems::Center);
            style.justify_items = Some(JustifyItems::Center);
        }
    }
}

/// Effective lengths after intrinsic defaults
fn requested_lengths(node: &ViewNode) -> (Length, Length) {
    let (mut width, mut height) = (node.layout.width, node.layout.height);
    match &node.kind {
        NodeKind::Shape { .. } => {
            if width == Length::Auto {
                width = Length::Fill;
            }
            if height == Length::Auto {
                height = Length::Fill;
            }
        }
        NodeKind::Text { content, font } => {
            let size = measure_text(content, font.size());
            if width == Length::Auto {
                width = Length::Fixed(size.width);
            }
            if height == Length::Auto {
                height = Length::Fixed(size.height);
            }
        }
        NodeKind::Stack { .. } => {
            // A stack is as greedy as its greediest child
            for child in &node.children {
                let (w, h) = requested_lengths(child);
                if width == Length::Auto && w == Length::Fill {
                    width = Length::Fill;
                }
                if height == Length::Auto && h == Length::Fill {
                    height = Length::Fill;
                }
            }
        }
        NodeKind::Spacer | NodeKind::Empty => {}
    }
    (width, height)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Width,
    Height,
}

fn apply_length(style: &mut Style, len: Length, axis: Axis, parent: StackAxis) {
    let main = match parent {
        StackAxis::Horizontal => Some(Axis::Width),
        StackAxis::Vertical => Some(Axis::Height),
        StackAxis::Depth => None,
    };

    match len {
        Length::Auto => {}
        Length::Fixed(v) => {
            let v = v.max(0.0);
            match axis {
                Axis::Width => style.size.width = Dimension::Length(v),
                Axis::Height => style.size.height = Dimension::Length(v),
            }
            style.flex_shrink = 0.0;
        }
        Length::Fill if main == Some(axis) => {
            style.flex_grow = 1.0;
            style.flex_basis = length(0.0);
        }
        Length::Fill => match (parent, axis) {
            // Grid cells stretch per axis
            (StackAxis::Depth, Axis::Width) => style.justify_self = Some(JustifySelf::Stretch),
            (StackAxis::Depth, Axis::Height) => style.align_self = Some(AlignSelf::Stretch),
            // Flex cross axis
            _ => style.align_self = Some(AlignSelf::Stretch),
        },
    }

    if parent == StackAxis::Depth {
        style.grid_row = line(1);
        style.grid_column = line(1);
    }
}

fn write_frames(
    tree: &TaffyTree<()>,
    id: NodeId,
    node: &mut ViewNode,
    origin: (f32, f32),
) -> Result<(), LayoutError> {
    let layout = tree.layout(id)?;
    let x = origin.0 + layout.location.x;
    let y = origin.1 + layout.location.y;
    node.frame = Rect::new(x, y, layout.size.width, layout.size.height);

    let child_ids = tree.children(id)?;
    for (child_id, child) in child_ids.into_iter().zip(node.children.iter_mut()) {
        write_frames(tree, child_id, child, (x, y))?;
    }
    Ok(())
}
