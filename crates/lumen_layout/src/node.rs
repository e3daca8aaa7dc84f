//! View nodes
//!
//! A [`ViewNode`] is an immutable description of one renderable element.
//! Nodes are rebuilt from state on every pass and thrown away afterwards;
//! only the laid-out frame is filled in after construction.
//!
//! Transform attributes (opacity, scale, rotation, offset) are local to the
//! node. Renderers compose them onto descendants, so animating a container's
//! offset moves its whole subtree. `frame` is the untransformed layout frame
//! in viewport coordinates.

use crate::transition::TransitionSpec;
use lumen_core::{Color, Point, Rect, Shadow};
use serde::Serialize;

/// Primitive shape kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Circle,
    Capsule,
}

/// Stacking direction of a container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StackAxis {
    /// Children left to right
    Horizontal,
    /// Children top to bottom
    Vertical,
    /// Children layered on top of each other
    Depth,
}

/// Text styles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Font {
    #[default]
    Body,
    Headline,
    Title,
    Caption,
}

impl Font {
    /// Point size used for intrinsic text measurement
    pub fn size(&self) -> f32 {
        match self {
            Font::Body | Font::Headline => 17.0,
            Font::Title => 28.0,
            Font::Caption => 12.0,
        }
    }
}

/// What a node draws
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Shape { shape: ShapeKind },
    Text { content: String, font: Font },
    Stack { axis: StackAxis },
    /// Flexible gap along the parent's main axis
    Spacer,
    /// Slot left by a false conditional; keeps sibling positions stable
    Empty,
}

impl NodeKind {
    /// Kinds are compatible for positional matching when the variant and
    /// its structural parameter agree; text content may differ.
    pub fn same_kind(&self, other: &NodeKind) -> bool {
        match (self, other) {
            (NodeKind::Shape { shape: a }, NodeKind::Shape { shape: b }) => a == b,
            (NodeKind::Text { .. }, NodeKind::Text { .. }) => true,
            (NodeKind::Stack { axis: a }, NodeKind::Stack { axis: b }) => a == b,
            (NodeKind::Spacer, NodeKind::Spacer) => true,
            (NodeKind::Empty, NodeKind::Empty) => true,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, NodeKind::Empty)
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Shape { .. } => "shape",
            NodeKind::Text { .. } => "text",
            NodeKind::Stack { .. } => "stack",
            NodeKind::Spacer => "spacer",
            NodeKind::Empty => "empty",
        }
    }
}

/// Requested length along one axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    /// Size to content (shapes fill what they are offered)
    #[default]
    Auto,
    Fixed(f32),
    /// Take all space offered by the parent
    Fill,
}

/// Layout request attached to a node before layout runs
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LayoutRequest {
    pub width: Length,
    pub height: Length,
    /// Inner padding per edge
    pub padding: EdgeInsets,
    /// Gap between children of a stack
    pub spacing: f32,
}

/// Padding on each edge of a node
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EdgeInsets {
    pub top: f32,
    pub leading: f32,
    pub bottom: f32,
    pub trailing: f32,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets::all(0.0);

    pub const fn all(value: f32) -> Self {
        Self {
            top: value,
            leading: value,
            bottom: value,
            trailing: value,
        }
    }

    /// Leading and trailing only
    pub const fn horizontal(value: f32) -> Self {
        Self {
            top: 0.0,
            leading: value,
            bottom: 0.0,
            trailing: value,
        }
    }

    /// Top and bottom only
    pub const fn vertical(value: f32) -> Self {
        Self {
            top: value,
            leading: 0.0,
            bottom: value,
            trailing: 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Default gap between stack children
pub const DEFAULT_SPACING: f32 = 8.0;

impl Default for LayoutRequest {
    fn default() -> Self {
        Self {
            width: Length::Auto,
            height: Length::Auto,
            padding: EdgeInsets::ZERO,
            spacing: DEFAULT_SPACING,
        }
    }
}

/// Presentation attributes
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NodeStyle {
    /// Shape fill, or background behind text and stacks
    pub fill: Color,
    /// Text color
    pub foreground: Color,
    pub opacity: f32,
    pub scale: f32,
    /// Degrees, clockwise
    pub rotation: f32,
    pub offset: Point,
    pub corner_radius: f32,
    pub shadow: Option<Shadow>,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: Color::TRANSPARENT,
            foreground: Color::BLACK,
            opacity: 1.0,
            scale: 1.0,
            rotation: 0.0,
            offset: Point::ZERO,
            corner_radius: 0.0,
            shadow: None,
        }
    }
}

/// Namespace scoping geometry identity tags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Namespace(pub &'static str);

/// Cross-tree identity used for matched-geometry animation
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GeometryTag {
    pub namespace: Namespace,
    pub id: String,
}

impl GeometryTag {
    pub fn new(id: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            namespace,
            id: id.into(),
        }
    }
}

/// Animatable channel indices into [`Channels`]
pub mod channel {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const WIDTH: usize = 2;
    pub const HEIGHT: usize = 3;
    pub const CORNER_RADIUS: usize = 4;
    pub const FILL_R: usize = 5;
    pub const FILL_G: usize = 6;
    pub const FILL_B: usize = 7;
    pub const FILL_A: usize = 8;
    pub const FOREGROUND_R: usize = 9;
    pub const FOREGROUND_G: usize = 10;
    pub const FOREGROUND_B: usize = 11;
    pub const FOREGROUND_A: usize = 12;
    pub const OPACITY: usize = 13;
    pub const SCALE: usize = 14;
    pub const ROTATION: usize = 15;
    pub const OFFSET_X: usize = 16;
    pub const OFFSET_Y: usize = 17;

    pub const COUNT: usize = 18;

    pub const NAMES: [&str; COUNT] = [
        "x",
        "y",
        "width",
        "height",
        "corner_radius",
        "fill.r",
        "fill.g",
        "fill.b",
        "fill.a",
        "foreground.r",
        "foreground.g",
        "foreground.b",
        "foreground.a",
        "opacity",
        "scale",
        "rotation",
        "offset.x",
        "offset.y",
    ];
}

/// Flat view of every animatable attribute of a node
pub type Channels = [f32; channel::COUNT];

/// Immutable description of one renderable element
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewNode {
    #[serde(flatten)]
    pub kind: NodeKind,
    pub layout: LayoutRequest,
    /// Filled in by layout
    pub frame: Rect,
    pub style: NodeStyle,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<GeometryTag>,
    #[serde(skip)]
    pub transition: Option<TransitionSpec>,
    /// Input target and diagnostics id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ViewNode {
    pub fn new(kind: NodeKind) -> Self {
        let mut style = NodeStyle::default();
        if matches!(kind, NodeKind::Shape { .. }) {
            style.fill = Color::BLACK;
        }
        Self {
            kind,
            layout: LayoutRequest::default(),
            frame: Rect::ZERO,
            style,
            children: Vec::new(),
            tag: None,
            transition: None,
            name: None,
        }
    }

    /// Placeholder left by a false conditional
    pub fn empty() -> Self {
        Self::new(NodeKind::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Append a child
    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    pub fn children(mut self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Tag this node for matched-geometry animation within `namespace`
    pub fn matched_geometry(mut self, id: impl Into<String>, namespace: Namespace) -> Self {
        self.tag = Some(GeometryTag::new(id, namespace));
        self
    }

    /// How this node enters and leaves the tree
    pub fn transition(mut self, transition: TransitionSpec) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Name used to address input and diagnostics
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Snapshot every animatable attribute
    pub fn channels(&self) -> Channels {
        let s = &self.style;
        let f = &self.frame;
        [
            f.origin.x,
            f.origin.y,
            f.size.width,
            f.size.height,
            s.corner_radius,
            s.fill.r,
            s.fill.g,
            s.fill.b,
            s.fill.a,
            s.foreground.r,
            s.foreground.g,
            s.foreground.b,
            s.foreground.a,
            s.opacity,
            s.scale,
            s.rotation,
            s.offset.x,
            s.offset.y,
        ]
    }

    /// Overwrite every animatable attribute
    pub fn set_channels(&mut self, c: &Channels) {
        use channel::*;
        self.frame = Rect::new(c[X], c[Y], c[WIDTH], c[HEIGHT]);
        self.style.corner_radius = c[CORNER_RADIUS];
        self.style.fill = Color::rgba(c[FILL_R], c[FILL_G], c[FILL_B], c[FILL_A]);
        self.style.foreground = Color::rgba(
            c[FOREGROUND_R],
            c[FOREGROUND_G],
            c[FOREGROUND_B],
            c[FOREGROUND_A],
        );
        self.style.opacity = c[OPACITY];
        self.style.scale = c[SCALE];
        self.style.rotation = c[ROTATION];
        self.style.offset = Point::new(c[OFFSET_X], c[OFFSET_Y]);
    }

    /// Depth-first search by name
    pub fn find(&self, name: &str) -> Option<&ViewNode> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Depth-first search by geometry tag id
    pub fn find_tagged(&self, id: &str) -> Option<&ViewNode> {
        if self.tag.as_ref().is_some_and(|t| t.id == id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_tagged(id))
    }

    /// Number of nodes in this subtree, placeholders excluded
    pub fn visible_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        1 + self.children.iter().map(ViewNode::visible_count).sum::<usize>()
    }
}
