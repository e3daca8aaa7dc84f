//! Style/modifier pipeline
//!
//! A [`Modifier`] is a plain record describing one presentation change. A
//! [`ModifierChain`] applies its records with a left fold: the first-declared
//! modifier runs first and every later modifier sees the node produced by the
//! ones before it.
//!
//! Composition rules:
//! - `Scale` and `Opacity` multiply the current value
//! - `Rotation` and `Offset` add to it
//! - colors, frame lengths, corner radius, shadow and font replace it
//! - `Padding` wraps the node in a padded depth stack, so modifiers declared
//!   after it apply to the wrapper
//!
//! `PressScale` and `PressOpacity` depend on [`InteractionState`] and are
//! no-ops while released.

use crate::node::{EdgeInsets, Font, Length, NodeKind, StackAxis, ViewNode};
use lumen_core::{Color, Point, Shadow};
use serde::Serialize;

/// Interaction state seen by interaction-dependent modifiers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InteractionState {
    pub pressed: bool,
}

impl InteractionState {
    pub const RELEASED: InteractionState = InteractionState { pressed: false };
    pub const PRESSED: InteractionState = InteractionState { pressed: true };
}

/// One presentation change
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "modifier", content = "value", rename_all = "snake_case")]
pub enum Modifier {
    Fill(Color),
    Foreground(Color),
    Font(Font),
    Opacity(f32),
    Scale(f32),
    Rotation(f32),
    Offset(Point),
    CornerRadius(f32),
    Shadow(Shadow),
    Width(Length),
    Height(Length),
    Padding(EdgeInsets),
    Spacing(f32),
    /// Multiply scale by the amount while pressed
    PressScale(f32),
    /// Multiply opacity by the amount while pressed
    PressOpacity(f32),
}

impl Modifier {
    /// Apply this record to a node
    pub fn apply(&self, mut node: ViewNode, interaction: InteractionState) -> ViewNode {
        match *self {
            Modifier::Fill(color) => node.style.fill = color,
            Modifier::Foreground(color) => node.style.foreground = color,
            Modifier::Font(font) => {
                if let NodeKind::Text { font: f, .. } = &mut node.kind {
                    *f = font;
                }
            }
            Modifier::Opacity(o) => node.style.opacity *= o,
            Modifier::Scale(s) => node.style.scale *= s,
            Modifier::Rotation(deg) => node.style.rotation += deg,
            Modifier::Offset(p) => {
                node.style.offset.x += p.x;
                node.style.offset.y += p.y;
            }
            Modifier::CornerRadius(r) => node.style.corner_radius = r,
            Modifier::Shadow(shadow) => node.style.shadow = Some(shadow),
            Modifier::Width(len) => node.layout.width = len,
            Modifier::Height(len) => node.layout.height = len,
            Modifier::Padding(p) => {
                let mut wrapper = ViewNode::new(NodeKind::Stack {
                    axis: StackAxis::Depth,
                });
                wrapper.layout.padding = p;
                // The wrapper stretches like its content would
                if node.layout.width == Length::Fill {
                    wrapper.layout.width = Length::Fill;
                }
                if node.layout.height == Length::Fill {
                    wrapper.layout.height = Length::Fill;
                }
                wrapper.name = node.name.take();
                return wrapper.child(node);
            }
            Modifier::Spacing(s) => node.layout.spacing = s,
            Modifier::PressScale(amount) => {
                if interaction.pressed {
                    node.style.scale *= amount;
                }
            }
            Modifier::PressOpacity(amount) => {
                if interaction.pressed {
                    node.style.opacity *= amount;
                }
            }
        }
        node
    }

    /// Whether the result depends on interaction state
    pub fn is_interactive(&self) -> bool {
        matches!(self, Modifier::PressScale(_) | Modifier::PressOpacity(_))
    }
}

/// Ordered list of modifiers
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ModifierChain(Vec<Modifier>);

impl ModifierChain {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a modifier after the existing ones
    pub fn then(mut self, modifier: Modifier) -> Self {
        self.0.push(modifier);
        self
    }

    /// Append another chain after this one
    pub fn extend(mut self, other: ModifierChain) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_interactive(&self) -> bool {
        self.0.iter().any(Modifier::is_interactive)
    }

    /// Fold the chain over `node`, first-declared first
    pub fn apply(&self, node: ViewNode, interaction: InteractionState) -> ViewNode {
        self.0
            .iter()
            .fold(node, |node, modifier| modifier.apply(node, interaction))
    }
}

impl From<Modifier> for ModifierChain {
    fn from(modifier: Modifier) -> Self {
        Self(vec![modifier])
    }
}

impl FromIterator<Modifier> for ModifierChain {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Button style that shrinks and dims its label while pressed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressableStyle {
    pub scaled_amount: f32,
}

/// Opacity factor applied while pressed
pub const PRESSED_OPACITY: f32 = 0.8;

impl PressableStyle {
    pub fn new(scaled_amount: f32) -> Self {
        Self { scaled_amount }
    }

    pub fn chain(&self) -> ModifierChain {
        ModifierChain::new()
            .then(Modifier::PressScale(self.scaled_amount))
            .then(Modifier::PressOpacity(PRESSED_OPACITY))
    }
}

impl Default for PressableStyle {
    fn default() -> Self {
        Self::new(0.9)
    }
}

/// Reusable "main button" look: headline white text on a full-width,
/// fixed-height rounded background with a soft shadow and outer padding
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonFormat {
    pub background: Color,
    pub frame_size: f32,
}

impl ButtonFormat {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }

    pub fn frame_size(mut self, frame_size: f32) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub fn chain(&self) -> ModifierChain {
        ModifierChain::new()
            .then(Modifier::Font(Font::Headline))
            .then(Modifier::Foreground(Color::WHITE))
            .then(Modifier::Height(Length::Fixed(self.frame_size)))
            .then(Modifier::Width(Length::Fill))
            .then(Modifier::Fill(self.background))
            .then(Modifier::CornerRadius(10.0))
            .then(Modifier::Shadow(Shadow::new(
                Color::BLACK.opacity(0.33),
                10.0,
                0.0,
                0.0,
            )))
            .then(Modifier::Padding(EdgeInsets::all(16.0)))
    }
}

impl Default for ButtonFormat {
    fn default() -> Self {
        Self {
            background: Color::BLUE,
            frame_size: 55.0,
        }
    }
}

/// Fluent modifier methods; each call appends one record to the fold
impl ViewNode {
    /// Apply a chain with released interaction state
    pub fn modifier(self, chain: impl Into<ModifierChain>) -> Self {
        chain.into().apply(self, InteractionState::RELEASED)
    }

    /// Apply a chain with explicit interaction state
    pub fn styled(self, chain: &ModifierChain, interaction: InteractionState) -> Self {
        chain.apply(self, interaction)
    }

    /// Apply a pressable style for the given pressed state
    pub fn pressable(self, style: PressableStyle, pressed: bool) -> Self {
        style.chain().apply(self, InteractionState { pressed })
    }

    /// Apply the main button format
    pub fn button_format(self, format: ButtonFormat) -> Self {
        self.modifier(format.chain())
    }

    pub fn fill(self, color: Color) -> Self {
        self.modifier(Modifier::Fill(color))
    }

    pub fn foreground(self, color: Color) -> Self {
        self.modifier(Modifier::Foreground(color))
    }

    pub fn font(self, font: Font) -> Self {
        self.modifier(Modifier::Font(font))
    }

    pub fn opacity(self, opacity: f32) -> Self {
        self.modifier(Modifier::Opacity(opacity))
    }

    pub fn scale(self, scale: f32) -> Self {
        self.modifier(Modifier::Scale(scale))
    }

    pub fn rotation(self, degrees: f32) -> Self {
        self.modifier(Modifier::Rotation(degrees))
    }

    pub fn offset(self, x: f32, y: f32) -> Self {
        self.modifier(Modifier::Offset(Point::new(x, y)))
    }

    pub fn corner_radius(self, radius: f32) -> Self {
        self.modifier(Modifier::CornerRadius(radius))
    }

    pub fn shadow(self, shadow: Shadow) -> Self {
        self.modifier(Modifier::Shadow(shadow))
    }

    /// Fixed width and height
    pub fn frame(self, width: f32, height: f32) -> Self {
        self.modifier(
            ModifierChain::new()
                .then(Modifier::Width(Length::Fixed(width)))
                .then(Modifier::Height(Length::Fixed(height))),
        )
    }

    pub fn width(self, length: Length) -> Self {
        self.modifier(Modifier::Width(length))
    }

    pub fn height(self, length: Length) -> Self {
        self.modifier(Modifier::Height(length))
    }

    /// Take all offered space on both axes
    pub fn fill_frame(self) -> Self {
        self.width(Length::Fill).height(Length::Fill)
    }

    pub fn padding(self, padding: f32) -> Self {
        self.padding_edges(EdgeInsets::all(padding))
    }

    /// Pad the leading and trailing edges only
    pub fn padding_horizontal(self, padding: f32) -> Self {
        self.padding_edges(EdgeInsets::horizontal(padding))
    }

    pub fn padding_edges(self, insets: EdgeInsets) -> Self {
        self.modifier(Modifier::Padding(insets))
    }

    pub fn spacing(self, spacing: f32) -> Self {
        self.modifier(Modifier::Spacing(spacing))
    }
}
