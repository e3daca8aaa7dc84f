//! View modifier lesson: one reusable button format, three variants

use crate::view::View;
use lumen_core::{BuildCx, Color};
use lumen_layout::prelude::*;

pub const NAME: &str = "view_modifiers";

pub struct ViewModifiers;

impl View for ViewModifiers {
    fn build(&self, _cx: &mut BuildCx<'_>) -> ViewNode {
        vstack([
            text("Hello World")
                .named("hello")
                .button_format(ButtonFormat::new(Color::BLUE)),
            text("Whats up")
                .named("whats_up")
                .button_format(ButtonFormat::new(Color::RED).frame_size(100.0)),
            text("Omboi")
                .named("omboi")
                .button_format(ButtonFormat::new(Color::BLACK)),
        ])
    }
}
