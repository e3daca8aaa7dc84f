//! Built-in lesson views
//!
//! Each lesson is a small view exercising one part of the engine. They are
//! launched by name from the CLI and the headless runner.

pub mod categories;
pub mod matched_geometry;
pub mod pressable_button;
pub mod transitions;
pub mod view_modifiers;

pub use categories::Categories;
pub use matched_geometry::MatchedGeometry;
pub use pressable_button::PressableButton;
pub use transitions::Transitions;
pub use view_modifiers::ViewModifiers;

use crate::config::LumenConfig;
use crate::error::{LumenError, Result};
use crate::runtime::Runtime;

/// Registry entry for a lesson
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LessonInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const LESSONS: &[LessonInfo] = &[
    LessonInfo {
        name: pressable_button::NAME,
        title: "Pressable button",
        description: "Button style that shrinks and dims its label while pressed",
    },
    LessonInfo {
        name: matched_geometry::NAME,
        title: "Matched geometry",
        description: "Tap to move a tagged rectangle between two slots",
    },
    LessonInfo {
        name: categories::NAME,
        title: "Category highlight",
        description: "Spring a shared highlight between category tabs",
    },
    LessonInfo {
        name: transitions::NAME,
        title: "Custom transitions",
        description: "Card rotates in from the bottom corner and slides out leading",
    },
    LessonInfo {
        name: view_modifiers::NAME,
        title: "View modifiers",
        description: "Reusable main-button format in three variants",
    },
];

pub fn find(name: &str) -> Option<&'static LessonInfo> {
    LESSONS.iter().find(|lesson| lesson.name == name)
}

/// Build a runtime hosting the named lesson
pub fn launch(name: &str, config: LumenConfig) -> Result<Runtime> {
    match name {
        pressable_button::NAME => Runtime::new(config, name, PressableButton::new),
        matched_geometry::NAME => Runtime::new(config, name, MatchedGeometry::new),
        categories::NAME => Runtime::new(config, name, Categories::new),
        transitions::NAME => Runtime::new(config, name, Transitions::new),
        view_modifiers::NAME => Runtime::new(config, name, |_, _| ViewModifiers),
        _ => Err(LumenError::UnknownLesson(name.to_string())),
    }
}
