//! Category highlight lesson
//!
//! Three tabs share one highlight shape. Selecting a tab moves the tagged
//! highlight into that tab's cell with a spring.

use crate::view::{EventCx, View};
use lumen_animation::AnimationSpec;
use lumen_core::{BuildCx, Color, InputEvent, InputKind, OwnerId, StateCell, StateStore};
use lumen_layout::prelude::*;

pub const NAME: &str = "categories";

pub const CATEGORIES: [&str; 3] = ["Home", "Popular", "Saved"];

/// Shared geometry id of the highlight
pub const SQUARE: &str = "square";

const NAMESPACE: Namespace = Namespace("categories");

pub struct Categories {
    selected: StateCell<String>,
}

impl Categories {
    pub fn new(store: &mut StateStore, owner: OwnerId) -> Self {
        Self {
            selected: store.create_cell(owner, "selected", String::new()),
        }
    }

    pub fn selected(&self) -> StateCell<String> {
        self.selected
    }
}

fn cell(category: &str, selected: bool) -> ViewNode {
    zstack([
        when(selected, || {
            rounded_rect(10.0)
                .fill(Color::RED.opacity(0.5))
                .matched_geometry(SQUARE, NAMESPACE)
                .named(SQUARE)
        }),
        text(category).foreground(if selected { Color::WHITE } else { Color::BLACK }),
    ])
    .width(Length::Fill)
    .height(Length::Fixed(55.0))
    .named(category)
}

impl View for Categories {
    fn build(&self, cx: &mut BuildCx<'_>) -> ViewNode {
        let selected = cx.read(self.selected);
        hstack(for_each(CATEGORIES, |category| cell(category, selected == category))).padding(16.0)
    }

    fn handle(&self, event: &InputEvent, cx: &mut EventCx<'_>) {
        if event.kind != InputKind::Tap {
            return;
        }
        if let Some(category) = CATEGORIES.iter().find(|c| **c == event.target) {
            cx.with_animation(AnimationSpec::spring(), |tx| {
                tx.write(self.selected, category.to_string())
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LumenConfig;
    use crate::runtime::Runtime;

    #[test]
    fn test_nothing_selected_initially() {
        let runtime = Runtime::new(LumenConfig::default(), NAME, Categories::new).unwrap();
        assert!(runtime.target().find_tagged(SQUARE).is_none());
        for category in CATEGORIES {
            assert!(runtime.target().find(category).is_some());
        }
    }

    #[test]
    fn test_first_selection_inserts_highlight() {
        let mut runtime = Runtime::new(LumenConfig::default(), NAME, Categories::new).unwrap();
        runtime.dispatch(InputEvent::tap("Home")).unwrap();

        let home = runtime.target().find("Home").unwrap();
        let square = runtime.target().find_tagged(SQUARE).unwrap();
        assert_eq!(square.frame, home.frame);
        assert_eq!(runtime.last_match().unwrap().insertions.len(), 1);
    }
}
