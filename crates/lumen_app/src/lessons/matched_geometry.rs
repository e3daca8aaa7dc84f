//! Matched geometry lesson
//!
//! A rounded rectangle sits at the top while collapsed and at the bottom
//! while expanded. Both placements carry the same geometry tag, so a toggle
//! animates one shape between the two frames.

use crate::view::{EventCx, View};
use lumen_animation::AnimationSpec;
use lumen_animation::spec::DEFAULT_DURATION_MS;
use lumen_core::{BuildCx, Color, InputEvent, InputKind, OwnerId, StateCell, StateStore};
use lumen_layout::prelude::*;

pub const NAME: &str = "matched_geometry";

/// Target name of the full-screen background
pub const SCREEN: &str = "screen";

/// Shared geometry id of the rectangle
pub const RECTANGLE: &str = "rectangle";

const NAMESPACE: Namespace = Namespace("matched_geometry");

pub struct MatchedGeometry {
    clicked: StateCell<bool>,
}

impl MatchedGeometry {
    pub fn new(store: &mut StateStore, owner: OwnerId) -> Self {
        Self {
            clicked: store.create_cell(owner, "clicked", false),
        }
    }

    pub fn clicked(&self) -> StateCell<bool> {
        self.clicked
    }
}

impl View for MatchedGeometry {
    fn build(&self, cx: &mut BuildCx<'_>) -> ViewNode {
        let clicked = cx.read(self.clicked);
        vstack([
            when(!clicked, || {
                rounded_rect(25.0)
                    .matched_geometry(RECTANGLE, NAMESPACE)
                    .frame(100.0, 100.0)
            }),
            spacer(),
            when(clicked, || {
                rounded_rect(25.0)
                    .matched_geometry(RECTANGLE, NAMESPACE)
                    .frame(300.0, 200.0)
            }),
        ])
        .fill_frame()
        .fill(Color::RED)
        .named(SCREEN)
    }

    fn handle(&self, event: &InputEvent, cx: &mut EventCx<'_>) {
        if event.target == SCREEN && event.kind == InputKind::Tap {
            cx.with_animation(AnimationSpec::ease_in_out(DEFAULT_DURATION_MS), |tx| {
                tx.update(self.clicked, |clicked| *clicked = !*clicked)
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
    fn test_tap_moves_one_tagged_shape() {
        let mut runtime = Runtime::new(LumenConfig::default(), NAME, MatchedGeometry::new).unwrap();
        let before = runtime.target().find_tagged(RECTANGLE).unwrap().frame;
        assert_eq!(before.width(), 100.0);
        assert_eq!(before.y(), 0.0);

        runtime.dispatch(InputEvent::tap(SCREEN)).unwrap();
        let matched = runtime.last_match().unwrap();
        assert_eq!(matched.moves().count(), 1);
        assert!(matched.insertions.is_empty());
        assert!(matched.removals.is_empty());

        let after = runtime.target().find_tagged(RECTANGLE).unwrap().frame;
        assert_eq!(after.width(), 300.0);
        assert_eq!(after.max_y(), 844.0);
        assert!(runtime.is_animating());
    }
}
