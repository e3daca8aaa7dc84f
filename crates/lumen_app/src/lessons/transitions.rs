//! Custom transition lesson
//!
//! The card rotates on screen from the bottom trailing corner and slides
//! off through the leading edge.

use crate::view::{EventCx, View};
use lumen_animation::AnimationSpec;
use lumen_core::{BuildCx, InputEvent, InputKind, OwnerId, StateCell, StateStore};
use lumen_layout::prelude::*;

pub const NAME: &str = "transitions";

pub const CARD: &str = "card";
pub const BUTTON: &str = "button";

/// Duration of the show/hide animation
pub const TOGGLE_DURATION_MS: f32 = 750.0;

pub struct Transitions {
    show: StateCell<bool>,
}

impl Transitions {
    pub fn new(store: &mut StateStore, owner: OwnerId) -> Self {
        Self {
            show: store.create_cell(owner, "show_rectangle", false),
        }
    }

    pub fn show(&self) -> StateCell<bool> {
        self.show
    }
}

impl View for Transitions {
    fn build(&self, cx: &mut BuildCx<'_>) -> ViewNode {
        let show = cx.read(self.show);
        vstack([
            spacer(),
            when(show, || {
                rounded_rect(25.0)
                    .frame(250.0, 350.0)
                    .transition(TransitionSpec::rotate_on())
                    .named(CARD)
            }),
            spacer(),
            text("Click Me!")
                .named(BUTTON)
                .button_format(ButtonFormat::default())
                .padding_horizontal(40.0),
        ])
        .fill_frame()
    }

    fn handle(&self, event: &InputEvent, cx: &mut EventCx<'_>) {
        if event.target == BUTTON && event.kind == InputKind::Tap {
            cx.with_animation(AnimationSpec::ease_in_out(TOGGLE_DURATION_MS), |tx| {
                tx.update(self.show, |show| *show = !*show)
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
    fn test_card_is_centered() {
        let mut runtime = Runtime::new(LumenConfig::default(), NAME, Transitions::new).unwrap();
        assert!(runtime.target().find(CARD).is_none());

        runtime.dispatch(InputEvent::tap(BUTTON)).unwrap();
        let card = runtime.target().find(CARD).unwrap().frame;
        assert_eq!(card.x(), 70.0);
        assert_eq!(card.max_x(), 320.0);
        assert_eq!(runtime.last_match().unwrap().insertions.len(), 1);
    }

    #[test]
    fn test_button_is_inset_horizontally() {
        let runtime = Runtime::new(LumenConfig::default(), NAME, Transitions::new).unwrap();
        let button = runtime.target().find(BUTTON).unwrap();
        assert_eq!(button.layout.padding, EdgeInsets::horizontal(40.0));
        assert!((button.frame.height() - (55.0 + 32.0)).abs() < 0.01);
        assert!((button.frame.max_y() - 844.0).abs() < 0.01);

        let format = button.children[0].frame;
        assert!((format.x() - 40.0).abs() < 0.01);
        assert!((format.width() - 310.0).abs() < 0.01);
    }

    #[test]
    fn test_insertion_starts_rotated_off_screen() {
        let mut runtime = Runtime::new(LumenConfig::default(), NAME, Transitions::new).unwrap();
        runtime.dispatch(InputEvent::tap(BUTTON)).unwrap();

        let first = runtime.presented();
        let card = first.find(CARD).unwrap();
        assert_eq!(card.style.rotation, 180.0);
        assert_eq!(card.style.offset.x, 390.0);
        assert_eq!(card.style.offset.y, 844.0);
    }
}
