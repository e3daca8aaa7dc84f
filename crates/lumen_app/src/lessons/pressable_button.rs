//! Pressable button lesson

use crate::view::{EventCx, View};
use lumen_core::{BuildCx, Color, InputEvent, InputKind, OwnerId, Shadow, StateCell, StateStore};
use lumen_layout::prelude::*;

pub const NAME: &str = "pressable_button";

/// Target name of the button
pub const BUTTON: &str = "button";

pub struct PressableButton {
    pressed: StateCell<bool>,
    /// Completed taps; never read by `build`, so counting does not rebuild
    taps: StateCell<u32>,
    style: PressableStyle,
}

impl PressableButton {
    pub fn new(store: &mut StateStore, owner: OwnerId) -> Self {
        Self {
            pressed: store.create_cell(owner, "pressed", false),
            taps: store.create_cell(owner, "taps", 0),
            style: PressableStyle::default(),
        }
    }

    pub fn pressed(&self) -> StateCell<bool> {
        self.pressed
    }

    pub fn taps(&self) -> StateCell<u32> {
        self.taps
    }
}

impl View for PressableButton {
    fn build(&self, cx: &mut BuildCx<'_>) -> ViewNode {
        let pressed = cx.read(self.pressed);
        let button = text("Click Me")
            .font(Font::Headline)
            .foreground(Color::WHITE)
            .height(Length::Fixed(55.0))
            .width(Length::Fill)
            .fill(Color::BLUE)
            .corner_radius(10.0)
            .shadow(Shadow::new(Color::BLUE.opacity(0.3), 10.0, 0.0, 10.0))
            .pressable(self.style, pressed)
            .named(BUTTON);
        // Padding would take over the name, so it goes on a container
        zstack([button]).width(Length::Fill).padding(16.0)
    }

    fn handle(&self, event: &InputEvent, cx: &mut EventCx<'_>) {
        if event.target != BUTTON {
            return;
        }
        match event.kind {
            InputKind::Tap => {
                cx.transaction(None, |tx| tx.update(self.taps, |n| *n += 1));
            }
            kind => {
                cx.route_press(self.pressed, kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LumenConfig;
    use crate::runtime::Runtime;

    fn label(runtime: &Runtime) -> ViewNode {
        runtime.presented().find(BUTTON).unwrap().clone()
    }

    #[test]
    fn test_press_scales_label() {
        let mut runtime = Runtime::new(LumenConfig::default(), NAME, PressableButton::new).unwrap();
        assert_eq!(label(&runtime).style.scale, 1.0);

        runtime.dispatch(InputEvent::press_down(BUTTON)).unwrap();
        let pressed = label(&runtime);
        assert_eq!(pressed.style.scale, 0.9);
        assert_eq!(pressed.style.opacity, 0.8);

        runtime.dispatch(InputEvent::press_up(BUTTON)).unwrap();
        assert_eq!(label(&runtime).style.scale, 1.0);
        assert_eq!(runtime.rebuild_count(), 3);
    }

    #[test]
    fn test_tap_counts_without_rebuild() {
        let mut runtime = Runtime::new(LumenConfig::default(), NAME, PressableButton::new).unwrap();
        runtime.dispatch(InputEvent::tap(BUTTON)).unwrap();
        runtime.dispatch(InputEvent::tap(BUTTON)).unwrap();
        assert_eq!(runtime.rebuild_count(), 1);
    }
}
