//! Interaction state machines
//!
//! Flat state machines driving widget interaction states. A pressable target
//! owns one machine; the runtime writes its current state into the target's
//! `StateCell<bool>` so pressed styling goes through the ordinary state store.

use crate::events::InputKind;

/// Identifier for a state within a state machine
pub type StateId = u32;

/// Identifier for an event type
pub type EventId = u32;

/// A transition in the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from_state: StateId,
    pub event: EventId,
    pub to_state: StateId,
}

impl Transition {
    pub fn new(from: StateId, event: EventId, to: StateId) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// A state machine instance
#[derive(Clone, Debug)]
pub struct StateMachine {
    current_state: StateId,
    transitions: Vec<Transition>,
    /// History of state transitions (for debugging)
    history: Vec<(StateId, EventId, StateId)>,
}

impl StateMachine {
    pub fn new(initial_state: StateId, transitions: Vec<Transition>) -> Self {
        Self {
            current_state: initial_state,
            transitions,
            history: Vec::new(),
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    pub fn is_in(&self, state: StateId) -> bool {
        self.current_state == state
    }

    pub fn history(&self) -> &[(StateId, EventId, StateId)] {
        &self.history
    }

    pub fn can_send(&self, event: EventId) -> bool {
        self.transitions
            .iter()
            .any(|t| t.from_state == self.current_state && t.event == event)
    }

    /// Send an event; returns the (possibly unchanged) current state
    pub fn send(&mut self, event: EventId) -> StateId {
        let current = self.current_state;
        let Some(to_state) = self
            .transitions
            .iter()
            .find(|t| t.from_state == current && t.event == event)
            .map(|t| t.to_state)
        else {
            return current;
        };

        self.current_state = to_state;
        self.history.push((current, event, to_state));
        tracing::trace!(from = current, event, to = to_state, "fsm transition");
        to_state
    }
}

/// Press interaction: idle <-> pressed
pub mod press {
    use super::{EventId, StateId, StateMachine, Transition};
    use crate::events::InputKind;

    pub const IDLE: StateId = 0;
    pub const PRESSED: StateId = 1;

    pub const PRESS_DOWN: EventId = 1;
    pub const PRESS_UP: EventId = 2;
    pub const PRESS_CANCEL: EventId = 3;

    /// Build the press machine in the idle state
    pub fn machine() -> StateMachine {
        StateMachine::new(
            IDLE,
            vec![
                Transition::new(IDLE, PRESS_DOWN, PRESSED),
                Transition::new(PRESSED, PRESS_UP, IDLE),
                Transition::new(PRESSED, PRESS_CANCEL, IDLE),
            ],
        )
    }

    /// Map an input signal onto a press event
    pub fn event_for(kind: InputKind) -> Option<EventId> {
        match kind {
            InputKind::PressDown => Some(PRESS_DOWN),
            InputKind::PressUp => Some(PRESS_UP),
            InputKind::PressCancel => Some(PRESS_CANCEL),
            InputKind::Tap => None,
        }
    }
}

/// Feed an input signal to a press machine; returns whether it is now pressed
pub fn apply_press(machine: &mut StateMachine, kind: InputKind) -> bool {
    if let Some(event) = press::event_for(kind) {
        machine.send(event);
    }
    machine.is_in(press::PRESSED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_cycle() {
        let mut fsm = press::machine();
        assert!(fsm.is_in(press::IDLE));

        assert!(apply_press(&mut fsm, InputKind::PressDown));
        assert!(!apply_press(&mut fsm, InputKind::PressUp));
        assert_eq!(fsm.history().len(), 2);
    }

    #[test]
    fn test_cancel_releases() {
        let mut fsm = press::machine();
        fsm.send(press::PRESS_DOWN);
        assert!(fsm.can_send(press::PRESS_CANCEL));
        assert_eq!(fsm.send(press::PRESS_CANCEL), press::IDLE);
    }

    #[test]
    fn test_invalid_event_keeps_state() {
        let mut fsm = press::machine();
        assert!(!fsm.can_send(press::PRESS_UP));
        assert_eq!(fsm.send(press::PRESS_UP), press::IDLE);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn test_tap_does_not_press() {
        let mut fsm = press::machine();
        assert!(!apply_press(&mut fsm, InputKind::Tap));
    }
}
