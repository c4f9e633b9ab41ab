//! Conversion of analog stick input into synthetic digital buttons.
//!
//! The left stick drives four extra button slots so that axis input goes
//! through the same edge detection and bindings as real buttons.

use crate::controller::device::JoystickSnapshot;
use crate::input::codes::{
    GAMEPAD_AXIS_DOWN, GAMEPAD_AXIS_LEFT, GAMEPAD_AXIS_RIGHT, GAMEPAD_AXIS_UP,
    GAMEPAD_BUTTON_SLOTS, GAMEPAD_RAW_BUTTONS,
};

pub const DEFAULT_AXIS_DEADZONE: f32 = 0.5;

/// Digital state of every button slot of one joystick.
pub type DigitalPad = [bool; GAMEPAD_BUTTON_SLOTS];

const AXIS_X: usize = 0;
const AXIS_Y: usize = 1;

/// Clamps `value` to zero when it lies within `deadzone` of center.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() <= deadzone {
        0.0
    } else {
        value
    }
}

/// Raw buttons followed by the four directions synthesized from the left
/// stick. Negative y is up.
pub fn digital_state(snapshot: &JoystickSnapshot, deadzone: f32) -> DigitalPad {
    let mut pad = [false; GAMEPAD_BUTTON_SLOTS];
    for (slot, down) in pad.iter_mut().take(GAMEPAD_RAW_BUTTONS).enumerate() {
        *down = snapshot.button(slot);
    }

    let x = apply_deadzone(snapshot.axis(AXIS_X), deadzone);
    let y = apply_deadzone(snapshot.axis(AXIS_Y), deadzone);

    pad[GAMEPAD_AXIS_LEFT as usize] = x < 0.0;
    pad[GAMEPAD_AXIS_RIGHT as usize] = x > 0.0;
    pad[GAMEPAD_AXIS_UP as usize] = y < 0.0;
    pad[GAMEPAD_AXIS_DOWN as usize] = y > 0.0;
    pad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::codes::GAMEPAD_B;

    fn stick(x: f32, y: f32) -> JoystickSnapshot {
        JoystickSnapshot {
            axes: vec![x, y],
            buttons: Vec::new(),
        }
    }

    #[test]
    fn deadzone_clamps_near_center() {
        assert_eq!(apply_deadzone(0.3, DEFAULT_AXIS_DEADZONE), 0.0);
        assert_eq!(apply_deadzone(-0.5, DEFAULT_AXIS_DEADZONE), 0.0);
        assert_eq!(apply_deadzone(0.6, DEFAULT_AXIS_DEADZONE), 0.6);
        assert_eq!(apply_deadzone(-0.9, DEFAULT_AXIS_DEADZONE), -0.9);
    }

    #[test]
    fn stick_inside_deadzone_is_idle() {
        let pad = digital_state(&stick(0.3, -0.3), DEFAULT_AXIS_DEADZONE);
        assert!(pad.iter().all(|down| !down));
    }

    #[test]
    fn stick_outside_deadzone_sets_directions() {
        let pad = digital_state(&stick(0.6, 0.0), DEFAULT_AXIS_DEADZONE);
        assert!(pad[GAMEPAD_AXIS_RIGHT as usize]);
        assert!(!pad[GAMEPAD_AXIS_LEFT as usize]);

        let pad = digital_state(&stick(-0.8, -0.7), DEFAULT_AXIS_DEADZONE);
        assert!(pad[GAMEPAD_AXIS_LEFT as usize]);
        assert!(pad[GAMEPAD_AXIS_UP as usize]);
        assert!(!pad[GAMEPAD_AXIS_DOWN as usize]);
    }

    #[test]
    fn raw_buttons_fill_the_first_slots() {
        let snapshot = JoystickSnapshot {
            axes: Vec::new(),
            buttons: vec![false, true],
        };
        let pad = digital_state(&snapshot, DEFAULT_AXIS_DEADZONE);
        assert!(pad[GAMEPAD_B as usize]);
        assert_eq!(pad.iter().filter(|down| **down).count(), 1);
    }
}
