//! In-process device and clock driven by code instead of hardware.
//!
//! Used by tests and by the replay mode of the demo binary.

use std::collections::HashSet;
use tracing::debug;

use crate::controller::device::{Clock, InputDevice, JoystickSnapshot, RawTransition};
use crate::input::{Key, Modifiers};

const DEFAULT_JOYSTICK_SLOTS: usize = 4;

#[derive(Debug, Clone)]
pub struct ScriptedDevice {
    held: HashSet<Key>,
    pending: Vec<RawTransition>,
    modifiers: Modifiers,
    joysticks: Vec<Option<JoystickSnapshot>>,
}

impl Default for ScriptedDevice {
    fn default() -> Self {
        Self::with_joystick_slots(DEFAULT_JOYSTICK_SLOTS)
    }
}

impl ScriptedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_joystick_slots(slots: usize) -> Self {
        Self {
            held: HashSet::new(),
            pending: Vec::new(),
            modifiers: Modifiers::NONE,
            joysticks: vec![None; slots],
        }
    }

    /// Holds `key` and queues a press transition for the next poll.
    pub fn press(&mut self, key: Key) {
        debug!("Scripted press {}", key);
        self.held.insert(key);
        self.pending.push(RawTransition::pressed(key));
    }

    /// Lets go of `key` and queues a release transition for the next poll.
    pub fn release(&mut self, key: Key) {
        debug!("Scripted release {}", key);
        self.held.remove(&key);
        self.pending.push(RawTransition::released(key));
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn set_joystick(&mut self, index: usize, snapshot: JoystickSnapshot) {
        if let Some(slot) = self.joysticks.get_mut(index) {
            *slot = Some(snapshot);
        }
    }

    pub fn set_axis(&mut self, index: usize, axis: usize, value: f32) {
        if let Some(Some(snapshot)) = self.joysticks.get_mut(index) {
            if snapshot.axes.len() <= axis {
                snapshot.axes.resize(axis + 1, 0.0);
            }
            snapshot.axes[axis] = value;
        }
    }

    pub fn set_button(&mut self, index: usize, button: usize, down: bool) {
        if let Some(Some(snapshot)) = self.joysticks.get_mut(index) {
            if snapshot.buttons.len() <= button {
                snapshot.buttons.resize(button + 1, false);
            }
            snapshot.buttons[button] = down;
        }
    }

    pub fn disconnect_joystick(&mut self, index: usize) {
        if let Some(slot) = self.joysticks.get_mut(index) {
            *slot = None;
        }
    }

    pub fn pending_transitions(&self) -> usize {
        self.pending.len()
    }
}

impl InputDevice for ScriptedDevice {
    fn poll_transitions(&mut self, out: &mut Vec<RawTransition>) {
        out.append(&mut self.pending);
    }

    fn is_down(&self, key: &Key) -> bool {
        self.held.contains(key)
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn joystick_slots(&self) -> usize {
        self.joysticks.len()
    }

    fn joystick(&self, index: usize) -> Option<JoystickSnapshot> {
        self.joysticks.get(index).cloned().flatten()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: u64) -> Self {
        Self { now_ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    pub fn set(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::codes::KEY_A;
    use crate::input::key;

    #[test]
    fn transitions_are_drained_once() {
        let mut device = ScriptedDevice::new();
        device.press(key(KEY_A));
        device.release(key(KEY_A));

        let mut out = Vec::new();
        device.poll_transitions(&mut out);
        assert_eq!(out, vec![RawTransition::pressed(key(KEY_A)), RawTransition::released(key(KEY_A))]);

        out.clear();
        device.poll_transitions(&mut out);
        assert!(out.is_empty());
        assert!(!device.is_down(&key(KEY_A)));
    }

    #[test]
    fn joystick_edits_need_a_connected_pad() {
        let mut device = ScriptedDevice::with_joystick_slots(2);
        device.set_axis(0, 0, 1.0);
        assert!(device.joystick(0).is_none());

        device.set_joystick(0, JoystickSnapshot::default());
        device.set_axis(0, 1, -0.75);
        device.set_button(0, 3, true);
        let snapshot = device.joystick(0).expect("pad 0 is connected");
        assert_eq!(snapshot.axis(1), -0.75);
        assert!(snapshot.button(3));

        device.set_joystick(5, JoystickSnapshot::default());
        assert!(device.joystick(5).is_none());
    }

    #[test]
    fn manual_clock_moves_on_demand() {
        let mut clock = ManualClock::starting_at(100);
        clock.advance(16);
        assert_eq!(clock.now_ms(), 116);
        clock.set(5);
        assert_eq!(clock.now_ms(), 5);
    }
}
