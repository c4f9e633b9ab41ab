//! Per-frame and per-tick edge tracking.
//!
//! A key's state is implicit in set membership: "held" is always asked of
//! the device (or of the last joystick snapshot), "triggered" lives in one
//! of two edge sets that only grow between their clear points.
//!
//! ```text
//! press(k) ──► poll_triggered += k ──► cleared by begin_poll()
//!          └─► tick_triggered += k ──► cleared by end_tick()
//! ```

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

use crate::controller::axis::DigitalPad;
use crate::controller::device::InputDevice;
use crate::input::{DeviceClass, Key, KeyRef, Modifiers};
use crate::mapping::VirtualKeyTable;

/// Which edge set a `triggered` query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Since the start of the current poll cycle.
    Frame,
    /// Since the last tick handler run.
    Tick,
}

#[derive(Debug, Default, Clone)]
pub struct KeystateTracker {
    poll_triggered: HashSet<Key>,
    tick_triggered: HashSet<Key>,
    pads: BTreeMap<usize, DigitalPad>,
}

impl KeystateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the edges of the previous poll cycle.
    pub fn begin_poll(&mut self) {
        self.poll_triggered.clear();
    }

    /// Forgets the edges consumed by the tick handler that just ran.
    pub fn end_tick(&mut self) {
        self.tick_triggered.clear();
    }

    pub fn record_press(&mut self, key: Key) {
        trace!("Recording edge for {}", key);
        self.poll_triggered.insert(key);
        self.tick_triggered.insert(key);
    }

    /// Stores the digital state of joystick `index` and returns the
    /// `(key, pressed)` transitions against the previous poll.
    ///
    /// `None` means the joystick is gone; every button it held is released.
    pub fn update_pad(&mut self, index: usize, state: Option<DigitalPad>) -> Vec<(Key, bool)> {
        let previous = match state {
            Some(pad) => self.pads.insert(index, pad),
            None => self.pads.remove(&index),
        };
        if previous.is_none() && state.is_some() {
            debug!("Joystick {} appeared", index);
        } else if previous.is_some() && state.is_none() {
            debug!("Joystick {} disconnected", index);
        }

        let before = previous.unwrap_or_default();
        let after = state.unwrap_or_default();
        before
            .iter()
            .zip(after.iter())
            .enumerate()
            .filter(|(_, (was, is))| was != is)
            .map(|(code, (_, is))| (Key::gamepad(code as i32, index as i32), *is))
            .collect()
    }

    pub fn connected_pads(&self) -> impl Iterator<Item = usize> + '_ {
        self.pads.keys().copied()
    }

    fn pad_down(&self, key: &Key) -> bool {
        let Ok(slot) = usize::try_from(key.code) else {
            return false;
        };
        let held = |pad: &DigitalPad| pad.get(slot).copied().unwrap_or(false);

        if key.is_any_device() {
            self.pads.values().any(held)
        } else {
            usize::try_from(key.device_id)
                .ok()
                .and_then(|index| self.pads.get(&index))
                .is_some_and(held)
        }
    }

    fn edges(&self, scope: Scope) -> &HashSet<Key> {
        match scope {
            Scope::Frame => &self.poll_triggered,
            Scope::Tick => &self.tick_triggered,
        }
    }

    fn edges_mut(&mut self, scope: Scope) -> &mut HashSet<Key> {
        match scope {
            Scope::Frame => &mut self.poll_triggered,
            Scope::Tick => &mut self.tick_triggered,
        }
    }

    /// The recorded edge `key` refers to, if any. An any-device gamepad key
    /// matches the edge of any joystick.
    fn find_edge(&self, key: &Key, scope: Scope) -> Option<Key> {
        let edges = self.edges(scope);
        if edges.contains(key) {
            return Some(*key);
        }
        if key.is_any_device() && key.device_class == DeviceClass::Gamepad {
            return edges.iter().find(|edge| key.covers(edge)).copied();
        }
        None
    }

    fn key_pressed(&self, device: &dyn InputDevice, key: &Key) -> bool {
        match key.device_class {
            DeviceClass::Gamepad => self.pad_down(key) || device.is_down(key),
            DeviceClass::Keyboard | DeviceClass::Mouse => device.is_down(key),
        }
    }

    /// Live held state, gated by the modifier mask. A virtual name is held
    /// when any of its physical keys is.
    pub fn pressed(
        &self,
        device: &dyn InputDevice,
        bindings: &VirtualKeyTable,
        key: &KeyRef,
        required: Modifiers,
    ) -> bool {
        if !device.modifiers().contains(required) {
            return false;
        }
        match key {
            KeyRef::Physical(physical) => self.key_pressed(device, physical),
            KeyRef::Virtual(name) => bindings
                .physical_keys_for(name)
                .iter()
                .any(|physical| self.key_pressed(device, physical)),
        }
    }

    /// Whether `key` went down since the clear point of `scope`.
    pub fn triggered(
        &self,
        device: &dyn InputDevice,
        bindings: &VirtualKeyTable,
        key: &KeyRef,
        required: Modifiers,
        scope: Scope,
    ) -> bool {
        if !device.modifiers().contains(required) {
            return false;
        }
        match key {
            KeyRef::Physical(physical) => self.find_edge(physical, scope).is_some(),
            KeyRef::Virtual(name) => bindings
                .physical_keys_for(name)
                .iter()
                .any(|physical| self.find_edge(physical, scope).is_some()),
        }
    }

    /// Like [`triggered`](Self::triggered) but consumes the edge it found.
    ///
    /// For a virtual name only the first triggered physical key is consumed;
    /// which one is first is unspecified.
    pub fn triggered_once(
        &mut self,
        device: &dyn InputDevice,
        bindings: &VirtualKeyTable,
        key: &KeyRef,
        required: Modifiers,
        scope: Scope,
    ) -> bool {
        if !device.modifiers().contains(required) {
            return false;
        }
        let edge = match key {
            KeyRef::Physical(physical) => self.find_edge(physical, scope),
            KeyRef::Virtual(name) => bindings
                .physical_keys_for(name)
                .iter()
                .find_map(|physical| self.find_edge(physical, scope)),
        };
        match edge {
            Some(edge) => {
                self.edges_mut(scope).remove(&edge);
                trace!("Consumed edge {} ({:?})", edge, scope);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::device::RawTransition;
    use crate::input::codes::{GAMEPAD_A, GAMEPAD_AXIS_RIGHT, KEY_A, KEY_LEFT, KEY_SPACE};
    use crate::input::{gamepad, key};
    use std::collections::HashSet;

    #[derive(Default)]
    struct Held {
        keys: HashSet<Key>,
        modifiers: Modifiers,
    }

    impl InputDevice for Held {
        fn poll_transitions(&mut self, _out: &mut Vec<RawTransition>) {}

        fn is_down(&self, key: &Key) -> bool {
            self.keys.contains(key)
        }

        fn modifiers(&self) -> Modifiers {
            self.modifiers
        }
    }

    fn space() -> KeyRef {
        KeyRef::Physical(key(KEY_SPACE))
    }

    #[test]
    fn edges_clear_independently() {
        let device = Held::default();
        let bindings = VirtualKeyTable::new();
        let mut tracker = KeystateTracker::new();

        tracker.record_press(key(KEY_SPACE));
        assert!(tracker.triggered(&device, &bindings, &space(), Modifiers::NONE, Scope::Frame));
        assert!(tracker.triggered(&device, &bindings, &space(), Modifiers::NONE, Scope::Tick));

        tracker.begin_poll();
        assert!(!tracker.triggered(&device, &bindings, &space(), Modifiers::NONE, Scope::Frame));
        assert!(tracker.triggered(&device, &bindings, &space(), Modifiers::NONE, Scope::Tick));

        tracker.end_tick();
        assert!(!tracker.triggered(&device, &bindings, &space(), Modifiers::NONE, Scope::Tick));
    }

    #[test]
    fn triggered_once_consumes_only_the_consulted_set() {
        let device = Held::default();
        let bindings = VirtualKeyTable::new();
        let mut tracker = KeystateTracker::new();

        tracker.record_press(key(KEY_SPACE));
        assert!(tracker.triggered_once(&device, &bindings, &space(), Modifiers::NONE, Scope::Frame));
        assert!(!tracker.triggered_once(&device, &bindings, &space(), Modifiers::NONE, Scope::Frame));
        assert!(tracker.triggered_once(&device, &bindings, &space(), Modifiers::NONE, Scope::Tick));
    }

    #[test]
    fn virtual_triggered_once_consumes_one_alias() {
        let device = Held::default();
        let mut bindings = VirtualKeyTable::new();
        bindings.bind(key(KEY_A), "left");
        bindings.bind(key(KEY_LEFT), "left");
        let left = KeyRef::from("left");

        let mut tracker = KeystateTracker::new();
        tracker.record_press(key(KEY_A));
        tracker.record_press(key(KEY_LEFT));

        assert!(tracker.triggered_once(&device, &bindings, &left, Modifiers::NONE, Scope::Frame));
        assert!(tracker.triggered_once(&device, &bindings, &left, Modifiers::NONE, Scope::Frame));
        assert!(!tracker.triggered_once(&device, &bindings, &left, Modifiers::NONE, Scope::Frame));
    }

    #[test]
    fn modifiers_gate_every_query() {
        let mut device = Held::default();
        device.keys.insert(key(KEY_SPACE));
        let bindings = VirtualKeyTable::new();
        let mut tracker = KeystateTracker::new();
        tracker.record_press(key(KEY_SPACE));

        assert!(!tracker.pressed(&device, &bindings, &space(), Modifiers::SHIFT));
        assert!(!tracker.triggered(&device, &bindings, &space(), Modifiers::SHIFT, Scope::Frame));

        device.modifiers = Modifiers::SHIFT;
        assert!(tracker.pressed(&device, &bindings, &space(), Modifiers::SHIFT));
        assert!(tracker.triggered(&device, &bindings, &space(), Modifiers::SHIFT, Scope::Frame));
    }

    #[test]
    fn pad_updates_produce_transitions() {
        let device = Held::default();
        let bindings = VirtualKeyTable::new();
        let mut tracker = KeystateTracker::new();

        let mut pad = DigitalPad::default();
        pad[GAMEPAD_A as usize] = true;
        pad[GAMEPAD_AXIS_RIGHT as usize] = true;
        let transitions = tracker.update_pad(1, Some(pad));
        assert_eq!(transitions.len(), 2);
        assert!(transitions.contains(&(gamepad(GAMEPAD_A, 1), true)));

        assert!(tracker.update_pad(1, Some(pad)).is_empty());
        let any_a = KeyRef::Physical(Key::any_gamepad(GAMEPAD_A));
        assert!(tracker.pressed(&device, &bindings, &any_a, Modifiers::NONE));
        assert!(!tracker.pressed(&device, &bindings, &KeyRef::Physical(gamepad(GAMEPAD_A, 0)), Modifiers::NONE));

        let released = tracker.update_pad(1, None);
        assert_eq!(released.len(), 2);
        assert!(released.iter().all(|(_, pressed)| !pressed));
        assert!(!tracker.pressed(&device, &bindings, &any_a, Modifiers::NONE));
    }

    #[test]
    fn any_joystick_query_finds_concrete_edges() {
        let device = Held::default();
        let bindings = VirtualKeyTable::new();
        let mut tracker = KeystateTracker::new();
        tracker.record_press(gamepad(GAMEPAD_A, 2));

        let any_a = KeyRef::Physical(Key::any_gamepad(GAMEPAD_A));
        assert!(tracker.triggered_once(&device, &bindings, &any_a, Modifiers::NONE, Scope::Frame));
        assert!(!tracker.triggered(&device, &bindings, &any_a, Modifiers::NONE, Scope::Frame));
    }
}
