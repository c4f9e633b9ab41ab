//! Gamepad backend over `gilrs`.
//!
//! The collector is a two-state machine: `Initializing` owns the gilrs context
//! and the device claim, `Collecting` assigns connected pads to joystick slots
//! and serves them to the frame driver as [`JoystickSnapshot`]s.
//!
//! ```text
//! GilrsDevice<Initializing> ──initialize()──► GilrsDevice<Collecting>: InputDevice
//! ```

use chrono::Local;
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

use crate::controller::device::{ContextClaim, InputDevice, JoystickSnapshot, RawTransition};
use crate::error::InputError;
use crate::input::codes::GAMEPAD_RAW_BUTTONS;
use crate::input::Key;

/// Button order of the raw slots, indexed by gamepad code.
const BUTTON_LAYOUT: [Button; GAMEPAD_RAW_BUTTONS] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadRight,
    Button::DPadDown,
    Button::DPadLeft,
];

/// Axis order of the snapshot. Stick y values are flipped so that up is
/// negative.
const AXIS_LAYOUT: [(Axis, f32); 6] = [
    (Axis::LeftStickX, 1.0),
    (Axis::LeftStickY, -1.0),
    (Axis::RightStickX, 1.0),
    (Axis::RightStickY, -1.0),
    (Axis::LeftZ, 1.0),
    (Axis::RightZ, 1.0),
];

#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

#[machine]
pub struct GilrsDevice<S: CollectionState> {
    gilrs: Gilrs,

    // Joystick slot -> gilrs pad
    slots: Vec<Option<GamepadId>>,

    _claim: ContextClaim,
}

impl<S: CollectionState> GilrsDevice<S> {
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl GilrsDevice<Initializing> {
    pub fn create(slot_count: usize) -> Result<Self, InputError> {
        let claim = ContextClaim::acquire()?;

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(InputError::Device(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, vec![None; slot_count], claim))
    }

    /// Assigns the already connected pads to slots in enumeration order and
    /// starts collecting.
    pub fn initialize(mut self) -> GilrsDevice<Collecting> {
        let connected: Vec<(GamepadId, String)> = self
            .gilrs
            .gamepads()
            .map(|(id, gamepad)| (id, gamepad.name().to_string()))
            .collect();

        if connected.is_empty() {
            warn!("No gamepad connected, continuing in keyboard-only mode");
        } else {
            info!("Found {} gamepads:", connected.len());
        }

        for (id, name) in connected {
            match assign_slot(&mut self.slots, id) {
                Some(slot) => info!("  [{}] {} ({})", slot, name, id),
                None => warn!("  No free joystick slot for {} ({})", name, id),
            }
        }

        info!("Gilrs device initialized, transitioning to Collecting state");
        self.transition()
    }
}

impl GilrsDevice<Collecting> {
    fn gamepad(&self, index: usize) -> Option<Gamepad<'_>> {
        let id = (*self.slots.get(index)?)?;
        self.gilrs.connected_gamepad(id)
    }

    fn handle_event(&mut self, id: GamepadId, event: EventType) {
        let now = Local::now();
        match event {
            EventType::Connected => match assign_slot(&mut self.slots, id) {
                Some(slot) => info!("Gamepad {} connected in slot {}", id, slot),
                None => warn!("Gamepad {} connected but all slots are taken", id),
            },
            EventType::Disconnected => {
                for slot in self.slots.iter_mut() {
                    if *slot == Some(id) {
                        *slot = None;
                    }
                }
                warn!("Gamepad {} disconnected", id);
            }
            EventType::ButtonPressed(button, _) => {
                debug!(
                    "Button pressed: {:?} ({:?}) at {}",
                    button,
                    button_code(button),
                    now.format("%H:%M:%S.%3f")
                );
            }
            EventType::ButtonReleased(button, _) => {
                debug!(
                    "Button released: {:?} ({:?}) at {}",
                    button,
                    button_code(button),
                    now.format("%H:%M:%S.%3f")
                );
            }
            _ => {}
        }
    }
}

impl InputDevice for GilrsDevice<Collecting> {
    /// Pumps gilrs so pad state is current. Gamepad edges are derived from
    /// snapshots by the driver, so no transitions are reported here.
    fn poll_transitions(&mut self, _out: &mut Vec<RawTransition>) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            self.handle_event(id, event);
        }
    }

    fn is_down(&self, _key: &Key) -> bool {
        false
    }

    fn joystick_slots(&self) -> usize {
        self.slots.len()
    }

    fn joystick(&self, index: usize) -> Option<JoystickSnapshot> {
        let gamepad = self.gamepad(index)?;
        Some(JoystickSnapshot {
            axes: AXIS_LAYOUT
                .iter()
                .map(|(axis, sign)| gamepad.value(*axis) * sign)
                .collect(),
            buttons: BUTTON_LAYOUT
                .iter()
                .map(|button| gamepad.is_pressed(*button))
                .collect(),
        })
    }
}

fn assign_slot(slots: &mut [Option<GamepadId>], id: GamepadId) -> Option<usize> {
    if let Some(existing) = slots.iter().position(|slot| *slot == Some(id)) {
        return Some(existing);
    }
    let free = slots.iter().position(Option::is_none)?;
    slots[free] = Some(id);
    Some(free)
}

fn button_code(button: Button) -> Option<i32> {
    BUTTON_LAYOUT
        .iter()
        .position(|candidate| *candidate == button)
        .map(|index| index as i32)
}
