//! Seams to the platform layer: the device feed and the steady clock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::InputError;
use crate::input::{Key, Modifiers};

/// One raw key transition reported by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTransition {
    pub key: Key,
    pub pressed: bool,
}

impl RawTransition {
    pub fn pressed(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn released(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Raw state of one joystick as read this poll.
///
/// At most [`GAMEPAD_MAX_AXES`](crate::input::codes::GAMEPAD_MAX_AXES) axes
/// and [`GAMEPAD_RAW_BUTTONS`](crate::input::codes::GAMEPAD_RAW_BUTTONS)
/// buttons are read; extra entries are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoystickSnapshot {
    pub axes: Vec<f32>,
    pub buttons: Vec<bool>,
}

impl JoystickSnapshot {
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }
}

/// Input capability handed to the frame driver at construction.
pub trait InputDevice {
    /// Appends every keyboard/mouse transition observed since the last call.
    /// Gamepad transitions are ignored by the driver; report pads through
    /// [`joystick`](Self::joystick) instead.
    fn poll_transitions(&mut self, out: &mut Vec<RawTransition>);

    /// Live "is this key held right now" query.
    fn is_down(&self, key: &Key) -> bool;

    /// Modifier mask currently held.
    fn modifiers(&self) -> Modifiers {
        Modifiers::NONE
    }

    /// Number of joystick slots the driver should read each poll.
    fn joystick_slots(&self) -> usize {
        0
    }

    /// Raw state of joystick `index`, `None` when nothing is connected there.
    fn joystick(&self, _index: usize) -> Option<JoystickSnapshot> {
        None
    }
}

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy)]
pub struct SteadyClock {
    origin: Instant,
}

impl SteadyClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SteadyClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SteadyClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

static CONTEXT_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Proof that the holder owns the single platform device context.
///
/// Backends that talk to process-wide platform state acquire one at
/// construction; the claim is released on drop.
#[derive(Debug)]
pub struct ContextClaim {
    _private: (),
}

impl ContextClaim {
    pub fn acquire() -> Result<Self, InputError> {
        match CONTEXT_ACTIVE.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => {
                debug!("Device context claimed");
                Ok(Self { _private: () })
            }
            Err(_) => {
                warn!("Refusing second device context");
                Err(InputError::ContextAlreadyActive)
            }
        }
    }
}

impl Drop for ContextClaim {
    fn drop(&mut self) {
        CONTEXT_ACTIVE.store(false, Ordering::Release);
        debug!("Device context released");
    }
}
