use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use super::key::{DeviceClass, Key};

/// Modifier bitmask reported by the device alongside each transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(0x0001);
    pub const CONTROL: Modifiers = Modifiers(0x0002);
    pub const ALT: Modifiers = Modifiers(0x0004);
    pub const SUPER: Modifiers = Modifiers(0x0008);
    pub const CAPS_LOCK: Modifiers = Modifiers(0x0010);
    pub const NUM_LOCK: Modifiers = Modifiers(0x0020);

    pub const fn from_bits(bits: u32) -> Self {
        Modifiers(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True iff every bit of `required` is set in `self`.
    pub const fn contains(&self, required: Modifiers) -> bool {
        self.0 & required.0 == required.0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;

    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// One observed key transition, as handed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub physical_key: Key,
    pub virtual_key: Option<String>,
    pub modifiers: Modifiers,
}

impl InputEvent {
    pub fn new(physical_key: Key, virtual_key: Option<String>, modifiers: Modifiers) -> Self {
        Self {
            physical_key,
            virtual_key,
            modifiers,
        }
    }

    pub fn device_class(&self) -> DeviceClass {
        self.physical_key.device_class
    }
}

/// Predicate over an [`InputEvent`]. Unset fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFilter {
    device_class: Option<DeviceClass>,
    physical_key: Option<Key>,
    virtual_key: Option<String>,
    modifiers: Option<Modifiers>,
}

impl InputFilter {
    /// Filter that matches every event.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn device(mut self, device_class: DeviceClass) -> Self {
        self.device_class = Some(device_class);
        self
    }

    pub fn key(mut self, physical_key: Key) -> Self {
        self.physical_key = Some(physical_key);
        self
    }

    pub fn virtual_key(mut self, name: impl Into<String>) -> Self {
        self.virtual_key = Some(name.into());
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Short-circuit AND over device class, physical key, virtual key and
    /// modifier containment, in that order.
    ///
    /// A physical key with device id -1 matches that key on any joystick.
    pub fn matches(&self, event: &InputEvent) -> bool {
        if let Some(device_class) = self.device_class {
            if device_class != event.device_class() {
                return false;
            }
        }

        if let Some(physical_key) = &self.physical_key {
            if !physical_key.covers(&event.physical_key) {
                return false;
            }
        }

        if let Some(name) = &self.virtual_key {
            if event.virtual_key.as_deref() != Some(name.as_str()) {
                return false;
            }
        }

        match self.modifiers {
            Some(required) => event.modifiers.contains(required),
            None => true,
        }
    }
}
