use serde::{Deserialize, Serialize};
use std::fmt;

/// Device id used for "any joystick" gamepad keys and for keyboard/mouse keys.
pub const ANY_DEVICE: i32 = -1;

// Device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Keyboard,
    Mouse,
    Gamepad,
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Keyboard => write!(f, "keyboard"),
            DeviceClass::Mouse => write!(f, "mouse"),
            DeviceClass::Gamepad => write!(f, "gamepad"),
        }
    }
}

/// Identity of one physical input source.
///
/// Equality and hashing are structural over all three fields. Codes are not
/// validated: a code no hardware reports is accepted and simply never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    pub device_class: DeviceClass,
    pub code: i32,
    #[serde(default = "any_device")]
    pub device_id: i32,
}

fn any_device() -> i32 {
    ANY_DEVICE
}

impl Key {
    pub const fn keyboard(code: i32) -> Self {
        Self {
            device_class: DeviceClass::Keyboard,
            code,
            device_id: ANY_DEVICE,
        }
    }

    pub const fn mouse(code: i32) -> Self {
        Self {
            device_class: DeviceClass::Mouse,
            code,
            device_id: ANY_DEVICE,
        }
    }

    /// Gamepad button on joystick `device_id`, or on any joystick for `-1`.
    pub const fn gamepad(code: i32, device_id: i32) -> Self {
        Self {
            device_class: DeviceClass::Gamepad,
            code,
            device_id,
        }
    }

    pub const fn any_gamepad(code: i32) -> Self {
        Self::gamepad(code, ANY_DEVICE)
    }

    pub fn is_any_device(&self) -> bool {
        self.device_id == ANY_DEVICE
    }

    /// Wildcard-aware match: same class and code, and either the same device
    /// or `self` addresses any device.
    pub fn covers(&self, other: &Key) -> bool {
        self.device_class == other.device_class
            && self.code == other.code
            && (self.device_id == other.device_id || self.is_any_device())
    }

    /// The same key with its device id widened to "any device".
    pub fn widened(&self) -> Key {
        Key {
            device_id: ANY_DEVICE,
            ..*self
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any_device() {
            write!(f, "{}:{}", self.device_class, self.code)
        } else {
            write!(f, "{}#{}:{}", self.device_class, self.device_id, self.code)
        }
    }
}

pub const fn key(code: i32) -> Key {
    Key::keyboard(code)
}

pub const fn mouse(code: i32) -> Key {
    Key::mouse(code)
}

pub const fn gamepad(code: i32, device_id: i32) -> Key {
    Key::gamepad(code, device_id)
}

/// A key reference as accepted by the query and binding APIs: either a
/// physical key or the name of a virtual key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyRef {
    Physical(Key),
    Virtual(String),
}

impl From<Key> for KeyRef {
    fn from(key: Key) -> Self {
        KeyRef::Physical(key)
    }
}

impl From<&Key> for KeyRef {
    fn from(key: &Key) -> Self {
        KeyRef::Physical(*key)
    }
}

impl From<&str> for KeyRef {
    fn from(name: &str) -> Self {
        KeyRef::Virtual(name.to_string())
    }
}

impl From<String> for KeyRef {
    fn from(name: String) -> Self {
        KeyRef::Virtual(name)
    }
}

impl From<&String> for KeyRef {
    fn from(name: &String) -> Self {
        KeyRef::Virtual(name.clone())
    }
}
