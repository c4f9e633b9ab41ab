//! Input vocabulary shared by every other module
//!
//! - [`key`] - physical key identity and the `KeyRef` query type
//! - [`event`] - modifier masks, input events and filters
//! - [`codes`] - named keyboard, mouse and gamepad codes

pub mod codes;
pub mod event;
pub mod key;

pub use event::{InputEvent, InputFilter, Modifiers};
pub use key::{gamepad, key, mouse, DeviceClass, Key, KeyRef, ANY_DEVICE};
