//! Input binding and keystate tracking for the engine's windowing layer.
//!
//! Physical keys from the keyboard, mouse and gamepads are mapped to virtual
//! key names, pressed/triggered state is tracked per frame and per fixed
//! tick, and transitions are fanned out to filtered subscribers.
//!
//! ```no_run
//! use keybinder::controller::{ScriptedDevice, SteadyClock};
//! use keybinder::input::{codes, key, Modifiers};
//! use keybinder::FrameDriver;
//!
//! let mut driver = FrameDriver::new(ScriptedDevice::new(), SteadyClock::new());
//! driver.bind(key(codes::KEY_SPACE), "jump");
//! driver.set_tick_handler(16, |tick| {
//!     if tick.triggered_once("jump", Modifiers::NONE) {
//!         // start the jump in the simulation step
//!     }
//! });
//!
//! loop {
//!     driver.poll();
//!     if driver.pressed("jump", Modifiers::NONE) {
//!         // draw the charge meter
//!     }
//! }
//! ```

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod input;
pub mod mapping;

pub use config::{ConfigError, InputSettings};
pub use dispatch::{EventBus, EventChannel, Placement, SubscriptionId};
pub use error::InputError;
pub use frame::{FrameDriver, TickContext};
pub use input::{gamepad, key, mouse, DeviceClass, InputEvent, InputFilter, Key, KeyRef, Modifiers};
pub use mapping::{BindingProfile, VirtualKeyTable};
