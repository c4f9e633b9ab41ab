//! Controller subsystem: device seams and keystate tracking
//!
//! - [`device`] - `InputDevice`/`Clock` traits the platform layer implements
//! - [`axis`] - analog stick to digital button synthesis
//! - [`tracker`] - per-poll and per-tick edge sets, live queries
//! - [`scripted`] - deterministic device and clock for tests and replays
//!
//! # Architecture
//!
//! ```text
//! InputDevice ──► RawTransition ──┐
//!      │                          ├──► KeystateTracker ──► queries
//!      └──► JoystickSnapshot ─► axis::digital_state ─┘
//! ```

pub mod axis;
pub mod device;
#[cfg(feature = "gilrs-backend")]
pub mod gilrs_device;
pub mod scripted;
pub mod tracker;

pub use device::{Clock, ContextClaim, InputDevice, JoystickSnapshot, RawTransition, SteadyClock};
#[cfg(feature = "gilrs-backend")]
pub use gilrs_device::GilrsDevice;
pub use scripted::{ManualClock, ScriptedDevice};
pub use tracker::{KeystateTracker, Scope};
