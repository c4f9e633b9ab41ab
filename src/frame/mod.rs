//! Frame driver: the once-per-frame entry point of the input core.

pub mod driver;
pub mod fps;
pub mod tick;

pub use driver::FrameDriver;
pub use fps::FpsCounter;
pub use tick::{TickContext, TickReport, TickScheduler};
