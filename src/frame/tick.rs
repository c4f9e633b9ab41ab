//! Fixed-interval tick handler decoupled from the frame rate.
//!
//! Elapsed frame time is added to an accumulator; every whole interval in it
//! runs the handler once and is subtracted again, so the remainder carries
//! over to the next poll.

use tracing::{debug, warn};

use crate::controller::{InputDevice, KeystateTracker, Scope};
use crate::input::{KeyRef, Modifiers};
use crate::mapping::VirtualKeyTable;

pub type TickCallback = Box<dyn FnMut(&mut TickContext<'_>)>;

/// View of the input state handed to the tick handler.
///
/// `triggered` and `triggered_once` read the per-tick edge set: a press
/// counts once per tick, however many frames passed in between.
pub struct TickContext<'a> {
    device: &'a dyn InputDevice,
    tracker: &'a mut KeystateTracker,
    bindings: &'a VirtualKeyTable,
    tick: u64,
    interval_ms: u64,
}

impl<'a> TickContext<'a> {
    /// Zero-based number of this run since the driver was created.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn pressed(&self, key: impl Into<KeyRef>, modifiers: Modifiers) -> bool {
        self.tracker
            .pressed(self.device, self.bindings, &key.into(), modifiers)
    }

    pub fn triggered(&self, key: impl Into<KeyRef>, modifiers: Modifiers) -> bool {
        self.tracker
            .triggered(self.device, self.bindings, &key.into(), modifiers, Scope::Tick)
    }

    pub fn triggered_once(&mut self, key: impl Into<KeyRef>, modifiers: Modifiers) -> bool {
        self.tracker.triggered_once(
            self.device,
            self.bindings,
            &key.into(),
            modifiers,
            Scope::Tick,
        )
    }
}

/// Outcome of one [`TickScheduler::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub runs: u32,
    pub dropped: u64,
}

pub struct TickScheduler {
    interval_ms: u64,
    accumulator_ms: u64,
    callback: TickCallback,
}

impl TickScheduler {
    pub fn new(interval_ms: u64, callback: TickCallback) -> Self {
        let interval_ms = if interval_ms == 0 {
            warn!("Tick interval of 0 ms requested, using 1 ms");
            1
        } else {
            interval_ms
        };
        Self {
            interval_ms,
            accumulator_ms: 0,
            callback,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn accumulator_ms(&self) -> u64 {
        self.accumulator_ms
    }

    /// Adds `delta_ms` and runs the handler once per whole interval.
    ///
    /// With `max_runs` set, intervals beyond the cap are dropped and only the
    /// sub-interval remainder is kept.
    pub fn advance(
        &mut self,
        delta_ms: u64,
        max_runs: Option<u32>,
        device: &dyn InputDevice,
        tracker: &mut KeystateTracker,
        bindings: &VirtualKeyTable,
        tick_count: &mut u64,
    ) -> TickReport {
        self.accumulator_ms += delta_ms;
        let mut report = TickReport::default();

        while self.accumulator_ms >= self.interval_ms {
            if max_runs.is_some_and(|cap| report.runs >= cap) {
                report.dropped = self.accumulator_ms / self.interval_ms;
                self.accumulator_ms %= self.interval_ms;
                warn!(
                    "Tick handler fell behind, dropped {} ticks after {} runs",
                    report.dropped, report.runs
                );
                break;
            }

            let mut context = TickContext {
                device,
                tracker: &mut *tracker,
                bindings,
                tick: *tick_count,
                interval_ms: self.interval_ms,
            };
            (self.callback)(&mut context);

            self.accumulator_ms -= self.interval_ms;
            *tick_count += 1;
            tracker.end_tick();
            report.runs += 1;
        }

        if report.runs > 1 {
            debug!("Ran {} catch-up ticks in one poll", report.runs);
        }
        report
    }
}

impl std::fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickScheduler")
            .field("interval_ms", &self.interval_ms)
            .field("accumulator_ms", &self.accumulator_ms)
            .finish_non_exhaustive()
    }
}
