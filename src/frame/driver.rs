//! Per-frame orchestration of device polling, edge tracking and dispatch.
//!
//! # Poll cycle
//!
//! ```text
//! poll()
//!   1. clock delta
//!   2. clear per-poll edges
//!   3. keyboard/mouse transitions ──► tracker + key_down/key_up dispatch
//!   4. joystick snapshots ──► axis synthesis ──► same pipeline as 3.
//!   5. tick accumulator  ──► tick handler (per-tick edges cleared after each run)
//!   6. FPS window
//! ```
//!
//! Everything runs on the calling thread; the handler and every subscriber
//! have returned before `poll` does.

use tracing::{debug, info, trace, warn};

use crate::config::InputSettings;
use crate::controller::axis;
use crate::controller::{Clock, InputDevice, KeystateTracker, RawTransition, Scope};
use crate::dispatch::{EventBus, EventChannel, Placement, SubscriptionId};
use crate::error::InputError;
use crate::frame::fps::FpsCounter;
use crate::frame::tick::{TickContext, TickScheduler};
use crate::input::{DeviceClass, InputEvent, InputFilter, Key, KeyRef, Modifiers};
use crate::mapping::VirtualKeyTable;

pub struct FrameDriver<D: InputDevice, C: Clock> {
    device: D,
    clock: C,
    settings: InputSettings,

    tracker: KeystateTracker,
    bindings: VirtualKeyTable,
    events: EventBus,
    ticker: Option<TickScheduler>,
    fps: FpsCounter,

    last_poll_ms: u64,
    delta_ms: u64,
    frame_count: u64,
    tick_count: u64,

    // Reused transition buffer
    transitions: Vec<RawTransition>,
}

impl<D: InputDevice, C: Clock> FrameDriver<D, C> {
    pub fn new(device: D, clock: C) -> Self {
        Self::build(device, clock, InputSettings::default())
    }

    pub fn with_settings(device: D, clock: C, settings: InputSettings) -> Result<Self, InputError> {
        settings.validate()?;
        Ok(Self::build(device, clock, settings))
    }

    fn build(device: D, clock: C, settings: InputSettings) -> Self {
        info!("Creating frame driver with settings: {:?}", settings);
        let last_poll_ms = clock.now_ms();
        Self {
            device,
            clock,
            fps: FpsCounter::new(settings.fps_window_ms),
            settings,
            tracker: KeystateTracker::new(),
            bindings: VirtualKeyTable::new(),
            events: EventBus::new(),
            ticker: None,
            last_poll_ms,
            delta_ms: 0,
            frame_count: 0,
            tick_count: 0,
            transitions: Vec::new(),
        }
    }

    /// Runs one poll cycle. Call once per engine frame.
    pub fn poll(&mut self) {
        let now = self.clock.now_ms();
        let delta = now.saturating_sub(self.last_poll_ms);
        self.last_poll_ms = now;
        self.delta_ms = delta;
        trace!("Poll cycle {} (+{} ms)", self.frame_count, delta);

        self.tracker.begin_poll();

        let mut transitions = std::mem::take(&mut self.transitions);
        self.device.poll_transitions(&mut transitions);
        for transition in transitions.drain(..) {
            // Gamepad edges come from the joystick snapshots below
            if transition.key.device_class == DeviceClass::Gamepad {
                debug!("Ignoring raw gamepad transition for {}", transition.key);
                continue;
            }
            self.apply_transition(transition.key, transition.pressed);
        }
        self.transitions = transitions;

        self.poll_joysticks();

        if let Some(ticker) = self.ticker.as_mut() {
            ticker.advance(
                delta,
                self.settings.max_catch_up_ticks,
                &self.device,
                &mut self.tracker,
                &self.bindings,
                &mut self.tick_count,
            );
        }

        self.frame_count += 1;
        if let Some(fps) = self.fps.record_frame(delta) {
            debug!("FPS: {:.1} ({} ticks so far)", fps, self.tick_count);
        }
    }

    fn poll_joysticks(&mut self) {
        let slots = self
            .settings
            .joystick_slots
            .unwrap_or_else(|| self.device.joystick_slots());
        let deadzone = self.settings.axis_deadzone;

        for index in 0..slots {
            let state = self
                .device
                .joystick(index)
                .map(|snapshot| axis::digital_state(&snapshot, deadzone));
            for (key, pressed) in self.tracker.update_pad(index, state) {
                self.apply_transition(key, pressed);
            }
        }
    }

    fn apply_transition(&mut self, key: Key, pressed: bool) {
        let event = InputEvent::new(
            key,
            self.bindings.resolve(&key).map(str::to_string),
            self.device.modifiers(),
        );

        if pressed {
            debug!("Key down: {} ({:?})", key, event.virtual_key);
            self.tracker.record_press(key);
            self.events.dispatch(EventChannel::KeyDown, &event);
        } else {
            debug!("Key up: {} ({:?})", key, event.virtual_key);
            self.events.dispatch(EventChannel::KeyUp, &event);
        }
    }

    // Queries

    /// Whether `key` is held right now with at least `modifiers` active.
    pub fn pressed(&self, key: impl Into<KeyRef>, modifiers: Modifiers) -> bool {
        self.tracker
            .pressed(&self.device, &self.bindings, &key.into(), modifiers)
    }

    /// Whether `key` went down during the current poll cycle.
    pub fn triggered(&self, key: impl Into<KeyRef>, modifiers: Modifiers) -> bool {
        self.tracker.triggered(
            &self.device,
            &self.bindings,
            &key.into(),
            modifiers,
            Scope::Frame,
        )
    }

    /// Like [`triggered`](Self::triggered), but true at most once per edge.
    pub fn triggered_once(&mut self, key: impl Into<KeyRef>, modifiers: Modifiers) -> bool {
        self.tracker.triggered_once(
            &self.device,
            &self.bindings,
            &key.into(),
            modifiers,
            Scope::Frame,
        )
    }

    // Bindings

    pub fn bind(&mut self, physical: Key, name: impl Into<String>) -> bool {
        self.bindings.bind(physical, name)
    }

    /// Unbinds one physical key or every key of a virtual name.
    pub fn unbind(&mut self, key: impl Into<KeyRef>) -> bool {
        match key.into() {
            KeyRef::Physical(physical) => self.bindings.unbind_key(&physical),
            KeyRef::Virtual(name) => self.bindings.unbind_name(&name),
        }
    }

    pub fn resolve(&self, physical: &Key) -> Option<&str> {
        self.bindings.resolve(physical)
    }

    pub fn bindings(&self) -> &VirtualKeyTable {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut VirtualKeyTable {
        &mut self.bindings
    }

    // Events

    pub fn subscribe<F>(
        &mut self,
        channel: EventChannel,
        filter: InputFilter,
        placement: Placement,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&InputEvent) + 'static,
    {
        self.events.subscribe(channel, filter, placement, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    // Tick handler

    /// Installs the fixed-interval handler, replacing any previous one. The
    /// accumulator starts empty.
    pub fn set_tick_handler<F>(&mut self, interval_ms: u64, callback: F)
    where
        F: FnMut(&mut TickContext<'_>) + 'static,
    {
        info!("Registering tick handler every {} ms", interval_ms);
        self.ticker = Some(TickScheduler::new(interval_ms, Box::new(callback)));
    }

    /// Installs the handler with `tick_interval_ms` from the settings.
    /// Returns `false` when the settings carry no interval.
    pub fn set_tick_handler_from_settings<F>(&mut self, callback: F) -> bool
    where
        F: FnMut(&mut TickContext<'_>) + 'static,
    {
        match self.settings.tick_interval_ms {
            Some(interval_ms) => {
                self.set_tick_handler(interval_ms, callback);
                true
            }
            None => {
                warn!("No tick_interval_ms configured, tick handler not installed");
                false
            }
        }
    }

    pub fn clear_tick_handler(&mut self) {
        if self.ticker.take().is_some() {
            info!("Tick handler removed");
        }
    }

    /// Time banked towards the next tick, `None` without a handler.
    pub fn tick_accumulator_ms(&self) -> Option<u64> {
        self.ticker.as_ref().map(TickScheduler::accumulator_ms)
    }

    // Counters and collaborators

    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Clock time between the last two polls.
    pub fn delta_ms(&self) -> u64 {
        self.delta_ms
    }

    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

impl<D: InputDevice, C: Clock> std::fmt::Debug for FrameDriver<D, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDriver")
            .field("settings", &self.settings)
            .field("bindings", &self.bindings.len())
            .field("events", &self.events)
            .field("ticker", &self.ticker)
            .field("frame_count", &self.frame_count)
            .field("tick_count", &self.tick_count)
            .finish_non_exhaustive()
    }
}
