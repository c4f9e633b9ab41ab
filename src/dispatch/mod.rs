//! Filtered, ordered event fan-out.
//!
//! Each [`EventChannel`] holds its own subscriber list. Dispatch runs the
//! matching callbacks synchronously in list order on the calling thread.
//!
//! ```text
//! FrameDriver ──► EventBus::dispatch(KeyDown, &event)
//!                   │
//!                   ├─ [filter 1] ──► callback 1
//!                   ├─ [filter 2] ──► (skipped)
//!                   └─ [filter 3] ──► callback 3
//! ```
//!
//! The bus is mutably borrowed for the whole dispatch, so callbacks cannot
//! add or remove subscribers while it runs.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

use crate::input::{InputEvent, InputFilter};

/// Named event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventChannel {
    KeyDown,
    KeyUp,
}

impl EventChannel {
    pub const ALL: [EventChannel; 2] = [EventChannel::KeyDown, EventChannel::KeyUp];

    pub fn name(&self) -> &'static str {
        match self {
            EventChannel::KeyDown => "key_down",
            EventChannel::KeyUp => "key_up",
        }
    }

    fn index(&self) -> usize {
        match self {
            EventChannel::KeyDown => 0,
            EventChannel::KeyUp => 1,
        }
    }
}

impl fmt::Display for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("Unknown event channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for EventChannel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key_down" => Ok(EventChannel::KeyDown),
            "key_up" => Ok(EventChannel::KeyUp),
            other => Err(UnknownChannel(other.to_string())),
        }
    }
}

/// Where a new subscriber goes in its channel's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    Front,
    #[default]
    Back,
}

/// Opaque handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type EventCallback = Box<dyn FnMut(&InputEvent)>;

struct Subscriber {
    id: SubscriptionId,
    filter: InputFilter,
    callback: EventCallback,
}

#[derive(Default)]
pub struct EventBus {
    channels: [Vec<Subscriber>; 2],
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

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
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let subscriber = Subscriber {
            id,
            filter,
            callback: Box::new(callback),
        };
        let subscribers = &mut self.channels[channel.index()];
        match placement {
            Placement::Front => subscribers.insert(0, subscriber),
            Placement::Back => subscribers.push(subscriber),
        }
        debug!(
            "Subscribed {:?} to {} ({:?}), {} subscribers",
            id,
            channel,
            placement,
            subscribers.len()
        );
        id
    }

    /// Removes a subscription by identity. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for subscribers in &mut self.channels {
            if let Some(position) = subscribers.iter().position(|s| s.id == id) {
                subscribers.remove(position);
                debug!("Unsubscribed {:?}", id);
                return true;
            }
        }
        false
    }

    /// Invokes every subscriber of `channel` whose filter matches, in list
    /// order. Returns the number of callbacks run.
    pub fn dispatch(&mut self, channel: EventChannel, event: &InputEvent) -> usize {
        let mut invoked = 0;
        for subscriber in &mut self.channels[channel.index()] {
            if subscriber.filter.matches(event) {
                (subscriber.callback)(event);
                invoked += 1;
            }
        }
        trace!(
            "Dispatched {} for {} to {} subscribers",
            channel,
            event.physical_key,
            invoked
        );
        invoked
    }

    pub fn subscriber_count(&self, channel: EventChannel) -> usize {
        self.channels[channel.index()].len()
    }

    pub fn clear(&mut self) {
        for subscribers in &mut self.channels {
            subscribers.clear();
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("key_down", &self.subscriber_count(EventChannel::KeyDown))
            .field("key_up", &self.subscriber_count(EventChannel::KeyUp))
            .finish()
    }
}
