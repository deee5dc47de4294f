//! Latest-value event channel between a producer and the driving thread.

use crate::core::{Context, EventCode};
use parking_lot::Mutex;

/// Lock-guarded holder of the current event code.
///
/// A producer thread writes the next trigger, the driver loop reads it and
/// feeds it to the machine. There is no queue: if the producer writes twice
/// before the driver reads, the first value is lost and the driver only sees
/// the latest one.
///
/// The channel is independent of any [`Signal`](super::Signal); holding one
/// lock says nothing about the other.
///
/// # Example
///
/// ```rust
/// use cadence::core::EventCode;
/// use cadence::sync::EventChannel;
///
/// let channel = EventChannel::new();
/// assert_eq!(channel.read(), EventCode::VOID);
///
/// channel.write(EventCode::new(1));
/// channel.write(EventCode::new(2));
/// assert_eq!(channel.read(), EventCode::new(2));
/// ```
#[derive(Debug)]
pub struct EventChannel {
    current: Mutex<EventCode>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::starting_at(EventCode::VOID)
    }

    pub fn starting_at(event: EventCode) -> Self {
        Self {
            current: Mutex::new(event),
        }
    }

    /// Replace the current event code.
    pub fn write(&self, event: EventCode) {
        *self.current.lock() = event;
        tracing::trace!(event = event.get(), "event written");
    }

    /// The last written event code.
    pub fn read(&self) -> EventCode {
        *self.current.lock()
    }

    /// Read the current code and reset the channel to `VOID`.
    pub fn take(&self) -> EventCode {
        std::mem::replace(&mut *self.current.lock(), EventCode::VOID)
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Context for EventChannel {
    fn update(&mut self, event: EventCode) -> bool {
        self.write(event);
        true
    }
}
