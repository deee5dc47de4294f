//! Single-slot blocking signal with timed wait and cancellation.

use crate::logging::{default_sink, Severity, SharedSink};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const ORIGIN: &str = "signal";

/// Result of a wait on a [`Signal`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WaitOutcome {
    /// A value was posted with [`Signal::update`].
    Value(i64),
    /// The deadline passed with nothing posted.
    TimedOut,
    /// The wait was interrupted by [`Signal::cancel`].
    Canceled,
}

impl WaitOutcome {
    pub fn value(self) -> Option<i64> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_canceled(self) -> bool {
        matches!(self, Self::Canceled)
    }

    pub fn is_timed_out(self) -> bool {
        matches!(self, Self::TimedOut)
    }

    /// `Ok(Some(v))` for a value, `Ok(None)` for a timeout, `Err` for a
    /// cancellation.
    pub fn into_result(self) -> Result<Option<i64>, WaitCanceled> {
        match self {
            Self::Value(v) => Ok(Some(v)),
            Self::TimedOut => Ok(None),
            Self::Canceled => Err(WaitCanceled),
        }
    }
}

/// A wait ended because someone canceled it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("wait on signal was canceled")]
pub struct WaitCanceled;

#[derive(Default)]
struct Slot {
    updated: bool,
    canceled: bool,
    value: i64,
}

impl Slot {
    fn ready(&self) -> bool {
        self.updated || self.canceled
    }

    /// Consume whichever flag is set. Cancellation wins over a pending value
    /// and leaves that value pending for the next wait.
    fn take(&mut self) -> Option<WaitOutcome> {
        if self.canceled {
            self.canceled = false;
            Some(WaitOutcome::Canceled)
        } else if self.updated {
            self.updated = false;
            Some(WaitOutcome::Value(self.value))
        } else {
            None
        }
    }
}

/// Blocking single-slot mailbox shared between one producer and one consumer.
///
/// A producer posts a value with [`update`](Self::update) or interrupts the
/// consumer with [`cancel`](Self::cancel). The consumer blocks in
/// [`wait_update`](Self::wait_update) or [`wait_for`](Self::wait_for).
///
/// This is not a queue. A second `update` before the consumer wakes
/// overwrites the first, and several concurrent waiters all wake but only
/// one of them consumes the value. A cancel is sticky: if nobody is waiting
/// it stays pending and the next wait returns [`WaitOutcome::Canceled`].
///
/// # Example
///
/// ```rust
/// use cadence::sync::{Signal, WaitOutcome};
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let signal = Arc::new(Signal::new());
/// let producer = Arc::clone(&signal);
///
/// let handle = thread::spawn(move || producer.update(7));
///
/// assert_eq!(signal.wait_update(), WaitOutcome::Value(7));
/// handle.join().unwrap();
///
/// assert_eq!(signal.wait_for(Duration::ZERO), WaitOutcome::TimedOut);
/// ```
pub struct Signal {
    slot: Mutex<Slot>,
    monitor: Condvar,
    sink: SharedSink,
}

impl Signal {
    pub fn new() -> Self {
        Self::with_sink(default_sink())
    }

    pub fn with_sink(sink: SharedSink) -> Self {
        Self {
            slot: Mutex::new(Slot::default()),
            monitor: Condvar::new(),
            sink,
        }
    }

    /// Post a value and wake every waiter.
    pub fn update(&self, value: i64) {
        let mut slot = self.slot.lock();
        slot.updated = true;
        slot.value = value;
        self.monitor.notify_all();
    }

    /// Block until a value is posted or the wait is canceled.
    ///
    /// Never returns [`WaitOutcome::TimedOut`].
    pub fn wait_update(&self) -> WaitOutcome {
        let outcome = {
            let mut slot = self.slot.lock();
            loop {
                if let Some(outcome) = slot.take() {
                    break outcome;
                }
                self.monitor.wait(&mut slot);
            }
        };
        self.trace(outcome);
        outcome
    }

    /// Block until a value is posted, the wait is canceled, or `timeout`
    /// elapses.
    pub fn wait_for(&self, timeout: Duration) -> WaitOutcome {
        let outcome = {
            let mut slot = self.slot.lock();
            if !slot.ready() {
                self.monitor
                    .wait_while_for(&mut slot, |s| !s.ready(), timeout);
            }
            slot.take().unwrap_or(WaitOutcome::TimedOut)
        };
        self.trace(outcome);
        outcome
    }

    /// Interrupt the current or next wait. Idempotent.
    pub fn cancel(&self) {
        {
            let mut slot = self.slot.lock();
            slot.canceled = true;
            self.monitor.notify_all();
        }
        self.sink.emit(Severity::Debug, ORIGIN, "cancel requested");
    }

    /// Drop any pending value or cancellation without waking anyone.
    pub fn clear(&self) {
        let mut slot = self.slot.lock();
        slot.updated = false;
        slot.canceled = false;
    }

    /// Whether a value or cancellation is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.slot.lock().ready()
    }

    fn trace(&self, outcome: WaitOutcome) {
        match outcome {
            WaitOutcome::Canceled => self.sink.emit(Severity::Debug, ORIGIN, "wait canceled"),
            WaitOutcome::TimedOut => self.sink.emit(Severity::Debug, ORIGIN, "wait timed out"),
            WaitOutcome::Value(_) => {}
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("Signal")
            .field("updated", &slot.updated)
            .field("canceled", &slot.canceled)
            .field("value", &slot.value)
            .finish()
    }
}

/// A [`Signal`] owned by a state, canceled when the owner is dropped.
///
/// Producers get a shared handle through [`handle`](Self::handle). Dropping
/// the waiter (usually because its state was removed from the machine or the
/// machine itself was dropped) cancels the signal, which releases any thread
/// still blocked on it.
///
/// # Example
///
/// ```rust
/// use cadence::sync::{WaitOutcome, Waiter};
/// use std::thread;
/// use std::time::Duration;
///
/// let waiter = Waiter::new();
/// let signal = waiter.handle();
///
/// let blocked = thread::spawn(move || signal.wait_for(Duration::from_secs(30)));
/// thread::sleep(Duration::from_millis(20));
/// drop(waiter);
///
/// assert_eq!(blocked.join().unwrap(), WaitOutcome::Canceled);
/// ```
#[derive(Debug, Default)]
pub struct Waiter {
    signal: Arc<Signal>,
}

impl Waiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: SharedSink) -> Self {
        Self {
            signal: Arc::new(Signal::with_sink(sink)),
        }
    }

    /// A producer handle for posting values or canceling from other threads.
    pub fn handle(&self) -> Arc<Signal> {
        Arc::clone(&self.signal)
    }
}

impl Deref for Waiter {
    type Target = Signal;

    fn deref(&self) -> &Signal {
        &self.signal
    }
}

impl Drop for Waiter {
    fn drop(&mut self) {
        self.signal.cancel();
    }
}
