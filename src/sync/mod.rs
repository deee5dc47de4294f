//! Cross-thread primitives used by state activities and driver loops.
//!
//! - [`Signal`]: blocking single-slot mailbox with timed wait and cancel
//! - [`Waiter`]: a state-owned signal that cancels itself on drop
//! - [`EventChannel`]: latest-value holder for the next event code
//!
//! The two primitives use separate locks and give no atomicity across each
//! other.

mod channel;
mod signal;

pub use channel::EventChannel;
pub use signal::{Signal, WaitCanceled, WaitOutcome, Waiter};
