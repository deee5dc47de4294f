//! Injected logging capability.
//!
//! Machines and signals do not reach for a global logger. They hold a
//! [`SharedSink`] handed to them at construction, which defaults to
//! [`TracingSink`]. Tests inject a [`MemorySink`] and assert on what was
//! emitted.
//!
//! # Example
//!
//! ```rust
//! use cadence::logging::{MemorySink, Severity, SharedSink};
//! use cadence::sync::Signal;
//!
//! let sink = MemorySink::shared();
//! let signal = Signal::with_sink(sink.clone() as SharedSink);
//! signal.cancel();
//!
//! assert!(sink.count(Severity::Debug) >= 1);
//! ```

mod sink;

pub use sink::{default_sink, LogRecord, LogSink, MemorySink, Severity, SharedSink, TracingSink};
