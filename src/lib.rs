//! Cadence: an event-driven finite state machine runtime
//!
//! A machine owns an arena of states, each with `entry`, `do_activity` and
//! `exit` hooks, and a per-state table mapping integer event codes to
//! successor states. A driver feeds events one at a time; activities that
//! need to wait block on a cancellable [`Signal`](sync::Signal) and report
//! the next event through the machine's [`Context`](core::Context).
//!
//! # Core Concepts
//!
//! - **Events**: `i32` codes; zero and below are reserved for the machine
//! - **Pseudo-states**: a start sentinel that hands over to the initial
//!   state, and a stop sentinel that ends the run
//! - **Expired transitions**: edges hold generational keys, so removing a
//!   state turns edges into it into a reported fault rather than a dangling
//!   reference
//! - **Stop reasons**: clean termination and faults are told apart
//!
//! # Example
//!
//! ```rust
//! use cadence::core::EventCode;
//! use cadence::machine::{StateMachine, StepResult, StopReason};
//!
//! let mut machine = StateMachine::new(EventCode::VOID);
//! let idle = machine.add_passive_state(1, "Idle");
//! let busy = machine.add_passive_state(2, "Busy");
//! let stop = machine.stop_state();
//!
//! machine.add_transition(idle, EventCode::new(1), busy).unwrap();
//! machine.add_transition(busy, EventCode::new(2), idle).unwrap();
//! machine.add_transition(idle, EventCode::new(4), stop).unwrap();
//! machine.initial(idle).unwrap();
//!
//! assert!(machine.on_any_event(EventCode::BEGIN));
//! assert!(machine.on_any_event(EventCode::new(1)));
//! assert_eq!(machine.name(), Some("Busy"));
//!
//! machine.on_any_event(EventCode::new(2));
//! let result = machine.step(EventCode::new(4));
//! assert_eq!(result, StepResult::Stopped(StopReason::Terminated));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod logging;
pub mod machine;
pub mod snapshot;
pub mod sync;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use config::MachineConfig;
pub use self::core::{Context, EventCatalog, EventCode, Passive, State, StateHistory, StateLabel};
pub use machine::{Phase, StateKey, StateMachine, StepResult, StopReason, TransitionError};
pub use snapshot::MachineSnapshot;
pub use sync::{EventChannel, Signal, WaitOutcome, Waiter};
