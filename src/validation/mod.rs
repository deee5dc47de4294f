//! Validation of transition graphs.
//!
//! The engine is lenient at setup time: it accepts duplicate ids, reserved
//! event codes and edges whose targets are later removed, and only reports a
//! problem when a bad edge is actually taken. [`StateMachine::validate`]
//! inspects the whole graph up front and, using Stillwater's `Validation`,
//! reports every violation in one pass instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use cadence::core::EventCode;
//! use cadence::machine::StateMachine;
//! use cadence::validation::GraphViolation;
//!
//! let mut machine = StateMachine::new(EventCode::VOID);
//! let idle = machine.add_passive_state(1, "Idle");
//! machine.add_transition(idle, EventCode::BEGIN, idle).unwrap();
//!
//! let violations = machine.violations();
//! assert_eq!(violations.len(), 2);
//! assert!(violations.contains(&GraphViolation::MissingInitialState));
//! ```
//!
//! [`StateMachine::validate`]: crate::machine::StateMachine::validate

pub mod rules;
pub mod violations;

pub use rules::GraphValidation;
pub use violations::GraphViolation;
