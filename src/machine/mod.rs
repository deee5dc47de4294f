//! The state machine engine.
//!
//! States live in an arena owned by the [`StateMachine`]; transition tables
//! hold generational [`StateKey`]s into that arena. A graph with cycles
//! (Red → Green → Yellow → Red) therefore has a single owner, and an edge
//! whose target was removed reports itself as expired instead of dangling.
//!
//! # Key Concepts
//!
//! - **Pseudo-start**: current until the first event; hands over to the
//!   initial state whatever the event is
//! - **Pseudo-stop**: shared terminal target; reaching it stops the machine
//! - **Step**: exit hook → lookup → swap → entry → activity, in that order
//! - **Stop reasons**: clean termination and faults are told apart

mod engine;
mod node;
mod outcome;

pub use engine::StateMachine;
pub use node::{StateKey, StateNode};
pub use outcome::{Phase, StepResult, StopReason, TransitionError};
