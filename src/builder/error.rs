//! Errors raised while wiring a state machine.

use crate::validation::GraphViolation;
use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(id) before .build()")]
    MissingInitialState,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("The {role} state is not registered with this machine")]
    UnknownState { role: &'static str },

    #[error("The {role} state cannot be a pseudo-state")]
    PseudoState { role: &'static str },

    #[error("The initial state can only be set before the first event")]
    AlreadyStarted,

    #[error("No state with id {0}")]
    UnknownStateId(u32),

    #[error("State id {0} is registered twice")]
    DuplicateStateId(u32),

    #[error("Transition graph has {} violation(s)", .0.len())]
    InvalidGraph(Vec<GraphViolation>),
}
