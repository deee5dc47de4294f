//! Results of driving the machine one event at a time.

use crate::core::{EventCode, StateLabel};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a transition could not be resolved.
///
/// None of these unwind out of the machine; they surface as
/// [`StopReason::Faulted`].
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TransitionError {
    #[error("no transition from '{state}' for event {event}")]
    NoTransition { state: StateLabel, event: EventCode },

    #[error("transition target from '{state}' for event {event} has expired")]
    ExpiredTarget { state: StateLabel, event: EventCode },

    #[error("state machine has no current state")]
    NoCurrentState,

    #[error("initial state was not set before the first event")]
    NoInitialState,

    #[error("pseudo-stop state has no successor")]
    Terminal,
}

/// Why the machine (or a `run` loop) stopped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// A transition reached the pseudo-stop state.
    Terminated,

    /// A transition could not be resolved.
    Faulted(TransitionError),

    /// `run` hit the configured step limit. The machine itself is still
    /// running and can be driven further.
    StepLimit { steps: u64 },
}

impl StopReason {
    /// Clean shutdown through the pseudo-stop state.
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }

    pub fn fault(&self) -> Option<&TransitionError> {
        match self {
            Self::Faulted(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminated => f.write_str("reached pseudo-stop"),
            Self::Faulted(error) => write!(f, "faulted: {error}"),
            Self::StepLimit { steps } => write!(f, "step limit of {steps} reached"),
        }
    }
}

/// Result of one call to [`StateMachine::step`](super::StateMachine::step).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// The machine moved to a new state and ran its entry and activity.
    Transitioned(StateLabel),

    /// A `STAY` event re-ran the current state's activity.
    Stayed,

    /// A `VOID` event arrived; nothing happened.
    Idle,

    /// The machine is stopped. Every later step returns the same reason.
    Stopped(StopReason),
}

impl StepResult {
    /// Whether the driver should keep feeding events.
    pub fn is_running(&self) -> bool {
        !matches!(self, Self::Stopped(_))
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        match self {
            Self::Stopped(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Lifecycle of the engine itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Pseudo-start is current; no event has been processed.
    Constructed,
    /// A real state is current.
    Running,
    /// A transition returned the stop sentinel or failed.
    Stopped,
}
