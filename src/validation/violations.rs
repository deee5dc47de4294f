//! Problems a transition graph can have.

use crate::core::{EventCode, StateLabel};
use thiserror::Error;

/// A single defect found while validating a machine's transition graph.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphViolation {
    #[error("No initial state has been set")]
    MissingInitialState,

    #[error("State '{state}' uses reserved event {event} (only 'stay' may be registered)")]
    ReservedEvent { state: StateLabel, event: EventCode },

    #[error("Transition from '{state}' for event {event} points at a removed state")]
    DanglingTarget { state: StateLabel, event: EventCode },

    #[error("State '{state}' cannot be reached from the initial state")]
    Unreachable { state: StateLabel },

    #[error("State id {id} is used by more than one state")]
    DuplicateId { id: u32 },
}
