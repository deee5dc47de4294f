//! Core vocabulary of the engine.
//!
//! This module contains the types every other module speaks in:
//! - Event codes and their display names
//! - The `Context` capability states operate on
//! - The `State` lifecycle trait
//! - Bounded transition history

mod context;
mod event;
mod history;
mod state;

pub use context::Context;
pub use event::{EventCatalog, EventCode};
pub use history::{StateHistory, StateLabel, TransitionRecord, DEFAULT_HISTORY_LIMIT};
pub use state::{Passive, State};
