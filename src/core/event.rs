//! Event codes that drive state transitions.
//!
//! An event code is a signed integer. Codes at or below zero are reserved
//! for the engine; applications define their own triggers as positive
//! integers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of the trigger that drives a transition lookup.
///
/// # Example
///
/// ```rust
/// use cadence::core::EventCode;
///
/// let start = EventCode::new(1);
/// assert!(!start.is_reserved());
/// assert!(EventCode::STAY.is_reserved());
/// assert_eq!(start.get(), 1);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCode(i32);

impl EventCode {
    /// No event has been produced yet.
    pub const VOID: EventCode = EventCode(i32::MIN);

    /// Drives the pseudo-start state into the initial state.
    pub const BEGIN: EventCode = EventCode(-10);

    /// Terminal marker.
    pub const END: EventCode = EventCode(-1);

    /// Re-run the current state's activity without changing state.
    pub const STAY: EventCode = EventCode(0);

    pub const fn new(code: i32) -> Self {
        EventCode(code)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    /// Codes at or below zero belong to the engine.
    pub const fn is_reserved(self) -> bool {
        self.0 <= 0
    }
}

impl From<i32> for EventCode {
    fn from(code: i32) -> Self {
        EventCode(code)
    }
}

impl From<EventCode> for i32 {
    fn from(event: EventCode) -> Self {
        event.0
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for EventCode {
    fn default() -> Self {
        Self::VOID
    }
}

/// Human readable names for event codes, used when rendering log lines.
///
/// The reserved codes are registered on construction.
///
/// # Example
///
/// ```rust
/// use cadence::core::{EventCatalog, EventCode};
///
/// let catalog = EventCatalog::new().with(EventCode::new(1), "start");
///
/// assert_eq!(catalog.describe(EventCode::new(1)), "start : 1");
/// assert_eq!(catalog.describe(EventCode::STAY), "stay : 0");
/// assert_eq!(catalog.describe(EventCode::new(7)), "7 is undefined");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventCatalog {
    names: HashMap<EventCode, String>,
}

impl EventCatalog {
    pub fn new() -> Self {
        let mut names = HashMap::new();
        names.insert(EventCode::VOID, "void".to_string());
        names.insert(EventCode::BEGIN, "begin".to_string());
        names.insert(EventCode::END, "terminate".to_string());
        names.insert(EventCode::STAY, "stay".to_string());
        Self { names }
    }

    /// Register (or rename) an event, returning the catalog.
    pub fn with(mut self, event: EventCode, name: impl Into<String>) -> Self {
        self.insert(event, name);
        self
    }

    pub fn insert(&mut self, event: EventCode, name: impl Into<String>) {
        self.names.insert(event, name.into());
    }

    pub fn name(&self, event: EventCode) -> Option<&str> {
        self.names.get(&event).map(String::as_str)
    }

    pub fn describe(&self, event: EventCode) -> String {
        match self.name(event) {
            Some(name) => format!("{name} : {event}"),
            None => format!("{event} is undefined"),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new()
    }
}
