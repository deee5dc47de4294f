//! State transition history tracking.
//!
//! Every real transition the machine performs is recorded with the event
//! that caused it. The history is bounded so a machine driven forever (a
//! traffic light, say) does not grow without limit.

use super::event::EventCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Default number of transitions kept by a history.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Identity of a state: numeric id plus display name.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct StateLabel {
    pub id: u32,
    pub name: String,
}

impl StateLabel {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use cadence::core::{EventCode, StateLabel, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: StateLabel::new(1, "Idle"),
///     to: StateLabel::new(2, "Red"),
///     event: EventCode::new(1),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to.name, "Red");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being transitioned from
    pub from: StateLabel,
    /// The state being transitioned to
    pub to: StateLabel,
    /// The event that triggered the transition
    pub event: EventCode,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// `record` returns a new history with the transition appended; once the
/// limit is reached the oldest transition is dropped.
///
/// # Example
///
/// ```rust
/// use cadence::core::{EventCode, StateHistory, StateLabel, TransitionRecord};
/// use chrono::Utc;
///
/// let idle = StateLabel::new(1, "Idle");
/// let red = StateLabel::new(2, "Red");
///
/// let history = StateHistory::new().record(TransitionRecord {
///     from: idle.clone(),
///     to: red.clone(),
///     event: EventCode::new(1),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![&idle, &red]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: VecDeque<TransitionRecord>,
    limit: usize,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHistory {
    /// Create a new empty history holding up to [`DEFAULT_HISTORY_LIMIT`]
    /// transitions.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a new empty history holding up to `limit` transitions.
    /// A limit of zero disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit,
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut next = self.clone();
        next.push(transition);
        next
    }

    pub(crate) fn push(&mut self, transition: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        while self.transitions.len() >= self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained transition followed by
    /// the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&StateLabel> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the oldest and newest retained transitions.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: (u32, &str), to: (u32, &str), event: i32) -> TransitionRecord {
        TransitionRecord {
            from: StateLabel::new(from.0, from.1),
            to: StateLabel::new(to.0, to.1),
            event: EventCode::new(event),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(record((1, "Idle"), (2, "A"), 1));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = StateHistory::new()
            .record(record((1, "Idle"), (2, "A"), 1))
            .record(record((2, "A"), (3, "B"), 2));

        let names: Vec<&str> = history.get_path().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Idle", "A", "B"]);
    }

    #[test]
    fn limit_drops_oldest() {
        let history = StateHistory::with_limit(2)
            .record(record((1, "Idle"), (2, "A"), 1))
            .record(record((2, "A"), (3, "B"), 2))
            .record(record((3, "B"), (1, "Idle"), 3));

        assert_eq!(history.len(), 2);
        assert_eq!(history.get_path()[0].name, "A");
        assert_eq!(history.last().map(|r| r.event), Some(EventCode::new(3)));
    }

    #[test]
    fn zero_limit_records_nothing() {
        let history = StateHistory::with_limit(0).record(record((1, "Idle"), (2, "A"), 1));
        assert!(history.is_empty());
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = StateHistory::new().record(record((1, "Idle"), (2, "A"), 1));
        std::thread::sleep(Duration::from_millis(10));
        let history = history.record(record((2, "A"), (3, "B"), 2));

        let duration = history.duration();
        assert!(duration.unwrap() >= Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::with_limit(5).record(record((1, "Idle"), (2, "A"), 1));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.limit(), 5);
        assert_eq!(deserialized.last(), history.last());
    }

    #[test]
    fn label_displays_name_and_id() {
        assert_eq!(StateLabel::new(3, "Yellow").to_string(), "Yellow(3)");
    }
}
