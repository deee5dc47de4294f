//! Point-in-time snapshots of a running machine.
//!
//! A snapshot records where a machine is and how it got there: the current
//! and initial states, the stop reason and the transition history. State
//! behaviors and the context are not part of it, so a snapshot is a report
//! for logs, dashboards and post-mortems rather than a resume point.

use crate::core::{StateHistory, StateLabel};
use crate::machine::{Phase, StateMachine, StopReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable view of a machine at one instant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Identifier of the machine instance that produced it
    pub run_id: Uuid,

    /// Configured machine name
    pub machine: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    pub phase: Phase,

    /// Current state; `None` before the first event or if it was removed
    pub current: Option<StateLabel>,

    pub initial: Option<StateLabel>,

    pub stop_reason: Option<StopReason>,

    /// Recorded transitions, oldest first
    pub history: StateHistory,

    /// Number of real (non-pseudo) states in the arena
    pub state_count: usize,
}

impl MachineSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Parse a snapshot, rejecting any format version other than the
    /// current one.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        Ok(snapshot)
    }
}

impl<C> StateMachine<C> {
    /// Capture the machine's position and history.
    pub fn snapshot(&self) -> MachineSnapshot {
        let current = match self.phase() {
            Phase::Constructed => None,
            _ => self.current_label().cloned(),
        };

        MachineSnapshot {
            version: SNAPSHOT_VERSION,
            run_id: self.run_id(),
            machine: self.config().name.clone(),
            taken_at: Utc::now(),
            phase: self.phase(),
            current,
            initial: self
                .initial_state()
                .and_then(|key| self.label(key))
                .cloned(),
            stop_reason: self.stop_reason().cloned(),
            history: self.history().clone(),
            state_count: self.state_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventCode;
    use crate::logging::MemorySink;

    fn lamp() -> StateMachine<EventCode> {
        let mut machine = StateMachine::new(EventCode::VOID).with_sink(MemorySink::shared());
        let off = machine.add_passive_state(1, "Off");
        let on = machine.add_passive_state(2, "On");
        let stop = machine.stop_state();
        machine.add_transition(off, EventCode::new(1), on).unwrap();
        machine.add_transition(on, EventCode::new(2), off).unwrap();
        machine.add_transition(off, EventCode::new(9), stop).unwrap();
        machine.initial(off).unwrap();
        machine
    }

    #[test]
    fn fresh_machine_has_no_current_state() {
        let snapshot = lamp().snapshot();

        assert_eq!(snapshot.phase, Phase::Constructed);
        assert!(snapshot.current.is_none());
        assert_eq!(snapshot.initial.as_ref().map(|l| l.name.as_str()), Some("Off"));
        assert_eq!(snapshot.state_count, 2);
        assert!(snapshot.history.is_empty());
    }

    #[test]
    fn snapshot_tracks_progress() {
        let mut machine = lamp();
        machine.step(EventCode::BEGIN);
        machine.step(EventCode::new(1));

        let snapshot = machine.snapshot();

        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.current.as_ref().map(|l| l.id), Some(2));
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.run_id, machine.run_id());
    }

    #[test]
    fn stopped_machine_records_reason() {
        let mut machine = lamp();
        machine.step(EventCode::BEGIN);
        machine.step(EventCode::new(9));

        let snapshot = machine.snapshot();

        assert_eq!(snapshot.phase, Phase::Stopped);
        assert_eq!(snapshot.stop_reason, Some(StopReason::Terminated));
    }

    #[test]
    fn json_round_trip_preserves_history() {
        let mut machine = lamp();
        machine.step(EventCode::BEGIN);
        machine.step(EventCode::new(1));
        machine.step(EventCode::new(2));

        let json = machine.snapshot().to_json().unwrap();
        let restored = MachineSnapshot::from_json(&json).unwrap();

        let path: Vec<u32> = restored.history.get_path().iter().map(|l| l.id).collect();
        assert_eq!(path, vec![0, 1, 2, 1]);
        assert_eq!(restored.machine, machine.config().name);
    }

    #[test]
    fn newer_version_is_rejected() {
        let mut snapshot = lamp().snapshot();
        snapshot.version = SNAPSHOT_VERSION + 1;
        let json = snapshot.to_json().unwrap();

        let result = MachineSnapshot::from_json(&json);

        assert!(matches!(
            result,
            Err(SnapshotError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn garbage_is_a_deserialization_error() {
        let result = MachineSnapshot::from_json("not json");
        assert!(matches!(
            result,
            Err(SnapshotError::DeserializationFailed(_))
        ));
    }
}
