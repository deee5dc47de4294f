//! The state machine: arena, pseudo-states and the step function.

use super::node::{StateKey, StateNode};
use super::outcome::{Phase, StepResult, StopReason, TransitionError};
use crate::builder::BuildError;
use crate::config::MachineConfig;
use crate::core::{EventCatalog, EventCode, Passive, State, StateHistory, StateLabel, TransitionRecord};
use crate::logging::{default_sink, Severity, SharedSink};
use chrono::Utc;
use slotmap::SlotMap;
use uuid::Uuid;

/// Event-driven state machine over a context `C`.
///
/// The machine owns every state in an arena, the context the states operate
/// on, and two sentinels. Pseudo-start is current until the first event and
/// always hands over to the initial state, whatever event arrives. Pseudo-stop
/// is a shared terminal target: reaching it stops the machine without running
/// anything.
///
/// Each call to [`step`](Self::step) runs, on the calling thread and in this
/// order: the current state's exit hook, the transition lookup, the swap,
/// then `entry` and `do_activity` of the new state.
///
/// # Example
///
/// ```rust
/// use cadence::core::EventCode;
/// use cadence::machine::{StateMachine, StopReason};
///
/// let mut machine = StateMachine::new(EventCode::VOID);
/// let idle = machine.add_passive_state(1, "Idle");
/// let busy = machine.add_passive_state(2, "Busy");
/// let stop = machine.stop_state();
///
/// machine.add_transition(idle, EventCode::new(1), busy).unwrap();
/// machine.add_transition(busy, EventCode::new(2), stop).unwrap();
/// machine.initial(idle).unwrap();
///
/// assert!(machine.on_any_event(EventCode::new(99))); // lands on Idle
/// assert!(machine.on_any_event(EventCode::new(1))); // Idle -> Busy
/// assert!(!machine.on_any_event(EventCode::new(2))); // Busy -> stop
/// assert_eq!(machine.stop_reason(), Some(&StopReason::Terminated));
/// ```
pub struct StateMachine<C> {
    states: SlotMap<StateKey, StateNode<C>>,
    start: StateKey,
    stop: StateKey,
    current: StateKey,
    initial: Option<StateKey>,
    stopped: Option<StopReason>,
    context: C,
    history: StateHistory,
    catalog: EventCatalog,
    config: MachineConfig,
    sink: SharedSink,
    run_id: Uuid,
}

impl<C> StateMachine<C> {
    pub fn new(context: C) -> Self {
        Self::with_config(context, MachineConfig::default())
    }

    pub fn with_config(context: C, config: MachineConfig) -> Self {
        let mut states = SlotMap::with_key();
        let start = states.insert(StateNode::pseudo_start());
        let stop = states.insert(StateNode::pseudo_stop());
        Self {
            states,
            start,
            stop,
            current: start,
            initial: None,
            stopped: None,
            context,
            history: StateHistory::with_limit(config.history_limit),
            catalog: EventCatalog::new(),
            config,
            sink: default_sink(),
            run_id: Uuid::new_v4(),
        }
    }

    /// Replace the log sink.
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Use `catalog` to name events in log lines.
    pub fn with_catalog(mut self, catalog: EventCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Add a state to the arena. The machine holds its only strong
    /// reference.
    pub fn add_state<S>(&mut self, id: u32, name: impl Into<String>, behavior: S) -> StateKey
    where
        S: State<C> + 'static,
    {
        self.add_boxed_state(id, name, Box::new(behavior))
    }

    pub(crate) fn add_boxed_state(
        &mut self,
        id: u32,
        name: impl Into<String>,
        behavior: Box<dyn State<C>>,
    ) -> StateKey {
        let label = StateLabel::new(id, name);
        self.log(Severity::Debug, format!("add state {label}"));
        self.states.insert(StateNode::real(label, behavior))
    }

    /// Add a state with no behavior.
    pub fn add_passive_state(&mut self, id: u32, name: impl Into<String>) -> StateKey {
        self.add_state(id, name, Passive)
    }

    /// Drop a state. Transitions that pointed at it become expired.
    ///
    /// Returns `false` for pseudo-states and keys that are already gone.
    pub fn remove_state(&mut self, key: StateKey) -> bool {
        if key == self.start || key == self.stop {
            return false;
        }
        match self.states.remove(key) {
            Some(node) => {
                self.log(Severity::Debug, format!("removed state {}", node.label()));
                true
            }
            None => false,
        }
    }

    /// The pseudo-start sentinel, current until the first event.
    pub fn start_state(&self) -> StateKey {
        self.start
    }

    /// The shared pseudo-stop sentinel, for use as a transition target.
    pub fn stop_state(&self) -> StateKey {
        self.stop
    }

    /// Set the state pseudo-start hands over to.
    pub fn initial(&mut self, key: StateKey) -> Result<(), BuildError> {
        if self.phase() != Phase::Constructed {
            return Err(BuildError::AlreadyStarted);
        }
        self.require_real(key, "initial")?;
        self.initial = Some(key);
        Ok(())
    }

    /// Register `from --event--> to`.
    ///
    /// The table stores a key, not ownership: removing `to` later leaves the
    /// edge expired. Registering the same `(from, event)` twice keeps the
    /// last target.
    pub fn add_transition(
        &mut self,
        from: StateKey,
        event: EventCode,
        to: StateKey,
    ) -> Result<(), BuildError> {
        self.require_real(from, "source")?;
        if to == self.start {
            return Err(BuildError::PseudoState { role: "target" });
        }
        if !self.states.contains_key(to) {
            return Err(BuildError::UnknownState { role: "target" });
        }
        if self.phase() != Phase::Constructed {
            self.log(Severity::Warn, "transition added after the machine started");
        }

        let to_label = self.states[to].label().clone();
        let node = &mut self.states[from];
        let from_label = node.label().clone();
        if node.destination(event, to).is_some() {
            self.log(
                Severity::Debug,
                format!("overwrote transition {from_label} --{event}--> {to_label}"),
            );
        }
        Ok(())
    }

    /// Leave `key` on `event` and resolve its successor.
    ///
    /// Runs the state's exit hook first. The pseudo-start state ignores the
    /// event and returns the initial state; the pseudo-stop state has no
    /// successor. A missing or expired edge is logged as fatal.
    pub fn exit(&mut self, key: StateKey, event: EventCode) -> Result<StateKey, TransitionError> {
        let Some(node) = self.states.get_mut(key) else {
            self.log(Severity::Fatal, "=====> no current state");
            return Err(TransitionError::NoCurrentState);
        };

        match node.behavior_mut() {
            Some(behavior) => behavior.exit(&mut self.context, event),
            None if key == self.start => return self.resolve_initial(),
            None => {
                self.log(Severity::Info, "pseudo-stop has no successor");
                return Err(TransitionError::Terminal);
            }
        }

        let node = &self.states[key];
        let state = node.label().clone();
        match node.next(event) {
            Some(to) if self.states.contains_key(to) => Ok(to),
            Some(_) => {
                self.log(
                    Severity::Fatal,
                    format!(
                        "======> transition target from {state} for {} has expired",
                        self.catalog.describe(event)
                    ),
                );
                Err(TransitionError::ExpiredTarget { state, event })
            }
            None => {
                self.log(
                    Severity::Fatal,
                    format!(
                        "=====> no transition from {state} for {}",
                        self.catalog.describe(event)
                    ),
                );
                Err(TransitionError::NoTransition { state, event })
            }
        }
    }

    /// Drive one event through the machine.
    pub fn step(&mut self, event: EventCode) -> StepResult {
        if let Some(reason) = &self.stopped {
            let line = format!("already stopped ({reason}); ignoring event {event}");
            let reason = reason.clone();
            self.log(Severity::Debug, line);
            return StepResult::Stopped(reason);
        }

        let from = self.current;
        let Some(node) = self.states.get(from) else {
            self.log(Severity::Fatal, "=====> no current state");
            return self.halt(StopReason::Faulted(TransitionError::NoCurrentState));
        };

        if !node.is_pseudo() {
            if event == EventCode::VOID {
                self.log(Severity::Debug, "no event yet");
                return StepResult::Idle;
            }
            if event == EventCode::STAY && node.next(EventCode::STAY).is_none() {
                self.activity(from);
                return StepResult::Stayed;
            }
        }

        let to = match self.exit(from, event) {
            Ok(to) => to,
            Err(error) => return self.halt(StopReason::Faulted(error)),
        };
        if to == self.stop {
            return self.halt(StopReason::Terminated);
        }

        let record = TransitionRecord {
            from: self.states[from].label().clone(),
            to: self.states[to].label().clone(),
            event,
            timestamp: Utc::now(),
        };
        let severity = if self.config.log_transitions {
            Severity::Info
        } else {
            Severity::Debug
        };
        self.log(
            severity,
            format!(
                "**change state** from {} to {} by event {}",
                record.from,
                record.to,
                self.catalog.describe(event)
            ),
        );
        let label = record.to.clone();
        self.history.push(record);
        self.current = to;

        if let Some(behavior) = self.states.get_mut(to).and_then(StateNode::behavior_mut) {
            behavior.entry(&mut self.context);
        }
        self.activity(to);
        StepResult::Transitioned(label)
    }

    /// Drive one event; `false` once the machine has stopped.
    pub fn on_any_event(&mut self, event: EventCode) -> bool {
        self.step(event).is_running()
    }

    /// Keep stepping with events pulled from the context until the machine
    /// stops or `config.max_steps` steps have been taken in this call.
    pub fn run<F>(&mut self, mut next_event: F) -> StopReason
    where
        F: FnMut(&mut C) -> EventCode,
    {
        let mut steps = 0_u64;
        loop {
            if let Some(limit) = self.config.max_steps {
                if steps >= limit {
                    self.log(Severity::Info, format!("run paused after {steps} steps"));
                    return StopReason::StepLimit { steps };
                }
            }
            let event = next_event(&mut self.context);
            steps += 1;
            if let StepResult::Stopped(reason) = self.step(event) {
                return reason;
            }
        }
    }

    pub fn phase(&self) -> Phase {
        if self.stopped.is_some() {
            Phase::Stopped
        } else if self.current == self.start {
            Phase::Constructed
        } else {
            Phase::Running
        }
    }

    /// Key of the current state, or `None` if it has been removed.
    pub fn current(&self) -> Option<StateKey> {
        self.states.contains_key(self.current).then_some(self.current)
    }

    pub fn current_label(&self) -> Option<&StateLabel> {
        self.states.get(self.current).map(StateNode::label)
    }

    /// Id of the current state (the pseudo-start's before the first event).
    pub fn id(&self) -> Option<u32> {
        self.current_label().map(|label| label.id)
    }

    /// Name of the current state (the pseudo-start's before the first event).
    pub fn name(&self) -> Option<&str> {
        self.current_label().map(|label| label.name.as_str())
    }

    pub fn initial_state(&self) -> Option<StateKey> {
        self.initial
    }

    pub fn label(&self, key: StateKey) -> Option<&StateLabel> {
        self.states.get(key).map(StateNode::label)
    }

    pub fn node(&self, key: StateKey) -> Option<&StateNode<C>> {
        self.states.get(key)
    }

    pub fn contains(&self, key: StateKey) -> bool {
        self.states.contains_key(key)
    }

    /// Every node in the arena, pseudo-states included.
    pub fn states(&self) -> impl Iterator<Item = (StateKey, &StateNode<C>)> {
        self.states.iter()
    }

    /// Number of real states.
    pub fn state_count(&self) -> usize {
        self.states.len() - 2
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stopped.as_ref()
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Unique id of this machine instance, for correlating logs and
    /// snapshots.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    fn resolve_initial(&mut self) -> Result<StateKey, TransitionError> {
        match self.initial {
            Some(initial) if self.states.contains_key(initial) => Ok(initial),
            Some(_) => {
                self.log(Severity::Fatal, "======> initial state has expired");
                Err(TransitionError::ExpiredTarget {
                    state: self.states[self.start].label().clone(),
                    event: EventCode::BEGIN,
                })
            }
            None => {
                self.log(Severity::Fatal, "=====> initial state was never set");
                Err(TransitionError::NoInitialState)
            }
        }
    }

    fn activity(&mut self, key: StateKey) {
        if let Some(behavior) = self.states.get_mut(key).and_then(StateNode::behavior_mut) {
            behavior.do_activity(&mut self.context);
        }
    }

    fn halt(&mut self, reason: StopReason) -> StepResult {
        self.log(Severity::Info, format!("=> machine stopped: {reason}"));
        self.stopped = Some(reason.clone());
        StepResult::Stopped(reason)
    }

    fn require_real(&self, key: StateKey, role: &'static str) -> Result<(), BuildError> {
        match self.states.get(key) {
            None => Err(BuildError::UnknownState { role }),
            Some(node) if node.is_pseudo() => Err(BuildError::PseudoState { role }),
            Some(_) => Ok(()),
        }
    }

    fn log(&self, severity: Severity, message: impl AsRef<str>) {
        self.sink.emit(severity, &self.config.name, message.as_ref());
    }
}
