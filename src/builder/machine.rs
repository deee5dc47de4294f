//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::{EventCatalog, EventCode, Passive, State};
use crate::logging::SharedSink;
use crate::machine::{StateKey, StateMachine};
use std::collections::HashMap;

struct PendingState<C> {
    id: u32,
    name: String,
    behavior: Box<dyn State<C>>,
}

#[derive(Clone, Copy)]
enum Target {
    State(u32),
    Stop,
}

struct PendingTransition {
    from: u32,
    event: EventCode,
    to: Target,
}

/// Builder for constructing state machines with a fluent API.
///
/// States are referred to by their numeric id, so the whole graph can be
/// declared before any arena key exists. [`build`](Self::build) resolves
/// the ids, wires the machine and rejects graphs that fail
/// [validation](crate::validation).
///
/// # Example
///
/// ```rust
/// use cadence::builder::StateMachineBuilder;
/// use cadence::core::EventCode;
///
/// let mut machine = StateMachineBuilder::new(EventCode::VOID)
///     .passive(1, "Idle")
///     .passive(2, "Busy")
///     .transition(1, EventCode::new(1), 2)
///     .transition(2, EventCode::new(2), 1)
///     .stop_on(1, EventCode::new(9))
///     .initial(1)
///     .build()
///     .unwrap();
///
/// assert!(machine.on_any_event(EventCode::BEGIN));
/// assert!(machine.on_any_event(EventCode::new(1)));
/// assert_eq!(machine.name(), Some("Busy"));
/// ```
pub struct StateMachineBuilder<C> {
    context: C,
    states: Vec<PendingState<C>>,
    transitions: Vec<PendingTransition>,
    initial: Option<u32>,
    config: MachineConfig,
    sink: Option<SharedSink>,
    catalog: Option<EventCatalog>,
}

impl<C> StateMachineBuilder<C> {
    /// Create a new builder around the machine's context.
    pub fn new(context: C) -> Self {
        Self {
            context,
            states: Vec::new(),
            transitions: Vec::new(),
            initial: None,
            config: MachineConfig::default(),
            sink: None,
            catalog: None,
        }
    }

    /// Add a state with a behavior.
    pub fn state<S>(mut self, id: u32, name: impl Into<String>, behavior: S) -> Self
    where
        S: State<C> + 'static,
    {
        self.states.push(PendingState {
            id,
            name: name.into(),
            behavior: Box::new(behavior),
        });
        self
    }

    /// Add a state with no behavior.
    pub fn passive(self, id: u32, name: impl Into<String>) -> Self {
        self.state(id, name, Passive)
    }

    /// Add `from --event--> to`.
    pub fn transition(mut self, from: u32, event: EventCode, to: u32) -> Self {
        self.transitions.push(PendingTransition {
            from,
            event,
            to: Target::State(to),
        });
        self
    }

    /// Stop the machine when `from` sees `event`.
    pub fn stop_on(mut self, from: u32, event: EventCode) -> Self {
        self.transitions.push(PendingTransition {
            from,
            event,
            to: Target::Stop,
        });
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, id: u32) -> Self {
        self.initial = Some(id);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn catalog(mut self, catalog: EventCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Build the state machine.
    /// Returns an error if required fields are missing, an id is unknown or
    /// repeated, or the finished graph has violations.
    pub fn build(self) -> Result<StateMachine<C>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        let mut machine = StateMachine::with_config(self.context, self.config);
        if let Some(sink) = self.sink {
            machine = machine.with_sink(sink);
        }
        if let Some(catalog) = self.catalog {
            machine = machine.with_catalog(catalog);
        }

        let mut keys: HashMap<u32, StateKey> = HashMap::new();
        for state in self.states {
            if keys.contains_key(&state.id) {
                return Err(BuildError::DuplicateStateId(state.id));
            }
            let key = machine.add_boxed_state(state.id, state.name, state.behavior);
            keys.insert(state.id, key);
        }

        let resolve = |id: u32| keys.get(&id).copied().ok_or(BuildError::UnknownStateId(id));

        for transition in self.transitions {
            let from = resolve(transition.from)?;
            let to = match transition.to {
                Target::State(id) => resolve(id)?,
                Target::Stop => machine.stop_state(),
            };
            machine.add_transition(from, transition.event, to)?;
        }

        machine.initial(resolve(initial)?)?;

        let violations = machine.violations();
        if !violations.is_empty() {
            return Err(BuildError::InvalidGraph(violations));
        }

        Ok(machine)
    }
}
