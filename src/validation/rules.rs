//! Graph checks, accumulated with `Validation`.

use crate::core::EventCode;
use crate::machine::{StateKey, StateMachine};
use crate::validation::violations::GraphViolation;
use std::collections::{HashMap, HashSet, VecDeque};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of validating a machine's graph.
pub type GraphValidation = Validation<(), NonEmptyVec<GraphViolation>>;

impl<C> StateMachine<C> {
    /// Check the transition graph, reporting every violation at once.
    ///
    /// The engine tolerates all of these at runtime (a dangling edge becomes
    /// a fault only when it is taken), so validation is advisory unless the
    /// graph is built through
    /// [`StateMachineBuilder`](crate::builder::StateMachineBuilder).
    pub fn validate(&self) -> GraphValidation {
        let mut checks: Vec<GraphValidation> = Vec::new();

        if self.initial_state().is_none() {
            checks.push(Validation::fail(GraphViolation::MissingInitialState));
        }

        let mut seen_ids: HashMap<u32, usize> = HashMap::new();
        for (_, node) in self.states().filter(|(_, n)| !n.is_pseudo()) {
            *seen_ids.entry(node.id()).or_default() += 1;

            for (event, to) in node.destinations() {
                if event.is_reserved() && event != EventCode::STAY {
                    checks.push(Validation::fail(GraphViolation::ReservedEvent {
                        state: node.label().clone(),
                        event,
                    }));
                }
                if !self.contains(to) {
                    checks.push(Validation::fail(GraphViolation::DanglingTarget {
                        state: node.label().clone(),
                        event,
                    }));
                }
            }
        }

        let mut duplicates: Vec<u32> = seen_ids
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect();
        duplicates.sort_unstable();
        for id in duplicates {
            checks.push(Validation::fail(GraphViolation::DuplicateId { id }));
        }

        if let Some(initial) = self.initial_state().filter(|k| self.contains(*k)) {
            let reached = reachable_from(self, initial);
            for (key, node) in self.states() {
                if !node.is_pseudo() && !reached.contains(&key) {
                    checks.push(Validation::fail(GraphViolation::Unreachable {
                        state: node.label().clone(),
                    }));
                }
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Every violation found by [`validate`](Self::validate), empty if the
    /// graph is sound.
    pub fn violations(&self) -> Vec<GraphViolation> {
        match self.validate() {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }
}

fn reachable_from<C>(machine: &StateMachine<C>, initial: StateKey) -> HashSet<StateKey> {
    let mut reached = HashSet::from([initial]);
    let mut queue = VecDeque::from([initial]);
    while let Some(key) = queue.pop_front() {
        let Some(node) = machine.node(key) else {
            continue;
        };
        for (_, to) in node.destinations() {
            if machine.contains(to) && reached.insert(to) {
                queue.push_back(to);
            }
        }
    }
    reached
}
