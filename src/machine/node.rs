//! Arena nodes: a state's identity, behavior and outgoing transitions.

use crate::core::{EventCode, State, StateLabel};
use slotmap::new_key_type;
use std::collections::HashMap;
use std::fmt;

new_key_type! {
    /// Generational handle to a state in a machine's arena.
    ///
    /// Transition tables store keys, never the states themselves. Once a
    /// state is removed every key that named it stops resolving, even if the
    /// slot is later reused.
    pub struct StateKey;
}

pub(crate) const PSEUDO_START_ID: u32 = 0;
pub(crate) const PSEUDO_STOP_ID: u32 = 10_000;

enum Kind<C> {
    PseudoStart,
    PseudoStop,
    Real(Box<dyn State<C>>),
}

/// One state in the machine, together with its transition table.
pub struct StateNode<C> {
    label: StateLabel,
    kind: Kind<C>,
    destinations: HashMap<EventCode, StateKey>,
}

impl<C> StateNode<C> {
    pub(crate) fn real(label: StateLabel, behavior: Box<dyn State<C>>) -> Self {
        Self::with_kind(label, Kind::Real(behavior))
    }

    pub(crate) fn pseudo_start() -> Self {
        Self::with_kind(
            StateLabel::new(PSEUDO_START_ID, "pseudo-start"),
            Kind::PseudoStart,
        )
    }

    pub(crate) fn pseudo_stop() -> Self {
        Self::with_kind(
            StateLabel::new(PSEUDO_STOP_ID, "pseudo-stop"),
            Kind::PseudoStop,
        )
    }

    fn with_kind(label: StateLabel, kind: Kind<C>) -> Self {
        Self {
            label,
            kind,
            destinations: HashMap::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.label.id
    }

    pub fn name(&self) -> &str {
        &self.label.name
    }

    pub fn label(&self) -> &StateLabel {
        &self.label
    }

    /// Whether this is the machine's pseudo-start or pseudo-stop sentinel.
    pub fn is_pseudo(&self) -> bool {
        !matches!(self.kind, Kind::Real(_))
    }

    pub(crate) fn behavior_mut(&mut self) -> Option<&mut (dyn State<C> + 'static)> {
        match &mut self.kind {
            Kind::Real(behavior) => Some(behavior.as_mut()),
            _ => None,
        }
    }

    /// Register the successor for `event`, returning the one it replaced.
    pub(crate) fn destination(&mut self, event: EventCode, to: StateKey) -> Option<StateKey> {
        self.destinations.insert(event, to)
    }

    /// Raw table lookup. The returned key may no longer be live.
    pub fn next(&self, event: EventCode) -> Option<StateKey> {
        self.destinations.get(&event).copied()
    }

    /// All registered `(event, successor)` pairs, in no particular order.
    pub fn destinations(&self) -> impl Iterator<Item = (EventCode, StateKey)> + '_ {
        self.destinations.iter().map(|(event, key)| (*event, *key))
    }

    pub fn transition_count(&self) -> usize {
        self.destinations.len()
    }
}

impl<C> fmt::Debug for StateNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            Kind::PseudoStart => "pseudo-start",
            Kind::PseudoStop => "pseudo-stop",
            Kind::Real(_) => "real",
        };
        f.debug_struct("StateNode")
            .field("label", &self.label)
            .field("kind", &kind)
            .field("destinations", &self.destinations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Passive;
    use slotmap::SlotMap;

    fn node(id: u32, name: &str) -> StateNode<()> {
        StateNode::real(StateLabel::new(id, name), Box::new(Passive))
    }

    #[test]
    fn destination_last_write_wins() {
        let mut arena: SlotMap<StateKey, ()> = SlotMap::with_key();
        let a = arena.insert(());
        let b = arena.insert(());

        let mut idle = node(1, "Idle");
        assert_eq!(idle.destination(EventCode::new(1), a), None);
        assert_eq!(idle.destination(EventCode::new(1), b), Some(a));
        assert_eq!(idle.next(EventCode::new(1)), Some(b));
        assert_eq!(idle.transition_count(), 1);
    }

    #[test]
    fn missing_event_is_a_miss() {
        let idle = node(1, "Idle");
        assert_eq!(idle.next(EventCode::new(9)), None);
    }

    #[test]
    fn pseudo_states_are_flagged() {
        assert!(StateNode::<()>::pseudo_start().is_pseudo());
        assert!(StateNode::<()>::pseudo_stop().is_pseudo());
        assert!(!node(1, "Idle").is_pseudo());
        assert_eq!(StateNode::<()>::pseudo_stop().id(), PSEUDO_STOP_ID);
    }

    #[test]
    fn only_real_states_have_behavior() {
        let mut idle = node(1, "Idle");
        assert!(idle.behavior_mut().is_some());
        assert!(StateNode::<()>::pseudo_start().behavior_mut().is_none());
    }

    #[test]
    fn removed_key_does_not_resolve() {
        let mut arena: SlotMap<StateKey, u32> = SlotMap::with_key();
        let old = arena.insert(1);
        arena.remove(old);
        let reused = arena.insert(2);

        assert!(!arena.contains_key(old));
        assert!(arena.contains_key(reused));
    }
}
