//! Lifecycle trait implemented by every state body.
//!
//! A state's behavior is split into three hooks that the machine calls in a
//! fixed order on the driving thread: `exit` on the state being left, then
//! `entry` and `do_activity` on the state being entered. Transition lookup
//! is not the body's concern; the machine owns the table.

use super::event::EventCode;

/// Behavior of a state machine state.
///
/// All hooks default to no-ops, so a state only overrides what it needs.
/// Hooks receive the machine's context mutably; an activity usually blocks on
/// a [`Signal`](crate::sync::Signal) and then calls
/// [`Context::update`](crate::core::Context::update) to request the next
/// event.
///
/// States are `Send` so a fully wired machine can be moved onto its driver
/// thread.
///
/// # Example
///
/// ```rust
/// use cadence::core::{Context, EventCode, State};
///
/// struct Counter {
///     visits: usize,
///     next: EventCode,
/// }
///
/// impl Context for Counter {
///     fn update(&mut self, event: EventCode) -> bool {
///         self.next = event;
///         true
///     }
/// }
///
/// struct Busy;
///
/// impl State<Counter> for Busy {
///     fn entry(&mut self, ctx: &mut Counter) {
///         ctx.visits += 1;
///     }
///
///     fn do_activity(&mut self, ctx: &mut Counter) {
///         ctx.update(EventCode::new(2));
///     }
/// }
///
/// let mut ctx = Counter { visits: 0, next: EventCode::VOID };
/// let mut busy = Busy;
/// busy.entry(&mut ctx);
/// busy.do_activity(&mut ctx);
/// assert_eq!(ctx.visits, 1);
/// assert_eq!(ctx.next, EventCode::new(2));
/// ```
pub trait State<C>: Send {
    /// Invoked once each time the state becomes current.
    fn entry(&mut self, _ctx: &mut C) {}

    /// The state's main body. Runs right after `entry`, and again for every
    /// `STAY` event while the state is current.
    fn do_activity(&mut self, _ctx: &mut C) {}

    /// Invoked when an event asks the machine to leave this state, before the
    /// successor is resolved.
    fn exit(&mut self, _ctx: &mut C, _event: EventCode) {}
}

/// A state with no behavior of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Passive;

impl<C> State<C> for Passive {}
