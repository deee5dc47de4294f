//! The capability a state needs from the object the machine drives.

use super::event::EventCode;

/// Application context mutated by states.
///
/// States receive `&mut C` in every lifecycle hook. The only capability the
/// engine itself relies on is `update`, through which an activity requests
/// the event the driver loop should feed on its next iteration. Everything
/// else (toggling outputs, talking to devices) is application-defined.
///
/// # Example
///
/// ```rust
/// use cadence::core::{Context, EventCode};
///
/// struct Lamp {
///     lit: bool,
///     next: EventCode,
/// }
///
/// impl Context for Lamp {
///     fn update(&mut self, event: EventCode) -> bool {
///         self.next = event;
///         true
///     }
/// }
///
/// let mut lamp = Lamp { lit: false, next: EventCode::VOID };
/// assert!(lamp.update(EventCode::new(2)));
/// assert_eq!(lamp.next, EventCode::new(2));
/// # let _ = lamp.lit;
/// ```
pub trait Context {
    /// Accept a new event code. Returns `false` if the context refused it.
    fn update(&mut self, event: EventCode) -> bool;
}

impl Context for EventCode {
    fn update(&mut self, event: EventCode) -> bool {
        *self = event;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_event_code_is_a_context() {
        let mut slot = EventCode::VOID;
        assert!(slot.update(EventCode::new(5)));
        assert_eq!(slot, EventCode::new(5));
    }
}
