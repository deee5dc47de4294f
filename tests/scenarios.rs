//! End-to-end driver scenarios.
//!
//! Each test wires a machine the way an application would (context,
//! states, transitions, initial state) and then feeds it events.

use cadence::core::{Context, EventCode, State};
use cadence::logging::{MemorySink, Severity};
use cadence::machine::{Phase, StateMachine, StepResult, StopReason, TransitionError};
use cadence::sync::{EventChannel, WaitOutcome, Waiter};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct Journal {
    entries: Vec<String>,
}

impl Context for Journal {
    fn update(&mut self, event: EventCode) -> bool {
        self.entries.push(format!("update {event}"));
        true
    }
}

struct Logged(&'static str);

impl State<Journal> for Logged {
    fn entry(&mut self, ctx: &mut Journal) {
        ctx.entries.push(format!("entry {}", self.0));
    }

    fn do_activity(&mut self, ctx: &mut Journal) {
        ctx.entries.push(format!("activity {}", self.0));
    }

    fn exit(&mut self, ctx: &mut Journal, event: EventCode) {
        ctx.entries.push(format!("exit {} on {event}", self.0));
    }
}

fn journal_machine() -> (StateMachine<Journal>, Arc<MemorySink>) {
    let sink = MemorySink::shared();
    let machine = StateMachine::new(Journal::default()).with_sink(sink.clone());
    (machine, sink)
}

#[test]
fn idle_a_b_then_missing_transition_stops() {
    let (mut machine, sink) = journal_machine();
    let idle = machine.add_state(1, "Idle", Logged("Idle"));
    let a = machine.add_state(2, "A", Logged("A"));
    let b = machine.add_state(3, "B", Logged("B"));
    machine.add_transition(idle, EventCode::new(1), a).unwrap();
    machine.add_transition(a, EventCode::new(2), b).unwrap();
    machine.add_transition(a, EventCode::new(3), idle).unwrap();
    machine.initial(idle).unwrap();

    assert!(machine.on_any_event(EventCode::BEGIN));
    assert_eq!(machine.id(), Some(1));
    assert!(machine.on_any_event(EventCode::new(1)));
    assert_eq!(machine.id(), Some(2));
    assert!(machine.on_any_event(EventCode::new(2)));
    assert_eq!(machine.id(), Some(3));

    let result = machine.step(EventCode::new(3));

    match result {
        StepResult::Stopped(StopReason::Faulted(TransitionError::NoTransition { state, event })) => {
            assert_eq!(state.name, "B");
            assert_eq!(event, EventCode::new(3));
        }
        other => panic!("Expected a no-transition fault, got {other:?}"),
    }
    assert!(sink.contains(Severity::Fatal, "no transition"));
    assert_eq!(machine.phase(), Phase::Stopped);
}

#[test]
fn first_event_lands_on_initial_whatever_its_code() {
    for code in [EventCode::VOID, EventCode::STAY, EventCode::new(42), EventCode::END] {
        let (mut machine, _) = journal_machine();
        let idle = machine.add_state(1, "Idle", Logged("Idle"));
        machine.initial(idle).unwrap();

        let result = machine.step(code);

        assert!(matches!(result, StepResult::Transitioned(ref label) if label.id == 1));
        assert_eq!(
            machine.context().entries,
            vec!["entry Idle".to_string(), "activity Idle".to_string()]
        );
    }
}

#[test]
fn reaching_pseudo_stop_runs_no_further_hooks() {
    let (mut machine, sink) = journal_machine();
    let work = machine.add_state(1, "Work", Logged("Work"));
    let stop = machine.stop_state();
    machine.add_transition(work, EventCode::new(5), stop).unwrap();
    machine.initial(work).unwrap();

    machine.on_any_event(EventCode::BEGIN);
    machine.context_mut().entries.clear();

    assert!(!machine.on_any_event(EventCode::new(5)));

    assert_eq!(machine.context().entries, vec!["exit Work on 5".to_string()]);
    assert_eq!(machine.stop_reason(), Some(&StopReason::Terminated));
    assert!(sink.contains(Severity::Info, "machine stopped"));
    assert_eq!(sink.count(Severity::Fatal), 0);
}

#[test]
fn stopped_machine_ignores_further_events() {
    let (mut machine, _) = journal_machine();
    let work = machine.add_state(1, "Work", Logged("Work"));
    machine.initial(work).unwrap();
    machine.on_any_event(EventCode::BEGIN);
    assert!(!machine.on_any_event(EventCode::new(9)));

    let entries = machine.context().entries.len();
    let history = machine.history().len();
    let reason = machine.stop_reason().cloned();

    for code in [1, 9, 0, -1] {
        assert!(!machine.on_any_event(EventCode::new(code)));
    }

    assert_eq!(machine.context().entries.len(), entries);
    assert_eq!(machine.history().len(), history);
    assert_eq!(machine.stop_reason().cloned(), reason);
    assert_eq!(machine.id(), Some(1));
}

#[test]
fn removed_target_is_reported_as_expired() {
    let (mut machine, sink) = journal_machine();
    let from = machine.add_state(1, "From", Logged("From"));
    let to = machine.add_state(2, "To", Logged("To"));
    machine.add_transition(from, EventCode::new(1), to).unwrap();
    machine.initial(from).unwrap();
    machine.on_any_event(EventCode::BEGIN);

    assert!(machine.remove_state(to));
    let result = machine.exit(from, EventCode::new(1));

    assert!(matches!(result, Err(TransitionError::ExpiredTarget { .. })));
    assert!(sink.contains(Severity::Fatal, "expired"));
}

#[test]
fn slot_reuse_does_not_revive_an_expired_edge() {
    let (mut machine, _) = journal_machine();
    let from = machine.add_state(1, "From", Logged("From"));
    let to = machine.add_state(2, "To", Logged("To"));
    machine.add_transition(from, EventCode::new(1), to).unwrap();
    machine.initial(from).unwrap();

    machine.remove_state(to);
    let replacement = machine.add_state(3, "Replacement", Logged("Replacement"));
    machine.on_any_event(EventCode::BEGIN);

    assert_ne!(replacement, to);
    let result = machine.step(EventCode::new(1));
    assert!(matches!(
        result.stop_reason(),
        Some(StopReason::Faulted(TransitionError::ExpiredTarget { .. }))
    ));
}

#[test]
fn removing_a_state_cancels_its_waiter() {
    struct Sleeper {
        _waiter: Waiter,
    }
    impl State<EventChannel> for Sleeper {}

    let mut machine = StateMachine::new(EventChannel::new()).with_sink(MemorySink::shared());
    let waiter = Waiter::with_sink(MemorySink::shared());
    let signal = waiter.handle();
    let key = machine.add_state(1, "Sleeper", Sleeper { _waiter: waiter });

    let blocked = thread::spawn(move || signal.wait_for(Duration::from_secs(30)));
    thread::sleep(Duration::from_millis(20));
    machine.remove_state(key);

    assert_eq!(blocked.join().unwrap(), WaitOutcome::Canceled);
}

#[test]
fn dropping_the_machine_cancels_every_waiter() {
    struct Sleeper {
        _waiter: Waiter,
    }
    impl State<EventChannel> for Sleeper {}

    let mut machine = StateMachine::new(EventChannel::new()).with_sink(MemorySink::shared());
    let mut handles = Vec::new();
    for id in 1..=3 {
        let waiter = Waiter::new();
        handles.push(waiter.handle());
        machine.add_state(id, format!("Sleeper{id}"), Sleeper { _waiter: waiter });
    }

    let blocked: Vec<_> = handles
        .into_iter()
        .map(|signal| thread::spawn(move || signal.wait_update()))
        .collect();
    thread::sleep(Duration::from_millis(20));
    drop(machine);

    for handle in blocked {
        assert_eq!(handle.join().unwrap(), WaitOutcome::Canceled);
    }
}

#[test]
fn activity_driven_by_a_producer_thread() {
    // A state whose activity waits for a value posted by another thread and
    // turns it into the next event.
    struct Listener {
        waiter: Waiter,
    }

    impl State<EventChannel> for Listener {
        fn do_activity(&mut self, ctx: &mut EventChannel) {
            match self.waiter.wait_for(Duration::from_secs(5)) {
                WaitOutcome::Value(v) => ctx.write(EventCode::new(v as i32)),
                WaitOutcome::TimedOut | WaitOutcome::Canceled => ctx.write(EventCode::new(99)),
            }
        }
    }

    let mut machine = StateMachine::new(EventChannel::new()).with_sink(MemorySink::shared());
    let waiter = Waiter::new();
    let producer = waiter.handle();
    let listen = machine.add_state(1, "Listen", Listener { waiter });
    let done = machine.add_passive_state(2, "Done");
    let stop = machine.stop_state();
    machine.add_transition(listen, EventCode::new(7), done).unwrap();
    machine.add_transition(done, EventCode::new(8), stop).unwrap();
    machine.initial(listen).unwrap();

    let posting = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        producer.update(7);
    });

    assert!(machine.on_any_event(EventCode::BEGIN));
    posting.join().unwrap();
    let next = machine.context().take();
    assert_eq!(next, EventCode::new(7));

    assert!(machine.on_any_event(next));
    assert_eq!(machine.name(), Some("Done"));
    assert!(!machine.on_any_event(EventCode::new(8)));
}
