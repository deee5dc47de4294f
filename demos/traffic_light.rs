//! Traffic light controller.
//!
//! Idle waits for `START`, then the lamps cycle Red → Green → Yellow → Red,
//! each lamp holding for a short while before reporting `TIMEOUT`. `STOP`
//! sends any lamp back to Idle and `QUIT` ends the run.
//!
//! Run with `RUST_LOG=cadence=debug cargo run --example traffic_light` to see the
//! machine's own log lines.

use cadence::core::{Context, EventCode, State};
use cadence::event_codes;
use cadence::machine::StateMachine;
use cadence::sync::{EventChannel, WaitOutcome, Waiter};
use cadence::MachineConfig;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

event_codes! {
    mod signal_event {
        START = 1,
        STOP = 2,
        TIMEOUT = 3,
        QUIT = 4,
    }
}

const LAMP_HOLD: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug)]
enum Lamp {
    Red,
    Yellow,
    Green,
}

/// Owns the lamps and the event the driver feeds to the machine next.
struct Controller {
    events: EventChannel,
}

impl Controller {
    fn turn(&self, lamp: Lamp, on: bool) {
        if on {
            info!(?lamp, "turn on");
        } else {
            info!(?lamp, "turn off");
        }
    }
}

impl Context for Controller {
    fn update(&mut self, event: EventCode) -> bool {
        info!(%event, "update");
        self.events.update(event)
    }
}

struct Idle;

impl State<Controller> for Idle {
    fn entry(&mut self, ctx: &mut Controller) {
        for lamp in [Lamp::Red, Lamp::Yellow, Lamp::Green] {
            ctx.turn(lamp, false);
        }
    }
}

/// One lit lamp. Holds for [`LAMP_HOLD`] and then asks for `TIMEOUT`.
struct Lit {
    lamp: Lamp,
    waiter: Waiter,
}

impl Lit {
    fn new(lamp: Lamp) -> Self {
        Self {
            lamp,
            waiter: Waiter::new(),
        }
    }
}

impl State<Controller> for Lit {
    fn entry(&mut self, ctx: &mut Controller) {
        ctx.turn(self.lamp, true);
    }

    fn do_activity(&mut self, ctx: &mut Controller) {
        match self.waiter.wait_for(LAMP_HOLD) {
            WaitOutcome::TimedOut => {}
            WaitOutcome::Canceled => info!(lamp = ?self.lamp, "hold canceled"),
            WaitOutcome::Value(value) => warn!(lamp = ?self.lamp, value, "unexpected wake"),
        }
        ctx.update(signal_event::TIMEOUT);
    }

    fn exit(&mut self, ctx: &mut Controller, _event: EventCode) {
        ctx.turn(self.lamp, false);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let controller = Controller {
        events: EventChannel::starting_at(EventCode::STAY),
    };
    let mut machine = StateMachine::with_config(controller, MachineConfig::new().named("traffic"))
        .with_catalog(signal_event::catalog());

    let idle = machine.add_state(1, "Idle", Idle);
    let red = machine.add_state(2, "red", Lit::new(Lamp::Red));
    let yellow = machine.add_state(3, "yellow", Lit::new(Lamp::Yellow));
    let green = machine.add_state(4, "green", Lit::new(Lamp::Green));
    let stop = machine.stop_state();

    let wiring = [
        (idle, EventCode::STAY, idle),
        (idle, signal_event::START, red),
        (idle, signal_event::STOP, idle),
        (idle, signal_event::QUIT, stop),
        (red, signal_event::TIMEOUT, green),
        (red, signal_event::STOP, idle),
        (green, signal_event::TIMEOUT, yellow),
        (green, signal_event::STOP, idle),
        (yellow, signal_event::TIMEOUT, red),
        (yellow, signal_event::STOP, idle),
    ];
    for (from, event, to) in wiring {
        if let Err(e) = machine.add_transition(from, event, to) {
            eprintln!("failed to wire the controller: {e}");
            return;
        }
    }
    if let Err(e) = machine.initial(idle) {
        eprintln!("failed to set the initial state: {e}");
        return;
    }

    let mut tick = 0usize;
    loop {
        tick += 1;
        let request = match tick {
            3 => Some(signal_event::START),
            10 => Some(signal_event::STOP),
            12 => Some(signal_event::QUIT),
            _ => None,
        };
        if let Some(event) = request {
            machine.context_mut().update(event);
        }

        let event = machine.context().events.read();
        info!(tick, "----- change state -----");
        if !machine.on_any_event(event) {
            break;
        }
    }

    info!(
        reason = ?machine.stop_reason(),
        transitions = machine.history().len(),
        "controller finished"
    );
}
