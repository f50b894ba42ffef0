//! Motor controller driven from a fixed-rate tick loop.
//!
//! Run with `RUST_LOG=debug cargo run --example motor` to see the
//! transition trace.

use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;
use tickstate::core::{Event, Outcome};
use tickstate::{state_ids, Context, StateMachine, StateMap};
use tracing_subscriber::EnvFilter;

state_ids! {
    enum MotorState {
        Idle,
        Start,
        ChangeSpeed,
        Stop,
    }
}

/// User signal carrying a new target speed.
const SET_SPEED: u16 = 0;

#[derive(Debug, Default)]
struct Motor {
    speed: u32,
    target: u32,
}

type MotorCtx<'a> = Context<'a, MotorState>;

fn idle(motor: &mut Motor, ctx: &mut MotorCtx<'_>, event: &Event<u32>) -> Outcome {
    match event {
        Event::Entry => tracing::info!("motor idle"),
        Event::Run if motor.target > 0 => ctx.request_transition(MotorState::Start),
        Event::User { signal: SET_SPEED, payload } => motor.target = *payload,
        _ => {}
    }
    Outcome::Idle
}

fn start(motor: &mut Motor, ctx: &mut MotorCtx<'_>, event: &Event<u32>) -> Outcome {
    match event {
        Event::Entry => {
            motor.speed = motor.target.min(500);
            tracing::info!(speed = motor.speed, "motor spinning up");
        }
        Event::Run => ctx.request_transition(MotorState::ChangeSpeed),
        _ => {}
    }
    Outcome::Running
}

fn change_speed(motor: &mut Motor, ctx: &mut MotorCtx<'_>, event: &Event<u32>) -> Outcome {
    match event {
        Event::Run if motor.speed < motor.target => {
            motor.speed = (motor.speed + 250).min(motor.target);
            tracing::info!(speed = motor.speed, target = motor.target, "ramping");
        }
        Event::Run if ctx.time_in_state() >= Duration::from_millis(50) => {
            ctx.request_transition(MotorState::Stop);
        }
        Event::User { signal: SET_SPEED, payload } => motor.target = *payload,
        _ => {}
    }
    Outcome::Running
}

fn stop(motor: &mut Motor, ctx: &mut MotorCtx<'_>, event: &Event<u32>) -> Outcome {
    match event {
        Event::Entry => {
            motor.speed = 0;
            motor.target = 0;
            tracing::info!("motor stopped");
        }
        Event::Run => ctx.request_transition(MotorState::Idle),
        _ => {}
    }
    Outcome::Done
}

/// One map for every motor in the process.
fn motor_map() -> Arc<StateMap<Motor, MotorState, u32>> {
    static MAP: OnceLock<Arc<StateMap<Motor, MotorState, u32>>> = OnceLock::new();
    let map = MAP.get_or_init(|| {
        let map = StateMap::builder()
            .state(MotorState::Idle, idle)
            .state(MotorState::Start, start)
            .state(MotorState::ChangeSpeed, change_speed)
            .state(MotorState::Stop, stop)
            .build()
            .expect("motor map covers every state");
        Arc::new(map)
    });
    Arc::clone(map)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut machine = StateMachine::builder(motor_map())
        .initial(MotorState::Idle)
        .name("Motor State Machine")
        .build(Motor::default())?;

    machine.init();
    machine.run();
    machine.dispatch(SET_SPEED, 1500);

    for tick in 0..40 {
        let outcome = machine.try_run()?;
        if outcome == Outcome::Done {
            tracing::info!(tick, "cycle complete");
        }
        if tick > 0 && machine.current_state() == MotorState::Idle {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    println!("{:?}", machine);
    println!("final: {:?}", machine.data());
    Ok(())
}
