//! Tickstate: a non-blocking, step-driven finite state machine engine
//!
//! A machine declares a fixed set of states and one row of handlers per
//! state. The engine drives lifecycle signals (ENTRY, EXIT, RUN) one bounded
//! step at a time, which makes it suitable for tight loops, periodic timer
//! ticks and any scheduler that calls in at a fixed rate.
//!
//! # Core Concepts
//!
//! - **StateId**: contiguous state enumeration, usually from `state_ids!`
//! - **StateMap**: immutable table of handlers, built once and shared
//! - **StateMachine**: per-instance engine; `init()` once, `run()` per tick
//! - **Context**: lets a handler request the next state
//!
//! # Example
//!
//! ```rust
//! use tickstate::core::{Event, Outcome};
//! use tickstate::{state_ids, StateMachine, StateMap};
//!
//! state_ids! {
//!     enum Heater {
//!         Off,
//!         Heating,
//!     }
//! }
//!
//! struct Thermostat {
//!     temperature: i32,
//!     target: i32,
//! }
//!
//! let map = StateMap::<Thermostat, Heater>::builder()
//!     .state(Heater::Off, |t, ctx, event| {
//!         if let Event::Run = event {
//!             if t.temperature < t.target {
//!                 ctx.request_transition(Heater::Heating);
//!             }
//!         }
//!         Outcome::Ok
//!     })
//!     .state(Heater::Heating, |t, ctx, event| {
//!         if let Event::Run = event {
//!             t.temperature += 1;
//!             if t.temperature >= t.target {
//!                 ctx.request_transition(Heater::Off);
//!             }
//!         }
//!         Outcome::Running
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut machine = StateMachine::builder(map)
//!     .initial(Heater::Off)
//!     .name("thermostat")
//!     .build(Thermostat { temperature: 18, target: 20 })
//!     .unwrap();
//!
//! machine.init();
//! for _ in 0..5 {
//!     machine.run();
//! }
//! assert_eq!(machine.data().temperature, 20);
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, StateMap, StateRow};
pub use core::{Event, Outcome, Signal, StateId};
pub use engine::{Context, EngineError, StateMachine};
