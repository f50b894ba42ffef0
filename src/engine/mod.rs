//! Step-driven execution of state machines.
//!
//! This module is the runtime around the state map:
//!
//! - **StateMachine**: holds current and pending state and executes one
//!   bounded step per call
//! - **Context**: the handle handlers use to request transitions
//! - **Trace sinks**: receive every committed transition
//!
//! # Step algorithm
//!
//! 1. If a transition is pending, validate it, report it to the trace sink,
//!    deliver EXIT to the old state and commit the new one.
//! 2. If the current state has not been entered yet, deliver ENTRY and
//!    stamp the entry time.
//! 3. Deliver RUN (or a user event) and return the handler's outcome.
//!
//! Requests made during a step are committed by the next one, so a single
//! call never performs more than one transition.

mod context;
mod error;
mod machine;
mod trace;

pub use context::Context;
pub use error::EngineError;
pub use machine::StateMachine;
pub use trace::{LogTrace, NoTrace, TransitionTrace};
