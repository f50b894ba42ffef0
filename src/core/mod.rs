//! Core state machine types.
//!
//! This module contains the vocabulary shared by the map and the engine:
//! - Signals and events delivered to handlers
//! - State identifiers via the `StateId` trait
//! - Step outcomes
//! - Guard predicates
//! - Transition history

mod event;
mod guard;
mod history;
mod outcome;
mod signal;
mod state;

pub use event::Event;
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use outcome::Outcome;
pub use signal::{Signal, SignalOutOfRange};
pub use state::StateId;
