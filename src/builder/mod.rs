//! Builder API for state maps and state machines.
//!
//! This module provides fluent builders and a declaration macro for creating
//! machines with minimal boilerplate. Every shape check happens here, at
//! build time, so the engine never meets an incomplete map.

pub mod error;
pub mod machine;
pub mod macros;
pub mod map;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use map::{Action, EntryAction, ExitAction, StateMap, StateMapBuilder, StateRow};
