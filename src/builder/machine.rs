//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::map::StateMap;
use crate::core::StateId;
use crate::engine::{LogTrace, StateMachine, TransitionTrace};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<M, S: StateId, P = (), T = LogTrace> {
    map: Arc<StateMap<M, S, P>>,
    initial: Option<S>,
    name: String,
    trace: T,
}

impl<M, S: StateId, P> StateMachineBuilder<M, S, P, LogTrace> {
    /// Create a new builder around a state map.
    pub fn new(map: impl Into<Arc<StateMap<M, S, P>>>) -> Self {
        Self {
            map: map.into(),
            initial: None,
            name: Self::DEFAULT_NAME.to_string(),
            trace: LogTrace,
        }
    }
}

impl<M, S: StateId, P, T: TransitionTrace<S>> StateMachineBuilder<M, S, P, T> {
    /// Name used when none is given.
    pub const DEFAULT_NAME: &'static str = "FSM";

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the diagnostic name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the transition trace sink.
    pub fn trace<U: TransitionTrace<S>>(self, trace: U) -> StateMachineBuilder<M, S, P, U> {
        StateMachineBuilder {
            map: self.map,
            initial: self.initial,
            name: self.name,
            trace,
        }
    }

    /// Build the state machine around its data.
    /// Returns an error if the initial state is missing or undeclared.
    pub fn build(self, data: M) -> Result<StateMachine<M, S, P, T>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if S::from_index(initial.index()) != Some(initial) {
            return Err(BuildError::UndeclaredState {
                state: initial.name(),
            });
        }

        Ok(StateMachine::from_parts(
            self.name,
            initial,
            self.map,
            data,
            self.trace,
        ))
    }
}
