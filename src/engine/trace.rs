//! Sinks for committed transitions.
//!
//! The engine reports every commit to a [`TransitionTrace`] before the old
//! state receives EXIT. The sink is a type parameter of the machine, so a
//! machine that does not trace pays nothing for it.

use crate::core::{StateHistory, StateId, StateTransition};

/// Receiver of committed transitions.
///
/// Implemented for [`LogTrace`], [`NoTrace`], [`StateHistory`] and for any
/// `FnMut(&str, &StateTransition<S>)` closure.
pub trait TransitionTrace<S: StateId> {
    fn on_transition(&mut self, machine: &str, transition: &StateTransition<S>);
}

/// Emits `[name] TRANSITION: old -> new` through `tracing` at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTrace;

impl<S: StateId> TransitionTrace<S> for LogTrace {
    fn on_transition(&mut self, machine: &str, transition: &StateTransition<S>) {
        tracing::debug!(
            machine,
            from = transition.from.name(),
            to = transition.to.name(),
            step = transition.step,
            "[{}] TRANSITION: {} -> {}",
            machine,
            transition.from.name(),
            transition.to.name()
        );
    }
}

/// Discards transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTrace;

impl<S: StateId> TransitionTrace<S> for NoTrace {
    fn on_transition(&mut self, _machine: &str, _transition: &StateTransition<S>) {}
}

impl<S: StateId> TransitionTrace<S> for StateHistory<S> {
    fn on_transition(&mut self, _machine: &str, transition: &StateTransition<S>) {
        self.record(transition.clone());
    }
}

impl<S, F> TransitionTrace<S> for F
where
    S: StateId,
    F: FnMut(&str, &StateTransition<S>),
{
    fn on_transition(&mut self, machine: &str, transition: &StateTransition<S>) {
        self(machine, transition)
    }
}
