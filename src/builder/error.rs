//! Build errors for state maps and state machines.

use thiserror::Error;

/// Errors that can occur when building state maps and state machines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("State enumeration is empty. Declare at least one state")]
    NoStates,

    #[error("State '{state}' reports index {index} but is declared at position {position}")]
    NonContiguousState {
        state: &'static str,
        index: usize,
        position: usize,
    },

    #[error("State '{state}' is not listed in its enumeration")]
    UndeclaredState { state: &'static str },

    #[error("No handler registered for state '{state}'")]
    MissingState { state: &'static str },

    #[error("State '{state}' registered more than once")]
    DuplicateState { state: &'static str },

    #[error("State map has {found} rows but {expected} states are declared")]
    CountMismatch { expected: usize, found: usize },

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,
}
