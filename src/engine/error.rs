//! Engine faults.

use crate::core::Outcome;

/// Invariant breaches detected while stepping a machine.
///
/// These are programming errors in the concrete machine, not operational
/// conditions. [`StateMachine::run`](crate::engine::StateMachine::run)
/// treats them as fatal; the `try_` variants return them instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("[{machine}] transition target {index} is out of range (max states: {max})")]
    StateOutOfRange {
        machine: String,
        index: usize,
        max: usize,
    },
}

impl EngineError {
    /// Result code matching the fault.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::StateOutOfRange { .. } => Outcome::StateOutOfRange,
        }
    }
}
