//! Handle given to state handlers during dispatch.

use crate::core::StateId;
use std::time::{Duration, Instant};

/// Per-instance engine bookkeeping.
#[derive(Debug)]
pub(crate) struct EngineState<S: StateId> {
    pub(crate) name: String,
    pub(crate) initial: S,
    pub(crate) current: S,
    /// Raw index so that out-of-range requests survive until commit.
    pub(crate) pending: usize,
    pub(crate) initialized: bool,
    pub(crate) entered_at: Option<Instant>,
    pub(crate) steps: u64,
}

impl<S: StateId> EngineState<S> {
    pub(crate) fn new(name: String, initial: S) -> Self {
        Self {
            name,
            initial,
            current: initial,
            pending: initial.index(),
            initialized: false,
            entered_at: None,
            steps: 0,
        }
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.pending != self.current.index()
    }

    pub(crate) fn pending_state(&self) -> Option<S> {
        if self.has_pending() {
            S::from_index(self.pending)
        } else {
            None
        }
    }
}

/// Engine access available to a handler while it runs.
///
/// A `Context` only exists for the duration of a single delivery, so
/// transition requests can only be made from inside a handler. Requests are
/// recorded, not committed: the engine commits the latest request at the
/// start of the next step.
pub struct Context<'a, S: StateId> {
    engine: &'a mut EngineState<S>,
}

impl<'a, S: StateId> Context<'a, S> {
    pub(crate) fn new(engine: &'a mut EngineState<S>) -> Self {
        Self { engine }
    }

    /// State the handler is running in.
    pub fn current_state(&self) -> S {
        self.engine.current
    }

    /// Request a transition, committed on the next step.
    ///
    /// A later request in the same step replaces an earlier one. Requesting
    /// the current state cancels any earlier request.
    pub fn request_transition(&mut self, state: S) {
        self.engine.pending = state.index();
    }

    /// Request a transition by raw index.
    ///
    /// The index is only validated when the next step tries to commit it;
    /// an index outside the enumeration is an unrecoverable fault there.
    pub fn request_transition_index(&mut self, index: usize) {
        self.engine.pending = index;
    }

    /// Requested state that has not been committed yet.
    pub fn pending_state(&self) -> Option<S> {
        self.engine.pending_state()
    }

    /// Check whether a request is waiting for the next step.
    pub fn has_pending_transition(&self) -> bool {
        self.engine.has_pending()
    }

    /// Time spent in the current state since its entry completed.
    ///
    /// Zero while the entry handler itself is running.
    pub fn time_in_state(&self) -> Duration {
        self.engine
            .entered_at
            .map(|entered| entered.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Diagnostic name of the machine.
    pub fn machine_name(&self) -> &str {
        &self.engine.name
    }

    /// Number of the step being executed, starting at 1.
    pub fn step(&self) -> u64 {
        self.engine.steps
    }
}
