//! Guard predicates for gating state handlers.
//!
//! A guard is attached to a row of the state map. When it evaluates to
//! `false` the engine skips the entry handler or action it guards. Exit
//! handling is never guarded.

use super::event::Event;

/// Predicate deciding whether a guarded handler may run.
///
/// Guards see the machine data read-only and the event about to be
/// delivered.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{Event, Guard};
///
/// struct Pump {
///     pressure: u32,
/// }
///
/// let below_limit = Guard::new(|pump: &Pump, _event: &Event| pump.pressure < 300);
///
/// assert!(below_limit.check(&Pump { pressure: 120 }, &Event::Run));
/// assert!(!below_limit.check(&Pump { pressure: 450 }, &Event::Run));
/// ```
pub struct Guard<M, P = ()> {
    predicate: Box<dyn Fn(&M, &Event<P>) -> bool + Send + Sync>,
}

impl<M, P> Guard<M, P> {
    /// Create a guard from a predicate.
    ///
    /// The predicate must be thread-safe (Send + Sync) because the state
    /// map holding it is shared between machine instances.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&M, &Event<P>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard.
    pub fn check(&self, machine: &M, event: &Event<P>) -> bool {
        (self.predicate)(machine, event)
    }
}

impl<M, P> std::fmt::Debug for Guard<M, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard")
    }
}
