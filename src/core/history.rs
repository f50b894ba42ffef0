//! State transition history tracking.
//!
//! Every committed transition is described by a [`StateTransition`]. A
//! [`StateHistory`] keeps the most recent ones, bounded so a machine ticking
//! in a tight loop never grows without limit.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateTransition;
/// use tickstate::state_ids;
/// use chrono::Utc;
///
/// state_ids! {
///     enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// let transition = StateTransition {
///     from: Door::Closed,
///     to: Door::Open,
///     timestamp: Utc::now(),
///     step: 1,
/// };
/// assert_eq!(transition.to_string(), "Closed -> Open");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition<S: StateId> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// Wall-clock time of the commit
    pub timestamp: DateTime<Utc>,
    /// Engine step (1-based) in which the commit happened
    pub step: u64,
}

impl<S: StateId> std::fmt::Display for StateTransition<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from.name(), self.to.name())
    }
}

/// Bounded, ordered history of transitions.
///
/// When the history is full the oldest record is dropped. A capacity of
/// zero keeps nothing.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{StateHistory, StateTransition};
/// use tickstate::state_ids;
/// use chrono::Utc;
///
/// state_ids! {
///     enum Phase {
///         One,
///         Two,
///         Three,
///     }
/// }
///
/// let mut history = StateHistory::with_capacity(8);
/// history.record(StateTransition { from: Phase::One, to: Phase::Two, timestamp: Utc::now(), step: 1 });
/// history.record(StateTransition { from: Phase::Two, to: Phase::Three, timestamp: Utc::now(), step: 2 });
///
/// assert_eq!(history.get_path(), vec![Phase::One, Phase::Two, Phase::Three]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory<S: StateId> {
    capacity: usize,
    transitions: VecDeque<StateTransition<S>>,
}

impl<S: StateId> StateHistory<S> {
    /// Default number of retained transitions.
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create an empty history retaining at most `capacity` transitions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a transition, evicting the oldest when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.capacity == 0 {
            return;
        }
        while self.transitions.len() >= self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed: the `from` of the oldest retained transition, then
    /// the `to` of each transition.
    pub fn get_path(&self) -> Vec<S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Wall-clock span between the oldest and newest retained transitions.
    ///
    /// Returns `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    /// Most recent transition.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    /// Number of retained transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check whether no transition is retained.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Maximum number of retained transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every retained transition.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

impl<S: StateId> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}
