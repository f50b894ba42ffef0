//! State map: one row of handlers per declared state.
//!
//! A map is immutable once built and is shared by every instance of a
//! machine through an `Arc`. Building is the only place its shape is
//! checked, so a `StateMap` value always has exactly one row per state.

use crate::builder::error::BuildError;
use crate::core::{Event, Guard, Outcome, StateId};
use crate::engine::Context;
use std::marker::PhantomData;

/// Handler receiving every signal delivered to a state.
pub type Action<M, S, P> =
    Box<dyn Fn(&mut M, &mut Context<'_, S>, &Event<P>) -> Outcome + Send + Sync>;

/// Dedicated handler run when a state is entered.
pub type EntryAction<M, S> = Box<dyn Fn(&mut M, &mut Context<'_, S>) + Send + Sync>;

/// Dedicated handler run when a state is left.
pub type ExitAction<M, S> = Box<dyn Fn(&mut M, &mut Context<'_, S>) + Send + Sync>;

/// Handlers for a single state.
///
/// A basic row holds only an action, which receives ENTRY, EXIT, RUN and
/// user events alike. An extended row adds a guard and dedicated entry and
/// exit handlers; a dedicated handler takes over its signal, so the action
/// no longer sees it.
pub struct StateRow<M, S: StateId, P = ()> {
    action: Action<M, S, P>,
    guard: Option<Guard<M, P>>,
    entry: Option<EntryAction<M, S>>,
    exit: Option<ExitAction<M, S>>,
}

impl<M, S: StateId, P> StateRow<M, S, P> {
    /// Create a basic row.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&mut M, &mut Context<'_, S>, &Event<P>) -> Outcome + Send + Sync + 'static,
    {
        Self {
            action: Box::new(action),
            guard: None,
            entry: None,
            exit: None,
        }
    }

    /// Gate the entry handler and action with a predicate.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&M, &Event<P>) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Gate the entry handler and action with a guard.
    pub fn guard(mut self, guard: Guard<M, P>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Handle ENTRY with a dedicated handler.
    pub fn on_entry<F>(mut self, entry: F) -> Self
    where
        F: Fn(&mut M, &mut Context<'_, S>) + Send + Sync + 'static,
    {
        self.entry = Some(Box::new(entry));
        self
    }

    /// Handle EXIT with a dedicated handler.
    pub fn on_exit<F>(mut self, exit: F) -> Self
    where
        F: Fn(&mut M, &mut Context<'_, S>) + Send + Sync + 'static,
    {
        self.exit = Some(Box::new(exit));
        self
    }

    /// Check whether the row uses any extended handler.
    pub fn is_extended(&self) -> bool {
        self.guard.is_some() || self.entry.is_some() || self.exit.is_some()
    }

    fn allows(&self, machine: &M, event: &Event<P>) -> bool {
        self.guard.as_ref().map_or(true, |g| g.check(machine, event))
    }

    /// Deliver EXIT. Never guarded.
    pub(crate) fn deliver_exit(&self, machine: &mut M, ctx: &mut Context<'_, S>) {
        match &self.exit {
            Some(exit) => exit(machine, ctx),
            None => {
                let outcome = (self.action)(machine, ctx, &Event::Exit);
                warn_on_error(ctx, &Event::<P>::Exit, outcome);
            }
        }
    }

    /// Deliver ENTRY unless the guard rejects it.
    pub(crate) fn deliver_entry(&self, machine: &mut M, ctx: &mut Context<'_, S>) {
        let event = Event::Entry;
        if !self.allows(machine, &event) {
            tracing::trace!(
                machine = ctx.machine_name(),
                state = ctx.current_state().name(),
                "guard suppressed ENTRY"
            );
            return;
        }
        match &self.entry {
            Some(entry) => entry(machine, ctx),
            None => {
                let outcome = (self.action)(machine, ctx, &event);
                warn_on_error(ctx, &event, outcome);
            }
        }
    }

    /// Deliver a RUN or user event to the action unless the guard rejects it.
    pub(crate) fn deliver(
        &self,
        machine: &mut M,
        ctx: &mut Context<'_, S>,
        event: &Event<P>,
    ) -> Outcome {
        if !self.allows(machine, event) {
            tracing::trace!(
                machine = ctx.machine_name(),
                state = ctx.current_state().name(),
                signal = %event.signal(),
                "guard suppressed action"
            );
            return Outcome::Ok;
        }
        (self.action)(machine, ctx, event)
    }
}

fn warn_on_error<S: StateId, P>(ctx: &Context<'_, S>, event: &Event<P>, outcome: Outcome) {
    if outcome.is_error() {
        tracing::warn!(
            machine = ctx.machine_name(),
            state = ctx.current_state().name(),
            signal = %event.signal(),
            %outcome,
            "handler reported an error outcome that the engine cannot propagate"
        );
    }
}

/// Immutable table of state rows, indexed by `StateId::index()`.
///
/// # Example
///
/// ```rust
/// use tickstate::builder::StateMap;
/// use tickstate::core::{Event, Outcome, StateId};
/// use tickstate::state_ids;
///
/// state_ids! {
///     enum Lamp {
///         Off,
///         On,
///     }
/// }
///
/// let map = StateMap::<u32, Lamp>::builder()
///     .state(Lamp::Off, |_, ctx, event| {
///         if let Event::Run = event {
///             ctx.request_transition(Lamp::On);
///         }
///         Outcome::Ok
///     })
///     .state(Lamp::On, |_, _, _| Outcome::Ok)
///     .build()
///     .unwrap();
///
/// assert_eq!(map.len(), Lamp::COUNT);
/// ```
pub struct StateMap<M, S: StateId, P = ()> {
    rows: Vec<StateRow<M, S, P>>,
    _state: PhantomData<fn() -> S>,
}

impl<M, S: StateId, P> StateMap<M, S, P> {
    /// Start building a map keyed by state.
    pub fn builder() -> StateMapBuilder<M, S, P> {
        StateMapBuilder::new()
    }

    /// Build a map from rows listed in enumeration order.
    ///
    /// Fails unless there is exactly one row per declared state.
    pub fn from_rows(rows: Vec<StateRow<M, S, P>>) -> Result<Self, BuildError> {
        check_enumeration::<S>()?;
        if rows.len() != S::COUNT {
            return Err(BuildError::CountMismatch {
                expected: S::COUNT,
                found: rows.len(),
            });
        }
        Ok(Self {
            rows,
            _state: PhantomData,
        })
    }

    /// Number of rows, always `S::COUNT`.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; an empty state set cannot be built.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether the row for `state` uses any extended handler.
    pub fn is_extended(&self, state: S) -> bool {
        self.row(state).is_extended()
    }

    pub(crate) fn row(&self, state: S) -> &StateRow<M, S, P> {
        &self.rows[state.index()]
    }
}

impl<M, S: StateId, P> std::fmt::Debug for StateMap<M, S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMap")
            .field("states", &S::ALL)
            .finish_non_exhaustive()
    }
}

/// Builder for [`StateMap`] that accepts rows in any order.
pub struct StateMapBuilder<M, S: StateId, P = ()> {
    entries: Vec<(S, StateRow<M, S, P>)>,
}

impl<M, S: StateId, P> StateMapBuilder<M, S, P> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(S::COUNT),
        }
    }

    /// Register a basic row for `state`.
    pub fn state<F>(self, state: S, action: F) -> Self
    where
        F: Fn(&mut M, &mut Context<'_, S>, &Event<P>) -> Outcome + Send + Sync + 'static,
    {
        self.row(state, StateRow::new(action))
    }

    /// Register a prepared row for `state`.
    pub fn row(mut self, state: S, row: StateRow<M, S, P>) -> Self {
        self.entries.push((state, row));
        self
    }

    /// Build the map.
    /// Returns an error unless every declared state has exactly one row.
    pub fn build(self) -> Result<StateMap<M, S, P>, BuildError> {
        check_enumeration::<S>()?;

        let mut slots: Vec<Option<StateRow<M, S, P>>> = S::ALL.iter().map(|_| None).collect();
        for (state, row) in self.entries {
            let Some(slot) = slots.get_mut(state.index()) else {
                return Err(BuildError::UndeclaredState {
                    state: state.name(),
                });
            };
            if slot.is_some() {
                return Err(BuildError::DuplicateState {
                    state: state.name(),
                });
            }
            *slot = Some(row);
        }

        let rows = slots
            .into_iter()
            .zip(S::ALL)
            .map(|(slot, state)| slot.ok_or(BuildError::MissingState { state: state.name() }))
            .collect::<Result<Vec<_>, _>>()?;

        StateMap::from_rows(rows)
    }
}

impl<M, S: StateId, P> Default for StateMapBuilder<M, S, P> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_enumeration<S: StateId>() -> Result<(), BuildError> {
    if S::COUNT == 0 {
        return Err(BuildError::NoStates);
    }
    for (position, state) in S::ALL.iter().enumerate() {
        if state.index() != position {
            return Err(BuildError::NonContiguousState {
                state: state.name(),
                index: state.index(),
                position,
            });
        }
    }
    Ok(())
}
