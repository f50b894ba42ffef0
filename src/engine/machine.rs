//! State machine that executes one bounded step per call.

use crate::builder::{StateMachineBuilder, StateMap};
use crate::core::{Event, Outcome, StateId, StateTransition};
use crate::engine::context::{Context, EngineState};
use crate::engine::error::EngineError;
use crate::engine::trace::{LogTrace, TransitionTrace};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A running instance of a machine.
///
/// Owns the machine data `M`, shares the state map with every other
/// instance of the same machine, and reports committed transitions to the
/// trace sink `T`.
///
/// Each call to [`run`](Self::run) performs at most one committed transition
/// and one RUN delivery, then returns. The caller decides the cadence.
///
/// # Example
///
/// ```rust
/// use tickstate::builder::StateMap;
/// use tickstate::core::{Event, Outcome};
/// use tickstate::engine::StateMachine;
/// use tickstate::state_ids;
///
/// state_ids! {
///     enum Blinker {
///         Off,
///         On,
///     }
/// }
///
/// let map = StateMap::<u32, Blinker>::builder()
///     .state(Blinker::Off, |toggles, ctx, event| {
///         if let Event::Run = event {
///             *toggles += 1;
///             ctx.request_transition(Blinker::On);
///         }
///         Outcome::Ok
///     })
///     .state(Blinker::On, |_, ctx, event| {
///         if let Event::Run = event {
///             ctx.request_transition(Blinker::Off);
///         }
///         Outcome::Ok
///     })
///     .build()
///     .unwrap();
///
/// let mut machine = StateMachine::builder(map)
///     .initial(Blinker::Off)
///     .name("blinker")
///     .build(0_u32)
///     .unwrap();
///
/// machine.init();
/// machine.run();
/// assert_eq!(machine.current_state(), Blinker::Off);
/// machine.run();
/// assert_eq!(machine.current_state(), Blinker::On);
/// assert_eq!(*machine.data(), 1);
/// ```
pub struct StateMachine<M, S: StateId, P = (), T = LogTrace> {
    engine: EngineState<S>,
    map: Arc<StateMap<M, S, P>>,
    data: M,
    trace: T,
}

impl<M, S: StateId, P> StateMachine<M, S, P, LogTrace> {
    /// Start building a machine around a state map.
    pub fn builder(map: impl Into<Arc<StateMap<M, S, P>>>) -> StateMachineBuilder<M, S, P> {
        StateMachineBuilder::new(map)
    }
}

impl<M, S: StateId, P, T: TransitionTrace<S>> StateMachine<M, S, P, T> {
    pub(crate) fn from_parts(
        name: String,
        initial: S,
        map: Arc<StateMap<M, S, P>>,
        data: M,
        trace: T,
    ) -> Self {
        Self {
            engine: EngineState::new(name, initial),
            map,
            data,
            trace,
        }
    }

    /// Arm the machine to (re)enter its initial state.
    ///
    /// Delivers nothing. The next step commits the initial state if the
    /// machine is elsewhere, and delivers ENTRY to it either way.
    pub fn init(&mut self) -> Outcome {
        self.engine.pending = self.engine.initial.index();
        self.engine.initialized = false;
        tracing::debug!(
            machine = %self.engine.name,
            initial = self.engine.initial.name(),
            "state machine armed"
        );
        Outcome::Ok
    }

    /// Execute one step, delivering RUN to the current state.
    ///
    /// Returns the outcome reported by the RUN handler.
    ///
    /// # Panics
    ///
    /// Panics if a handler requested a transition to an index outside the
    /// state enumeration. Use [`try_run`](Self::try_run) to get the fault as
    /// a value instead.
    pub fn run(&mut self) -> Outcome {
        self.try_run().unwrap_or_else(|err| fatal(err))
    }

    /// Execute one step, delivering RUN to the current state.
    ///
    /// On an out-of-range transition request nothing is delivered and the
    /// current state is left unchanged.
    pub fn try_run(&mut self) -> Result<Outcome, EngineError> {
        self.step(Event::Run)
    }

    /// Execute one step, delivering a user event instead of RUN.
    ///
    /// Any pending transition is committed first, exactly as in
    /// [`run`](Self::run). The event is not queued.
    ///
    /// # Panics
    ///
    /// Same conditions as [`run`](Self::run).
    pub fn dispatch(&mut self, signal: u16, payload: P) -> Outcome {
        self.try_dispatch(signal, payload)
            .unwrap_or_else(|err| fatal(err))
    }

    /// Fallible form of [`dispatch`](Self::dispatch).
    pub fn try_dispatch(&mut self, signal: u16, payload: P) -> Result<Outcome, EngineError> {
        self.step(Event::user(signal, payload))
    }

    fn step(&mut self, event: Event<P>) -> Result<Outcome, EngineError> {
        let Self {
            engine,
            map,
            data,
            trace,
        } = self;

        let next = if engine.has_pending() {
            let next = S::from_index(engine.pending).ok_or_else(|| EngineError::StateOutOfRange {
                machine: engine.name.clone(),
                index: engine.pending,
                max: S::COUNT,
            })?;
            Some(next)
        } else {
            None
        };

        engine.steps += 1;

        if let Some(next) = next {
            let transition = StateTransition {
                from: engine.current,
                to: next,
                timestamp: Utc::now(),
                step: engine.steps,
            };
            trace.on_transition(&engine.name, &transition);

            map.row(engine.current)
                .deliver_exit(data, &mut Context::new(engine));

            engine.current = next;
            engine.initialized = false;
            engine.entered_at = None;
        }

        if !engine.initialized {
            map.row(engine.current)
                .deliver_entry(data, &mut Context::new(engine));
            engine.entered_at = Some(Instant::now());
            engine.initialized = true;
        }

        let outcome = map
            .row(engine.current)
            .deliver(data, &mut Context::new(engine), &event);
        Ok(outcome)
    }

    /// Current state.
    pub fn current_state(&self) -> S {
        self.engine.current
    }

    /// State the machine starts in and returns to on [`init`](Self::init).
    pub fn initial_state(&self) -> S {
        self.engine.initial
    }

    /// Requested state that the next step will commit.
    pub fn pending_state(&self) -> Option<S> {
        self.engine.pending_state()
    }

    /// Number of declared states.
    pub fn max_states(&self) -> usize {
        S::COUNT
    }

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.engine.name
    }

    /// Whether the current state has received its ENTRY.
    pub fn is_initialized(&self) -> bool {
        self.engine.initialized
    }

    /// Steps executed so far.
    pub fn steps(&self) -> u64 {
        self.engine.steps
    }

    /// Time since the current state was entered.
    ///
    /// Returns `None` until the first step has entered a state.
    pub fn time_in_state(&self) -> Option<Duration> {
        self.engine.entered_at.map(|entered| entered.elapsed())
    }

    /// Machine data.
    pub fn data(&self) -> &M {
        &self.data
    }

    /// Mutable machine data.
    pub fn data_mut(&mut self) -> &mut M {
        &mut self.data
    }

    /// Transition trace sink.
    pub fn trace(&self) -> &T {
        &self.trace
    }

    /// Mutable transition trace sink, e.g. to clear a history.
    pub fn trace_mut(&mut self) -> &mut T {
        &mut self.trace
    }

    /// State map shared with the other instances of this machine.
    pub fn map(&self) -> &Arc<StateMap<M, S, P>> {
        &self.map
    }

    /// Consume the machine, returning its data.
    pub fn into_data(self) -> M {
        self.data
    }
}

impl<M, S: StateId, P, T> std::fmt::Debug for StateMachine<M, S, P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.engine.name)
            .field("current", &self.engine.current)
            .field("pending", &self.engine.pending)
            .field("initialized", &self.engine.initialized)
            .field("steps", &self.engine.steps)
            .finish_non_exhaustive()
    }
}

#[cold]
fn fatal(err: EngineError) -> ! {
    tracing::error!(error = %err, "unrecoverable state machine fault");
    panic!("{err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateRow;
    use crate::core::{Signal, StateHistory};
    use crate::engine::NoTrace;
    use crate::state_ids;

    state_ids! {
        enum WorkflowState {
            Initial,
            Processing,
            Complete,
        }
    }

    /// Signals seen by each state, in delivery order.
    #[derive(Default)]
    struct Recorder {
        log: Vec<(WorkflowState, Signal)>,
        next: Option<WorkflowState>,
        out_of_range: bool,
    }

    impl Recorder {
        fn signals(&self) -> Vec<(WorkflowState, Signal)> {
            self.log.clone()
        }
    }

    fn record(m: &mut Recorder, ctx: &mut Context<'_, WorkflowState>, ev: &Event<u32>) -> Outcome {
        m.log.push((ctx.current_state(), ev.signal()));
        if let Event::Run = ev {
            if m.out_of_range {
                ctx.request_transition_index(WorkflowState::COUNT + 5);
            } else if let Some(next) = m.next.take() {
                ctx.request_transition(next);
            }
        }
        Outcome::Ok
    }

    fn recording_map() -> StateMap<Recorder, WorkflowState, u32> {
        StateMap::builder()
            .state(WorkflowState::Initial, record)
            .state(WorkflowState::Processing, record)
            .state(WorkflowState::Complete, |m, ctx, ev| {
                record(m, ctx, ev);
                Outcome::Done
            })
            .build()
            .unwrap()
    }

    fn machine() -> StateMachine<Recorder, WorkflowState, u32, StateHistory<WorkflowState>> {
        StateMachine::builder(recording_map())
            .initial(WorkflowState::Initial)
            .name("workflow")
            .trace(StateHistory::new())
            .build(Recorder::default())
            .unwrap()
    }

    #[test]
    fn init_delivers_nothing() {
        let mut machine = machine();
        assert_eq!(machine.init(), Outcome::Ok);
        assert!(machine.data().log.is_empty());
        assert!(!machine.is_initialized());
    }

    #[test]
    fn first_run_enters_initial_state() {
        let mut machine = machine();
        machine.init();
        assert_eq!(machine.run(), Outcome::Ok);

        assert_eq!(machine.current_state(), WorkflowState::Initial);
        assert_eq!(
            machine.data().signals(),
            vec![
                (WorkflowState::Initial, Signal::Entry),
                (WorkflowState::Initial, Signal::Run),
            ]
        );
        assert!(machine.is_initialized());
        assert!(machine.time_in_state().is_some());
    }

    #[test]
    fn run_without_request_only_delivers_run() {
        let mut machine = machine();
        machine.init();
        machine.run();
        machine.data_mut().log.clear();

        for _ in 0..5 {
            machine.run();
        }

        assert_eq!(machine.current_state(), WorkflowState::Initial);
        assert!(machine.is_initialized());
        assert_eq!(
            machine.data().signals(),
            vec![(WorkflowState::Initial, Signal::Run); 5]
        );
        assert!(machine.trace().is_empty());
    }

    #[test]
    fn requested_transition_commits_on_next_step() {
        let mut machine = machine();
        machine.init();
        machine.data_mut().next = Some(WorkflowState::Processing);
        machine.run();

        // requested during RUN, not yet committed
        assert_eq!(machine.current_state(), WorkflowState::Initial);
        assert_eq!(machine.pending_state(), Some(WorkflowState::Processing));
        machine.data_mut().log.clear();

        machine.run();

        assert_eq!(machine.current_state(), WorkflowState::Processing);
        assert_eq!(machine.pending_state(), None);
        assert_eq!(
            machine.data().signals(),
            vec![
                (WorkflowState::Initial, Signal::Exit),
                (WorkflowState::Processing, Signal::Entry),
                (WorkflowState::Processing, Signal::Run),
            ]
        );
        let last = machine.trace().last().unwrap();
        assert_eq!(last.from, WorkflowState::Initial);
        assert_eq!(last.to, WorkflowState::Processing);
        assert_eq!(last.step, 2);
    }

    #[test]
    fn run_returns_handler_outcome() {
        let mut machine = machine();
        machine.init();
        machine.data_mut().next = Some(WorkflowState::Complete);
        machine.run();
        assert_eq!(machine.run(), Outcome::Done);
    }

    #[test]
    fn out_of_range_request_is_reported_and_state_kept() {
        let mut machine = machine();
        machine.init();
        machine.data_mut().out_of_range = true;
        machine.run();
        machine.data_mut().log.clear();

        let err = machine.try_run().unwrap_err();

        assert_eq!(
            err,
            EngineError::StateOutOfRange {
                machine: "workflow".to_string(),
                index: WorkflowState::COUNT + 5,
                max: WorkflowState::COUNT,
            }
        );
        assert_eq!(err.outcome(), Outcome::StateOutOfRange);
        assert_eq!(machine.current_state(), WorkflowState::Initial);
        assert!(machine.data().log.is_empty());
        assert_eq!(machine.steps(), 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_request_is_fatal_for_run() {
        let mut machine = machine();
        machine.init();
        machine.data_mut().out_of_range = true;
        machine.run();
        machine.run();
    }

    #[test]
    fn dispatch_delivers_user_event_after_commit() {
        let mut machine = machine();
        machine.init();
        machine.data_mut().next = Some(WorkflowState::Processing);
        machine.run();
        machine.data_mut().log.clear();

        assert_eq!(machine.dispatch(2, 40), Outcome::Ok);

        assert_eq!(
            machine.data().signals(),
            vec![
                (WorkflowState::Initial, Signal::Exit),
                (WorkflowState::Processing, Signal::Entry),
                (WorkflowState::Processing, Signal::User(2)),
            ]
        );
    }

    #[test]
    fn init_after_transition_returns_to_initial_state() {
        let mut machine = machine();
        machine.init();
        machine.data_mut().next = Some(WorkflowState::Processing);
        machine.run();
        machine.run();
        machine.data_mut().log.clear();

        machine.init();
        machine.run();

        assert_eq!(machine.current_state(), WorkflowState::Initial);
        assert_eq!(
            machine.data().signals(),
            vec![
                (WorkflowState::Processing, Signal::Exit),
                (WorkflowState::Initial, Signal::Entry),
                (WorkflowState::Initial, Signal::Run),
            ]
        );
    }

    #[test]
    fn init_in_initial_state_re_enters_without_exit() {
        let mut machine = machine();
        machine.init();
        machine.run();
        machine.data_mut().log.clear();

        machine.init();
        machine.run();

        assert_eq!(
            machine.data().signals(),
            vec![
                (WorkflowState::Initial, Signal::Entry),
                (WorkflowState::Initial, Signal::Run),
            ]
        );
    }

    #[test]
    fn time_in_state_resets_on_commit() {
        let mut machine = machine();
        machine.init();
        machine.run();
        std::thread::sleep(Duration::from_millis(20));
        let before = machine.time_in_state().unwrap();
        assert!(before >= Duration::from_millis(20));

        machine.data_mut().next = Some(WorkflowState::Processing);
        machine.run();
        machine.run();

        assert!(machine.time_in_state().unwrap() < before);
    }

    #[test]
    fn time_in_state_is_none_before_first_step() {
        let machine = machine();
        assert!(machine.time_in_state().is_none());
        assert_eq!(machine.max_states(), 3);
        assert_eq!(machine.name(), "workflow");
    }

    // Extended rows

    #[derive(Default)]
    struct Gate {
        open: bool,
        entries: u32,
        exits: u32,
        runs: u32,
        action_signals: Vec<Signal>,
    }

    fn gated_machine() -> StateMachine<Gate, WorkflowState, (), NoTrace> {
        let map = StateMap::builder()
            .row(
                WorkflowState::Initial,
                StateRow::new(|g: &mut Gate, ctx: &mut Context<'_, WorkflowState>, ev: &Event| {
                    g.action_signals.push(ev.signal());
                    if let Event::Run = ev {
                        g.runs += 1;
                        ctx.request_transition(WorkflowState::Processing);
                    }
                    Outcome::Ok
                })
                .when(|g: &Gate, _| g.open)
                .on_entry(|g, _| g.entries += 1)
                .on_exit(|g, _| g.exits += 1),
            )
            .state(WorkflowState::Processing, |g, _, ev| {
                g.action_signals.push(ev.signal());
                Outcome::Ok
            })
            .state(WorkflowState::Complete, |_, _, _| Outcome::Ok)
            .build()
            .unwrap();

        StateMachine::builder(map)
            .initial(WorkflowState::Initial)
            .trace(NoTrace)
            .build(Gate::default())
            .unwrap()
    }

    #[test]
    fn closed_guard_suppresses_entry_and_run() {
        let mut machine = gated_machine();
        machine.init();
        machine.run();
        machine.run();

        let gate = machine.data();
        assert_eq!(gate.entries, 0);
        assert_eq!(gate.runs, 0);
        assert!(gate.action_signals.is_empty());
        assert!(machine.is_initialized());
        assert_eq!(machine.current_state(), WorkflowState::Initial);
    }

    #[test]
    fn dedicated_handlers_replace_entry_and_exit_signals() {
        let mut machine = gated_machine();
        machine.data_mut().open = true;
        machine.init();
        machine.run();
        machine.run();

        let gate = machine.data();
        assert_eq!(gate.entries, 1);
        assert_eq!(gate.exits, 1);
        assert_eq!(gate.runs, 1);
        assert_eq!(
            gate.action_signals,
            vec![Signal::Run, Signal::Entry, Signal::Run]
        );
        assert_eq!(machine.current_state(), WorkflowState::Processing);
    }

    #[test]
    fn exit_is_never_guarded() {
        let mut machine = gated_machine();
        machine.data_mut().open = true;
        machine.init();
        machine.run();
        machine.data_mut().open = false;
        machine.run();

        assert_eq!(machine.data().exits, 1);
        assert_eq!(machine.current_state(), WorkflowState::Processing);
    }

    #[test]
    fn instances_share_one_map() {
        let map = Arc::new(recording_map());
        let a = StateMachine::builder(Arc::clone(&map))
            .initial(WorkflowState::Initial)
            .build(Recorder::default())
            .unwrap();
        let b = StateMachine::builder(Arc::clone(&map))
            .initial(WorkflowState::Processing)
            .build(Recorder::default())
            .unwrap();

        assert!(Arc::ptr_eq(a.map(), b.map()));
        assert_eq!(Arc::strong_count(&map), 3);
    }

    #[test]
    fn user_event_payload_reaches_handler() {
        let map = StateMap::<Vec<u32>, WorkflowState, u32>::builder()
            .state(WorkflowState::Initial, |seen, _, ev| {
                if let Event::User { payload, .. } = ev {
                    seen.push(*payload);
                }
                Outcome::Running
            })
            .state(WorkflowState::Processing, |_, _, _| Outcome::Ok)
            .state(WorkflowState::Complete, |_, _, _| Outcome::Ok)
            .build()
            .unwrap();
        let mut machine = StateMachine::builder(map)
            .initial(WorkflowState::Initial)
            .build(Vec::new())
            .unwrap();

        machine.init();
        assert_eq!(machine.dispatch(0, 1500), Outcome::Running);
        assert_eq!(machine.dispatch(0, 900), Outcome::Running);
        assert_eq!(machine.into_data(), vec![1500, 900]);
    }
}
