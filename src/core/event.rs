//! Events handed to state handlers.

use super::signal::Signal;

/// A single occurrence delivered to a state.
///
/// Reserved signals carry no data. User events carry a payload whose type is
/// fixed for the whole machine, so a handler can never receive a payload of
/// the wrong type.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{Event, Signal};
///
/// let event = Event::user(1, 1500_u32);
/// assert_eq!(event.signal(), Signal::User(1));
/// assert_eq!(event.payload(), Some(&1500));
///
/// let run: Event<u32> = Event::Run;
/// assert_eq!(run.payload(), None);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Event<P = ()> {
    Entry,
    Init,
    Exit,
    Run,
    User { signal: u16, payload: P },
}

impl<P> Event<P> {
    /// Create a user event.
    pub fn user(signal: u16, payload: P) -> Self {
        Event::User { signal, payload }
    }

    /// The signal this event carries.
    pub fn signal(&self) -> Signal {
        match self {
            Event::Entry => Signal::Entry,
            Event::Init => Signal::Init,
            Event::Exit => Signal::Exit,
            Event::Run => Signal::Run,
            Event::User { signal, .. } => Signal::User(*signal),
        }
    }

    /// The payload of a user event.
    pub fn payload(&self) -> Option<&P> {
        match self {
            Event::User { payload, .. } => Some(payload),
            _ => None,
        }
    }
}
