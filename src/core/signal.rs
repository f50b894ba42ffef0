//! Signals delivered to state handlers.
//!
//! The first four values are reserved by the engine. Everything from
//! [`Signal::USER_BASE`] upwards belongs to the concrete machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of occurrence delivered to a state.
///
/// # Example
///
/// ```rust
/// use tickstate::core::Signal;
///
/// assert_eq!(Signal::Run.raw(), 3);
/// assert_eq!(Signal::User(2).raw(), 6);
/// assert_eq!(Signal::from_raw(6), Signal::User(2));
/// assert!(Signal::User(0).is_user());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Signal {
    /// Delivered once when a state becomes current
    Entry,
    /// Reserved; the engine never synthesizes it
    Init,
    /// Delivered once when a state stops being current
    Exit,
    /// Delivered on every engine step
    Run,
    /// Machine-specific signal, numbered from zero
    User(u16),
}

impl Signal {
    /// First raw value available to machine-specific signals.
    pub const USER_BASE: u32 = 4;

    /// Raw numeric value of the signal.
    pub fn raw(self) -> u32 {
        match self {
            Self::Entry => 0,
            Self::Init => 1,
            Self::Exit => 2,
            Self::Run => 3,
            Self::User(n) => Self::USER_BASE + u32::from(n),
        }
    }

    /// Decode a raw value.
    ///
    /// Values past the `u16` user range saturate to `User(u16::MAX)`, so
    /// `from_raw(raw).raw() == raw` only holds up to that signal. Use
    /// `Signal::try_from` to reject such values instead.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Entry,
            1 => Self::Init,
            2 => Self::Exit,
            3 => Self::Run,
            n => Self::User(u16::try_from(n - Self::USER_BASE).unwrap_or(u16::MAX)),
        }
    }

    /// Check whether this is a machine-specific signal.
    pub fn is_user(self) -> bool {
        matches!(self, Self::User(_))
    }
}

/// Raw signal value past the last user signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("raw signal {0} is past the last user signal")]
pub struct SignalOutOfRange(pub u32);

impl TryFrom<u32> for Signal {
    type Error = SignalOutOfRange;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        if raw > Signal::User(u16::MAX).raw() {
            return Err(SignalOutOfRange(raw));
        }
        Ok(Self::from_raw(raw))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("ENTRY"),
            Self::Init => f.write_str("INIT"),
            Self::Exit => f.write_str("EXIT"),
            Self::Run => f.write_str("RUN"),
            Self::User(n) => write!(f, "USER({n})"),
        }
    }
}
