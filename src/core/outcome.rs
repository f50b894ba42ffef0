//! Result codes returned from engine steps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a step, as seen by the driver loop.
///
/// The engine itself only ever contributes [`Outcome::Ok`]. Handlers return
/// the richer codes to tell the driver something about the domain, for
/// example that the machine is [`Outcome::Done`] and ticking may stop.
///
/// Codes at or above 100 are error codes.
///
/// # Example
///
/// ```rust
/// use tickstate::core::Outcome;
///
/// assert_eq!(Outcome::Done.code(), 4);
/// assert_eq!(Outcome::from_code(101), Some(Outcome::StateOutOfRange));
/// assert!(Outcome::Unhandled.is_error());
/// assert!(!Outcome::Delay.is_error());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Ok,
    Running,
    Idle,
    Delay,
    Done,
    Error,
    StateOutOfRange,
    NoMemory,
    Unhandled,
    Unrecoverable,
}

impl Outcome {
    /// Numeric code of the outcome.
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Running => 1,
            Self::Idle => 2,
            Self::Delay => 3,
            Self::Done => 4,
            Self::Error => 100,
            Self::StateOutOfRange => 101,
            Self::NoMemory => 102,
            Self::Unhandled => 103,
            Self::Unrecoverable => 104,
        }
    }

    /// Decode a numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        let outcome = match code {
            0 => Self::Ok,
            1 => Self::Running,
            2 => Self::Idle,
            3 => Self::Delay,
            4 => Self::Done,
            100 => Self::Error,
            101 => Self::StateOutOfRange,
            102 => Self::NoMemory,
            103 => Self::Unhandled,
            104 => Self::Unrecoverable,
            _ => return None,
        };
        Some(outcome)
    }

    /// Check whether this is an error code.
    pub fn is_error(self) -> bool {
        self.code() >= 100
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::Running => "RUNNING",
            Self::Idle => "IDLE",
            Self::Delay => "DELAY",
            Self::Done => "DONE",
            Self::Error => "ERROR",
            Self::StateOutOfRange => "STATE_OUT_OF_RANGE",
            Self::NoMemory => "NO_MEMORY",
            Self::Unhandled => "UNHANDLED",
            Self::Unrecoverable => "UNRECOVERABLE",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Outcome; 10] = [
        Outcome::Ok,
        Outcome::Running,
        Outcome::Idle,
        Outcome::Delay,
        Outcome::Done,
        Outcome::Error,
        Outcome::StateOutOfRange,
        Outcome::NoMemory,
        Outcome::Unhandled,
        Outcome::Unrecoverable,
    ];

    #[test]
    fn every_code_decodes_to_its_outcome() {
        for outcome in ALL {
            assert_eq!(Outcome::from_code(outcome.code()), Some(outcome));
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(Outcome::from_code(5), None);
        assert_eq!(Outcome::from_code(99), None);
        assert_eq!(Outcome::from_code(105), None);
    }

    #[test]
    fn only_error_range_is_error() {
        let errors: Vec<_> = ALL.iter().filter(|o| o.is_error()).collect();
        assert_eq!(errors.len(), 5);
        assert!(!Outcome::Done.is_error());
        assert!(Outcome::Error.is_error());
    }

    #[test]
    fn default_is_ok() {
        assert_eq!(Outcome::default(), Outcome::Ok);
    }

    #[test]
    fn display_matches_code_names() {
        assert_eq!(Outcome::StateOutOfRange.to_string(), "STATE_OUT_OF_RANGE");
    }
}
