//! State identifiers.
//!
//! A machine's states form a contiguous, zero-based enumeration. The engine
//! only ever stores states as indices into that enumeration, which is what
//! lets the state map be a plain array.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for the state enumeration of a machine.
///
/// Implementations must list every state in [`StateId::ALL`] in declaration
/// order, and `ALL[i].index()` must equal `i`. The [`state_ids!`] macro
/// generates a conforming enum; the state map builder rejects hand-written
/// impls that break the ordering.
///
/// [`state_ids!`]: crate::state_ids
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateId;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Valve {
///     Closed,
///     Open,
/// }
///
/// impl StateId for Valve {
///     const ALL: &'static [Self] = &[Self::Closed, Self::Open];
///
///     fn index(&self) -> usize {
///         *self as usize
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open => "Open",
///         }
///     }
/// }
///
/// assert_eq!(Valve::COUNT, 2);
/// assert_eq!(Valve::from_index(1), Some(Valve::Open));
/// assert_eq!(Valve::from_index(2), None);
/// ```
pub trait StateId: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every state, in enumeration order.
    const ALL: &'static [Self];

    /// Number of declared states.
    const COUNT: usize = Self::ALL.len();

    /// Zero-based position of the state in the enumeration.
    fn index(&self) -> usize;

    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Look up a state by index.
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}
