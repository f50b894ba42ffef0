//! Macros for declaring machine states.

/// Declare a state enumeration and its `StateId` implementation.
///
/// Variants are numbered from zero in declaration order, which is also the
/// order rows appear in the state map.
///
/// # Example
///
/// ```
/// use tickstate::core::StateId;
/// use tickstate::state_ids;
///
/// state_ids! {
///     pub enum ConveyorState {
///         Stopped,
///         Accelerating,
///         Cruising,
///     }
/// }
///
/// assert_eq!(ConveyorState::COUNT, 3);
/// assert_eq!(ConveyorState::Cruising.index(), 2);
/// assert_eq!(ConveyorState::Accelerating.name(), "Accelerating");
/// ```
#[macro_export]
macro_rules! state_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateId for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),*];

            fn index(&self) -> usize {
                *self as usize
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
