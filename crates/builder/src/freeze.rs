//! Per-instance freeze state machine.
//!
//! `Mutable` and `ImmutableLive` are the two initial states, picked from the
//! governing mutability of the instance's type. `ImmutableLive` only exists
//! while the constructor assigns fields; [`FreezeState::finalize`] moves it to
//! the terminal `Frozen` state. `Mutable` never freezes.

use crate::field_spec::Mutability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreezeState {
    Mutable,
    ImmutableLive,
    Frozen,
}

impl FreezeState {
    pub fn initial(mutability: Mutability) -> Self {
        match mutability {
            Mutability::Mutable => Self::Mutable,
            Mutability::Immutable => Self::ImmutableLive,
        }
    }

    /// Last construction step.
    pub fn finalize(self) -> Self {
        match self {
            Self::ImmutableLive | Self::Frozen => Self::Frozen,
            Self::Mutable => Self::Mutable,
        }
    }

    pub fn is_frozen(self) -> bool {
        self == Self::Frozen
    }
}
