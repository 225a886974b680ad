//! Rejected actions

use crate::types::Side;
use thiserror::Error;

/// Why a submitted action was refused
///
/// A rejected action never changes battle state; the caller resubmits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("The battle is already over")]
    BattleOver,
    #[error("{side} already submitted an action this turn")]
    DuplicateSubmission { side: Side },
    #[error("{side} has no move in slot {slot}")]
    UnknownMove { side: Side, slot: usize },
    #[error("{name} has no PP left")]
    NoPp { side: Side, slot: usize, name: String },
    #[error("{side} has no creature in slot {index}")]
    UnknownSlot { side: Side, index: usize },
    #[error("{name} is already in battle")]
    SwapToActive { side: Side, index: usize, name: String },
    #[error("{name} has fainted and cannot battle")]
    SwapToFainted { side: Side, index: usize, name: String },
    #[error("{side} must swap in a replacement first")]
    SwapRequired { side: Side },
    #[error("{side} is not expected to act right now")]
    NotExpected { side: Side },
    #[error("Forfeit is only accepted while waiting for actions")]
    ForfeitNotAllowed,
}
