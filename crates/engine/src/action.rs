//! Gesture actions and the amount each one moves.

use serde::{Deserialize, Serialize};

/// What a drag or scroll gesture does with every slot it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    #[default]
    None,
    ScrollToOtherMoveOne,
    ScrollToOtherStacks,
    MoveToOtherMoveOne,
    MoveToOtherLeaveOne,
    MoveToOtherStacks,
    MoveToOtherMatching,
    DropOne,
    DropLeaveOne,
    DropStacks,
    MoveDownMoveOne,
    MoveDownLeaveOne,
    MoveDownStacks,
    MoveDownMatching,
    MoveUpMoveOne,
    MoveUpLeaveOne,
    MoveUpStacks,
    MoveUpMatching,
}

/// How much of a slot an action moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveAmount {
    #[default]
    None,
    MoveOne,
    LeaveOne,
    FullStacks,
    AllMatching,
}

impl MoveAction {
    /// Amount moved per slot.
    pub fn amount(self) -> MoveAmount {
        match self {
            Self::ScrollToOtherMoveOne
            | Self::MoveToOtherMoveOne
            | Self::DropOne
            | Self::MoveDownMoveOne
            | Self::MoveUpMoveOne => MoveAmount::MoveOne,
            Self::MoveToOtherLeaveOne
            | Self::DropLeaveOne
            | Self::MoveDownLeaveOne
            | Self::MoveUpLeaveOne => MoveAmount::LeaveOne,
            Self::ScrollToOtherStacks
            | Self::MoveToOtherStacks
            | Self::DropStacks
            | Self::MoveDownStacks
            | Self::MoveUpStacks => MoveAmount::FullStacks,
            Self::MoveToOtherMatching | Self::MoveDownMatching | Self::MoveUpMatching => {
                MoveAmount::AllMatching
            }
            Self::None => MoveAmount::None,
        }
    }

    /// Vertical direction of a move-up / move-down action: `Some(true)` for up.
    pub fn vertical(self) -> Option<bool> {
        match self {
            Self::MoveUpMoveOne | Self::MoveUpLeaveOne | Self::MoveUpStacks | Self::MoveUpMatching => {
                Some(true)
            }
            Self::MoveDownMoveOne
            | Self::MoveDownLeaveOne
            | Self::MoveDownStacks
            | Self::MoveDownMatching => Some(false),
            _ => None,
        }
    }

    /// Check if the action throws items out of the window.
    pub fn is_drop(self) -> bool {
        matches!(self, Self::DropOne | Self::DropLeaveOne | Self::DropStacks)
    }
}
