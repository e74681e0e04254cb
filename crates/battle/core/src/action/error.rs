//! Command rejection reasons.

use crate::action::ActionCost;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{MaskId, ResourceKind, Team, UnitId};

/// Why a command was rejected. A rejected command never mutates state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("no battle round is active")]
    BattleNotActive,

    #[error("{unit} not found")]
    UnitNotFound { unit: UnitId },

    #[error("{unit} is dead")]
    InitiatorDead { unit: UnitId },

    #[error("{unit} belongs to {team}, which is not the active team")]
    NotActiveTeam { unit: UnitId, team: Team },

    #[error("{unit} is stunned")]
    Stunned { unit: UnitId },

    #[error("{unit} cannot act this turn")]
    CannotAct { unit: UnitId },

    #[error("insufficient {kind}: required {required}, available {available}")]
    InsufficientResources {
        kind: ResourceKind,
        required: u32,
        available: u32,
    },

    #[error("command cost {actual:?} does not match required {expected:?}")]
    CostMismatch {
        expected: ActionCost,
        actual: ActionCost,
    },

    #[error("command requires a target")]
    MissingTarget,

    #[error("target {unit} not found")]
    TargetNotFound { unit: UnitId },

    #[error("target {unit} is dead")]
    TargetDead { unit: UnitId },

    #[error("target {unit} is not an opponent")]
    TargetNotHostile { unit: UnitId },

    #[error("{mask} not found")]
    MaskNotFound { mask: MaskId },

    #[error("{mask} is not in the team's hand")]
    MaskNotInHand { mask: MaskId },

    #[error("{mask} is not equipped by the initiator")]
    MaskNotEquipped { mask: MaskId },

    #[error("{mask} was already activated this turn")]
    ActivationSpent { mask: MaskId },

    #[error("{mask} has no activation effects")]
    NoActivationEffects { mask: MaskId },
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        use CommandError::*;
        match self {
            BattleNotActive | NotActiveTeam { .. } => ErrorSeverity::Recoverable,
            Stunned { .. } | CannotAct { .. } => ErrorSeverity::Recoverable,
            InsufficientResources { .. } | ActivationSpent { .. } => ErrorSeverity::Recoverable,
            UnitNotFound { .. } | TargetNotFound { .. } | MaskNotFound { .. } => {
                ErrorSeverity::Validation
            }
            InitiatorDead { .. } | TargetDead { .. } | TargetNotHostile { .. } => {
                ErrorSeverity::Validation
            }
            CostMismatch { .. } | MissingTarget => ErrorSeverity::Validation,
            MaskNotInHand { .. } | MaskNotEquipped { .. } | NoActivationEffects { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use CommandError::*;
        match self {
            BattleNotActive => "COMMAND_BATTLE_NOT_ACTIVE",
            UnitNotFound { .. } => "COMMAND_UNIT_NOT_FOUND",
            InitiatorDead { .. } => "COMMAND_INITIATOR_DEAD",
            NotActiveTeam { .. } => "COMMAND_NOT_ACTIVE_TEAM",
            Stunned { .. } => "COMMAND_STUNNED",
            CannotAct { .. } => "COMMAND_CANNOT_ACT",
            InsufficientResources { .. } => "COMMAND_INSUFFICIENT_RESOURCES",
            CostMismatch { .. } => "COMMAND_COST_MISMATCH",
            MissingTarget => "COMMAND_MISSING_TARGET",
            TargetNotFound { .. } => "COMMAND_TARGET_NOT_FOUND",
            TargetDead { .. } => "COMMAND_TARGET_DEAD",
            TargetNotHostile { .. } => "COMMAND_TARGET_NOT_HOSTILE",
            MaskNotFound { .. } => "COMMAND_MASK_NOT_FOUND",
            MaskNotInHand { .. } => "COMMAND_MASK_NOT_IN_HAND",
            MaskNotEquipped { .. } => "COMMAND_MASK_NOT_EQUIPPED",
            ActivationSpent { .. } => "COMMAND_ACTIVATION_SPENT",
            NoActivationEffects { .. } => "COMMAND_NO_ACTIVATION_EFFECTS",
        }
    }
}
