//! Errors surfaced by engine entry points.

use crate::action::CommandError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{DeckError, Team};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error("a battle is already active; reset before initializing another")]
    AlreadyActive,

    #[error("no battle round is active")]
    NotActive,

    #[error("{team} is not the active team")]
    NotActiveTeam { team: Team },

    #[error("insufficient action points: required {required}, available {available}")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Deck(#[from] DeckError),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::AlreadyActive | EngineError::NotActive => ErrorSeverity::Recoverable,
            EngineError::NotActiveTeam { .. } | EngineError::InsufficientActionPoints { .. } => {
                ErrorSeverity::Recoverable
            }
            EngineError::Command(error) => error.severity(),
            EngineError::Deck(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::AlreadyActive => "ENGINE_ALREADY_ACTIVE",
            EngineError::NotActive => "ENGINE_NOT_ACTIVE",
            EngineError::NotActiveTeam { .. } => "ENGINE_NOT_ACTIVE_TEAM",
            EngineError::InsufficientActionPoints { .. } => "ENGINE_INSUFFICIENT_ACTION_POINTS",
            EngineError::Command(error) => error.error_code(),
            EngineError::Deck(error) => error.error_code(),
        }
    }
}
