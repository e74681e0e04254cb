//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the engine and action providers
//! so clients can bubble them up with consistent context.
use std::fmt;

use battle_core::{CommandError, EngineError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} action provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("no battle has been initialized")]
    NotStarted,

    #[error(transparent)]
    Rejected(#[from] CommandError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    Player,
    Enemy,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Player => "player",
            ProviderKind::Enemy => "enemy",
        };
        write!(f, "{}", label)
    }
}
