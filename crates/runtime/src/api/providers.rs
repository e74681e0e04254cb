//! Asynchronous abstraction for sourcing player and enemy intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so battles can
//! run with human input, scripted fixtures, or AI policies.
use async_trait::async_trait;
use battle_core::{ActionCommand, BattleState, UnitId};

use super::errors::Result;

/// Trait for providing commands based on the current battle state.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Enemy behavior trees
/// - Scripted/replayed commands
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide a command for `unit`, or `None` to let it pass this round.
    ///
    /// # Arguments
    /// * `unit` - The unit that needs to act
    /// * `state` - Copy of the battle state at the time of asking
    async fn provide_action(&self, unit: UnitId, state: &BattleState)
    -> Result<Option<ActionCommand>>;
}
