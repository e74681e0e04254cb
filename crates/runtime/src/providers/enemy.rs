//! Enemy intent from the unit's archetype behavior tree.

use std::time::Duration;

use async_trait::async_trait;
use battle_core::{ActionCommand, BattleState, UnitId};
use tracing::debug;

use crate::api::{ActionProvider, Result};

/// Asks the enemy's own brain what to do, optionally after a pause so a
/// presentation layer can show the preview first.
#[derive(Debug, Clone, Default)]
pub struct EnemyAiProvider {
    think_delay: Duration,
}

impl EnemyAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_think_delay(think_delay: Duration) -> Self {
        Self { think_delay }
    }
}

#[async_trait]
impl ActionProvider for EnemyAiProvider {
    async fn provide_action(
        &self,
        unit: UnitId,
        state: &BattleState,
    ) -> Result<Option<ActionCommand>> {
        if !self.think_delay.is_zero() {
            tokio::time::sleep(self.think_delay).await;
        }

        let Some(controller) = state.controller(unit) else {
            return Ok(None);
        };
        if !controller.can_act(state) {
            return Ok(None);
        }

        let decision = controller
            .brain()
            .and_then(|brain| brain.decide(state, unit));
        debug!(
            target: "runtime::provider",
            unit = %unit,
            command = ?decision.map(|d| d.command.kind.as_str()),
            "enemy decided"
        );
        Ok(decision.map(|d| d.command))
    }
}
