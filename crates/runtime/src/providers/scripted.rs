//! Replays a fixed list of commands. Mostly useful in tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use battle_core::{ActionCommand, BattleState, UnitId};
use tokio::sync::Mutex;

use crate::api::{ActionProvider, Result};

#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<ActionCommand>>,
}

impl ScriptedProvider {
    pub fn new(commands: impl IntoIterator<Item = ActionCommand>) -> Self {
        Self {
            script: Mutex::new(commands.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    /// Hands out the next scripted command if it belongs to `unit`.
    ///
    /// A command for another unit stays at the front until that unit is
    /// asked, so a script reads in the order the battle plays it.
    async fn provide_action(
        &self,
        unit: UnitId,
        _state: &BattleState,
    ) -> Result<Option<ActionCommand>> {
        let mut script = self.script.lock().await;
        match script.front() {
            Some(command) if command.initiator == unit => Ok(script.pop_front()),
            _ => Ok(None),
        }
    }
}
