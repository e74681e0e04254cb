//! Enemy turns driven by archetype behavior trees.

use tracing::{debug, info};

use super::BattleEngine;
use crate::action::{ActionCommand, CommandError};
use crate::controller::Decision;
use crate::events::BattleEvent;
use crate::state::{Team, UnitId};

impl BattleEngine {
    /// What the enemy `unit` would do right now. Pure: nothing is committed.
    pub fn enemy_decision(&self, unit: UnitId) -> Option<Decision> {
        let controller = self.state.controller(unit)?;
        if !controller.can_act(&self.state) {
            return None;
        }
        controller.brain()?.decide(&self.state, unit)
    }

    /// Decides, confirms and fully resolves one enemy's turn.
    ///
    /// The brain's memory (charge, cooldowns) only advances when the command
    /// is accepted; see [`confirm_action`](Self::confirm_action). Returns the
    /// command that ran, if any.
    pub fn take_enemy_turn(&mut self, unit: UnitId) -> Result<Option<ActionCommand>, CommandError> {
        let Some(decision) = self.enemy_decision(unit) else {
            debug!(target: "battle::ai", unit = %unit, "enemy passes");
            return Ok(None);
        };

        self.confirm_action(decision.command)?;
        info!(
            target: "battle::ai",
            unit = %unit,
            kind = decision.command.kind.as_str(),
            target = ?decision.command.target,
            "enemy acts"
        );
        self.run_pending();
        Ok(Some(decision.command))
    }

    /// Plays the whole enemy round: each living enemy acts once in id order,
    /// then the round ends.
    pub fn run_enemy_round(&mut self) {
        if self.state.active_team() != Some(Team::Enemy) {
            return;
        }
        for unit in self.state.living_ids(Team::Enemy) {
            if !self.state.phase.is_active() {
                return;
            }
            if let Err(error) = self.take_enemy_turn(unit) {
                debug!(target: "battle::ai", unit = %unit, %error, "enemy command rejected");
            }
        }
        if self.state.active_team() == Some(Team::Enemy) {
            self.end_round();
        }
    }

    /// Announces what each enemy intends to do this round.
    pub(super) fn publish_previews(&mut self) {
        for unit in self.state.living_ids(Team::Enemy) {
            if let Some(decision) = self.enemy_decision(unit) {
                self.emit(BattleEvent::EnemyActionPreview {
                    unit,
                    command: decision.command,
                });
            }
        }
    }
}
