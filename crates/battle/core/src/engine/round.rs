use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use super::{BattleEngine, EngineError};
use crate::action::ActionExecutor;
use crate::controller::Controller;
use crate::effect::EffectTiming;
use crate::events::BattleEvent;
use crate::rng::{SeedContext, compute_seed};
use crate::state::{
    BattlePhase, BattleState, Deck, MaskId, MaskLocation, ResourceKind, StatusKind, Team, Unit,
    UnitId, UnitTemplate,
};

impl BattleEngine {
    /// Sets up a new battle and starts the first (player) round.
    ///
    /// Teams are assigned from the side each template is passed on. Units
    /// spawned dead are never registered. Calling this while a round is
    /// active is rejected; call [`reset`](Self::reset) first.
    pub fn initialize_battle(
        &mut self,
        player_units: Vec<UnitTemplate>,
        enemy_units: Vec<UnitTemplate>,
    ) -> Result<(), EngineError> {
        if self.state.phase.is_active() {
            warn!(
                target: "battle::engine",
                round = self.state.round,
                "initialize_battle called while a battle is active; ignoring"
            );
            return Err(EngineError::AlreadyActive);
        }

        let config = self.state.config.clone();
        self.state = BattleState::new(config.clone());
        self.executor = ActionExecutor::new();
        self.destroying.clear();
        self.shuffles = 0;

        for team in Team::iter() {
            self.state
                .pools
                .get_mut(team)
                .set_max(ResourceKind::ActionPoint, config.action_point_max);
        }

        let mut equipped = Vec::new();
        for (team, templates) in [(Team::Player, player_units), (Team::Enemy, enemy_units)] {
            for template in &templates {
                if let Some(mask) = self.spawn_unit(team, template) {
                    equipped.push(mask);
                }
            }
        }

        for team in Team::iter() {
            self.build_deck(team);
        }

        // Registration happens once every unit exists so OnEquip effects can
        // resolve allies and enemies.
        let living: Vec<UnitId> = self
            .state
            .units
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| u.id)
            .collect();
        self.state.roster.extend(living);

        for (unit, mask) in equipped {
            self.emit(BattleEvent::MaskEquipped { unit, mask });
            self.run_mask_effects(mask, EffectTiming::OnEquip, None);
        }

        let player_units = self.state.living_ids(Team::Player);
        let enemy_units = self.state.living_ids(Team::Enemy);
        info!(
            target: "battle::engine",
            players = player_units.len(),
            enemies = enemy_units.len(),
            seed = config.game_seed,
            "battle initialized"
        );
        self.emit(BattleEvent::BattleStarted {
            player_units,
            enemy_units,
        });

        if let Some(winner) = self.check_victory() {
            self.state.phase = BattlePhase::RoundActive(Team::Player);
            self.finish_battle(winner);
            return Ok(());
        }

        self.state.phase = BattlePhase::RoundActive(Team::Player);
        self.start_round();
        Ok(())
    }

    /// Drops the current battle and returns to `Idle`. Observers stay registered.
    pub fn reset(&mut self) {
        let config = self.state.config.clone();
        self.state = BattleState::new(config);
        self.executor = ActionExecutor::new();
        self.destroying.clear();
        self.shuffles = 0;
        debug!(target: "battle::engine", "battle reset");
    }

    fn spawn_unit(&mut self, team: Team, template: &UnitTemplate) -> Option<(UnitId, MaskId)> {
        let id = UnitId(self.state.units.len() as u32);
        let mut unit = Unit::from_template(id, team, template);
        let controller = Controller::new(
            id,
            team,
            template.control,
            self.state.config.attack_allowance_max,
        );

        let mask = template.starting_mask.as_ref().map(|mask_template| {
            let mask_id = MaskId(self.state.masks.len() as u32);
            self.state.masks.push(mask_template.instantiate(
                mask_id,
                team,
                MaskLocation::Equipped(id),
            ));
            mask_id
        });
        unit.mask = mask;

        debug!(
            target: "battle::engine",
            unit = %id,
            name = %unit.name,
            %team,
            lane = %unit.lane,
            health = unit.current_health,
            "unit spawned"
        );
        let alive = unit.is_alive();
        self.state.units.push(unit);
        self.state.controllers.push(controller);

        match mask {
            Some(mask) if alive => Some((id, mask)),
            _ => None,
        }
    }

    fn build_deck(&mut self, team: Team) {
        let list = self.deck_lists.get(team).clone();
        if list.is_empty() {
            return;
        }
        let ids: Vec<MaskId> = list
            .iter()
            .map(|template| {
                let id = MaskId(self.state.masks.len() as u32);
                self.state
                    .masks
                    .push(template.instantiate(id, team, MaskLocation::Deck));
                id
            })
            .collect();

        let mut deck = Deck::new(ids);
        let seed = compute_seed(
            self.state.config.game_seed,
            0,
            team.index() as u32,
            SeedContext::Shuffle as u32,
        );
        deck.shuffle(&self.rng, seed);
        *self.state.decks.get_mut(team) = Some(deck);

        let opening = self.state.config.opening_hand.min(self.state.config.hand_limit);
        for _ in 0..opening {
            if self.draw_into_hand(team).is_none() {
                break;
            }
        }
    }

    /// Begins the active team's round.
    ///
    /// Status ticks and controller turn-start for every living unit on the
    /// active team, then resource grants. Enemy rounds publish a preview of
    /// each enemy's intended command; player rounds request input.
    pub fn start_round(&mut self) {
        let Some(team) = self.state.active_team() else {
            debug!(target: "battle::engine", phase = ?self.state.phase, "start_round ignored");
            return;
        };
        self.state.round += 1;
        let round = self.state.round;

        for id in self.state.living_ids(team) {
            self.unit_turn_start(id);
            if !self.state.is_alive(id) {
                continue;
            }
            if let Some(controller) = self.state.controller_mut(id) {
                controller.on_turn_start();
            }
            if let Some(mask) = self.state.unit(id).and_then(|u| u.mask)
                && let Some(record) = self.state.mask_mut(mask)
            {
                record.can_activate = true;
            }
        }

        if let Some(winner) = self.check_victory() {
            self.finish_battle(winner);
            return;
        }

        self.grant_resources(team);

        if team == Team::Enemy {
            self.publish_previews();
        }

        info!(target: "battle::engine", %team, round, "round started");
        self.emit(BattleEvent::RoundStarted { team, round });

        if team == Team::Player {
            for id in self.state.living_ids(team) {
                self.player_take_turn(id);
            }
        }
    }

    fn grant_resources(&mut self, team: Team) {
        let base = self.state.config.base_attack_allowance;
        for id in self.state.living_ids(team) {
            if let Some(controller) = self.state.controller_mut(id) {
                controller.resources.reset_to(ResourceKind::Attack, base);
            }
        }

        let pool = self.state.pools.get_mut(team);
        pool.refill(ResourceKind::ActionPoint);
        let amount = pool.get(ResourceKind::ActionPoint);
        debug!(target: "battle::engine", %team, amount, "action points granted");
        self.emit(BattleEvent::ActionPointsGranted { team, amount });
    }

    /// Regeneration heals and poison hurts, in application order.
    fn unit_turn_start(&mut self, id: UnitId) {
        let ticks: Vec<(StatusKind, i32)> = self
            .state
            .unit(id)
            .map(|u| {
                u.statuses
                    .iter()
                    .filter(|s| matches!(s.kind, StatusKind::Regeneration | StatusKind::Poison))
                    .map(|s| (s.kind, s.tick_amount()))
                    .collect()
            })
            .unwrap_or_default();

        for (kind, amount) in ticks {
            let signed = if kind == StatusKind::Poison { -amount } else { amount };
            self.apply_health_change(id, signed);
        }
    }

    /// Durations run down and expired statuses come off.
    fn unit_turn_end(&mut self, id: UnitId) {
        let expired = match self.state.unit_mut(id) {
            Some(unit) => {
                unit.statuses.tick_durations();
                unit.statuses.expired()
            }
            None => return,
        };
        for kind in expired {
            self.remove_status_from(id, kind);
        }
    }

    /// Ends the active team's round and either starts the opponent's round
    /// or declares the battle over. Never both.
    pub fn end_round(&mut self) {
        let Some(team) = self.state.active_team() else {
            debug!(target: "battle::engine", phase = ?self.state.phase, "end_round ignored");
            return;
        };

        // Confirmed commands always run to completion.
        self.run_pending();
        if self.state.phase.is_over() {
            return;
        }

        let round = self.state.round;
        for id in self.state.living_ids(team) {
            self.unit_turn_end(id);
            if let Some(controller) = self.state.controller_mut(id) {
                controller.on_turn_end();
            }
        }

        self.sweep_dead();
        info!(target: "battle::engine", %team, round, "round ended");
        self.emit(BattleEvent::RoundEnded { team, round });

        if let Some(winner) = self.check_victory() {
            self.finish_battle(winner);
            return;
        }

        if round >= self.state.config.max_rounds {
            let player = self.state.team_health(Team::Player);
            let enemy = self.state.team_health(Team::Enemy);
            let winner = if player > enemy { Team::Player } else { Team::Enemy };
            warn!(
                target: "battle::engine",
                round,
                player_health = player,
                enemy_health = enemy,
                "round cap reached; deciding on remaining health"
            );
            self.finish_battle(winner);
            return;
        }

        let next = team.opponent();
        self.state.phase = BattlePhase::RoundActive(next);
        debug!(target: "battle::engine", from = %team, to = %next, "team switched");
        self.emit(BattleEvent::TeamSwitched {
            from: team,
            to: next,
        });
        self.start_round();
    }

    /// Player-facing "end turn" request. Only valid during a player round.
    pub fn player_end_turn(&mut self) -> Result<(), EngineError> {
        match self.state.active_team() {
            Some(Team::Player) => {
                self.end_round();
                Ok(())
            }
            Some(team) => {
                warn!(
                    target: "battle::engine",
                    %team,
                    "player_end_turn during another team's round"
                );
                Err(EngineError::NotActiveTeam { team: Team::Player })
            }
            None => {
                warn!(
                    target: "battle::engine",
                    phase = ?self.state.phase,
                    "player_end_turn without an active round"
                );
                Err(EngineError::NotActive)
            }
        }
    }

    /// Registered units that are no longer alive leave the roster.
    fn sweep_dead(&mut self) {
        let dead: Vec<UnitId> = self
            .state
            .roster
            .iter()
            .copied()
            .filter(|id| !self.state.is_alive(*id))
            .collect();
        for id in dead {
            if self.state.roster.remove(&id) {
                debug!(target: "battle::engine", unit = %id, "removed from battle");
                self.state.removal_queue.push(id);
            }
        }
    }

    /// Winner if one side has no registered survivors.
    ///
    /// A scan over the roster, never a running counter. If both sides are
    /// wiped out at once the enemy wins.
    pub(super) fn check_victory(&self) -> Option<Team> {
        let player = self.state.has_survivors(Team::Player);
        let enemy = self.state.has_survivors(Team::Enemy);
        match (player, enemy) {
            (true, true) => None,
            (true, false) => Some(Team::Player),
            (false, _) => Some(Team::Enemy),
        }
    }

    /// Moves to `BattleOver` and emits the battle-over event exactly once.
    pub(super) fn finish_battle(&mut self, winner: Team) {
        if self.state.phase.is_over() {
            return;
        }
        self.state.phase = BattlePhase::BattleOver { winner };
        let dropped = self.executor.discard_queued();
        if !dropped.is_empty() {
            debug!(target: "battle::engine", dropped = dropped.len(), "queued commands dropped");
        }
        info!(target: "battle::engine", %winner, round = self.state.round, "battle over");
        self.emit(BattleEvent::BattleOver {
            winner,
            winner_is_player: winner == Team::Player,
        });
    }
}
