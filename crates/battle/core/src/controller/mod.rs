//! Controllers: who decides what a unit does.
//!
//! Every unit is bound to exactly one controller. Player controllers wait for
//! commands from outside; enemy controllers carry an [`EnemyBrain`] (target
//! policy plus archetype script) that produces commands on demand.

pub mod ai;

pub use ai::{
    Archetype, ArchetypeMemory, Decision, EnemyBrain, EnemySpec, TargetPolicy, select_target,
};

use crate::action::{ActionCommand, validate};
use crate::state::{BattleState, ResourceKind, ResourcePool, Team, UnitId};

/// How a unit template wants to be controlled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlSpec {
    #[default]
    Player,
    Enemy(EnemySpec),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    /// Set by `take_turn`, cleared by the next confirmed command or turn end.
    pub waiting_for_input: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControllerKind {
    Player(PlayerState),
    Enemy(EnemyBrain),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Controller {
    pub unit: UnitId,
    pub team: Team,
    /// Attack allowance for the current round.
    pub resources: ResourcePool,
    /// Raised at the owner's turn start, lowered at its turn end.
    pub can_act_flag: bool,
    pub kind: ControllerKind,
}

impl Controller {
    pub fn new(unit: UnitId, team: Team, spec: ControlSpec, attack_allowance_max: u32) -> Self {
        let kind = match spec {
            ControlSpec::Player => ControllerKind::Player(PlayerState::default()),
            ControlSpec::Enemy(spec) => ControllerKind::Enemy(EnemyBrain::new(spec)),
        };
        Self {
            unit,
            team,
            resources: ResourcePool::new().with_max(ResourceKind::Attack, attack_allowance_max),
            can_act_flag: false,
            kind,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, ControllerKind::Player(_))
    }

    pub fn brain(&self) -> Option<&EnemyBrain> {
        match &self.kind {
            ControllerKind::Enemy(brain) => Some(brain),
            ControllerKind::Player(_) => None,
        }
    }

    pub fn brain_mut(&mut self) -> Option<&mut EnemyBrain> {
        match &mut self.kind {
            ControllerKind::Enemy(brain) => Some(brain),
            ControllerKind::Player(_) => None,
        }
    }

    pub fn is_waiting_for_input(&self) -> bool {
        matches!(
            self.kind,
            ControllerKind::Player(PlayerState {
                waiting_for_input: true
            })
        )
    }

    pub fn set_waiting_for_input(&mut self, waiting: bool) {
        if let ControllerKind::Player(player) = &mut self.kind {
            player.waiting_for_input = waiting;
        }
    }

    /// Not stunned, bound unit alive, and the local flag raised.
    pub fn can_act(&self, state: &BattleState) -> bool {
        self.can_act_flag
            && state
                .unit(self.unit)
                .is_some_and(|u| u.is_alive() && !u.is_stunned())
    }

    pub fn on_turn_start(&mut self) {
        self.can_act_flag = true;
        if let Some(brain) = self.brain_mut() {
            brain.tick_cooldowns();
        }
    }

    pub fn on_turn_end(&mut self) {
        self.can_act_flag = false;
        self.set_waiting_for_input(false);
    }

    /// Every command this controller could confirm right now.
    ///
    /// Attacks on each living opponent, a switch to each affordable mask in
    /// hand and the activation of the equipped mask. Anything that would fail
    /// validation (including cost) is filtered out.
    pub fn available_actions(&self, state: &BattleState) -> Vec<ActionCommand> {
        let Some(unit) = state.unit(self.unit) else {
            return Vec::new();
        };
        let mut candidates = Vec::new();

        let pattern = state.attack_pattern(self.unit);
        for target in state.living(unit.team.opponent()) {
            candidates.push(ActionCommand::attack(self.unit, target.id, pattern));
        }

        if let Some(deck) = state.deck(unit.team) {
            for mask in deck.hand() {
                if let Some(record) = state.mask(*mask) {
                    candidates.push(ActionCommand::switch_mask(
                        self.unit,
                        *mask,
                        record.switch_cost,
                    ));
                }
            }
        }

        if let Some(mask) = unit.mask {
            candidates.push(ActionCommand::activate_mask(
                self.unit,
                mask,
                state.config.activate_cost,
            ));
        }

        candidates
            .into_iter()
            .filter(|command| validate(state, command).is_ok())
            .collect()
    }
}
