use behavior_tree::{PercentRoll, Status};

use super::{ArchetypeMemory, TargetPolicy, select_target};
use crate::action::{AbilityKind, ActionCommand};
use crate::rng::{PcgRng, RngOracle, SeedContext, compute_seed};
use crate::state::{BattleState, DamagePattern, Lane, ResourceKind, Team, UnitId};

/// A unit the deciding enemy can see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub id: UnitId,
    pub lane: Lane,
    pub health: u32,
    pub max_health: u32,
}

/// What the tree settled on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Attack {
        target: UnitId,
        multiplier_pct: u32,
        pattern: DamagePattern,
    },
    Ability {
        ability: AbilityKind,
        target: Option<UnitId>,
    },
}

/// Owned view of the battle from one enemy's perspective.
///
/// Built fresh for every decision so archetype trees can hold no borrows.
#[derive(Clone, Debug)]
pub struct Blackboard {
    pub unit: UnitId,
    pub team: Team,
    pub attacks_left: u32,
    pub pattern: DamagePattern,
    pub policy: TargetPolicy,
    pub memory: ArchetypeMemory,
    pub opponents: Vec<Candidate>,
    pub allies: Vec<Candidate>,
    pub intent: Option<Intent>,
    game_seed: u64,
    round: u32,
    rolls: u32,
}

fn candidates(state: &BattleState, team: Team) -> Vec<Candidate> {
    state
        .living(team)
        .map(|u| Candidate {
            id: u.id,
            lane: u.lane,
            health: u.current_health,
            max_health: u.max_health,
        })
        .collect()
}

impl Blackboard {
    pub fn new(
        state: &BattleState,
        unit: UnitId,
        policy: TargetPolicy,
        memory: ArchetypeMemory,
    ) -> Option<Self> {
        let record = state.unit(unit)?;
        Some(Self {
            unit,
            team: record.team,
            attacks_left: state.available(unit, ResourceKind::Attack),
            pattern: state.attack_pattern(unit),
            policy,
            memory,
            opponents: candidates(state, record.team.opponent()),
            allies: candidates(state, record.team),
            intent: None,
            game_seed: state.config.game_seed,
            round: state.round,
            rolls: 0,
        })
    }

    pub fn pick_target(&self) -> Option<UnitId> {
        let seed = compute_seed(
            self.game_seed,
            u64::from(self.round),
            self.unit.0,
            SeedContext::Targeting as u32,
        );
        select_target(self.policy, &self.opponents, &PcgRng, seed)
    }

    pub fn support_ready(&self) -> bool {
        self.memory.support_cooldown == 0
    }

    pub fn any_ally_below(&self, percent: u32) -> bool {
        self.allies
            .iter()
            .any(|a| u64::from(a.health) * 100 < u64::from(a.max_health) * u64::from(percent))
    }

    /// Settles on an attack against the policy target.
    pub fn attack(&mut self, multiplier_pct: u32) -> Status {
        if self.attacks_left == 0 {
            return Status::Failure;
        }
        let Some(target) = self.pick_target() else {
            return Status::Failure;
        };
        self.intent = Some(Intent::Attack {
            target,
            multiplier_pct,
            pattern: self.pattern,
        });
        Status::Success
    }

    pub fn use_ability(&mut self, ability: AbilityKind) -> Status {
        if self.attacks_left == 0 {
            return Status::Failure;
        }
        let target = if ability.needs_target() {
            match self.pick_target() {
                Some(target) => Some(target),
                None => return Status::Failure,
            }
        } else {
            None
        };
        self.intent = Some(Intent::Ability { ability, target });
        Status::Success
    }

    /// Either releases the charged attack or keeps charging.
    pub fn continue_charge(&mut self, charge_time: u32, multiplier_pct: u32) -> Status {
        if self.memory.charge >= charge_time {
            let status = self.attack(multiplier_pct);
            if status.is_success() {
                self.memory.charge = 0;
            }
            status
        } else {
            let status = self.use_ability(AbilityKind::Charge);
            if status.is_success() {
                self.memory.charge += 1;
            }
            status
        }
    }

    pub fn start_charge(&mut self) -> Status {
        let status = self.use_ability(AbilityKind::Charge);
        if status.is_success() {
            self.memory.charge = 1;
        }
        status
    }

    /// Uses a support ability and puts support on cooldown.
    pub fn support(&mut self, ability: AbilityKind, cooldown: u32) -> Status {
        let status = self.use_ability(ability);
        if status.is_success() {
            self.memory.support_cooldown = cooldown;
        }
        status
    }

    pub fn into_command(self) -> Option<ActionCommand> {
        match self.intent? {
            Intent::Attack {
                target,
                multiplier_pct,
                pattern,
            } => Some(ActionCommand::charged_attack(
                self.unit,
                target,
                pattern,
                multiplier_pct,
            )),
            Intent::Ability { ability, target } => {
                Some(ActionCommand::ability(self.unit, ability, target))
            }
        }
    }
}

impl PercentRoll for Blackboard {
    fn roll_percent(&mut self) -> u32 {
        let seed = compute_seed(
            self.game_seed,
            u64::from(self.round),
            self.unit.0,
            SeedContext::Decision as u32 + self.rolls,
        );
        self.rolls += 1;
        PcgRng.roll_d100(seed)
    }
}
