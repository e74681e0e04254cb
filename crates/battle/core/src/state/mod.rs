//! Battle state: the unit and mask arenas, controllers, pools and decks.
//!
//! Units and masks live in index-addressed arenas ([`UnitId`] / [`MaskId`]).
//! Cross references (a unit's equipped mask, a mask's wielder, deck piles)
//! are ids into those arenas, never pointers, so the whole state can be
//! cloned for previews and snapshots.

mod common;
mod deck;
mod mask;
mod resources;
mod status;
mod unit;

use std::collections::BTreeSet;

pub use common::{Lane, MaskId, PerTeam, Team, UnitId};
pub use deck::{Deck, DeckError, Draw};
pub use mask::{Absorption, DamagePattern, Mask, MaskKind, MaskLocation, MaskTemplate};
pub use resources::{ResourceKind, ResourcePool};
pub use status::{
    ApplyOutcome, StatusApplication, StatusEffect, StatusEffects, StatusError, StatusKind,
    StatusSpec,
};
pub use unit::{HealthDelta, Unit, UnitTemplate};

use crate::config::BattleConfig;
use crate::controller::Controller;

/// Root state machine of a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    #[default]
    Idle,
    RoundActive(Team),
    BattleOver { winner: Team },
}

impl BattlePhase {
    pub const fn is_active(&self) -> bool {
        matches!(self, BattlePhase::RoundActive(_))
    }

    pub const fn active_team(&self) -> Option<Team> {
        match *self {
            BattlePhase::RoundActive(team) => Some(team),
            _ => None,
        }
    }

    pub const fn is_over(&self) -> bool {
        matches!(self, BattlePhase::BattleOver { .. })
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub config: BattleConfig,
    pub phase: BattlePhase,
    /// Incremented every time a team's round starts.
    pub round: u32,

    pub units: Vec<Unit>,
    pub masks: Vec<Mask>,
    /// One controller per unit, same index as the unit.
    pub controllers: Vec<Controller>,

    /// Shared action-point pool per team.
    pub pools: PerTeam<ResourcePool>,
    pub decks: PerTeam<Option<Deck>>,

    /// Units still participating. Victory is a scan of this set.
    pub roster: BTreeSet<UnitId>,
    /// Units unregistered since the last `BattleEngine::drain_removed`.
    pub removal_queue: Vec<UnitId>,
}

impl BattleState {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.index())
    }

    pub fn mask(&self, id: MaskId) -> Option<&Mask> {
        self.masks.get(id.index())
    }

    pub fn mask_mut(&mut self, id: MaskId) -> Option<&mut Mask> {
        self.masks.get_mut(id.index())
    }

    pub fn controller(&self, unit: UnitId) -> Option<&Controller> {
        self.controllers.get(unit.index())
    }

    pub fn controller_mut(&mut self, unit: UnitId) -> Option<&mut Controller> {
        self.controllers.get_mut(unit.index())
    }

    pub fn deck(&self, team: Team) -> Option<&Deck> {
        self.decks.get(team).as_ref()
    }

    pub fn deck_mut(&mut self, team: Team) -> Option<&mut Deck> {
        self.decks.get_mut(team).as_mut()
    }

    pub fn active_team(&self) -> Option<Team> {
        self.phase.active_team()
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.unit(id).is_some_and(Unit::is_alive)
    }

    /// Registered, living units of `team` in id order.
    pub fn living(&self, team: Team) -> impl Iterator<Item = &Unit> + '_ {
        self.roster
            .iter()
            .filter_map(|id| self.unit(*id))
            .filter(move |u| u.team == team && u.is_alive())
    }

    pub fn living_ids(&self, team: Team) -> Vec<UnitId> {
        self.living(team).map(|u| u.id).collect()
    }

    pub fn has_survivors(&self, team: Team) -> bool {
        self.living(team).next().is_some()
    }

    pub fn team_health(&self, team: Team) -> u32 {
        self.living(team).map(|u| u.current_health).sum()
    }

    /// Mask currently worn by `unit`, if any.
    pub fn equipped_mask(&self, unit: UnitId) -> Option<&Mask> {
        self.unit(unit)
            .and_then(|u| u.mask)
            .and_then(|m| self.mask(m))
    }

    /// Attack before the situational multiplier.
    pub fn total_attack(&self, unit: UnitId) -> u32 {
        let bonus = self.equipped_mask(unit).map_or(0, |m| m.attack_bonus);
        self.unit(unit).map_or(0, |u| u.total_attack(bonus))
    }

    /// Pattern of the equipped mask, single-target when bare.
    pub fn attack_pattern(&self, unit: UnitId) -> DamagePattern {
        self.equipped_mask(unit)
            .map_or(DamagePattern::SingleTarget, |m| m.pattern)
    }

    /// Amount of `kind` the unit can draw on: its own allowance for attacks,
    /// the team pool for action points.
    pub fn available(&self, unit: UnitId, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Attack => self
                .controller(unit)
                .map_or(0, |c| c.resources.get(ResourceKind::Attack)),
            ResourceKind::ActionPoint => self
                .unit(unit)
                .map_or(0, |u| self.pools.get(u.team).get(ResourceKind::ActionPoint)),
        }
    }

    /// Debits `amount` of `kind` on behalf of `unit`.
    ///
    /// Returns false without touching anything unless the unit is alive, on
    /// the active team and able to pay in full.
    pub fn consume_resource(&mut self, unit: UnitId, kind: ResourceKind, amount: u32) -> bool {
        let Some(team) = self.unit(unit).filter(|u| u.is_alive()).map(|u| u.team) else {
            return false;
        };
        if self.active_team() != Some(team) {
            return false;
        }
        match kind {
            ResourceKind::Attack => self
                .controller_mut(unit)
                .is_some_and(|c| c.resources.spend(ResourceKind::Attack, amount)),
            ResourceKind::ActionPoint => self
                .pools
                .get_mut(team)
                .spend(ResourceKind::ActionPoint, amount),
        }
    }

    /// Living opponents of `unit` in lanes adjacent to `lane`.
    pub fn adjacent_opponents(&self, team: Team, lane: Lane) -> Vec<UnitId> {
        self.living(team.opponent())
            .filter(|u| u.lane.is_adjacent(lane))
            .map(|u| u.id)
            .collect()
    }
}
