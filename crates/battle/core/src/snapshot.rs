//! Read model handed to presentation layers and async providers.

use crate::state::{
    BattlePhase, BattleState, DamagePattern, Lane, MaskId, MaskKind, MaskLocation, ResourceKind,
    StatusKind, Team, UnitId,
};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusView {
    pub kind: StatusKind,
    pub stacks: u8,
    pub duration: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitView {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub lane: Lane,
    pub current_health: u32,
    pub max_health: u32,
    pub total_attack: u32,
    pub mask: Option<MaskId>,
    pub statuses: Vec<StatusView>,
    pub attacks_left: u32,
    pub can_act: bool,
}

impl UnitView {
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskView {
    pub id: MaskId,
    pub name: String,
    pub kind: MaskKind,
    pub pattern: DamagePattern,
    pub switch_cost: u32,
    pub attack_bonus: i32,
    pub durability: u32,
    pub max_durability: u32,
    pub location: MaskLocation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamView {
    pub team: Team,
    pub action_points: u32,
    pub hand: Vec<MaskId>,
    pub draw_pile: usize,
    pub discard_pile: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub phase: BattlePhase,
    pub round: u32,
    pub units: Vec<UnitView>,
    pub masks: Vec<MaskView>,
    pub teams: Vec<TeamView>,
}

impl BattleSnapshot {
    pub fn capture(state: &BattleState) -> Self {
        let units = state
            .units
            .iter()
            .map(|u| UnitView {
                id: u.id,
                name: u.name.clone(),
                team: u.team,
                lane: u.lane,
                current_health: u.current_health,
                max_health: u.max_health,
                total_attack: state.total_attack(u.id),
                mask: u.mask,
                statuses: u
                    .statuses
                    .iter()
                    .map(|s| StatusView {
                        kind: s.kind,
                        stacks: s.stack_count,
                        duration: s.duration,
                    })
                    .collect(),
                attacks_left: state.available(u.id, ResourceKind::Attack),
                can_act: state.controller(u.id).is_some_and(|c| c.can_act(state)),
            })
            .collect();

        let masks = state
            .masks
            .iter()
            .map(|m| MaskView {
                id: m.id,
                name: m.name.clone(),
                kind: m.kind,
                pattern: m.pattern,
                switch_cost: m.switch_cost,
                attack_bonus: m.attack_bonus,
                durability: m.current_durability,
                max_durability: m.max_durability,
                location: m.location,
            })
            .collect();

        let teams = [Team::Player, Team::Enemy]
            .into_iter()
            .map(|team| {
                let deck = state.deck(team);
                TeamView {
                    team,
                    action_points: state.pools.get(team).get(ResourceKind::ActionPoint),
                    hand: deck.map(|d| d.hand().to_vec()).unwrap_or_default(),
                    draw_pile: deck.map_or(0, |d| d.draw_pile().len()),
                    discard_pile: deck.map_or(0, |d| d.discard_pile().len()),
                }
            })
            .collect();

        Self {
            phase: state.phase,
            round: state.round,
            units,
            masks,
            teams,
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitView> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn team(&self, team: Team) -> Option<&TeamView> {
        self.teams.iter().find(|t| t.team == team)
    }

    pub fn living(&self, team: Team) -> impl Iterator<Item = &UnitView> + '_ {
        self.units
            .iter()
            .filter(move |u| u.team == team && u.is_alive())
    }
}
