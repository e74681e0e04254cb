//! Combat units.

use crate::controller::ControlSpec;
use crate::state::{
    Lane, MaskId, MaskTemplate, StatusApplication, StatusEffect, StatusEffects, StatusError,
    StatusKind, StatusSpec, Team, UnitId,
};

/// Content-side description of a unit. The engine assigns the team from the
/// side the template is passed on, so templates can be reused for either side.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub name: String,
    pub lane: Lane,
    pub max_health: u32,
    /// Defaults to `max_health`. A value of 0 spawns the unit dead.
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_health: Option<u32>,
    pub base_attack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_defense: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_mask: Option<MaskTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub control: ControlSpec,
}

/// Result of a raw health change on a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HealthDelta {
    /// Signed change actually applied after clamping.
    pub applied: i32,
    /// True only for the change that took the unit from alive to 0.
    pub died: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub lane: Lane,

    pub max_health: u32,
    /// Always within `0..=max_health`; 0 means dead.
    pub current_health: u32,

    pub base_attack: i32,
    /// Carried for content and display; damage does not read it.
    pub base_defense: i32,

    /// At most one equipped mask.
    pub mask: Option<MaskId>,

    pub statuses: StatusEffects,

    /// Sum of attack modifiers pushed by active statuses.
    pub attack_modifier: i32,
}

impl Unit {
    pub fn from_template(id: UnitId, team: Team, template: &UnitTemplate) -> Self {
        let max_health = template.max_health;
        let current_health = template.starting_health.unwrap_or(max_health).min(max_health);
        Self {
            id,
            name: template.name.clone(),
            team,
            lane: template.lane,
            max_health,
            current_health,
            base_attack: template.base_attack,
            base_defense: template.base_defense,
            mask: None,
            statuses: StatusEffects::empty(),
            attack_modifier: 0,
        }
    }

    #[inline]
    pub const fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    pub fn is_stunned(&self) -> bool {
        self.statuses.is_stunned()
    }

    /// base + mask bonus + status modifiers, floored at 0.
    pub fn total_attack(&self, mask_bonus: i32) -> u32 {
        let total = self
            .base_attack
            .saturating_add(mask_bonus)
            .saturating_add(self.attack_modifier);
        total.max(0) as u32
    }

    /// Applies a signed change directly to health, clamped to `0..=max`.
    ///
    /// Dead units ignore every change, which is what makes the death
    /// transition observable exactly once.
    pub fn apply_health_delta(&mut self, delta: i32) -> HealthDelta {
        if !self.is_alive() {
            return HealthDelta::default();
        }
        let before = i64::from(self.current_health);
        let after = (before + i64::from(delta)).clamp(0, i64::from(self.max_health));
        self.current_health = after as u32;
        HealthDelta {
            applied: (after - before) as i32,
            died: after == 0,
        }
    }

    /// Adds or refreshes a status and pushes its modifier contribution.
    pub fn apply_status(&mut self, spec: StatusSpec) -> Result<StatusApplication, StatusError> {
        let application = self.statuses.apply(spec)?;
        self.attack_modifier += application.modifier_delta;
        Ok(application)
    }

    /// Removes a status and takes back exactly what it contributed.
    pub fn remove_status(&mut self, kind: StatusKind) -> Result<StatusEffect, StatusError> {
        let removed = self.statuses.remove(kind)?;
        self.attack_modifier -= removed.applied_modifier;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(health: u32) -> Unit {
        let template = UnitTemplate {
            name: "Warden".into(),
            lane: Lane::Middle,
            max_health: health,
            starting_health: None,
            base_attack: 3,
            base_defense: 1,
            starting_mask: None,
            control: ControlSpec::Player,
        };
        Unit::from_template(UnitId(0), Team::Player, &template)
    }

    #[test]
    fn health_stays_within_bounds() {
        let mut unit = unit(10);
        for delta in [-4, 25, -3, -100, 7, -1] {
            unit.apply_health_delta(delta);
            assert!(unit.current_health <= unit.max_health);
        }
        assert_eq!(unit.current_health, 0);
    }

    #[test]
    fn death_is_reported_once() {
        let mut unit = unit(5);
        let first = unit.apply_health_delta(-9);
        assert!(first.died);
        assert_eq!(first.applied, -5);

        let second = unit.apply_health_delta(-1);
        assert!(!second.died);
        assert_eq!(second.applied, 0);
        assert_eq!(unit.apply_health_delta(5), HealthDelta::default());
    }

    #[test]
    fn status_round_trip_restores_attack_modifier() {
        let mut unit = unit(10);
        unit.apply_status(StatusSpec::attack_up(2, 2)).unwrap();
        assert_eq!(unit.attack_modifier, 2);
        assert_eq!(unit.total_attack(0), 5);

        unit.remove_status(StatusKind::AttackUp).unwrap();
        assert_eq!(unit.attack_modifier, 0);

        unit.apply_status(StatusSpec::attack_down(2, 2)).unwrap();
        assert_eq!(unit.attack_modifier, -2);
        unit.remove_status(StatusKind::AttackDown).unwrap();
        assert_eq!(unit.attack_modifier, 0);
    }

    #[test]
    fn total_attack_never_negative() {
        let mut unit = unit(10);
        unit.apply_status(StatusSpec::attack_down(9, 1)).unwrap();
        assert_eq!(unit.total_attack(1), 0);
    }

    #[test]
    fn zero_starting_health_spawns_dead() {
        let template = UnitTemplate {
            starting_health: Some(0),
            ..UnitTemplate {
                name: "Husk".into(),
                lane: Lane::Up,
                max_health: 4,
                starting_health: None,
                base_attack: 1,
                base_defense: 0,
                starting_mask: None,
                control: ControlSpec::Player,
            }
        };
        assert!(!Unit::from_template(UnitId(1), Team::Enemy, &template).is_alive());
    }
}
