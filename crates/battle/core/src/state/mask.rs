//! Masks: equippable cards with a durability pool and timed effects.

use crate::effect::{EffectSet, EffectSpec};
use crate::state::{MaskId, Team, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskKind {
    Offensive,
    Defensive,
    Support,
    Special,
}

/// Which opponents an attack made with this mask hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamagePattern {
    #[default]
    SingleTarget,
    /// Every living unit of the opposing team.
    AoE,
    /// Primary target plus opponents in adjacent lanes.
    Splash,
}

/// Lifecycle position: deck → hand → equipped → discard (→ deck on reshuffle).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskLocation {
    Deck,
    Hand,
    Equipped(UnitId),
    Discard,
}

/// Split of an incoming hit between mask durability and health.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Absorption {
    pub absorbed: u32,
    pub overflow: u32,
    /// Durability reached 0 during this hit.
    pub broke: bool,
}

/// Content-side description of a mask, instantiated into the arena per battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskTemplate {
    pub name: String,
    pub kind: MaskKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pattern: DamagePattern,
    pub switch_cost: u32,
    pub attack_bonus: i32,
    pub max_durability: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<EffectSpec>,
}

impl MaskTemplate {
    pub fn instantiate(&self, id: MaskId, owner: Team, location: MaskLocation) -> Mask {
        Mask {
            id,
            name: self.name.clone(),
            kind: self.kind,
            pattern: self.pattern,
            switch_cost: self.switch_cost,
            attack_bonus: self.attack_bonus,
            max_durability: self.max_durability,
            current_durability: self.max_durability,
            effects: EffectSet::from_specs(&self.effects),
            can_activate: true,
            owner,
            location,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mask {
    pub id: MaskId,
    pub name: String,
    pub kind: MaskKind,
    pub pattern: DamagePattern,
    /// Action points paid to switch this mask in.
    pub switch_cost: u32,
    pub attack_bonus: i32,
    pub max_durability: u32,
    pub current_durability: u32,
    pub effects: EffectSet,
    /// OnActivate gate, re-armed at the wielder's turn start.
    pub can_activate: bool,
    /// Team whose deck the mask cycles through.
    pub owner: Team,
    pub location: MaskLocation,
}

impl Mask {
    pub const fn is_broken(&self) -> bool {
        self.current_durability == 0
    }

    /// Back-reference to the wielding unit, if equipped.
    pub const fn equipped_by(&self) -> Option<UnitId> {
        match self.location {
            MaskLocation::Equipped(unit) => Some(unit),
            _ => None,
        }
    }

    /// Takes `damage` into durability first and reports the remainder.
    ///
    /// A broken mask absorbs nothing.
    pub fn absorb(&mut self, damage: u32) -> Absorption {
        if self.is_broken() {
            return Absorption {
                absorbed: 0,
                overflow: damage,
                broke: false,
            };
        }
        let absorbed = self.current_durability.min(damage);
        self.current_durability -= absorbed;
        Absorption {
            absorbed,
            overflow: damage - absorbed,
            broke: self.current_durability == 0,
        }
    }

    /// Restores up to `amount` durability, capped at max. Returns the gain.
    pub fn repair(&mut self, amount: u32) -> u32 {
        let before = self.current_durability;
        self.current_durability = before.saturating_add(amount).min(self.max_durability);
        self.current_durability - before
    }

    /// Full durability, activation re-armed, condition counters cleared.
    pub fn restore(&mut self) {
        self.current_durability = self.max_durability;
        self.can_activate = true;
        self.effects.reset_state();
    }
}
