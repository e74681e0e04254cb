//! Mask effect model.
//!
//! Masks carry effects keyed by [`EffectTiming`]. Within one timing effects
//! run in insertion order; across timings that fire at the same moment the
//! engine resolves Destroy, then Equip, then Activate, then Condition.
//!
//! Only data lives here. Execution needs the whole battle (teams, pools,
//! controllers) and is handled by the engine.

mod condition;

pub use condition::{ConditionEvent, ConditionView, EffectCondition};

use strum::EnumCount;

use crate::state::StatusSpec;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumCount,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectTiming {
    /// Once, when the mask becomes equipped.
    OnEquip,
    /// On explicit activation; at most once per owner turn.
    OnActivate,
    /// Polled after attacks against the effect's condition.
    OnCondition,
    /// Once, when durability reaches 0 or the mask is unequipped by a switch.
    OnDestroy,
}

impl EffectTiming {
    #[inline]
    const fn slot(self) -> usize {
        match self {
            EffectTiming::OnEquip => 0,
            EffectTiming::OnActivate => 1,
            EffectTiming::OnCondition => 2,
            EffectTiming::OnDestroy => 3,
        }
    }
}

/// Who an effect lands on, resolved against the wielder when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectTarget {
    Wielder,
    /// Living units on the wielder's team, wielder included.
    Allies,
    /// Living units on the opposing team.
    Enemies,
    /// The unit the wielder just attacked (condition effects only).
    AttackTarget,
    /// Living opponents in lanes adjacent to the attack target.
    AdjacentEnemies,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectAction {
    ApplyStatus {
        target: EffectTarget,
        status: StatusSpec,
    },
    Heal {
        target: EffectTarget,
        amount: u32,
    },
    /// Damage routed through the normal pipeline, so masks absorb it.
    Damage {
        target: EffectTarget,
        amount: u32,
    },
    /// Restores durability of the mask carrying the effect.
    RepairMask { amount: u32 },
    /// Refunds action points to the wielder's team.
    GrantActionPoints { amount: u32 },
    /// Grants extra attacks to the wielder this round.
    GrantAttacks { amount: u32 },
}

/// One effect instance on a mask. Stateful conditions keep their counters here.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskEffect {
    pub action: EffectAction,
    pub condition: Option<EffectCondition>,
    pub counter: u32,
}

impl MaskEffect {
    pub const fn new(action: EffectAction) -> Self {
        Self {
            action,
            condition: None,
            counter: 0,
        }
    }

    pub const fn when(action: EffectAction, condition: EffectCondition) -> Self {
        Self {
            action,
            condition: Some(condition),
            counter: 0,
        }
    }

    /// Feeds an event to the condition. Returns true when the effect should fire.
    ///
    /// Effects without a condition never fire from polling.
    pub fn observe(&mut self, event: &ConditionEvent, view: &ConditionView) -> bool {
        match self.condition {
            Some(condition) => condition.evaluate(&mut self.counter, event, view),
            None => false,
        }
    }
}

/// Serialized form of an effect inside a mask template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub timing: EffectTiming,
    pub action: EffectAction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Option<EffectCondition>,
}

/// Effects of one mask, indexed by timing, insertion-ordered within a timing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSet {
    by_timing: [Vec<MaskEffect>; EffectTiming::COUNT],
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: &[EffectSpec]) -> Self {
        let mut set = Self::new();
        for spec in specs {
            let effect = match spec.condition {
                Some(condition) => MaskEffect::when(spec.action, condition),
                None => MaskEffect::new(spec.action),
            };
            set.push(spec.timing, effect);
        }
        set
    }

    pub fn push(&mut self, timing: EffectTiming, effect: MaskEffect) {
        self.by_timing[timing.slot()].push(effect);
    }

    pub fn get(&self, timing: EffectTiming) -> &[MaskEffect] {
        &self.by_timing[timing.slot()]
    }

    pub fn get_mut(&mut self, timing: EffectTiming) -> &mut [MaskEffect] {
        &mut self.by_timing[timing.slot()]
    }

    pub fn has(&self, timing: EffectTiming) -> bool {
        !self.by_timing[timing.slot()].is_empty()
    }

    /// Clears condition counters. Used when a mask is reshuffled back in.
    pub fn reset_state(&mut self) {
        for effects in &mut self.by_timing {
            for effect in effects {
                effect.counter = 0;
            }
        }
    }
}
