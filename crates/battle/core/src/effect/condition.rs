//! Predicates for OnCondition effects.

use crate::state::UnitId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectCondition {
    /// Fires on every n-th attack made by the wielder.
    EveryNthAttack { n: u32 },
    /// Fires while the wielder's health is below `percent` of max and the
    /// wielder took part in the attack.
    WielderHealthBelow { percent: u32 },
    /// Same as above, measured on the mask's durability.
    DurabilityBelow { percent: u32 },
}

/// Game events condition effects are polled against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionEvent {
    UnitAttacked { attacker: UnitId, target: UnitId },
}

impl ConditionEvent {
    fn involves(&self, unit: UnitId) -> bool {
        match *self {
            ConditionEvent::UnitAttacked { attacker, target } => attacker == unit || target == unit,
        }
    }
}

/// Snapshot of the wielder and mask at polling time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionView {
    pub wielder: UnitId,
    pub wielder_health: u32,
    pub wielder_max_health: u32,
    pub durability: u32,
    pub max_durability: u32,
}

fn below_percent(value: u32, max: u32, percent: u32) -> bool {
    // value / max < percent / 100 without floating point
    u64::from(value) * 100 < u64::from(max) * u64::from(percent)
}

impl EffectCondition {
    pub(crate) fn evaluate(
        self,
        counter: &mut u32,
        event: &ConditionEvent,
        view: &ConditionView,
    ) -> bool {
        match self {
            EffectCondition::EveryNthAttack { n } => {
                let ConditionEvent::UnitAttacked { attacker, .. } = *event;
                if attacker != view.wielder {
                    return false;
                }
                *counter += 1;
                if *counter >= n.max(1) {
                    *counter = 0;
                    true
                } else {
                    false
                }
            }
            EffectCondition::WielderHealthBelow { percent } => {
                event.involves(view.wielder)
                    && below_percent(view.wielder_health, view.wielder_max_health, percent)
            }
            EffectCondition::DurabilityBelow { percent } => {
                event.involves(view.wielder)
                    && below_percent(view.durability, view.max_durability, percent)
            }
        }
    }
}
