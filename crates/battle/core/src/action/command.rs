use crate::state::{DamagePattern, MaskId, ResourceKind, StatusSpec, UnitId};

/// Multiplier applied to ordinary attacks, in percent.
pub const BASE_MULTIPLIER_PCT: u32 = 100;

/// Resource debited when a command is confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionCost {
    pub resource: ResourceKind,
    pub amount: u32,
}

impl ActionCost {
    pub const fn attack() -> Self {
        Self {
            resource: ResourceKind::Attack,
            amount: 1,
        }
    }

    pub const fn action_points(amount: u32) -> Self {
        Self {
            resource: ResourceKind::ActionPoint,
            amount,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackPayload {
    pub pattern: DamagePattern,
    /// 100 for a normal hit; charged attacks use more.
    pub multiplier_pct: u32,
}

/// Scripted abilities used by enemy archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityKind {
    /// Spend the turn building up a charged attack.
    Charge,
    /// Apply a status to every living ally, self included.
    BuffAllies { status: StatusSpec },
    /// Apply a status to the target.
    DebuffTarget { status: StatusSpec },
    /// Heal every living ally, self included.
    HealAllies { amount: u32 },
}

impl AbilityKind {
    pub const fn needs_target(&self) -> bool {
        matches!(self, AbilityKind::DebuffTarget { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Attack(AttackPayload),
    /// Replace the equipped mask with one from the team's hand.
    SwitchMask { mask: MaskId },
    /// Trigger the equipped mask's OnActivate effects.
    ActivateMask { mask: MaskId },
    Ability(AbilityKind),
}

impl ActionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Attack(_) => "attack",
            ActionKind::SwitchMask { .. } => "switch_mask",
            ActionKind::ActivateMask { .. } => "activate_mask",
            ActionKind::Ability(_) => "ability",
        }
    }
}

/// A request for one unit to do one thing.
///
/// Commands are plain values: building one never touches state, and the same
/// command may be validated any number of times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionCommand {
    pub initiator: UnitId,
    pub kind: ActionKind,
    pub target: Option<UnitId>,
    pub cost: ActionCost,
}

impl ActionCommand {
    pub const fn attack(initiator: UnitId, target: UnitId, pattern: DamagePattern) -> Self {
        Self::charged_attack(initiator, target, pattern, BASE_MULTIPLIER_PCT)
    }

    pub const fn charged_attack(
        initiator: UnitId,
        target: UnitId,
        pattern: DamagePattern,
        multiplier_pct: u32,
    ) -> Self {
        Self {
            initiator,
            kind: ActionKind::Attack(AttackPayload {
                pattern,
                multiplier_pct,
            }),
            target: Some(target),
            cost: ActionCost::attack(),
        }
    }

    pub const fn switch_mask(initiator: UnitId, mask: MaskId, switch_cost: u32) -> Self {
        Self {
            initiator,
            kind: ActionKind::SwitchMask { mask },
            target: None,
            cost: ActionCost::action_points(switch_cost),
        }
    }

    pub const fn activate_mask(initiator: UnitId, mask: MaskId, activate_cost: u32) -> Self {
        Self {
            initiator,
            kind: ActionKind::ActivateMask { mask },
            target: None,
            cost: ActionCost::action_points(activate_cost),
        }
    }

    pub const fn ability(initiator: UnitId, ability: AbilityKind, target: Option<UnitId>) -> Self {
        Self {
            initiator,
            kind: ActionKind::Ability(ability),
            target,
            cost: ActionCost::attack(),
        }
    }
}
