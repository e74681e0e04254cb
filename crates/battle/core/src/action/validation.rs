//! Pure command validation.

use crate::action::{ActionCommand, ActionCost, ActionKind, CommandError};
use crate::effect::EffectTiming;
use crate::state::{BattleState, MaskLocation, UnitId};

/// Cost the state demands for `command`, independent of what it claims.
pub fn required_cost(
    state: &BattleState,
    command: &ActionCommand,
) -> Result<ActionCost, CommandError> {
    match command.kind {
        ActionKind::Attack(_) | ActionKind::Ability(_) => Ok(ActionCost::attack()),
        ActionKind::SwitchMask { mask } => state
            .mask(mask)
            .map(|m| ActionCost::action_points(m.switch_cost))
            .ok_or(CommandError::MaskNotFound { mask }),
        ActionKind::ActivateMask { .. } => {
            Ok(ActionCost::action_points(state.config.activate_cost))
        }
    }
}

/// Checks `command` against `state` without mutating anything.
///
/// Order matters only for which error is reported: battle phase, initiator,
/// cost, then kind-specific checks.
pub fn validate(state: &BattleState, command: &ActionCommand) -> Result<(), CommandError> {
    let active = state.active_team().ok_or(CommandError::BattleNotActive)?;

    let initiator = command.initiator;
    let unit = state
        .unit(initiator)
        .ok_or(CommandError::UnitNotFound { unit: initiator })?;
    if !unit.is_alive() {
        return Err(CommandError::InitiatorDead { unit: initiator });
    }
    if unit.team != active {
        return Err(CommandError::NotActiveTeam {
            unit: initiator,
            team: unit.team,
        });
    }
    if unit.is_stunned() {
        return Err(CommandError::Stunned { unit: initiator });
    }
    let controller = state
        .controller(initiator)
        .ok_or(CommandError::UnitNotFound { unit: initiator })?;
    if !controller.can_act(state) {
        return Err(CommandError::CannotAct { unit: initiator });
    }

    let expected = required_cost(state, command)?;
    if expected != command.cost {
        return Err(CommandError::CostMismatch {
            expected,
            actual: command.cost,
        });
    }
    let available = state.available(initiator, expected.resource);
    if available < expected.amount {
        return Err(CommandError::InsufficientResources {
            kind: expected.resource,
            required: expected.amount,
            available,
        });
    }

    match command.kind {
        ActionKind::Attack(_) => {
            let target = command.target.ok_or(CommandError::MissingTarget)?;
            validate_hostile_target(state, initiator, target)
        }
        ActionKind::Ability(ability) => match command.target {
            Some(target) if ability.needs_target() => {
                validate_hostile_target(state, initiator, target)
            }
            None if ability.needs_target() => Err(CommandError::MissingTarget),
            _ => Ok(()),
        },
        ActionKind::SwitchMask { mask } => {
            let record = state.mask(mask).ok_or(CommandError::MaskNotFound { mask })?;
            let in_hand = record.location == MaskLocation::Hand
                && record.owner == unit.team
                && state.deck(unit.team).is_some_and(|d| d.in_hand(mask));
            if !in_hand {
                return Err(CommandError::MaskNotInHand { mask });
            }
            Ok(())
        }
        ActionKind::ActivateMask { mask } => {
            let record = state.mask(mask).ok_or(CommandError::MaskNotFound { mask })?;
            if unit.mask != Some(mask) || record.equipped_by() != Some(initiator) {
                return Err(CommandError::MaskNotEquipped { mask });
            }
            if !record.effects.has(EffectTiming::OnActivate) {
                return Err(CommandError::NoActivationEffects { mask });
            }
            if !record.can_activate {
                return Err(CommandError::ActivationSpent { mask });
            }
            Ok(())
        }
    }
}

fn validate_hostile_target(
    state: &BattleState,
    initiator: UnitId,
    target: UnitId,
) -> Result<(), CommandError> {
    let record = state
        .unit(target)
        .ok_or(CommandError::TargetNotFound { unit: target })?;
    if !record.is_alive() || !state.roster.contains(&target) {
        return Err(CommandError::TargetDead { unit: target });
    }
    let same_team = state.unit(initiator).is_some_and(|u| u.team == record.team);
    if same_team {
        return Err(CommandError::TargetNotHostile { unit: target });
    }
    Ok(())
}
