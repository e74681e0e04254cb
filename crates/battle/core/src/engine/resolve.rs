//! Per-step state changes.

use tracing::{debug, info, trace, warn};

use super::BattleEngine;
use crate::action::{AbilityKind, AttackPayload, ResolutionStep};
use crate::effect::{ConditionEvent, EffectTiming};
use crate::events::BattleEvent;
use crate::state::{DamagePattern, MaskId, MaskLocation, UnitId};

impl BattleEngine {
    pub(super) fn apply_step(&mut self, step: ResolutionStep) {
        match step {
            ResolutionStep::Approach { unit, target } => {
                trace!(target: "battle::action", unit = %unit, target = %target, "approach");
            }
            ResolutionStep::Retreat { unit } => {
                trace!(target: "battle::action", unit = %unit, "retreat");
            }
            ResolutionStep::Strike {
                attacker,
                target,
                payload,
            } => self.resolve_strike(attacker, target, payload),
            ResolutionStep::Unequip { unit } => self.resolve_unequip(unit),
            ResolutionStep::Equip { unit, mask } => self.resolve_equip(unit, mask),
            ResolutionStep::Activate { unit, mask } => self.resolve_activate(unit, mask),
            ResolutionStep::Ability {
                unit,
                ability,
                target,
            } => self.resolve_ability(unit, ability, target),
        }
    }

    /// Damage is `total_attack * multiplier / 100`, dealt to every victim of
    /// the pattern. Condition effects are polled once afterwards.
    fn resolve_strike(&mut self, attacker: UnitId, target: UnitId, payload: AttackPayload) {
        let Some(team) = self
            .state
            .unit(attacker)
            .filter(|u| u.is_alive())
            .map(|u| u.team)
        else {
            debug!(target: "battle::action", unit = %attacker, "strike skipped: attacker gone");
            return;
        };

        let damage = (u64::from(self.state.total_attack(attacker))
            * u64::from(payload.multiplier_pct)
            / 100) as u32;

        let victims: Vec<UnitId> = match payload.pattern {
            DamagePattern::SingleTarget => {
                if self.state.is_alive(target) {
                    vec![target]
                } else {
                    Vec::new()
                }
            }
            DamagePattern::AoE => self.state.living_ids(team.opponent()),
            DamagePattern::Splash => {
                let mut victims = Vec::new();
                if let Some(primary) = self.state.unit(target).filter(|u| u.is_alive()) {
                    victims.push(primary.id);
                    victims.extend(self.state.adjacent_opponents(team, primary.lane));
                }
                victims
            }
        };

        info!(
            target: "battle::action",
            attacker = %attacker,
            target = %target,
            damage,
            pattern = %payload.pattern,
            victims = victims.len(),
            "strike"
        );
        for victim in victims {
            self.apply_health_change(victim, -(damage as i32));
        }

        if !self.state.phase.is_over() {
            self.poll_conditions(ConditionEvent::UnitAttacked { attacker, target });
        }
    }

    /// The outgoing mask's OnDestroy runs, then it goes to the discard pile.
    fn resolve_unequip(&mut self, unit: UnitId) {
        let Some(mask) = self.state.unit(unit).and_then(|u| u.mask) else {
            return;
        };
        if self.destroying.contains(&mask) {
            return;
        }
        self.destroying.push(mask);
        self.run_mask_effects(mask, EffectTiming::OnDestroy, None);
        self.detach_mask(mask);
        self.destroying.retain(|m| *m != mask);
    }

    /// The incoming mask leaves the hand, is worn, then its OnEquip runs.
    fn resolve_equip(&mut self, unit: UnitId, mask: MaskId) {
        let Some(owner) = self.state.mask(mask).map(|m| m.owner) else {
            return;
        };
        if !self.state.is_alive(unit) {
            warn!(
                target: "battle::action",
                unit = %unit,
                mask = %mask,
                "equip skipped: unit is dead"
            );
            return;
        }
        let taken = self
            .state
            .deck_mut(owner)
            .is_some_and(|deck| deck.take_from_hand(mask).is_ok());
        if !taken {
            warn!(
                target: "battle::action",
                unit = %unit,
                mask = %mask,
                "equip skipped: mask left the hand"
            );
            return;
        }

        // A leftover mask (e.g. from a skipped unequip) is discarded silently.
        if let Some(previous) = self.state.unit(unit).and_then(|u| u.mask) {
            self.detach_mask(previous);
        }

        if let Some(record) = self.state.mask_mut(mask) {
            record.location = MaskLocation::Equipped(unit);
        }
        if let Some(record) = self.state.unit_mut(unit) {
            record.mask = Some(mask);
        }
        info!(target: "battle::action", unit = %unit, mask = %mask, "mask equipped");
        self.emit(BattleEvent::MaskEquipped { unit, mask });
        self.run_mask_effects(mask, EffectTiming::OnEquip, None);
    }

    fn resolve_activate(&mut self, unit: UnitId, mask: MaskId) {
        let Some(record) = self
            .state
            .mask_mut(mask)
            .filter(|m| m.equipped_by() == Some(unit))
        else {
            return;
        };
        record.can_activate = false;
        info!(target: "battle::action", unit = %unit, mask = %mask, "mask activated");
        self.emit(BattleEvent::MaskActivated { unit, mask });
        self.run_mask_effects(mask, EffectTiming::OnActivate, None);
    }

    fn resolve_ability(&mut self, unit: UnitId, ability: AbilityKind, target: Option<UnitId>) {
        let Some(team) = self
            .state
            .unit(unit)
            .filter(|u| u.is_alive())
            .map(|u| u.team)
        else {
            return;
        };
        self.emit(BattleEvent::AbilityUsed { unit, ability });

        match ability {
            AbilityKind::Charge => {
                debug!(target: "battle::ai", unit = %unit, "charging");
            }
            AbilityKind::BuffAllies { status } => {
                for ally in self.state.living_ids(team) {
                    self.apply_status_to(ally, status);
                }
            }
            AbilityKind::DebuffTarget { status } => {
                if let Some(target) = target {
                    self.apply_status_to(target, status);
                }
            }
            AbilityKind::HealAllies { amount } => {
                for ally in self.state.living_ids(team) {
                    self.apply_health_change(ally, amount as i32);
                }
            }
        }
    }
}
