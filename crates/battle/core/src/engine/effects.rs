//! Mask effect execution.

use tracing::{debug, trace, warn};

use super::BattleEngine;
use crate::effect::{ConditionEvent, ConditionView, EffectAction, EffectTarget, EffectTiming};
use crate::events::BattleEvent;
use crate::state::{MaskId, MaskLocation, ResourceKind, Team, UnitId};

/// Everything an effect needs to resolve its targets.
#[derive(Clone, Copy, Debug)]
struct EffectContext {
    mask: MaskId,
    wielder: Option<UnitId>,
    team: Team,
    attack_target: Option<UnitId>,
}

impl BattleEngine {
    /// Runs every effect of `mask` registered under `timing`, in insertion order.
    ///
    /// Condition effects are skipped here; they fire through
    /// [`poll_conditions`](Self::poll_conditions).
    pub(super) fn run_mask_effects(
        &mut self,
        mask: MaskId,
        timing: EffectTiming,
        attack_target: Option<UnitId>,
    ) {
        if timing == EffectTiming::OnCondition {
            return;
        }
        let Some(record) = self.state.mask(mask) else {
            return;
        };
        let actions: Vec<EffectAction> = record
            .effects
            .get(timing)
            .iter()
            .map(|effect| effect.action)
            .collect();
        if actions.is_empty() {
            return;
        }

        let ctx = EffectContext {
            mask,
            wielder: record.equipped_by(),
            team: record.owner,
            attack_target,
        };
        debug!(
            target: "battle::effect",
            mask = %mask,
            %timing,
            count = actions.len(),
            "running mask effects"
        );
        for action in actions {
            self.execute_effect(&ctx, action);
        }
    }

    /// Feeds `event` to every condition effect on an equipped mask.
    ///
    /// Counters of every wielder are updated first; the fired effects then
    /// run in wielder id order.
    pub(super) fn poll_conditions(&mut self, event: ConditionEvent) {
        let ConditionEvent::UnitAttacked { target, .. } = event;
        let wielders: Vec<UnitId> = self.state.roster.iter().copied().collect();

        let mut fired: Vec<(EffectContext, EffectAction)> = Vec::new();
        for wielder in wielders {
            let Some(unit) = self.state.unit(wielder).filter(|u| u.is_alive()) else {
                continue;
            };
            let Some(mask_id) = unit.mask else {
                continue;
            };
            let wielder_health = unit.current_health;
            let wielder_max_health = unit.max_health;
            let team = unit.team;

            let Some(mask) = self.state.mask_mut(mask_id) else {
                continue;
            };
            let view = ConditionView {
                wielder,
                wielder_health,
                wielder_max_health,
                durability: mask.current_durability,
                max_durability: mask.max_durability,
            };
            for effect in mask.effects.get_mut(EffectTiming::OnCondition) {
                if effect.observe(&event, &view) {
                    fired.push((
                        EffectContext {
                            mask: mask_id,
                            wielder: Some(wielder),
                            team,
                            attack_target: Some(target),
                        },
                        effect.action,
                    ));
                }
            }
        }

        for (ctx, action) in fired {
            trace!(target: "battle::effect", mask = %ctx.mask, ?action, "condition fired");
            self.execute_effect(&ctx, action);
        }
    }

    fn resolve_targets(&self, ctx: &EffectContext, target: EffectTarget) -> Vec<UnitId> {
        match target {
            EffectTarget::Wielder => match ctx.wielder.filter(|id| self.state.is_alive(*id)) {
                Some(id) => vec![id],
                None => {
                    warn!(
                        target: "battle::effect",
                        mask = %ctx.mask,
                        "wielder-targeted effect without a living wielder; skipped"
                    );
                    Vec::new()
                }
            },
            EffectTarget::Allies => self.state.living_ids(ctx.team),
            EffectTarget::Enemies => self.state.living_ids(ctx.team.opponent()),
            EffectTarget::AttackTarget => ctx
                .attack_target
                .filter(|id| self.state.is_alive(*id))
                .into_iter()
                .collect(),
            EffectTarget::AdjacentEnemies => {
                let anchor = ctx.attack_target.or(ctx.wielder);
                match anchor.and_then(|id| self.state.unit(id)) {
                    Some(unit) => self.state.adjacent_opponents(ctx.team, unit.lane),
                    None => Vec::new(),
                }
            }
        }
    }

    fn execute_effect(&mut self, ctx: &EffectContext, action: EffectAction) {
        if self.state.phase.is_over() {
            return;
        }
        match action {
            EffectAction::ApplyStatus { target, status } => {
                for unit in self.resolve_targets(ctx, target) {
                    self.apply_status_to(unit, status);
                }
            }
            EffectAction::Heal { target, amount } => {
                for unit in self.resolve_targets(ctx, target) {
                    self.apply_health_change(unit, amount as i32);
                }
            }
            EffectAction::Damage { target, amount } => {
                for unit in self.resolve_targets(ctx, target) {
                    self.apply_health_change(unit, -(amount as i32));
                }
            }
            EffectAction::RepairMask { amount } => {
                let Some(mask) = self
                    .state
                    .mask_mut(ctx.mask)
                    .filter(|m| matches!(m.location, MaskLocation::Equipped(_)))
                else {
                    return;
                };
                if mask.repair(amount) > 0 {
                    let current = mask.current_durability;
                    self.emit(BattleEvent::MaskDurabilityChanged {
                        mask: ctx.mask,
                        current,
                    });
                }
            }
            EffectAction::GrantActionPoints { amount } => {
                let gained = self
                    .state
                    .pools
                    .get_mut(ctx.team)
                    .gain(ResourceKind::ActionPoint, amount);
                debug!(
                    target: "battle::economy",
                    team = %ctx.team,
                    gained,
                    "action points refunded"
                );
            }
            EffectAction::GrantAttacks { amount } => {
                let Some(wielder) = ctx.wielder else {
                    return;
                };
                if let Some(controller) = self.state.controller_mut(wielder) {
                    let gained = controller.resources.gain(ResourceKind::Attack, amount);
                    debug!(target: "battle::economy", unit = %wielder, gained, "attacks granted");
                }
            }
        }
    }
}
