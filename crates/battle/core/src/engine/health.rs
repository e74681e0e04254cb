use tracing::{debug, info, warn};

use super::BattleEngine;
use crate::effect::EffectTiming;
use crate::events::BattleEvent;
use crate::state::{MaskId, MaskLocation, StatusKind, StatusSpec, UnitId};

/// What a single health change did to a unit and its mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HealthChange {
    /// Damage taken by the equipped mask's durability.
    pub absorbed: u32,
    /// Signed change actually applied to health.
    pub health_delta: i32,
    /// The unit died from this change.
    pub died: bool,
}

impl BattleEngine {
    /// Routes a signed health change through the unit's mask.
    ///
    /// Damage (negative `amount`) is absorbed by durability first and only
    /// the overflow reaches health. Healing goes straight to health. If the
    /// mask breaks, its OnDestroy effects run before death is processed.
    /// Dead units are left alone.
    pub fn apply_health_change(&mut self, unit: UnitId, amount: i32) -> HealthChange {
        let Some(record) = self.state.unit(unit).filter(|u| u.is_alive()) else {
            return HealthChange::default();
        };
        let mask = record.mask;

        let mut change = HealthChange::default();
        let mut broken = None;
        let mut to_health = amount;

        if amount < 0
            && let Some(mask_id) = mask
            && let Some(mask) = self.state.mask_mut(mask_id)
            && !mask.is_broken()
        {
            let absorption = mask.absorb(amount.unsigned_abs());
            let current = mask.current_durability;
            change.absorbed = absorption.absorbed;
            to_health = -(absorption.overflow as i32);
            if absorption.absorbed > 0 {
                self.emit(BattleEvent::MaskDurabilityChanged {
                    mask: mask_id,
                    current,
                });
            }
            if absorption.broke {
                broken = Some(mask_id);
            }
        }

        if to_health != 0 {
            let delta = match self.state.unit_mut(unit) {
                Some(u) => u.apply_health_delta(to_health),
                None => return change,
            };
            change.health_delta = delta.applied;
            change.died = delta.died;
            if delta.applied != 0 {
                let current = self.state.unit(unit).map_or(0, |u| u.current_health);
                debug!(
                    target: "battle::engine",
                    unit = %unit,
                    delta = delta.applied,
                    current,
                    "health changed"
                );
                self.emit(BattleEvent::UnitHealthChanged {
                    unit,
                    delta: delta.applied,
                    current,
                });
            }
        }

        if let Some(mask_id) = broken {
            self.destroy_mask(mask_id);
        }

        if change.died {
            self.handle_death(unit);
        }

        change
    }

    /// Breaks `mask` outright, running its OnDestroy effects and discarding it.
    pub fn break_mask(&mut self, mask: MaskId) -> bool {
        let Some(record) = self.state.mask_mut(mask) else {
            return false;
        };
        if !matches!(record.location, MaskLocation::Equipped(_)) {
            return false;
        }
        record.current_durability = 0;
        self.emit(BattleEvent::MaskDurabilityChanged { mask, current: 0 });
        self.destroy_mask(mask);
        true
    }

    /// OnDestroy, then discard. Runs at most once per mask life.
    pub(super) fn destroy_mask(&mut self, mask: MaskId) {
        if self.destroying.contains(&mask) {
            return;
        }
        let Some(record) = self.state.mask(mask) else {
            return;
        };
        if record.location == MaskLocation::Discard {
            return;
        }
        let wielder = record.equipped_by();

        self.destroying.push(mask);
        info!(target: "battle::effect", mask = %mask, "mask destroyed");
        self.run_mask_effects(mask, EffectTiming::OnDestroy, None);
        self.emit(BattleEvent::MaskDestroyed { mask, wielder });
        self.detach_mask(mask);
        self.destroying.retain(|m| *m != mask);
    }

    /// Takes `mask` off its wielder and puts it in the owner's discard pile.
    /// No effects run here.
    pub(super) fn detach_mask(&mut self, mask: MaskId) {
        let Some(record) = self.state.mask_mut(mask) else {
            return;
        };
        let wielder = record.equipped_by();
        let owner = record.owner;
        record.location = MaskLocation::Discard;

        if let Some(unit) = wielder {
            if let Some(u) = self.state.unit_mut(unit)
                && u.mask == Some(mask)
            {
                u.mask = None;
            }
            self.emit(BattleEvent::MaskUnequipped { unit, mask });
        }
        if let Some(deck) = self.state.deck_mut(owner) {
            deck.push_discard(mask);
            self.emit(BattleEvent::MaskDiscarded { team: owner, mask });
        }
    }

    /// Death: announce it, unregister the unit, drop its mask, stop its controller.
    fn handle_death(&mut self, unit: UnitId) {
        info!(target: "battle::engine", unit = %unit, "unit died");
        self.emit(BattleEvent::UnitDied { unit });

        if self.state.roster.remove(&unit) {
            self.state.removal_queue.push(unit);
        }

        if let Some(mask) = self.state.unit(unit).and_then(|u| u.mask) {
            self.detach_mask(mask);
        }
        if let Some(controller) = self.state.controller_mut(unit) {
            controller.on_turn_end();
        }
    }

    /// Applies a status and emits the resulting stack/duration.
    pub fn apply_status_to(&mut self, unit: UnitId, spec: StatusSpec) -> bool {
        let Some(record) = self.state.unit_mut(unit).filter(|u| u.is_alive()) else {
            return false;
        };
        match record.apply_status(spec) {
            Ok(application) => {
                debug!(
                    target: "battle::effect",
                    unit = %unit,
                    kind = %spec.kind,
                    stacks = application.stack_count,
                    duration = application.duration,
                    outcome = ?application.outcome,
                    "status applied"
                );
                if spec.kind == StatusKind::Stun
                    && let Some(brain) = self
                        .state
                        .controller_mut(unit)
                        .and_then(|c| c.brain_mut())
                {
                    brain.reset_charge();
                }
                self.emit(BattleEvent::StatusApplied {
                    unit,
                    kind: spec.kind,
                    stacks: application.stack_count,
                    duration: application.duration,
                });
                true
            }
            Err(error) => {
                warn!(target: "battle::effect", unit = %unit, %error, "status rejected");
                false
            }
        }
    }

    pub fn remove_status_from(&mut self, unit: UnitId, kind: StatusKind) -> bool {
        let removed = self
            .state
            .unit_mut(unit)
            .is_some_and(|u| u.remove_status(kind).is_ok());
        if removed {
            debug!(target: "battle::effect", unit = %unit, %kind, "status removed");
            self.emit(BattleEvent::StatusRemoved { unit, kind });
        }
        removed
    }
}
