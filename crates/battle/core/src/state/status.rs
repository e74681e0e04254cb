//! Status effects attached to units.
//!
//! A unit carries at most one entry per [`StatusKind`]. Re-applying a kind
//! refreshes the entry instead of duplicating it: the longer duration wins
//! and stackable kinds gain a stack until `max_stacks`.
//!
//! # Modifier bookkeeping
//!
//! Each entry records the attack modifier it has contributed so far
//! (`applied_modifier`). Removal hands that exact amount back to the unit,
//! which makes apply followed by remove an exact round trip no matter how many
//! stacks were added in between.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::error::{ErrorSeverity, GameError};

/// Built-in status kinds. Each kind doubles as the status id on a unit.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// +magnitude attack.
    AttackUp,
    /// −magnitude attack.
    AttackDown,
    /// +magnitude attack per stack.
    Rage,
    /// Unit cannot act.
    Stun,
    /// Heals magnitude × stacks at the owner's turn start.
    Regeneration,
    /// Deals magnitude × stacks at the owner's turn start (masks absorb it).
    Poison,
}

impl StatusKind {
    /// Attack modifier contributed by a single stack.
    pub const fn modifier_per_stack(self, magnitude: i32) -> i32 {
        match self {
            StatusKind::AttackUp | StatusKind::Rage => magnitude,
            StatusKind::AttackDown => -magnitude,
            StatusKind::Stun | StatusKind::Regeneration | StatusKind::Poison => 0,
        }
    }
}

/// Blueprint of a status to apply. Carried by mask effects and abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSpec {
    pub kind: StatusKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub magnitude: i32,
    /// Remaining owner turns.
    pub duration: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stackable: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stacks"))]
    pub max_stacks: u8,
}

#[cfg(feature = "serde")]
fn default_max_stacks() -> u8 {
    1
}

impl StatusSpec {
    pub const fn new(kind: StatusKind, magnitude: i32, duration: i32) -> Self {
        Self {
            kind,
            magnitude,
            duration,
            stackable: false,
            max_stacks: 1,
        }
    }

    pub const fn attack_up(amount: i32, duration: i32) -> Self {
        Self::new(StatusKind::AttackUp, amount, duration)
    }

    pub const fn attack_down(amount: i32, duration: i32) -> Self {
        Self::new(StatusKind::AttackDown, amount, duration)
    }

    pub const fn rage(per_stack: i32, duration: i32, max_stacks: u8) -> Self {
        Self {
            kind: StatusKind::Rage,
            magnitude: per_stack,
            duration,
            stackable: true,
            max_stacks,
        }
    }

    pub const fn stun(duration: i32) -> Self {
        Self::new(StatusKind::Stun, 0, duration)
    }

    pub const fn regeneration(amount: i32, duration: i32) -> Self {
        Self::new(StatusKind::Regeneration, amount, duration)
    }

    pub const fn poison(amount: i32, duration: i32) -> Self {
        Self::new(StatusKind::Poison, amount, duration)
    }
}

/// A status instance living on a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub magnitude: i32,
    /// Remaining owner turns; `<= 0` means the entry is due for removal.
    pub duration: i32,
    pub stack_count: u8,
    pub stackable: bool,
    pub max_stacks: u8,
    /// Attack modifier this entry has pushed onto its unit so far.
    pub applied_modifier: i32,
}

impl StatusEffect {
    pub const fn is_expired(&self) -> bool {
        self.duration <= 0
    }

    /// Per-turn heal or damage for ticking kinds.
    pub fn tick_amount(&self) -> i32 {
        self.magnitude.saturating_mul(i32::from(self.stack_count))
    }
}

/// What an application did to the status list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    Added,
    /// Existing entry kept; duration possibly extended.
    Refreshed,
    /// Existing entry gained a stack.
    Stacked,
}

/// Result of [`StatusEffects::apply`]. `modifier_delta` must be added to the
/// owning unit's attack modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusApplication {
    pub outcome: ApplyOutcome,
    pub modifier_delta: i32,
    pub stack_count: u8,
    pub duration: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusError {
    #[error("status list is full (max: {max})")]
    SlotsFull { max: usize },

    #[error("status {kind} is not present")]
    NotPresent { kind: StatusKind },
}

impl GameError for StatusError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StatusError::SlotsFull { .. } => ErrorSeverity::Internal,
            StatusError::NotPresent { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StatusError::SlotsFull { .. } => "STATUS_SLOTS_FULL",
            StatusError::NotPresent { .. } => "STATUS_NOT_PRESENT",
        }
    }
}

/// Active statuses on a unit, unique by kind, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn is_stunned(&self) -> bool {
        self.has(StatusKind::Stun)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Adds or refreshes the entry for `spec.kind`.
    pub fn apply(&mut self, spec: StatusSpec) -> Result<StatusApplication, StatusError> {
        let per_stack = spec.kind.modifier_per_stack(spec.magnitude);

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == spec.kind) {
            existing.duration = existing.duration.max(spec.duration);

            let mut outcome = ApplyOutcome::Refreshed;
            let mut modifier_delta = 0;
            if existing.stackable && existing.stack_count < existing.max_stacks {
                existing.stack_count += 1;
                let delta = existing.kind.modifier_per_stack(existing.magnitude);
                existing.applied_modifier += delta;
                modifier_delta = delta;
                outcome = ApplyOutcome::Stacked;
            }

            return Ok(StatusApplication {
                outcome,
                modifier_delta,
                stack_count: existing.stack_count,
                duration: existing.duration,
            });
        }

        let entry = StatusEffect {
            kind: spec.kind,
            magnitude: spec.magnitude,
            duration: spec.duration,
            stack_count: 1,
            stackable: spec.stackable,
            max_stacks: spec.max_stacks.max(1),
            applied_modifier: per_stack,
        };
        self.effects
            .try_push(entry)
            .map_err(|_| StatusError::SlotsFull {
                max: BattleConfig::MAX_STATUS_EFFECTS,
            })?;

        Ok(StatusApplication {
            outcome: ApplyOutcome::Added,
            modifier_delta: per_stack,
            stack_count: 1,
            duration: spec.duration,
        })
    }

    /// Removes the entry for `kind` and returns it so the caller can reverse
    /// `applied_modifier`.
    pub fn remove(&mut self, kind: StatusKind) -> Result<StatusEffect, StatusError> {
        let index = self
            .effects
            .iter()
            .position(|e| e.kind == kind)
            .ok_or(StatusError::NotPresent { kind })?;
        Ok(self.effects.remove(index))
    }

    /// Decrements every duration by one owner turn.
    pub fn tick_durations(&mut self) {
        for effect in &mut self.effects {
            effect.duration -= 1;
        }
    }

    /// Kinds whose duration has run out, in application order.
    pub fn expired(&self) -> Vec<StatusKind> {
        self.effects
            .iter()
            .filter(|e| e.is_expired())
            .map(|e| e.kind)
            .collect()
    }
}
