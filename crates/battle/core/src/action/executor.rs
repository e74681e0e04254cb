//! Step queue for action resolution.
//!
//! Resolution is a list of discrete steps (move, strike, return ...). The
//! engine applies one step per call, and every step leaves the battle in a
//! consistent state, so a presentation layer can animate between steps using
//! the attached [`StepHint`] without the rules ever waiting on it.
//!
//! Only one command resolves at a time. Commands confirmed while another one
//! is resolving wait in a FIFO queue.

use std::collections::VecDeque;

use crate::action::{AbilityKind, ActionCommand, ActionKind, AttackPayload};
use crate::config::StepTimings;
use crate::state::{BattleState, MaskId, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionStep {
    /// Attacker moves toward its target. No state change.
    Approach { unit: UnitId, target: UnitId },
    /// Damage is computed and applied.
    Strike {
        attacker: UnitId,
        target: UnitId,
        payload: AttackPayload,
    },
    /// Attacker returns to its lane. No state change.
    Retreat { unit: UnitId },
    /// Current mask leaves the unit (OnDestroy fires) and is discarded.
    Unequip { unit: UnitId },
    /// Mask moves from hand to the unit (OnEquip fires).
    Equip { unit: UnitId, mask: MaskId },
    Activate { unit: UnitId, mask: MaskId },
    Ability {
        unit: UnitId,
        ability: AbilityKind,
        target: Option<UnitId>,
    },
}

impl ResolutionStep {
    pub const fn label(&self) -> &'static str {
        match self {
            ResolutionStep::Approach { .. } => "approach",
            ResolutionStep::Strike { .. } => "strike",
            ResolutionStep::Retreat { .. } => "retreat",
            ResolutionStep::Unequip { .. } => "unequip",
            ResolutionStep::Equip { .. } => "equip",
            ResolutionStep::Activate { .. } => "activate",
            ResolutionStep::Ability { .. } => "ability",
        }
    }

    pub fn hint(&self, timings: &StepTimings) -> StepHint {
        let duration_ms = match self {
            ResolutionStep::Approach { .. } | ResolutionStep::Retreat { .. } => timings.move_ms,
            ResolutionStep::Strike { .. } => timings.strike_ms,
            ResolutionStep::Unequip { .. }
            | ResolutionStep::Equip { .. }
            | ResolutionStep::Activate { .. } => timings.mask_ms,
            ResolutionStep::Ability { .. } => timings.ability_ms,
        };
        StepHint {
            label: self.label(),
            duration_ms,
        }
    }
}

/// Presentation timing for a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StepHint {
    pub label: &'static str,
    pub duration_ms: u32,
}

/// Expands a validated command into the steps that resolve it.
pub fn plan(state: &BattleState, command: &ActionCommand) -> Vec<ResolutionStep> {
    let unit = command.initiator;
    match command.kind {
        ActionKind::Attack(payload) => match command.target {
            Some(target) => vec![
                ResolutionStep::Approach { unit, target },
                ResolutionStep::Strike {
                    attacker: unit,
                    target,
                    payload,
                },
                ResolutionStep::Retreat { unit },
            ],
            None => Vec::new(),
        },
        ActionKind::SwitchMask { mask } => {
            let mut steps = Vec::with_capacity(2);
            if state.unit(unit).is_some_and(|u| u.mask.is_some()) {
                steps.push(ResolutionStep::Unequip { unit });
            }
            steps.push(ResolutionStep::Equip { unit, mask });
            steps
        }
        ActionKind::ActivateMask { mask } => vec![ResolutionStep::Activate { unit, mask }],
        ActionKind::Ability(ability) => vec![ResolutionStep::Ability {
            unit,
            ability,
            target: command.target,
        }],
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActionExecutor {
    current: Option<ActionCommand>,
    steps: VecDeque<ResolutionStep>,
    queued: VecDeque<ActionCommand>,
}

impl ActionExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no command is resolving.
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn current(&self) -> Option<&ActionCommand> {
        self.current.as_ref()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn begin(&mut self, command: ActionCommand, steps: Vec<ResolutionStep>) {
        self.current = Some(command);
        self.steps = steps.into();
    }

    pub fn next_step(&mut self) -> Option<ResolutionStep> {
        self.steps.pop_front()
    }

    /// Completes the current command once its last step has run.
    pub fn finish_if_done(&mut self) -> Option<ActionCommand> {
        if self.steps.is_empty() {
            self.current.take()
        } else {
            None
        }
    }

    pub fn enqueue(&mut self, command: ActionCommand) {
        self.queued.push_back(command);
    }

    pub fn dequeue(&mut self) -> Option<ActionCommand> {
        self.queued.pop_front()
    }

    /// Drops queued (unstarted) commands. The resolving command is kept.
    pub fn discard_queued(&mut self) -> Vec<ActionCommand> {
        self.queued.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DamagePattern;

    #[test]
    fn attack_plans_move_strike_return() {
        let state = BattleState::default();
        let command = ActionCommand::attack(UnitId(0), UnitId(3), DamagePattern::SingleTarget);
        let labels: Vec<_> = plan(&state, &command).iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["approach", "strike", "retreat"]);
    }

    #[test]
    fn executor_finishes_after_last_step() {
        let state = BattleState::default();
        let command = ActionCommand::attack(UnitId(0), UnitId(3), DamagePattern::SingleTarget);
        let mut executor = ActionExecutor::new();
        executor.begin(command, plan(&state, &command));

        assert!(!executor.is_idle());
        executor.next_step();
        executor.next_step();
        assert_eq!(executor.finish_if_done(), None);
        executor.next_step();
        assert_eq!(executor.finish_if_done(), Some(command));
        assert!(executor.is_idle());
    }

    #[test]
    fn hints_follow_configured_timings() {
        let timings = StepTimings {
            move_ms: 10,
            strike_ms: 20,
            mask_ms: 30,
            ability_ms: 40,
        };
        let step = ResolutionStep::Retreat { unit: UnitId(1) };
        assert_eq!(step.hint(&timings).duration_ms, 10);
        let step = ResolutionStep::Equip {
            unit: UnitId(1),
            mask: MaskId(0),
        };
        assert_eq!(step.hint(&timings).duration_ms, 30);
    }
}
