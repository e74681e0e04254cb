use tracing::{debug, info, warn};

use super::BattleEngine;
use crate::action::{ActionCommand, CommandError, ResolutionStep, StepHint, plan, validate};
use crate::events::BattleEvent;
use crate::state::UnitId;

/// How [`BattleEngine::confirm_action`] disposed of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfirmOutcome {
    /// Validated, paid for and now resolving.
    Started,
    /// Another command is resolving; this one waits and is validated when
    /// its turn comes.
    Queued,
}

/// One resolved step, handed back to whoever drives the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub step: ResolutionStep,
    pub hint: StepHint,
    /// The command this step belonged to has fully resolved.
    pub action_finished: bool,
}

impl BattleEngine {
    /// Submits a command.
    ///
    /// If nothing is resolving the command is validated, its cost is
    /// debited and resolution starts. Otherwise it is queued. A rejected
    /// command changes no state besides the rejection event.
    ///
    /// When an enemy submits exactly the command its brain decides, the
    /// brain's memory (charge, cooldowns) is committed as the command starts.
    pub fn confirm_action(
        &mut self,
        command: ActionCommand,
    ) -> Result<ConfirmOutcome, CommandError> {
        if !self.state.phase.is_active() {
            warn!(
                target: "battle::action",
                phase = ?self.state.phase,
                kind = command.kind.as_str(),
                "command confirmed outside an active round"
            );
            return Err(CommandError::BattleNotActive);
        }

        if !self.executor.is_idle() {
            debug!(
                target: "battle::action",
                unit = %command.initiator,
                kind = command.kind.as_str(),
                "command queued"
            );
            self.executor.enqueue(command);
            self.emit(BattleEvent::ActionQueued { command });
            return Ok(ConfirmOutcome::Queued);
        }

        self.begin_action(command)?;
        Ok(ConfirmOutcome::Started)
    }

    fn begin_action(&mut self, command: ActionCommand) -> Result<(), CommandError> {
        if let Err(error) = validate(&self.state, &command) {
            warn!(
                target: "battle::action",
                unit = %command.initiator,
                kind = command.kind.as_str(),
                %error,
                "command rejected"
            );
            self.emit(BattleEvent::ActionRejected {
                command,
                error: error.clone(),
            });
            return Err(error);
        }

        // An enemy confirming exactly what its brain decides advances the
        // brain's memory, whichever path submitted the command.
        let decided = self
            .enemy_decision(command.initiator)
            .filter(|decision| decision.command == command);

        if !self
            .state
            .consume_resource(command.initiator, command.cost.resource, command.cost.amount)
        {
            // validate() already checked availability, so this is a bug.
            let error = CommandError::InsufficientResources {
                kind: command.cost.resource,
                required: command.cost.amount,
                available: self.state.available(command.initiator, command.cost.resource),
            };
            warn!(target: "battle::action", %error, "resource debit failed after validation");
            self.emit(BattleEvent::ActionRejected {
                command,
                error: error.clone(),
            });
            return Err(error);
        }

        if let Some(controller) = self.state.controller_mut(command.initiator) {
            controller.set_waiting_for_input(false);
            if let (Some(decision), Some(brain)) = (decided, controller.brain_mut()) {
                brain.commit(decision.memory);
            }
        }

        let steps = plan(&self.state, &command);
        info!(
            target: "battle::action",
            unit = %command.initiator,
            kind = command.kind.as_str(),
            target = ?command.target,
            steps = steps.len(),
            "command started"
        );
        self.emit(BattleEvent::ActionStarted { command });
        self.executor.begin(command, steps);

        if self.executor.remaining_steps() == 0 {
            self.finish_action();
        }
        Ok(())
    }

    /// Applies the next step of the resolving command.
    ///
    /// Returns `None` when nothing is resolving.
    pub fn step(&mut self) -> Option<StepReport> {
        let step = self.executor.next_step()?;
        self.apply_step(step);
        let hint = step.hint(&self.state.config.step_timings);
        self.emit(BattleEvent::StepResolved { step });

        let action_finished = self.executor.remaining_steps() == 0;
        if action_finished {
            self.finish_action();
        }
        Some(StepReport {
            step,
            hint,
            action_finished,
        })
    }

    /// Resolves the current command and everything queued behind it.
    pub fn run_pending(&mut self) -> Vec<StepReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.step() {
            reports.push(report);
        }
        reports
    }

    fn finish_action(&mut self) {
        let Some(command) = self.executor.finish_if_done() else {
            return;
        };
        debug!(
            target: "battle::action",
            unit = %command.initiator,
            kind = command.kind.as_str(),
            "command resolved"
        );
        self.emit(BattleEvent::ActionResolved { command });

        if self.state.phase.is_active()
            && let Some(winner) = self.check_victory()
        {
            self.finish_battle(winner);
            return;
        }
        self.start_next_queued();
    }

    /// Starts the oldest queued command that still validates.
    fn start_next_queued(&mut self) {
        while self.executor.is_idle() && self.state.phase.is_active() {
            let Some(command) = self.executor.dequeue() else {
                return;
            };
            if self.begin_action(command).is_ok() {
                return;
            }
        }
    }

    /// Marks a player unit as awaiting input and tells observers.
    pub(super) fn player_take_turn(&mut self, unit: UnitId) {
        let ready = self
            .state
            .controller(unit)
            .is_some_and(|c| c.is_player() && c.can_act(&self.state));
        if !ready {
            return;
        }
        if let Some(controller) = self.state.controller_mut(unit) {
            controller.set_waiting_for_input(true);
        }
        self.emit(BattleEvent::InputRequested { unit });
    }

    /// Player units still waiting for a command this round.
    pub fn awaiting_input(&self) -> Vec<UnitId> {
        self.state
            .controllers
            .iter()
            .filter(|c| c.is_waiting_for_input() && self.state.is_alive(c.unit))
            .map(|c| c.unit)
            .collect()
    }
}
