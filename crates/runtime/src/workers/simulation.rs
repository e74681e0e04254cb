//! Simulation worker that owns the authoritative [`BattleEngine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), drives the
//! engine, and republishes every event the engine emitted on the
//! [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use battle_core::{
    ActionCommand, BattleEngine, BattleSnapshot, BattleState, ConfirmOutcome, Decision,
    EngineError, MaskId, StepReport, Team, UnitId, UnitTemplate,
};

use crate::api::{Result, RuntimeError};
use crate::events::EventBus;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Start a battle with the given units. Decks were installed at build time.
    Initialize {
        players: Vec<UnitTemplate>,
        enemies: Vec<UnitTemplate>,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Submit a command; it starts immediately or waits in the queue.
    ConfirmAction {
        command: ActionCommand,
        reply: oneshot::Sender<Result<ConfirmOutcome>>,
    },
    /// Resolve the next step of the current command.
    Step {
        reply: oneshot::Sender<Option<StepReport>>,
    },
    /// Resolve everything confirmed so far.
    RunPending {
        reply: oneshot::Sender<Vec<StepReport>>,
    },
    /// End the player round.
    EndPlayerTurn { reply: oneshot::Sender<Result<()>> },
    /// End whichever round is active.
    EndRound { reply: oneshot::Sender<Result<()>> },
    /// What an enemy would do right now, without committing anything.
    EnemyDecision {
        unit: UnitId,
        reply: oneshot::Sender<Option<Decision>>,
    },
    Draw {
        team: Team,
        reply: oneshot::Sender<Result<Option<MaskId>>>,
    },
    Discard {
        team: Team,
        mask: MaskId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query the current battle state (read-only copy).
    QueryState { reply: oneshot::Sender<BattleState> },
    /// Capture a presentation snapshot.
    Snapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
}

impl Command {
    fn as_str(&self) -> &'static str {
        match self {
            Command::Initialize { .. } => "initialize",
            Command::ConfirmAction { .. } => "confirm_action",
            Command::Step { .. } => "step",
            Command::RunPending { .. } => "run_pending",
            Command::EndPlayerTurn { .. } => "end_player_turn",
            Command::EndRound { .. } => "end_round",
            Command::EnemyDecision { .. } => "enemy_decision",
            Command::Draw { .. } => "draw",
            Command::Discard { .. } => "discard",
            Command::QueryState { .. } => "query_state",
            Command::Snapshot { .. } => "snapshot",
        }
    }
}

/// Background task that processes battle commands.
pub struct SimulationWorker {
    engine: BattleEngine,
    command_rx: mpsc::Receiver<Command>,
    bus: EventBus,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(engine: BattleEngine, command_rx: mpsc::Receiver<Command>, bus: EventBus) -> Self {
        Self {
            engine,
            command_rx,
            bus,
        }
    }

    /// Main worker loop. Exits once every handle is dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    debug!(target: "runtime::worker", command = cmd.as_str(), "handling command");
                    self.handle_command(cmd);
                    self.flush_events();
                }
                else => break,
            }
        }
        debug!(target: "runtime::worker", "command channel closed; worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Initialize {
                players,
                enemies,
                reply,
            } => {
                let result = self
                    .engine
                    .initialize_battle(players, enemies)
                    .map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::ConfirmAction { command, reply } => {
                let result = self.engine.confirm_action(command).map_err(|error| {
                    debug!(
                        target: "runtime::worker",
                        unit = %command.initiator,
                        kind = command.kind.as_str(),
                        %error,
                        "command rejected"
                    );
                    RuntimeError::from(error)
                });
                let _ = reply.send(result);
            }
            Command::Step { reply } => {
                let _ = reply.send(self.engine.step());
            }
            Command::RunPending { reply } => {
                let _ = reply.send(self.engine.run_pending());
            }
            Command::EndPlayerTurn { reply } => {
                let result = self.engine.player_end_turn().map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::EndRound { reply } => {
                let result = if self.engine.state().active_team().is_some() {
                    self.engine.end_round();
                    Ok(())
                } else {
                    warn!(
                        target: "runtime::worker",
                        phase = ?self.engine.phase(),
                        "end_round without an active round"
                    );
                    Err(RuntimeError::from(EngineError::NotActive))
                };
                let _ = reply.send(result);
            }
            Command::EnemyDecision { unit, reply } => {
                let _ = reply.send(self.engine.enemy_decision(unit));
            }
            Command::Draw { team, reply } => {
                let result = self.engine.draw_mask(team).map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::Discard { team, mask, reply } => {
                let result = self
                    .engine
                    .discard_mask(team, mask)
                    .map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.engine.state().clone());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.engine.snapshot());
            }
        }
    }

    /// Moves everything the engine journaled onto the bus.
    fn flush_events(&mut self) {
        for event in self.engine.drain_events() {
            self.bus.publish(event);
        }
    }
}
