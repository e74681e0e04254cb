//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and drives rounds by asking the configured providers for each unit's
//! command.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use battle_content::BattleSetup;
use battle_core::{
    BattleConfig, BattleEngine, BattleEvent, BattlePhase, BattleSnapshot, MaskTemplate, PerTeam,
    Team, UnitTemplate,
};

use crate::api::{ActionProvider, ProviderKind, Result, RuntimeError, RuntimeHandle};
use crate::events::{EventBus, Topic};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Commands a player unit may issue in one round before the runtime
    /// moves on. Enemies always act once.
    pub max_player_actions: u32,
    /// Sleep for each step's presentation hint instead of resolving at once.
    pub pace_steps: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            max_player_actions: 4,
            pace_steps: false,
        }
    }
}

/// How a battle finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub winner: Team,
    pub rounds: u32,
    pub snapshot: BattleSnapshot,
}

/// Main runtime that orchestrates a battle
///
/// Design: Runtime owns the worker and coordinates turns.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct BattleRuntime {
    handle: RuntimeHandle,
    config: RuntimeConfig,

    players: Vec<UnitTemplate>,
    enemies: Vec<UnitTemplate>,

    player_provider: Option<Box<dyn ActionProvider>>,
    enemy_provider: Option<Box<dyn ActionProvider>>,

    sim_worker_handle: JoinHandle<()>,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.handle.subscribe(topic)
    }

    /// Set the player action provider
    pub fn set_player_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.player_provider = Some(Box::new(provider));
    }

    /// Set the enemy action provider
    pub fn set_enemy_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.enemy_provider = Some(Box::new(provider));
    }

    /// Initialize the battle with the units given to the builder.
    pub async fn start(&self) -> Result<()> {
        self.handle
            .initialize(self.players.clone(), self.enemies.clone())
            .await
    }

    /// Play the active team's round.
    ///
    /// Every living unit of the active team is asked for commands in id
    /// order; each accepted command is resolved before the next question.
    /// The round then ends. Returns the winner once the battle is over.
    pub async fn play_round(&self) -> Result<Option<Team>> {
        let state = self.handle.query_state().await?;
        let team = match state.phase {
            BattlePhase::Idle => return Err(RuntimeError::NotStarted),
            BattlePhase::BattleOver { winner } => return Ok(Some(winner)),
            BattlePhase::RoundActive(team) => team,
        };

        let (kind, provider) = self.provider_for(team)?;
        let budget = match team {
            Team::Player => self.config.max_player_actions,
            Team::Enemy => 1,
        };

        'units: for unit in state.living_ids(team) {
            for _ in 0..budget {
                let state = self.handle.query_state().await?;
                if state.active_team() != Some(team) {
                    break 'units;
                }
                if !state.controller(unit).is_some_and(|c| c.can_act(&state)) {
                    break;
                }

                let Some(command) = provider.provide_action(unit, &state).await? else {
                    debug!(target: "runtime::orchestrator", %kind, unit = %unit, "unit passes");
                    break;
                };

                match self.handle.confirm_action(command).await {
                    Ok(_) => self.resolve_pending().await?,
                    Err(RuntimeError::Rejected(error)) => {
                        warn!(
                            target: "runtime::orchestrator",
                            %kind,
                            unit = %unit,
                            %error,
                            "provider command rejected"
                        );
                        break;
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        let state = self.handle.query_state().await?;
        if state.active_team() == Some(team) {
            match team {
                Team::Player => self.handle.end_player_turn().await?,
                Team::Enemy => self.handle.end_round().await?,
            }
        }

        let state = self.handle.query_state().await?;
        Ok(match state.phase {
            BattlePhase::BattleOver { winner } => Some(winner),
            _ => None,
        })
    }

    /// Run rounds until the battle is decided, initializing it first if needed.
    pub async fn run(&self) -> Result<BattleOutcome> {
        if self.handle.query_state().await?.phase == BattlePhase::Idle {
            self.start().await?;
        }

        let winner = loop {
            if let Some(winner) = self.play_round().await? {
                break winner;
            }
        };

        let snapshot = self.handle.snapshot().await?;
        info!(
            target: "runtime::orchestrator",
            %winner,
            rounds = snapshot.round,
            "battle finished"
        );
        Ok(BattleOutcome {
            winner,
            rounds: snapshot.round,
            snapshot,
        })
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }

    fn provider_for(&self, team: Team) -> Result<(ProviderKind, &dyn ActionProvider)> {
        let (kind, provider) = match team {
            Team::Player => (ProviderKind::Player, &self.player_provider),
            Team::Enemy => (ProviderKind::Enemy, &self.enemy_provider),
        };
        provider
            .as_deref()
            .map(|p| (kind, p))
            .ok_or(RuntimeError::ProviderNotSet { kind })
    }

    async fn resolve_pending(&self) -> Result<()> {
        if !self.config.pace_steps {
            self.handle.run_pending().await?;
            return Ok(());
        }
        while let Some(report) = self.handle.step().await? {
            tokio::time::sleep(Duration::from_millis(u64::from(report.hint.duration_ms))).await;
        }
        Ok(())
    }
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    battle_config: BattleConfig,
    decks: PerTeam<Vec<MaskTemplate>>,
    players: Vec<UnitTemplate>,
    enemies: Vec<UnitTemplate>,
    player_provider: Option<Box<dyn ActionProvider>>,
    enemy_provider: Option<Box<dyn ActionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            battle_config: BattleConfig::default(),
            decks: PerTeam::default(),
            players: Vec::new(),
            enemies: Vec::new(),
            player_provider: None,
            enemy_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override battle rules
    pub fn battle_config(mut self, battle_config: BattleConfig) -> Self {
        self.battle_config = battle_config;
        self
    }

    pub fn deck(mut self, team: Team, masks: Vec<MaskTemplate>) -> Self {
        *self.decks.get_mut(team) = masks;
        self
    }

    pub fn units(mut self, players: Vec<UnitTemplate>, enemies: Vec<UnitTemplate>) -> Self {
        self.players = players;
        self.enemies = enemies;
        self
    }

    /// Take rules, units and decks from an assembled encounter.
    pub fn setup(self, setup: BattleSetup) -> Self {
        self.battle_config(setup.config)
            .deck(Team::Player, setup.player_deck)
            .deck(Team::Enemy, setup.enemy_deck)
            .units(setup.players, setup.enemies)
    }

    /// Set player action provider (optional)
    pub fn player_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.player_provider = Some(Box::new(provider));
        self
    }

    /// Set enemy action provider (optional)
    pub fn enemy_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.enemy_provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and spawn its worker. The battle is not started yet.
    pub async fn build(mut self) -> Result<BattleRuntime> {
        let mut engine = BattleEngine::new(self.battle_config);
        for team in [Team::Player, Team::Enemy] {
            engine.set_deck(team, std::mem::take(self.decks.get_mut(team)));
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, bus.clone());

        let sim_worker = SimulationWorker::new(engine, command_rx, bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(BattleRuntime {
            handle,
            config: self.config,
            players: self.players,
            enemies: self.enemies,
            player_provider: self.player_provider,
            enemy_provider: self.enemy_provider,
            sim_worker_handle,
        })
    }
}
