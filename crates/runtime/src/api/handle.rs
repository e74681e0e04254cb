//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the battle or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{
    ActionCommand, BattleEvent, BattleSnapshot, BattleState, ConfirmOutcome, Decision, MaskId,
    StepReport, Team, UnitId, UnitTemplate,
};

use super::errors::{Result, RuntimeError};
use crate::events::{EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Start a battle. Fails if one is already running.
    pub async fn initialize(
        &self,
        players: Vec<UnitTemplate>,
        enemies: Vec<UnitTemplate>,
    ) -> Result<()> {
        self.request(|reply| Command::Initialize {
            players,
            enemies,
            reply,
        })
        .await?
    }

    /// Submit a command for validation and resolution.
    pub async fn confirm_action(&self, command: ActionCommand) -> Result<ConfirmOutcome> {
        self.request(|reply| Command::ConfirmAction { command, reply })
            .await?
    }

    /// Resolve one step of the current command.
    pub async fn step(&self) -> Result<Option<StepReport>> {
        self.request(|reply| Command::Step { reply }).await
    }

    /// Resolve every confirmed command to completion.
    pub async fn run_pending(&self) -> Result<Vec<StepReport>> {
        self.request(|reply| Command::RunPending { reply }).await
    }

    pub async fn end_player_turn(&self) -> Result<()> {
        self.request(|reply| Command::EndPlayerTurn { reply })
            .await?
    }

    /// End the active round regardless of team.
    pub async fn end_round(&self) -> Result<()> {
        self.request(|reply| Command::EndRound { reply }).await?
    }

    pub async fn enemy_decision(&self, unit: UnitId) -> Result<Option<Decision>> {
        self.request(|reply| Command::EnemyDecision { unit, reply })
            .await
    }

    /// Pay action points to draw a mask into `team`'s hand.
    pub async fn draw_mask(&self, team: Team) -> Result<Option<MaskId>> {
        self.request(|reply| Command::Draw { team, reply }).await?
    }

    pub async fn discard_mask(&self, team: Team, mask: MaskId) -> Result<()> {
        self.request(|reply| Command::Discard { team, mask, reply })
            .await?
    }

    /// Query the current battle state (read-only copy)
    pub async fn query_state(&self) -> Result<BattleState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Round` - Round lifecycle, grants and the battle result
    /// - `Topic::Unit` - Health, deaths and statuses
    /// - `Topic::Mask` - Equips, breaks, draws and reshuffles
    /// - `Topic::Action` - Command lifecycle, steps and enemy previews
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use battle_runtime::Topic;
    ///
    /// let mut round_rx = handle.subscribe(Topic::Round);
    /// while let Ok(event) = round_rx.recv().await {
    ///     // Handle round events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<BattleEvent>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
