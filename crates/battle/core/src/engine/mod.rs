//! Round/turn orchestration and action resolution.
//!
//! [`BattleEngine`] owns one battle: the [`BattleState`], the action executor
//! and the event dispatcher. Callers create one per battle and drop it when
//! done; there is no global state.
//!
//! Phases: `Idle` → `RoundActive(team)` ⇄ `RoundActive(opponent)` →
//! `BattleOver`. Within a round, confirmed commands are resolved one step at
//! a time through [`BattleEngine::step`], and every mutation happens at a
//! step boundary.
//!
//! Entry points that correspond to outside requests (`initialize_battle`,
//! `confirm_action`, `player_end_turn`) log a warning and leave state untouched
//! when they cannot proceed; they also return the reason so callers can react.
//!
//! Every emitted event is kept in a journal until the caller takes it with
//! [`BattleEngine::drain_events`]. The journal is not capped: a caller that
//! drives the engine directly must drain it periodically (the runtime worker
//! does so after every command). Removed units accumulate the same way until
//! [`BattleEngine::drain_removed`].

mod actions;
mod economy;
mod effects;
mod enemy;
mod errors;
mod health;
mod resolve;
mod round;

#[cfg(test)]
mod tests;

pub use actions::{ConfirmOutcome, StepReport};
pub use errors::EngineError;
pub use health::HealthChange;

use crate::action::ActionExecutor;
use crate::config::BattleConfig;
use crate::events::{BattleEvent, EventDispatcher, SubscriptionId};
use crate::rng::PcgRng;
use crate::snapshot::BattleSnapshot;
use crate::state::{
    BattlePhase, BattleState, MaskId, MaskTemplate, PerTeam, ResourceKind, Team, UnitId,
};

#[derive(Debug)]
pub struct BattleEngine {
    state: BattleState,
    executor: ActionExecutor,
    events: EventDispatcher,
    rng: PcgRng,
    /// Deck lists instantiated into the mask arena at every initialization.
    deck_lists: PerTeam<Vec<MaskTemplate>>,
    /// Masks whose OnDestroy effects are currently running.
    destroying: Vec<MaskId>,
    /// Number of reshuffles so far; feeds the shuffle seed.
    shuffles: u32,
}

impl BattleEngine {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            state: BattleState::new(config),
            executor: ActionExecutor::new(),
            events: EventDispatcher::new(),
            rng: PcgRng,
            deck_lists: PerTeam::default(),
            destroying: Vec::new(),
            shuffles: 0,
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.state.config
    }

    pub fn phase(&self) -> BattlePhase {
        self.state.phase
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::capture(&self.state)
    }

    /// Masks `team` draws from in every battle this engine initializes.
    pub fn set_deck(&mut self, team: Team, masks: Vec<MaskTemplate>) {
        *self.deck_lists.get_mut(team) = masks;
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&BattleEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Events emitted since the last [`drain_events`](Self::drain_events).
    pub fn journal(&self) -> &[BattleEvent] {
        self.events.journal()
    }

    /// Takes every journaled event, oldest first, leaving the journal empty.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.events.drain()
    }

    /// Units that left the roster since the last call, in removal order.
    /// Each unit appears once.
    pub fn drain_removed(&mut self) -> Vec<UnitId> {
        core::mem::take(&mut self.state.removal_queue)
    }

    /// True when no command is resolving.
    pub fn is_idle(&self) -> bool {
        self.executor.is_idle()
    }

    /// Debits a resource on behalf of `unit`. See [`BattleState::consume_resource`].
    pub fn consume_resource(&mut self, unit: UnitId, kind: ResourceKind, amount: u32) -> bool {
        self.state.consume_resource(unit, kind, amount)
    }

    fn emit(&mut self, event: BattleEvent) {
        self.events.emit(event);
    }
}
