//! Deterministic rules for lane-based, round-based mask battles.
//!
//! `battle-core` owns the canonical rules: units and their statuses, masks and
//! their timed effects, the team deck economy, commands and their validation,
//! enemy behavior trees, and the round orchestrator. All state mutation flows
//! through [`engine::BattleEngine`]; the runtime and clients only submit
//! commands and read events and snapshots.
//!
//! Randomness comes from [`rng::RngOracle`] seeded per battle, so the same
//! seed and command sequence always replays the same battle.
pub mod action;
pub mod config;
pub mod controller;
pub mod effect;
pub mod engine;
pub mod error;
pub mod events;
pub mod rng;
pub mod snapshot;
pub mod state;

pub use action::{
    AbilityKind, ActionCommand, ActionCost, ActionExecutor, ActionKind, AttackPayload,
    BASE_MULTIPLIER_PCT, CommandError, ResolutionStep, StepHint, plan, required_cost, validate,
};
pub use config::{BattleConfig, StepTimings};
pub use controller::{
    Archetype, ArchetypeMemory, ControlSpec, Controller, ControllerKind, Decision, EnemyBrain,
    EnemySpec, PlayerState, TargetPolicy, select_target,
};
pub use effect::{
    ConditionEvent, ConditionView, EffectAction, EffectCondition, EffectSet, EffectSpec,
    EffectTarget, EffectTiming, MaskEffect,
};
pub use engine::{BattleEngine, ConfirmOutcome, EngineError, HealthChange, StepReport};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use events::{BattleEvent, EventCategory, EventDispatcher, SubscriptionId};
pub use rng::{PcgRng, RngOracle, SeedContext, compute_seed};
pub use snapshot::{BattleSnapshot, MaskView, StatusView, TeamView, UnitView};
pub use state::{
    BattlePhase, BattleState, DamagePattern, Deck, DeckError, Lane, Mask, MaskId, MaskKind,
    MaskLocation, MaskTemplate, PerTeam, ResourceKind, ResourcePool, StatusEffect, StatusEffects,
    StatusError, StatusKind, StatusSpec, Team, Unit, UnitId, UnitTemplate,
};
