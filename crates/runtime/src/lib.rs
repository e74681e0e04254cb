//! Runtime orchestration for battles.
//!
//! This crate wires the action provider abstraction, the simulation worker
//! and the topic event bus into a cohesive runtime API. Consumers embed
//! [`BattleRuntime`] to drive rounds, subscribe to events, and submit
//! commands through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`providers`] ships the stock action providers
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod providers;
pub mod runtime;

mod workers;

pub use api::{ActionProvider, ProviderKind, Result, RuntimeError, RuntimeHandle};
pub use events::{EventBus, Topic};
pub use providers::{AutoPlayerProvider, EnemyAiProvider, ScriptedProvider};
pub use runtime::{BattleOutcome, BattleRuntime, RuntimeBuilder, RuntimeConfig};
