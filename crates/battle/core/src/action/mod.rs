//! Action commands and their resolution pipeline.
//!
//! A command goes through three stages:
//!
//! 1. [`validate`]: a pure check against the current [`BattleState`]
//! 2. debit: the cost is taken from the unit or team pool
//! 3. resolution: [`plan`] turns it into ordered [`ResolutionStep`]s that the
//!    engine applies one at a time through the [`ActionExecutor`]
//!
//! Validation runs again whenever a queued command reaches the head of the
//! queue, so a command confirmed against stale state never resolves.

mod command;
mod error;
mod executor;
mod validation;

pub use command::{
    AbilityKind, ActionCommand, ActionCost, ActionKind, AttackPayload, BASE_MULTIPLIER_PCT,
};
pub use error::CommandError;
pub use executor::{ActionExecutor, ResolutionStep, StepHint, plan};
pub use validation::{required_cost, validate};

