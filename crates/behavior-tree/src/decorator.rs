//! Decorator behavior nodes.
//!
//! Decorators wrap a single child: [`AlwaysSucceed`] hides its failure and
//! [`Chance`] gates it behind a seeded percentage roll.

use crate::{Behavior, PercentRoll, Status};

/// Ticks its child and reports success whatever the child returned.
///
/// Useful for optional bookkeeping inside a sequence.
pub struct AlwaysSucceed<C> {
    child: Box<dyn Behavior<C>>,
}

impl<C> AlwaysSucceed<C> {
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for AlwaysSucceed<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let _ = self.child.tick(ctx);
        Status::Success
    }
}

/// Ticks its child only when a percentage roll lands at or under `percent`.
///
/// The roll is drawn from the blackboard, so the branch taken is reproducible
/// for identical inputs. A failed roll returns `Failure` without ticking the
/// child. `percent >= 100` always passes and `0` never does, but a roll is
/// consumed either way to keep later rolls aligned.
pub struct Chance<C> {
    percent: u32,
    child: Box<dyn Behavior<C>>,
}

impl<C> Chance<C> {
    pub fn new(percent: u32, child: Box<dyn Behavior<C>>) -> Self {
        Self { percent, child }
    }
}

impl<C: PercentRoll> Behavior<C> for Chance<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let roll = ctx.roll_percent();
        if roll <= self.percent {
            self.child.tick(ctx)
        } else {
            Status::Failure
        }
    }
}
