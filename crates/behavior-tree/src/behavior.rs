//! Core behavior trait and the roll source used by probabilistic nodes.

use crate::Status;

/// A behavior tree node evaluated against a blackboard `C`.
pub trait Behavior<C>: Send + Sync {
    /// Evaluates this node once.
    ///
    /// Nodes may read the blackboard and write intermediate results into it
    /// (for example the command an archetype settled on).
    fn tick(&self, ctx: &mut C) -> Status;
}

impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}

/// Blackboards that can hand out percentage rolls.
///
/// Implementations must be deterministic: the n-th roll of a blackboard built
/// from the same inputs must always return the same value.
pub trait PercentRoll {
    /// Returns a roll in `1..=100`.
    fn roll_percent(&mut self) -> u32;
}
