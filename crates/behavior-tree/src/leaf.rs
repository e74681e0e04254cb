//! Leaf nodes built from closures.
//!
//! Archetype trees are assembled at runtime from configuration values
//! (charge thresholds, heal amounts), so leaves capture those values in
//! closures instead of requiring one struct per check.

use crate::{Behavior, Status};

type Predicate<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;
type Effect<C> = Box<dyn Fn(&mut C) -> Status + Send + Sync>;

/// Read-only check against the blackboard.
pub struct Condition<C> {
    predicate: Predicate<C>,
}

impl<C> Condition<C> {
    pub fn new(predicate: impl Fn(&C) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl<C> Behavior<C> for Condition<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        Status::from_bool((self.predicate)(ctx))
    }
}

/// Step that may write to the blackboard.
pub struct Action<C> {
    effect: Effect<C>,
}

impl<C> Action<C> {
    pub fn new(effect: impl Fn(&mut C) -> Status + Send + Sync + 'static) -> Self {
        Self {
            effect: Box::new(effect),
        }
    }
}

impl<C> Behavior<C> for Action<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        (self.effect)(ctx)
    }
}
