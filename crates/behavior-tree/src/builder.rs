//! Shorthand constructors returning boxed nodes.
//!
//! `sequence(vec![condition(..), action(..)])` instead of nesting
//! `Box::new(Sequence::new(..))` by hand.

use crate::{
    Action, AlwaysSucceed, Behavior, Chance, Condition, PercentRoll, Selector, Sequence, Status,
};

#[inline]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Sequence::new(children))
}

#[inline]
pub fn selector<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Selector::new(children))
}

#[inline]
pub fn always_succeed<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(AlwaysSucceed::new(child))
}

/// Gates `child` behind a `percent` roll drawn from the blackboard.
#[inline]
pub fn chance<C: PercentRoll + 'static>(
    percent: u32,
    child: Box<dyn Behavior<C>>,
) -> Box<dyn Behavior<C>> {
    Box::new(Chance::new(percent, child))
}

#[inline]
pub fn condition<C: 'static>(
    predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
) -> Box<dyn Behavior<C>> {
    Box::new(Condition::new(predicate))
}

#[inline]
pub fn action<C: 'static>(
    effect: impl Fn(&mut C) -> Status + Send + Sync + 'static,
) -> Box<dyn Behavior<C>> {
    Box::new(Action::new(effect))
}
