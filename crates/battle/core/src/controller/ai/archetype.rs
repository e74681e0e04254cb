//! Behavior trees for each [`Archetype`].

use behavior_tree::Behavior;
use behavior_tree::builder::{action, always_succeed, chance, condition, selector, sequence};

use super::{Archetype, Blackboard};
use crate::action::{AbilityKind, BASE_MULTIPLIER_PCT};
use crate::state::DamagePattern;

type Tree = Box<dyn Behavior<Blackboard>>;

fn plain_attack() -> Tree {
    action(|b: &mut Blackboard| b.attack(BASE_MULTIPLIER_PCT))
}

fn support_ready() -> Tree {
    condition(|b: &Blackboard| b.support_ready())
}

pub(super) fn build(archetype: &Archetype) -> Tree {
    match *archetype {
        Archetype::Basic => plain_attack(),

        // Mid-charge turns never reach the roll: the first branch always
        // succeeds once the counter is non-zero.
        Archetype::Tank {
            charge_time,
            charge_chance,
            multiplier_pct,
        } => selector(vec![
            sequence(vec![
                condition(|b: &Blackboard| b.memory.charge > 0),
                always_succeed(action(move |b: &mut Blackboard| {
                    b.continue_charge(charge_time, multiplier_pct)
                })),
            ]),
            chance(charge_chance, action(|b: &mut Blackboard| b.start_charge())),
            plain_attack(),
        ]),

        Archetype::Buffer {
            chance: percent,
            status,
            cooldown,
        } => selector(vec![
            sequence(vec![
                support_ready(),
                chance(
                    percent,
                    action(move |b: &mut Blackboard| {
                        b.support(AbilityKind::BuffAllies { status }, cooldown)
                    }),
                ),
            ]),
            plain_attack(),
        ]),

        Archetype::Debuffer {
            chance: percent,
            status,
            cooldown,
        } => selector(vec![
            sequence(vec![
                support_ready(),
                chance(
                    percent,
                    action(move |b: &mut Blackboard| {
                        b.support(AbilityKind::DebuffTarget { status }, cooldown)
                    }),
                ),
            ]),
            plain_attack(),
        ]),

        Archetype::Healer {
            chance: percent,
            amount,
            threshold_pct,
            cooldown,
        } => selector(vec![
            sequence(vec![
                support_ready(),
                condition(move |b: &Blackboard| b.any_ally_below(threshold_pct)),
                chance(
                    percent,
                    action(move |b: &mut Blackboard| {
                        b.support(AbilityKind::HealAllies { amount }, cooldown)
                    }),
                ),
            ]),
            plain_attack(),
        ]),

        Archetype::Splash => action(|b: &mut Blackboard| {
            b.pattern = DamagePattern::Splash;
            b.attack(BASE_MULTIPLIER_PCT)
        }),
    }
}
