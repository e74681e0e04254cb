//! Enemy decision making.
//!
//! An [`EnemyBrain`] pairs a [`TargetPolicy`] (who to hit) with an
//! [`Archetype`] (what to do this turn). Archetypes are behavior trees ticked
//! against a [`Blackboard`] built from the current state.
//!
//! Deciding never mutates the brain. [`EnemyBrain::decide`] returns the
//! command together with the memory the brain would have afterwards, and the
//! engine commits that memory only once the command is accepted. Previews
//! therefore run the exact same code path as real turns.

mod archetype;
mod blackboard;

pub use blackboard::{Blackboard, Candidate, Intent};

use behavior_tree::Behavior;

use crate::action::ActionCommand;
use crate::rng::RngOracle;
use crate::state::{BattleState, StatusSpec, UnitId};

/// Which opponent an enemy singles out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetPolicy {
    /// Lowest current health.
    #[default]
    Aggressive,
    /// Highest current health.
    Defensive,
    /// Current health closest to the mean of all candidates.
    Balanced,
    /// Uniform pick from a seeded roll.
    Random,
}

/// Picks a target among `candidates`. Ties go to the earliest candidate.
pub fn select_target(
    policy: TargetPolicy,
    candidates: &[Candidate],
    rng: &impl RngOracle,
    seed: u64,
) -> Option<UnitId> {
    let first = candidates.first()?;
    let chosen = match policy {
        TargetPolicy::Aggressive => candidates
            .iter()
            .fold(first, |best, c| if c.health < best.health { c } else { best }),
        TargetPolicy::Defensive => candidates
            .iter()
            .fold(first, |best, c| if c.health > best.health { c } else { best }),
        TargetPolicy::Balanced => {
            // |health - mean| compared as |health * n - sum| to stay in integers
            let n = candidates.len() as i64;
            let sum: i64 = candidates.iter().map(|c| i64::from(c.health)).sum();
            let distance = |c: &Candidate| (i64::from(c.health) * n - sum).abs();
            candidates.iter().fold(first, |best, c| {
                if distance(c) < distance(best) { c } else { best }
            })
        }
        TargetPolicy::Random => &candidates[rng.pick_index(seed, candidates.len())],
    };
    Some(chosen.id)
}

/// Scripted behaviour layered on top of the target policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Archetype {
    /// Attacks every turn.
    #[default]
    Basic,
    /// May start charging; once the counter reaches `charge_time` it releases
    /// an attack at `multiplier_pct` and resets.
    Tank {
        charge_time: u32,
        charge_chance: u32,
        multiplier_pct: u32,
    },
    /// Sometimes buffs every ally instead of attacking.
    Buffer {
        chance: u32,
        status: StatusSpec,
        cooldown: u32,
    },
    /// Sometimes debuffs the policy target instead of attacking.
    Debuffer {
        chance: u32,
        status: StatusSpec,
        cooldown: u32,
    },
    /// Sometimes heals allies when one is under `threshold_pct` health.
    Healer {
        chance: u32,
        amount: u32,
        threshold_pct: u32,
        cooldown: u32,
    },
    /// Attacks hit the target and opponents in adjacent lanes.
    Splash,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub policy: TargetPolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub archetype: Archetype,
}

/// Counters an archetype carries between turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchetypeMemory {
    /// Turns spent charging; 0 when not charging.
    pub charge: u32,
    /// Owner turns left before a support ability can be used again.
    pub support_cooldown: u32,
}

/// A command plus the memory to commit if the command is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub command: ActionCommand,
    pub memory: ArchetypeMemory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyBrain {
    pub spec: EnemySpec,
    pub memory: ArchetypeMemory,
}

impl EnemyBrain {
    pub fn new(spec: EnemySpec) -> Self {
        Self {
            spec,
            memory: ArchetypeMemory::default(),
        }
    }

    /// Runs the archetype tree for `unit` against `state`.
    ///
    /// Returns `None` when the tree settles on nothing (no target, no
    /// allowance, or a tank whose release found no one to hit).
    pub fn decide(&self, state: &BattleState, unit: UnitId) -> Option<Decision> {
        let mut board = Blackboard::new(state, unit, self.spec.policy, self.memory)?;
        let tree = archetype::build(&self.spec.archetype);
        if tree.tick(&mut board).is_failure() {
            return None;
        }
        let memory = board.memory;
        board.into_command().map(|command| Decision { command, memory })
    }

    pub fn commit(&mut self, memory: ArchetypeMemory) {
        self.memory = memory;
    }

    pub fn tick_cooldowns(&mut self) {
        self.memory.support_cooldown = self.memory.support_cooldown.saturating_sub(1);
    }

    /// Stun side effect: an interrupted charge starts over.
    pub fn reset_charge(&mut self) {
        self.memory.charge = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;
    use crate::state::Lane;

    fn candidates(health: &[u32]) -> Vec<Candidate> {
        health
            .iter()
            .enumerate()
            .map(|(i, hp)| Candidate {
                id: UnitId(i as u32),
                lane: Lane::Middle,
                health: *hp,
                max_health: 20,
            })
            .collect()
    }

    fn pick(policy: TargetPolicy, health: &[u32]) -> Option<UnitId> {
        select_target(policy, &candidates(health), &PcgRng, 11)
    }

    #[test]
    fn aggressive_picks_lowest_health_first_on_tie() {
        assert_eq!(pick(TargetPolicy::Aggressive, &[7, 3, 3, 9]), Some(UnitId(1)));
    }

    #[test]
    fn defensive_picks_highest_health_first_on_tie() {
        assert_eq!(pick(TargetPolicy::Defensive, &[9, 3, 9]), Some(UnitId(0)));
    }

    #[test]
    fn balanced_picks_closest_to_mean() {
        // mean = 6
        assert_eq!(pick(TargetPolicy::Balanced, &[2, 7, 9]), Some(UnitId(1)));
        // mean = 5, both 4 and 6 are one away
        assert_eq!(pick(TargetPolicy::Balanced, &[4, 6]), Some(UnitId(0)));
    }

    #[test]
    fn random_is_reproducible_and_in_range() {
        let a = pick(TargetPolicy::Random, &[1, 2, 3, 4]);
        let b = pick(TargetPolicy::Random, &[1, 2, 3, 4]);
        assert_eq!(a, b);
        assert!(a.is_some_and(|id| id.0 < 4));
    }

    #[test]
    fn no_candidates_no_target() {
        assert_eq!(pick(TargetPolicy::Aggressive, &[]), None);
    }

    #[test]
    fn cooldown_ticks_down_to_zero() {
        let mut brain = EnemyBrain::new(EnemySpec::default());
        brain.memory.support_cooldown = 1;
        brain.tick_cooldowns();
        brain.tick_cooldowns();
        assert_eq!(brain.memory.support_cooldown, 0);
    }
}
