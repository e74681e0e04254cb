//! Deterministic random number generation.
//!
//! Every probabilistic branch in a battle (archetype rolls, the Random
//! targeting policy, deck shuffles) derives its seed from
//! `(game_seed, round, unit, context)` through [`compute_seed`]. Nothing keeps
//! hidden generator state, so asking the same question twice yields the same
//! answer. That is what lets an enemy preview published at round start match
//! the decision the enemy takes later in the round.

/// RNG oracle for deterministic random number generation.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn pick_index(&self, seed: u64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u32(seed) as usize) % len
    }

    /// Fisher-Yates shuffle where swap `i` draws from `compute_seed(seed, i, ..)`.
    fn shuffle<T>(&self, seed: u64, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let draw = self.next_u32(compute_seed(
                seed,
                i as u64,
                0,
                SeedContext::Shuffle as u32,
            ));
            let j = (draw as usize) % (i + 1);
            items.swap(i, j);
        }
    }
}

/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Separates independent random streams that share the same round and unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum SeedContext {
    /// Enemy decision rolls; the n-th roll of a decision adds `n`.
    Decision = 0x100,
    /// Random targeting policy.
    Targeting = 0x200,
    /// Deck reshuffles and the opening shuffle.
    Shuffle = 0x300,
}

/// Mixes the seed inputs with SplitMix64/FxHash style multipliers and a final
/// avalanche step.
pub fn compute_seed(game_seed: u64, nonce: u64, actor: u32, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
