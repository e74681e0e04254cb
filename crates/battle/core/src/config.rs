/// Battle rules and tunable parameters.
///
/// Loaded from TOML by `battle-content`; every field has a default so a
/// partial file only overrides what it names.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Cap of each team's shared action-point pool; refilled at round start.
    pub action_point_max: u32,

    /// Attacks (and abilities) each unit gets per round. Flat reset, no carry-over.
    pub base_attack_allowance: u32,

    /// Upper bound for the attack allowance when effects grant extra attacks.
    pub attack_allowance_max: u32,

    /// Action points paid to draw one mask.
    pub draw_cost: u32,

    /// Action points paid to trigger the equipped mask's OnActivate effects.
    pub activate_cost: u32,

    /// Maximum masks a hand can hold.
    pub hand_limit: usize,

    /// Masks dealt to each team with a deck at initialization.
    pub opening_hand: usize,

    /// Base seed for every random decision in the battle.
    pub game_seed: u64,

    /// Round cap. When reached the team with more total health wins and ties
    /// go to the enemy.
    pub max_rounds: u32,

    /// Presentation hints attached to resolution steps.
    pub step_timings: StepTimings,
}

impl BattleConfig {
    // ===== compile-time constants =====
    /// Status slots per unit (one per status kind).
    pub const MAX_STATUS_EFFECTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ACTION_POINT_MAX: u32 = 3;
    pub const DEFAULT_BASE_ATTACK_ALLOWANCE: u32 = 1;
    pub const DEFAULT_ATTACK_ALLOWANCE_MAX: u32 = 3;
    pub const DEFAULT_DRAW_COST: u32 = 1;
    pub const DEFAULT_ACTIVATE_COST: u32 = 1;
    pub const DEFAULT_HAND_LIMIT: usize = 5;
    pub const DEFAULT_OPENING_HAND: usize = 3;
    pub const DEFAULT_MAX_ROUNDS: u32 = 200;

    pub fn new() -> Self {
        Self {
            action_point_max: Self::DEFAULT_ACTION_POINT_MAX,
            base_attack_allowance: Self::DEFAULT_BASE_ATTACK_ALLOWANCE,
            attack_allowance_max: Self::DEFAULT_ATTACK_ALLOWANCE_MAX,
            draw_cost: Self::DEFAULT_DRAW_COST,
            activate_cost: Self::DEFAULT_ACTIVATE_COST,
            hand_limit: Self::DEFAULT_HAND_LIMIT,
            opening_hand: Self::DEFAULT_OPENING_HAND,
            game_seed: 0,
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
            step_timings: StepTimings::default(),
        }
    }

    pub fn with_seed(mut self, game_seed: u64) -> Self {
        self.game_seed = game_seed;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Milliseconds a presentation layer may spend on each resolution step.
///
/// The engine never sleeps; these values travel with each step as a hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StepTimings {
    pub move_ms: u32,
    pub strike_ms: u32,
    pub mask_ms: u32,
    pub ability_ms: u32,
}

impl Default for StepTimings {
    fn default() -> Self {
        Self {
            move_ms: 250,
            strike_ms: 150,
            mask_ms: 200,
            ability_ms: 300,
        }
    }
}
