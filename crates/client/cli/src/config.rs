//! CLI configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Everything the headless client needs to run one battle.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub encounter: String,
    pub seed: u64,
    pub think_delay: Duration,
    pub pace_steps: bool,
    pub data_dir: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            encounter: "skirmish".to_owned(),
            seed: 0,
            think_delay: Duration::ZERO,
            pace_steps: false,
            data_dir: None,
            session_id: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_ENCOUNTER` - Encounter id to play (default: skirmish)
    /// - `BATTLE_SEED` - Game seed (default: random)
    /// - `BATTLE_THINK_MS` - Enemy think delay in milliseconds (default: 0)
    /// - `BATTLE_PACE_STEPS` - Sleep for each step's timing hint (default: false)
    /// - `BATTLE_DATA_DIR` - Load content from this directory instead of the embedded data
    /// - `BATTLE_SESSION_ID` - Session identifier for log files (default: auto-generated)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(encounter) = env::var("BATTLE_ENCOUNTER") {
            config.encounter = encounter;
        }

        config.seed = read_env::<u64>("BATTLE_SEED").unwrap_or_else(rand::random);

        if let Some(ms) = read_env::<u64>("BATTLE_THINK_MS") {
            config.think_delay = Duration::from_millis(ms);
        }

        if let Some(pace) = read_env::<bool>("BATTLE_PACE_STEPS") {
            config.pace_steps = pace;
        } else if env::var("BATTLE_PACE_STEPS").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.pace_steps = true;
        }

        config.data_dir = env::var("BATTLE_DATA_DIR").ok().map(PathBuf::from);
        config.session_id = env::var("BATTLE_SESSION_ID").ok();

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
